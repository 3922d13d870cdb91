//! The decoration entry point and the generated callable.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};
use unfurl_schema::{FieldDefault, ParamDefault, Registry, Signature, Value};

use crate::condense::condense;
use crate::error::{CallError, ExpandError};
use crate::options::ExpandOptions;
use crate::signature::{self, Synthesis};
use crate::walker::{FlatField, ParentLinks};

/// Keyword arguments by parameter name.
pub type Kwargs = IndexMap<String, Value>;

type Body<R> = dyn Fn(Kwargs) -> anyhow::Result<R> + Send + Sync;

/// A function to be expanded: its signature plus a body taking keyword
/// arguments keyed by original parameter name.
pub struct Function<R> {
    signature: Signature,
    body: Box<Body<R>>,
}

impl<R> Function<R> {
    /// Wraps `body` under `signature`.
    pub fn new<F>(signature: Signature, body: F) -> Self
    where
        F: Fn(Kwargs) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Box::new(body),
        }
    }

    /// Returns the declared signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Invokes the body directly.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Body`] if the body fails.
    pub fn call(&self, kwargs: Kwargs) -> Result<R, CallError> {
        (self.body)(kwargs).map_err(CallError::Body)
    }
}

impl<R> fmt::Debug for Function<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Call arguments for an expanded function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    /// Values bound to flattened parameters in signature order.
    pub positional: Vec<Value>,
    /// Values keyed by flattened name, or by an original schema-typed
    /// parameter name when passing an already-built record.
    pub keywords: Kwargs,
}

impl Arguments {
    /// No arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional value.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adds a keyword value.
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }
}

impl From<Kwargs> for Arguments {
    fn from(keywords: Kwargs) -> Self {
        Self {
            positional: Vec::new(),
            keywords,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |args, (name, value)| args.kwarg(name, value))
    }
}

/// Builds expanded callables with a fixed set of options.
///
/// ```
/// use std::sync::Arc;
/// use unfurl::{Arguments, Expander, Function};
/// use unfurl_schema::{Field, FieldType, Parameter, Registry, ScalarKind, Schema, Signature};
///
/// let pet = Schema::builder("Pet")
///     .field(Field::new("name", FieldType::scalar(ScalarKind::Str)))
///     .build()?;
/// let registry = Arc::new(Registry::from_schemas([pet])?);
/// let adopt = Function::new(
///     Signature::new("adopt").param(Parameter::typed("pet", FieldType::nested("Pet"))),
///     |kwargs| Ok(kwargs["pet"].to_string()),
/// );
///
/// let expanded = Expander::default().expand(registry, adopt)?;
/// assert_eq!(expanded.signature().to_string(), "adopt(pet__name: str)");
/// let shown = expanded.call(Arguments::new().kwarg("pet__name", "Rex"))?;
/// assert_eq!(shown, r#"Pet(name="Rex")"#);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Expander {
    options: ExpandOptions,
}

impl Expander {
    /// An expander using `options`.
    #[must_use]
    pub fn new(options: ExpandOptions) -> Self {
        Self { options }
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }

    /// Flattens `function` against `registry`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExpandError`] for unusable options or a configuration
    /// error in the schemas reached; no callable is produced in that case.
    pub fn expand<R>(
        &self,
        registry: Arc<Registry>,
        function: Function<R>,
    ) -> Result<Expanded<R>, ExpandError> {
        let synthesis = signature::build(&registry, function.signature(), &self.options)?;
        let slots = record_slots(&registry, function.signature(), &synthesis, &self.options);
        debug!(
            function = %function.signature().name,
            params = synthesis.signature.params.len(),
            rounds = synthesis.rounds,
            slots = slots.len(),
            "expanded function"
        );
        Ok(Expanded {
            registry,
            options: self.options.clone(),
            function,
            synthesis,
            slots,
        })
    }
}

/// A schema-typed entry that a call may fill with an already-built record.
#[derive(Debug, Clone, PartialEq)]
struct RecordSlot {
    schema: String,
    /// The owning field defaults to `None`, so `Null` is accepted too.
    nullable: bool,
}

/// Collects every schema-typed key the walker expanded away: the original
/// parameters plus each nested field along the way.
fn record_slots(
    registry: &Registry,
    original: &Signature,
    synthesis: &Synthesis,
    options: &ExpandOptions,
) -> IndexMap<String, RecordSlot> {
    let mut slots = IndexMap::new();
    for param in &original.params {
        if let Some(schema) = param.nested_schema() {
            slots.insert(
                param.name.clone(),
                RecordSlot {
                    schema: schema.to_owned(),
                    nullable: false,
                },
            );
        }
    }
    for entry in &synthesis.fields {
        let keys = entry.ancestor_keys(options);
        for (depth, (key, segment)) in keys.into_iter().zip(&entry.path).enumerate() {
            if slots.contains_key(&key) {
                continue;
            }
            let nullable = depth
                .checked_sub(1)
                .and_then(|owner| registry.get(&entry.path[owner].schema))
                .and_then(|owner| owner.field(&segment.name))
                .is_some_and(|field| field.default == FieldDefault::Null);
            slots.insert(
                key,
                RecordSlot {
                    schema: segment.schema.clone(),
                    nullable,
                },
            );
        }
    }
    slots
}

/// A function with flattened parameters.
///
/// Calls bind against the flattened signature, condense the arguments back
/// into records, and invoke the original body.
#[derive(Debug)]
pub struct Expanded<R> {
    registry: Arc<Registry>,
    options: ExpandOptions,
    function: Function<R>,
    synthesis: Synthesis,
    slots: IndexMap<String, RecordSlot>,
}

impl<R> Expanded<R> {
    /// Function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.synthesis.signature.name
    }

    /// Expanded docstring.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.synthesis.signature.doc.as_deref()
    }

    /// The flattened signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.synthesis.signature
    }

    /// Flattened entries, aligned with [`signature`](Self::signature)'s
    /// parameters.
    #[must_use]
    pub fn fields(&self) -> &[FlatField] {
        &self.synthesis.fields
    }

    /// Parent links of the flattened entries.
    #[must_use]
    pub fn parents(&self) -> &ParentLinks {
        &self.synthesis.parents
    }

    /// Walker runs needed to reach the flattened signature.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.synthesis.rounds
    }

    /// Options the function was expanded with.
    #[must_use]
    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }

    /// Registry the schemas resolve against.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The signature before flattening.
    #[must_use]
    pub fn original(&self) -> &Signature {
        self.function.signature()
    }

    /// Binds `args` against the flattened signature and fills defaults.
    ///
    /// A keyword naming a schema-typed entry that was expanded away (an
    /// original parameter such as `hero`, or a nested field such as
    /// `hero__pet`) is accepted when its value is a record of that schema,
    /// or `None` where the field defaults to `None`. The flattened
    /// parameters under it are then no longer required.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::TooManyPositional`],
    /// [`CallError::DuplicateArgument`], [`CallError::UnexpectedArgument`],
    /// or [`CallError::MissingArgument`] listing every unbound required
    /// parameter.
    pub fn bind(&self, args: Arguments) -> Result<Kwargs, CallError> {
        let signature = self.signature();
        let params = &signature.params;
        if args.positional.len() > params.len() {
            return Err(CallError::TooManyPositional {
                function: signature.name.clone(),
                max: params.len(),
                given: args.positional.len(),
            });
        }

        let mut bound: Kwargs = params
            .iter()
            .zip(args.positional)
            .map(|(param, value)| (param.name.clone(), value))
            .collect();
        let mut records = Kwargs::new();
        for (name, value) in args.keywords {
            if signature.get(&name).is_some() {
                if bound.contains_key(&name) {
                    return Err(CallError::DuplicateArgument {
                        function: signature.name.clone(),
                        name,
                    });
                }
                bound.insert(name, value);
            } else if self.is_prebuilt(&name, &value) {
                trace!(param = %name, "accepting pre-built record");
                records.insert(name, value);
            } else {
                return Err(CallError::UnexpectedArgument {
                    function: signature.name.clone(),
                    name,
                });
            }
        }

        let mut kwargs = Kwargs::with_capacity(params.len() + records.len());
        let mut missing = Vec::new();
        for (param, field) in params.iter().zip(self.fields()) {
            if let Some(value) = bound.shift_remove(&param.name) {
                kwargs.insert(param.name.clone(), value);
                continue;
            }
            match &param.default {
                ParamDefault::Value(value) => {
                    kwargs.insert(param.name.clone(), value.clone());
                }
                ParamDefault::Absent
                    if field
                        .ancestor_keys(&self.options)
                        .iter()
                        .any(|key| records.contains_key(key)) => {}
                ParamDefault::Absent => missing.push(param.name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(CallError::MissingArgument {
                function: signature.name.clone(),
                names: missing,
            });
        }
        kwargs.extend(records);
        Ok(kwargs)
    }

    /// Calls the function with flattened arguments.
    ///
    /// # Errors
    ///
    /// Returns a binding error (see [`bind`](Self::bind)),
    /// [`CallError::Construct`] if a record cannot be rebuilt, or
    /// [`CallError::Body`] if the function itself fails.
    pub fn call(&self, args: Arguments) -> Result<R, CallError> {
        let kwargs = self.bind(args)?;
        let condensed = condense(&self.registry, self.original(), &kwargs, &self.options)?;
        trace!(function = %self.name(), args = condensed.len(), "invoking");
        self.function.call(condensed)
    }

    fn is_prebuilt(&self, name: &str, value: &Value) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| value.is_record_of(&slot.schema) || (slot.nullable && value.is_null()))
    }
}
