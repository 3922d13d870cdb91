//! Signature synthesis: flattened fields → the expanded callable's signature.

use tracing::trace;
use unfurl_schema::{Parameter, Registry, Signature};

use crate::error::ExpandError;
use crate::options::ExpandOptions;
use crate::synth::synthesize;
use crate::walker::{self, FlatField, Flattened, ParentLinks};

/// Result of synthesizing an expanded signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// The external signature.
    pub signature: Signature,
    /// Flattened entries, aligned index-for-index with `signature.params`.
    pub fields: Vec<FlatField>,
    /// Parent links gathered across all rounds.
    pub parents: ParentLinks,
    /// Number of walker runs needed to reach a signature without
    /// schema-typed parameters.
    pub rounds: usize,
}

/// Builds the flattened signature for `original`.
///
/// Parameters without defaults come first, then defaulted ones, each group
/// in walker order. When the walker is depth-limited and the result still
/// exposes a schema-typed parameter, the walk resumes on that result until
/// none remains.
///
/// # Errors
///
/// Returns any configuration error found by the walker, or
/// [`ExpandError::InvalidOptions`] for unusable options.
pub fn build(
    registry: &Registry,
    original: &Signature,
    options: &ExpandOptions,
) -> Result<Synthesis, ExpandError> {
    options.validate()?;

    let mut flattened = walker::collect_leaf_fields(registry, &original.params, options)?;
    let mut rounds = 1;
    loop {
        let (signature, fields) = assemble(original, flattened.fields, options);
        if !signature.has_nested() {
            return Ok(Synthesis {
                signature,
                fields,
                parents: flattened.parents,
                rounds,
            });
        }
        trace!(round = rounds, "signature still has schema-typed parameters");
        flattened = walker::expand(
            registry,
            Flattened {
                fields,
                parents: flattened.parents,
            },
            options,
        )?;
        rounds += 1;
    }
}

/// Orders the synthesized parameters and writes the expanded docstring.
fn assemble(
    original: &Signature,
    fields: Vec<FlatField>,
    options: &ExpandOptions,
) -> (Signature, Vec<FlatField>) {
    let (required, defaulted): (Vec<_>, Vec<_>) = fields
        .into_iter()
        .map(|entry| (synthesize(&entry, options), entry))
        .partition(|(param, _)| !param.has_default());
    let (params, fields): (Vec<Parameter>, Vec<FlatField>) =
        required.into_iter().chain(defaulted).unzip();

    let signature = Signature {
        name: original.name.clone(),
        doc: Some(expanded_doc(original, &params)),
        params,
    };
    (signature, fields)
}

/// Original docstring plus a line listing the accepted flattened names.
fn expanded_doc(original: &Signature, params: &[Parameter]) -> String {
    let accepted = params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let replaced = original
        .params
        .iter()
        .filter(|p| p.nested_schema().is_some())
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>();
    let doc = original.doc.as_deref().unwrap_or_default();
    if replaced.is_empty() {
        format!("{doc}\nalso accepts [{accepted}]")
    } else {
        format!("{doc}\nalso accepts [{accepted}] in place of {}", replaced.join(", "))
    }
}
