//! Schema walker: schema-typed parameters → flattened leaf fields.
//!
//! The walk is level by level rather than recursive. Each pass replaces every
//! schema-typed entry of the table, in place, with that schema's immediate
//! fields; passes repeat until no schema-typed entry is left. Doing a whole
//! level at a time means every sibling insertion (and every bare-name
//! collision between them) is visible before the next level is classified.

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::trace;
use unfurl_schema::{Field, FieldType, Parameter, Registry, Schema};

use crate::error::ExpandError;
use crate::options::ExpandOptions;

/// One link of the owning-schema chain of a flattened field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Parameter or field name that held the schema.
    pub name: String,
    /// Name of the schema it held.
    pub schema: String,
}

/// Where a flattened entry came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    /// A parameter of the function being expanded.
    Parameter(Parameter),
    /// A field of a schema reached by the walk.
    Field(Field),
}

/// An entry of the flattened parameter table.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatField {
    /// Flattened key: qualified or bare, depending on the mode.
    pub key: String,
    /// Bare name of the parameter or field.
    pub name: String,
    /// Owning-schema chain, outermost first. Empty for function parameters.
    pub path: Vec<PathSegment>,
    /// Source metadata.
    pub origin: Origin,
}

impl FlatField {
    /// Seeds an entry from a function parameter.
    #[must_use]
    pub fn from_parameter(param: &Parameter) -> Self {
        Self {
            key: param.name.clone(),
            name: param.name.clone(),
            path: Vec::new(),
            origin: Origin::Parameter(param.clone()),
        }
    }

    /// Returns the declared type.
    #[must_use]
    pub fn annotation(&self) -> Option<&FieldType> {
        match &self.origin {
            Origin::Parameter(p) => p.annotation.as_ref(),
            Origin::Field(f) => Some(&f.ty),
        }
    }

    /// Returns the schema name if this entry still needs expanding.
    #[must_use]
    pub fn nested_schema(&self) -> Option<&str> {
        self.annotation().and_then(FieldType::as_nested)
    }

    /// Returns true if the entry has no default to fall back on.
    #[must_use]
    pub fn is_required(&self) -> bool {
        match &self.origin {
            Origin::Parameter(p) => !p.has_default(),
            Origin::Field(f) => f.default.is_required(),
        }
    }

    /// Returns the top-level function parameter this entry descends from.
    #[must_use]
    pub fn root(&self) -> &str {
        self.path.first().map_or(self.name.as_str(), |s| s.name.as_str())
    }

    /// Flattened keys of the schema-typed entries this entry was expanded
    /// from, outermost first. The first is always the function parameter.
    #[must_use]
    pub fn ancestor_keys(&self, options: &ExpandOptions) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(self.path.len());
        for segment in &self.path {
            let key = match keys.last() {
                Some(parent) => options.child_key(parent, &segment.name),
                None => segment.name.clone(),
            };
            keys.push(key);
        }
        keys
    }

    fn child(&self, schema: &Schema, field: &Field, options: &ExpandOptions) -> Self {
        let mut path = self.path.clone();
        path.push(PathSegment {
            name: self.name.clone(),
            schema: schema.name.clone(),
        });
        Self {
            key: options.child_key(&self.key, &field.name),
            name: field.name.clone(),
            path,
            origin: Origin::Field(field.clone()),
        }
    }

    fn type_text(&self) -> String {
        self.annotation().map(ToString::to_string).unwrap_or_default()
    }
}

/// Back-references from each inserted key to the key it was expanded from.
///
/// Used for name qualification and group labels; never for mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentLinks {
    links: IndexMap<String, ParentLink>,
}

/// A single parent link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Key of the expanded (removed) entry.
    pub parent: String,
    /// Schema whose field produced the child.
    pub schema: String,
}

impl ParentLinks {
    fn link(&mut self, child: &str, parent: &str, schema: &str) {
        self.links.insert(
            child.to_owned(),
            ParentLink {
                parent: parent.to_owned(),
                schema: schema.to_owned(),
            },
        );
    }

    /// Returns the link recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParentLink> {
        self.links.get(key)
    }

    /// Returns the number of recorded links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if nothing was expanded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Follows links upward from `key`, returning owning schema names
    /// outermost first.
    ///
    /// In bare mode a field may share its parent's key; the walk stops at the
    /// first repeated key.
    #[must_use]
    pub fn schema_chain(&self, key: &str) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut seen = Vec::new();
        let mut current = key;
        while let Some(link) = self.links.get(current) {
            if seen.contains(&current) {
                break;
            }
            seen.push(current);
            chain.push(link.schema.as_str());
            current = &link.parent;
        }
        chain.reverse();
        chain
    }
}

/// Output of a walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    /// Flattened entries; required first, then defaulted, each group in
    /// first-discovery order.
    pub fields: Vec<FlatField>,
    /// Parent links for every expanded entry.
    pub parents: ParentLinks,
}

/// Flattens the parameters of a function.
///
/// # Errors
///
/// Returns [`ExpandError::CyclicSchema`] for a self-nesting schema,
/// [`ExpandError::IncompatibleCollision`] or
/// [`ExpandError::DuplicateParameter`] for colliding names, and
/// [`ExpandError::Schema`] for an unknown schema.
pub fn collect_leaf_fields(
    registry: &Registry,
    params: &[Parameter],
    options: &ExpandOptions,
) -> Result<Flattened, ExpandError> {
    let seed = Flattened {
        fields: params.iter().map(FlatField::from_parameter).collect(),
        parents: ParentLinks::default(),
    };
    expand(registry, seed, options)
}

/// Continues a walk from a previous (possibly depth-limited) result.
///
/// # Errors
///
/// See [`collect_leaf_fields`].
pub fn expand(
    registry: &Registry,
    flattened: Flattened,
    options: &ExpandOptions,
) -> Result<Flattened, ExpandError> {
    let Flattened {
        fields,
        mut parents,
    } = flattened;

    let mut table = IndexMap::with_capacity(fields.len());
    for entry in fields {
        insert(&mut table, entry, options)?;
    }

    let mut pass = 0usize;
    while table.values().any(|e: &FlatField| e.nested_schema().is_some()) {
        if options.max_depth.is_some_and(|limit| pass >= limit) {
            break;
        }
        pass += 1;

        let mut next = IndexMap::with_capacity(table.len());
        for entry in table.into_values() {
            let Some(schema_name) = entry.nested_schema() else {
                insert(&mut next, entry, options)?;
                continue;
            };
            let schema = registry.resolve(schema_name)?;
            if entry.path.iter().any(|s| s.schema == schema.name) {
                let mut chain: Vec<String> = entry.path.iter().map(|s| s.schema.clone()).collect();
                chain.push(schema.name.clone());
                return Err(ExpandError::CyclicSchema { chain });
            }
            // The expanded entry itself is dropped; it only reappears if one
            // of its own fields carries the same key.
            for field in schema.fields() {
                let child = entry.child(schema, field, options);
                parents.link(&child.key, &entry.key, &schema.name);
                insert(&mut next, child, options)?;
            }
        }
        trace!(pass, entries = next.len(), "expanded one schema level");
        table = next;
    }

    let (required, defaulted): (Vec<_>, Vec<_>) =
        table.into_values().partition(FlatField::is_required);
    Ok(Flattened {
        fields: required.into_iter().chain(defaulted).collect(),
        parents,
    })
}

/// Inserts an entry, resolving a key collision per the naming mode.
fn insert(
    table: &mut IndexMap<String, FlatField>,
    entry: FlatField,
    options: &ExpandOptions,
) -> Result<(), ExpandError> {
    let mut slot = match table.entry(entry.key.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(entry);
            return Ok(());
        }
        Entry::Occupied(slot) => slot,
    };
    if options.include_parent_name {
        return Err(ExpandError::DuplicateParameter(entry.key));
    }
    let existing = slot.get_mut();
    if existing.annotation() != entry.annotation() {
        return Err(ExpandError::IncompatibleCollision {
            name: entry.key.clone(),
            first: existing.type_text(),
            second: entry.type_text(),
        });
    }
    // Later occurrence wins, keeping the earlier position.
    *existing = entry;
    Ok(())
}
