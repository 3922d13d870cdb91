//! Core schema model types.
//!
//! A [`Registry`] holds every [`Schema`] a flattening pass may reach. Schemas
//! refer to each other by name through [`FieldType::Nested`], so nesting is
//! resolved against the registry rather than by ownership; this keeps cyclic
//! graphs representable so that the walker can reject them explicitly.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::value::{Record, Value};

/// The scalar kinds a leaf field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// Text.
    Str,
    /// Signed integer.
    Int,
    /// Floating point; integers are accepted and widened.
    Float,
    /// Boolean.
    Bool,
    /// ISO-8601 date-time, carried as text.
    DateTime,
    /// Anything; no validation.
    Any,
}

impl ScalarKind {
    /// Returns the type text for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Str => "str",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Any => "any",
        }
    }

    /// Looks a kind up by its type text.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" => Some(ScalarKind::Str),
            "int" => Some(ScalarKind::Int),
            "float" => Some(ScalarKind::Float),
            "bool" => Some(ScalarKind::Bool),
            "datetime" => Some(ScalarKind::DateTime),
            "any" => Some(ScalarKind::Any),
            _ => None,
        }
    }

    /// Checks `value` against this kind, widening integers to floats.
    ///
    /// Returns `None` if the value does not fit.
    #[must_use]
    pub fn coerce(self, value: Value) -> Option<Value> {
        match (self, value) {
            (ScalarKind::Any, v) => Some(v),
            (ScalarKind::Str | ScalarKind::DateTime, v @ Value::Str(_)) => Some(v),
            (ScalarKind::Int, v @ Value::Int(_)) => Some(v),
            (ScalarKind::Float, v @ Value::Float(_)) => Some(v),
            #[allow(clippy::cast_precision_loss)]
            (ScalarKind::Float, Value::Int(i)) => Some(Value::Float(i as f64)),
            (ScalarKind::Bool, v @ Value::Bool(_)) => Some(v),
            _ => None,
        }
    }
}

/// A scalar leaf type, optionally nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalarType {
    /// The underlying kind.
    pub kind: ScalarKind,
    /// Whether `None` is an accepted value.
    pub optional: bool,
}

impl ScalarType {
    /// A non-optional scalar of `kind`.
    #[must_use]
    pub fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    /// An optional scalar of `kind`.
    #[must_use]
    pub fn optional(kind: ScalarKind) -> Self {
        Self {
            kind,
            optional: true,
        }
    }

    /// Parses command-line text into a value of this type.
    ///
    /// For optional types the text `None` (and the empty string) yields
    /// [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] if the text is not a valid literal.
    pub fn parse_value(&self, text: &str) -> Result<Value, SchemaError> {
        if self.optional && (text.is_empty() || text == "None") {
            return Ok(Value::Null);
        }
        let parse_error = || SchemaError::Parse {
            text: text.to_owned(),
            expected: self.to_string(),
        };
        match self.kind {
            ScalarKind::Str | ScalarKind::DateTime | ScalarKind::Any => Ok(Value::from(text)),
            ScalarKind::Int => text.trim().parse().map(Value::Int).map_err(|_| parse_error()),
            ScalarKind::Float => text
                .trim()
                .parse()
                .map(Value::Float)
                .map_err(|_| parse_error()),
            ScalarKind::Bool => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "y" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "n" | "off" => Ok(Value::Bool(false)),
                _ => Err(parse_error()),
            },
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "Optional[{}]", self.kind.as_str())
        } else {
            f.write_str(self.kind.as_str())
        }
    }
}

/// The declared type of a field or parameter.
///
/// Resolved once, when the schema is defined: a field is either a scalar
/// leaf or a reference to another schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// A scalar leaf.
    Scalar(ScalarType),
    /// A nested schema, by name.
    Nested(String),
}

impl FieldType {
    /// Shorthand for a non-optional scalar.
    #[must_use]
    pub fn scalar(kind: ScalarKind) -> Self {
        FieldType::Scalar(ScalarType::new(kind))
    }

    /// Shorthand for an optional scalar.
    #[must_use]
    pub fn optional(kind: ScalarKind) -> Self {
        FieldType::Scalar(ScalarType::optional(kind))
    }

    /// Shorthand for a nested schema reference.
    pub fn nested(schema: impl Into<String>) -> Self {
        FieldType::Nested(schema.into())
    }

    /// Returns the nested schema name, if this type is one.
    #[must_use]
    pub fn as_nested(&self) -> Option<&str> {
        match self {
            FieldType::Nested(name) => Some(name),
            FieldType::Scalar(_) => None,
        }
    }

    /// Returns true if this type refers to a schema.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.as_nested().is_some()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(scalar) => write!(f, "{scalar}"),
            FieldType::Nested(name) => f.write_str(name),
        }
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if let Some(inner) = text
            .strip_prefix("Optional[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            // Optional schemas are not flattenable; only scalars may be wrapped.
            return ScalarKind::from_name(inner.trim())
                .map(FieldType::optional)
                .ok_or_else(|| SchemaError::InvalidType(s.to_owned()));
        }
        if let Some(kind) = ScalarKind::from_name(text) {
            return Ok(FieldType::scalar(kind));
        }
        let is_identifier = text
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && text.chars().all(|c| c.is_alphanumeric() || c == '_');
        if is_identifier {
            Ok(FieldType::nested(text))
        } else {
            Err(SchemaError::InvalidType(s.to_owned()))
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.to_string()
    }
}

/// The default-value state of a field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDefault {
    /// No default; a value must be supplied.
    Required,
    /// Optional, defaulting to `None`.
    Null,
    /// Defaults to the given literal.
    Literal(Value),
    /// The schema gave no usable default metadata; treated as required.
    #[default]
    Unspecified,
}

impl FieldDefault {
    /// Returns true if the field has no default value to fall back on.
    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(self, FieldDefault::Required | FieldDefault::Unspecified)
    }

    /// Returns the default value, if any.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        match self {
            FieldDefault::Null => Some(Value::Null),
            FieldDefault::Literal(v) => Some(v.clone()),
            FieldDefault::Required | FieldDefault::Unspecified => None,
        }
    }
}

/// One named, typed member of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Bare field name, unique within its schema.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: FieldType,
    /// Default-value state.
    #[serde(default)]
    pub default: FieldDefault,
    /// Human-readable description, surfaced as help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether an interactive front-end should always prompt for this field.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prompt: bool,
}

impl Field {
    /// A required field.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: FieldDefault::Required,
            description: None,
            prompt: false,
        }
    }

    /// Sets a literal default.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Literal(value.into());
        self
    }

    /// Makes the field optional with a `None` default.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.default = FieldDefault::Null;
        self
    }

    /// Drops all default metadata.
    #[must_use]
    pub fn unspecified(mut self) -> Self {
        self.default = FieldDefault::Unspecified;
        self
    }

    /// Attaches a description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Requests an interactive prompt even when a default exists.
    #[must_use]
    pub fn prompt(mut self) -> Self {
        self.prompt = true;
        self
    }

    /// Checks a supplied value against the declared type.
    fn admit(&self, schema: &str, value: Value) -> Result<Value, SchemaError> {
        let mismatch = |found: &Value| SchemaError::TypeMismatch {
            schema: schema.to_owned(),
            field: self.name.clone(),
            expected: self.ty.to_string(),
            found: found.kind_name().to_owned(),
        };
        if value.is_null() {
            let nullable = matches!(self.ty, FieldType::Scalar(s) if s.optional)
                || self.default == FieldDefault::Null;
            return if nullable {
                Ok(Value::Null)
            } else {
                Err(mismatch(&value))
            };
        }
        match &self.ty {
            FieldType::Scalar(scalar) => {
                let found = mismatch(&value);
                scalar.kind.coerce(value).ok_or(found)
            }
            FieldType::Nested(name) if value.is_record_of(name) => Ok(value),
            FieldType::Nested(_) => Err(mismatch(&value)),
        }
    }
}

/// A named record type with ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Schema (type) name.
    pub name: String,
    /// Optional documentation.
    pub doc: Option<String>,
    fields: IndexMap<String, Field>,
}

impl Schema {
    /// Starts building a schema named `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            doc: None,
            fields: Vec::new(),
        }
    }

    /// Iterates the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Looks a field up by bare name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds a record from field values keyed by bare name.
    ///
    /// Missing fields take their defaults; keys that are not fields of this
    /// schema are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingField`] for a required field without a
    /// value and [`SchemaError::TypeMismatch`] for a value (supplied or
    /// defaulted) of the wrong kind.
    pub fn construct(&self, mut values: IndexMap<String, Value>) -> Result<Record, SchemaError> {
        let mut record = Record::new(self.name.clone());
        for field in self.fields.values() {
            let supplied = values
                .shift_remove(&field.name)
                .or_else(|| field.default.value())
                .ok_or_else(|| SchemaError::MissingField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                })?;
            let value = field.admit(&self.name, supplied)?;
            record.fields.insert(field.name.clone(), value);
        }
        Ok(record)
    }
}

/// Builder for [`Schema`]; rejects duplicate field names on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    doc: Option<String>,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Sets the documentation string.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several fields.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateField`] if a field name repeats and
    /// [`SchemaError::TypeMismatch`] if a literal default does not fit its
    /// field's type.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for mut field in self.fields {
            if fields.contains_key(&field.name) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name,
                    field: field.name,
                });
            }
            // Literal defaults are stored already coerced to the field type.
            if let FieldDefault::Literal(value) = &field.default {
                let admitted = field.admit(&self.name, value.clone())?;
                field.default = FieldDefault::Literal(admitted);
            }
            fields.insert(field.name.clone(), field);
        }
        Ok(Schema {
            name: self.name,
            doc: self.doc,
            fields,
        })
    }
}

/// The set of schemas a flattening pass resolves nested references against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    schemas: IndexMap<String, Schema>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from schemas, checking names and references.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateSchema`] for a repeated name and
    /// [`SchemaError::UnknownSchema`] for a dangling nested reference.
    pub fn from_schemas(schemas: impl IntoIterator<Item = Schema>) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for schema in schemas {
            registry.insert(schema)?;
        }
        registry.check_references()?;
        Ok(registry)
    }

    /// Adds a schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateSchema`] if the name is taken.
    pub fn insert(&mut self, schema: Schema) -> Result<(), SchemaError> {
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::DuplicateSchema(schema.name));
        }
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Looks a schema up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Looks a schema up by name, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSchema`] if no schema has that name.
    pub fn resolve(&self, name: &str) -> Result<&Schema, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_owned()))
    }

    /// Iterates the schemas in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Returns the number of schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no schemas are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Verifies that every nested field refers to a registered schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSchema`] for the first dangling reference.
    pub fn check_references(&self) -> Result<(), SchemaError> {
        for schema in self.schemas.values() {
            for field in schema.fields() {
                if let Some(nested) = field.ty.as_nested() {
                    self.resolve(nested)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet() -> Result<Schema, SchemaError> {
        Schema::builder("Pet")
            .field(Field::new("name", FieldType::scalar(ScalarKind::Str)))
            .field(Field::new("age", FieldType::scalar(ScalarKind::Float)).with_default(1_i64))
            .field(Field::new("tag", FieldType::optional(ScalarKind::Str)).nullable())
            .build()
    }

    #[test]
    fn type_text_round_trips() -> Result<(), SchemaError> {
        for text in ["str", "int", "Optional[bool]", "Hero", "datetime"] {
            let ty: FieldType = text.parse()?;
            assert_eq!(ty.to_string(), text);
        }
        assert!("Optional[Hero]".parse::<FieldType>().is_err());
        assert!("List[int]".parse::<FieldType>().is_err());
        Ok(())
    }

    #[test]
    fn construct_fills_defaults_and_ignores_extras() -> Result<(), SchemaError> {
        let schema = pet()?;
        let mut values = IndexMap::new();
        values.insert("name".to_owned(), Value::from("Rex"));
        values.insert("owner".to_owned(), Value::from("ignored"));
        let record = schema.construct(values)?;
        assert_eq!(record.get("name"), Some(&Value::from("Rex")));
        assert_eq!(record.get("age"), Some(&Value::Float(1.0)));
        assert_eq!(record.get("tag"), Some(&Value::Null));
        assert_eq!(record.get("owner"), None);
        Ok(())
    }

    #[test]
    fn construct_reports_missing_and_mismatched() -> Result<(), SchemaError> {
        let schema = pet()?;
        assert_eq!(
            schema.construct(IndexMap::new()),
            Err(SchemaError::MissingField {
                schema: "Pet".into(),
                field: "name".into()
            })
        );
        let mut values = IndexMap::new();
        values.insert("name".to_owned(), Value::Int(3));
        assert!(matches!(
            schema.construct(values),
            Err(SchemaError::TypeMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn literal_defaults_are_checked_and_coerced() -> Result<(), SchemaError> {
        let schema = pet()?;
        assert_eq!(
            schema.field("age").map(|f| &f.default),
            Some(&FieldDefault::Literal(Value::Float(1.0)))
        );

        let result = Schema::builder("Crate")
            .field(Field::new("count", FieldType::scalar(ScalarKind::Int)).with_default("many"))
            .build();
        assert_eq!(
            result,
            Err(SchemaError::TypeMismatch {
                schema: "Crate".into(),
                field: "count".into(),
                expected: "int".into(),
                found: "str".into(),
            })
        );
        Ok(())
    }

    #[test]
    fn defaults_pass_the_type_check_on_construct() -> Result<(), SchemaError> {
        let mut schema = pet()?;
        // Bypass the builder to reach construct with an unchecked default.
        if let Some(age) = schema.fields.get_mut("age") {
            age.default = FieldDefault::Literal(Value::from("old"));
        }
        let mut values = IndexMap::new();
        values.insert("name".to_owned(), Value::from("Rex"));
        assert!(matches!(
            schema.construct(values),
            Err(SchemaError::TypeMismatch { ref field, .. }) if field == "age"
        ));
        Ok(())
    }

    #[test]
    fn duplicate_fields_rejected() {
        let result = Schema::builder("Twice")
            .field(Field::new("a", FieldType::scalar(ScalarKind::Int)))
            .field(Field::new("a", FieldType::scalar(ScalarKind::Str)))
            .build();
        assert!(matches!(result, Err(SchemaError::DuplicateField { .. })));
    }

    #[test]
    fn dangling_reference_rejected() -> Result<(), SchemaError> {
        let owner = Schema::builder("Owner")
            .field(Field::new("pet", FieldType::nested("Missing")))
            .build()?;
        assert_eq!(
            Registry::from_schemas([owner]),
            Err(SchemaError::UnknownSchema("Missing".into()))
        );
        Ok(())
    }

    #[test]
    fn bool_and_optional_parsing() -> Result<(), SchemaError> {
        let flag = ScalarType::new(ScalarKind::Bool);
        assert_eq!(flag.parse_value("yes")?, Value::Bool(true));
        assert!(flag.parse_value("maybe").is_err());
        let alias = ScalarType::optional(ScalarKind::Str);
        assert_eq!(alias.parse_value("None")?, Value::Null);
        assert_eq!(alias.parse_value("Bob")?, Value::from("Bob"));
        Ok(())
    }
}
