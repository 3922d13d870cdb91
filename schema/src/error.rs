//! Errors raised while defining schemas or constructing records.

/// Failure reported by the schema layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A nested field or parameter refers to a schema the registry does not hold.
    #[error("unknown schema `{0}`")]
    UnknownSchema(String),

    /// Two schemas were registered under the same name.
    #[error("schema `{0}` is defined more than once")]
    DuplicateSchema(String),

    /// A schema declares the same field name twice.
    #[error("schema `{schema}` declares field `{field}` more than once")]
    DuplicateField {
        /// Owning schema.
        schema: String,
        /// Repeated field name.
        field: String,
    },

    /// A required field had neither a supplied value nor a default.
    #[error("schema `{schema}` is missing required field `{field}`")]
    MissingField {
        /// Schema being constructed.
        schema: String,
        /// Field without a value.
        field: String,
    },

    /// A supplied value does not fit the field's declared type.
    #[error("field `{schema}.{field}` expects {expected}, found {found}")]
    TypeMismatch {
        /// Schema being constructed.
        schema: String,
        /// Offending field.
        field: String,
        /// Declared type text.
        expected: String,
        /// Kind of the supplied value.
        found: String,
    },

    /// A type expression could not be parsed.
    #[error("invalid type expression `{0}`")]
    InvalidType(String),

    /// Command-line text could not be parsed into the declared scalar type.
    #[error("cannot parse `{text}` as {expected}")]
    Parse {
        /// Raw text.
        text: String,
        /// Declared type text.
        expected: String,
    },

    /// A registry document is not valid JSON or does not match the document shape.
    #[error("invalid registry document: {0}")]
    Document(String),
}
