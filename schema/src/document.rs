//! JSON registry documents.
//!
//! A registry document describes schemas and the function signatures that
//! use them, so that tools can flatten functions defined outside Rust:
//!
//! ```json
//! {
//!   "schemas": [
//!     { "name": "Pet", "fields": [
//!         { "name": "name", "type": "str", "default": "required",
//!           "description": "The pet's name." } ] }
//!   ],
//!   "functions": [
//!     { "name": "get_pet", "params": [ { "name": "pet", "type": "Pet" } ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::model::{Field, Registry, Schema};
use crate::signature::Signature;

/// Serialized form of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    /// Schema name.
    pub name: String,
    /// Documentation string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Fields in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl SchemaDef {
    /// Converts the definition into a checked [`Schema`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateField`] if a field name repeats.
    pub fn into_schema(self) -> Result<Schema, SchemaError> {
        let builder = Schema::builder(self.name).fields(self.fields);
        match self.doc {
            Some(doc) => builder.doc(doc).build(),
            None => builder.build(),
        }
    }
}

impl From<&Schema> for SchemaDef {
    fn from(schema: &Schema) -> Self {
        Self {
            name: schema.name.clone(),
            doc: schema.doc.clone(),
            fields: schema.fields().cloned().collect(),
        }
    }
}

/// A registry plus function signatures, as read from or written to JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Schema definitions.
    #[serde(default)]
    pub schemas: Vec<SchemaDef>,
    /// Function signatures declared against the schemas.
    #[serde(default)]
    pub functions: Vec<Signature>,
}

impl RegistryDocument {
    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Document`] if the text is not a valid document.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(text).map_err(|e| SchemaError::Document(e.to_string()))
    }

    /// Renders the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Document`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SchemaError> {
        serde_json::to_string_pretty(self).map_err(|e| SchemaError::Document(e.to_string()))
    }

    /// Captures a registry and signatures as a document.
    #[must_use]
    pub fn from_parts(registry: &Registry, functions: &[Signature]) -> Self {
        Self {
            schemas: registry.iter().map(SchemaDef::from).collect(),
            functions: functions.to_vec(),
        }
    }

    /// Splits the document into a checked [`Registry`] and its signatures.
    ///
    /// # Errors
    ///
    /// Returns an error if a schema is malformed, a name repeats, or a
    /// nested reference (in a schema or a function parameter) is dangling.
    pub fn into_parts(self) -> Result<(Registry, Vec<Signature>), SchemaError> {
        let schemas = self
            .schemas
            .into_iter()
            .map(SchemaDef::into_schema)
            .collect::<Result<Vec<_>, _>>()?;
        let registry = Registry::from_schemas(schemas)?;
        for function in &self.functions {
            for param in &function.params {
                if let Some(nested) = param.nested_schema() {
                    registry.resolve(nested)?;
                }
            }
        }
        Ok((registry, self.functions))
    }

    /// Finds a function signature by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Signature> {
        self.functions.iter().find(|f| f.name == name)
    }
}
