//! Record schema descriptors consumed by unfurl.
//!
//! The `unfurl-schema` crate is the metadata contract between a structured
//! record system and the flattening engine: named [`Schema`]s with ordered
//! [`Field`]s, the [`Registry`] that nested references resolve against,
//! dynamically typed [`Value`]s, and the [`Signature`] descriptors of the
//! functions being flattened.
//!
//! # Entry Point
//!
//! ```
//! use unfurl_schema::{Field, FieldType, Registry, ScalarKind, Schema};
//!
//! let pet = Schema::builder("Pet")
//!     .field(Field::new("name", FieldType::scalar(ScalarKind::Str)).describe("The pet's name."))
//!     .build()?;
//! let hero = Schema::builder("Hero")
//!     .field(Field::new("name", FieldType::scalar(ScalarKind::Str)))
//!     .field(Field::new("pet", FieldType::nested("Pet")))
//!     .build()?;
//! let registry = Registry::from_schemas([pet, hero])?;
//! assert_eq!(registry.len(), 2);
//! # Ok::<(), unfurl_schema::SchemaError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod document;
pub mod error;
pub mod model;
pub mod signature;
pub mod value;

pub use document::{RegistryDocument, SchemaDef};
pub use error::SchemaError;
pub use model::{
    Field, FieldDefault, FieldType, Registry, ScalarKind, ScalarType, Schema, SchemaBuilder,
};
pub use signature::{OptionMeta, ParamDefault, Parameter, Signature};
pub use value::{Record, Value};
