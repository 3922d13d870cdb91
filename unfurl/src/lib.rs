//! Flatten record-typed function parameters into leaf-field parameters.
//!
//! A function taking schema-typed parameters (records whose fields may
//! themselves be records) is exposed with one scalar parameter per leaf
//! field. Calls supply the flattened values; the records are rebuilt
//! bottom-up before the original body runs.
//!
//! # Pipeline
//!
//! 1. [`walker`] flattens the parameters into [`FlatField`]s.
//! 2. [`synth`] gives each entry its external name, default and option
//!    metadata.
//! 3. [`signature`] orders the parameters and writes the expanded docstring.
//! 4. [`condense`] rebuilds the original arguments at call time.
//!
//! [`Expander`] runs the first three once per function and returns an
//! [`Expanded`] callable that runs the fourth on every call. With the `cli`
//! feature, [`cli`] turns an expanded function into a clap command.
//!
//! ```
//! use std::sync::Arc;
//! use unfurl::{Arguments, ExpandOptions, Expander, Function};
//! use unfurl_schema::{Field, FieldType, Parameter, Registry, ScalarKind, Schema, Signature};
//!
//! let pet = Schema::builder("Pet")
//!     .field(Field::new("name", FieldType::scalar(ScalarKind::Str)))
//!     .build()?;
//! let hero = Schema::builder("Hero")
//!     .field(Field::new("name", FieldType::scalar(ScalarKind::Str)))
//!     .field(Field::new("pet", FieldType::nested("Pet")))
//!     .build()?;
//! let registry = Arc::new(Registry::from_schemas([pet, hero])?);
//!
//! let greet = Function::new(
//!     Signature::new("greet").param(Parameter::typed("hero", FieldType::nested("Hero"))),
//!     |kwargs| Ok(kwargs["hero"].to_string()),
//! );
//! let greet = Expander::new(ExpandOptions::default()).expand(registry, greet)?;
//! assert_eq!(
//!     greet.signature().to_string(),
//!     "greet(hero__name: str, hero__pet__name: str)"
//! );
//!
//! let out = greet.call(
//!     Arguments::new()
//!         .kwarg("hero__name", "Ada")
//!         .kwarg("hero__pet__name", "Rex"),
//! )?;
//! assert_eq!(out, r#"Hero(name="Ada", pet=Pet(name="Rex"))"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod condense;
pub mod error;
pub mod expand;
pub mod options;
pub mod signature;
pub mod synth;
pub mod walker;

pub use error::{CallError, ExpandError};
pub use expand::{Arguments, Expanded, Expander, Function, Kwargs};
pub use options::{ExpandOptions, DEFAULT_SEPARATOR};
pub use signature::Synthesis;
pub use walker::{FlatField, Flattened, Origin, ParentLinks, PathSegment};

pub use unfurl_schema::{
    Field, FieldDefault, FieldType, Parameter, Record, Registry, ScalarKind, ScalarType, Schema,
    SchemaError, Signature, Value,
};
