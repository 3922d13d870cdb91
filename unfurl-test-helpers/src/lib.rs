//! Test-only fixtures for the unfurl crates.
//!
//! - [`models`]: the people-and-hair schema registry plus a cyclic one.
//! - [`functions`]: signatures of the functions the suites expand.
//! - [`strategies`]: proptest strategies producing records of the fixture
//!   schemas, and [`strategies::flatten_record`] to spread one back into
//!   flattened keyword arguments.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod functions;
pub mod models;
pub mod strategies;
