//! Decoration-time and call-time errors.

use unfurl_schema::SchemaError;

/// A configuration error, reported when a function is expanded.
///
/// Any of these aborts the decoration; no callable is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpandError {
    /// A schema nests itself, directly or transitively.
    #[error("schema cycle: {}", .chain.join(" -> "))]
    CyclicSchema {
        /// Schema names from the outermost ancestor to the repeated schema.
        chain: Vec<String>,
    },

    /// Bare names collided between fields of different declared types.
    #[error("flattened parameter `{name}` is declared as both `{first}` and `{second}`")]
    IncompatibleCollision {
        /// The colliding bare name.
        name: String,
        /// Type text of the earlier occurrence.
        first: String,
        /// Type text of the later occurrence.
        second: String,
    },

    /// A qualified name was produced twice.
    #[error("flattened parameter `{0}` is produced more than once")]
    DuplicateParameter(String),

    /// The options are unusable.
    #[error("invalid expansion options: {0}")]
    InvalidOptions(String),

    /// A schema could not be resolved.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A failure while invoking an expanded function.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Flattened parameters without defaults were not supplied.
    #[error("{function}() missing required argument(s): {}", .names.join(", "))]
    MissingArgument {
        /// Expanded function name.
        function: String,
        /// Missing parameter names, in signature order.
        names: Vec<String>,
    },

    /// A keyword matched no parameter.
    #[error("{function}() got an unexpected keyword argument `{name}`")]
    UnexpectedArgument {
        /// Expanded function name.
        function: String,
        /// The unknown keyword.
        name: String,
    },

    /// A parameter received both a positional and a keyword value.
    #[error("{function}() got multiple values for argument `{name}`")]
    DuplicateArgument {
        /// Expanded function name.
        function: String,
        /// The parameter bound twice.
        name: String,
    },

    /// More positional values than parameters.
    #[error("{function}() takes {max} positional argument(s) but {given} were given")]
    TooManyPositional {
        /// Expanded function name.
        function: String,
        /// Parameter count.
        max: usize,
        /// Positional values supplied.
        given: usize,
    },

    /// Condensation reached a schema already being rebuilt.
    #[error("schema cycle while condensing: {}", .chain.join(" -> "))]
    CyclicSchema {
        /// Schema names along the rebuild path.
        chain: Vec<String>,
    },

    /// A record could not be constructed from the supplied values.
    #[error(transparent)]
    Construct(#[from] SchemaError),

    /// The wrapped function itself failed.
    #[error("function body failed: {0}")]
    Body(#[source] anyhow::Error),
}
