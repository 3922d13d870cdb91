//! Function signature descriptors.
//!
//! A [`Signature`] is the introspectable parameter list of a callable: the
//! original one a caller declares, and the flattened one unfurl produces.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::FieldType;
use crate::value::Value;

/// The default of a parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamDefault {
    /// No default; the caller must supply a value.
    #[default]
    Absent,
    /// Falls back to the given value (which may be [`Value::Null`]).
    Value(Value),
}

impl ParamDefault {
    /// Returns true when no default exists.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, ParamDefault::Absent)
    }

    /// Returns the default value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            ParamDefault::Absent => None,
            ParamDefault::Value(v) => Some(v),
        }
    }
}

/// Presentation metadata for a command-line front-end.
///
/// Only produced in interactive mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionMeta {
    /// Help text, from the field description. `None` when the field carried
    /// no usable metadata.
    pub help: Option<String>,
    /// Dot-joined chain of ancestor schema names, for grouping options.
    pub group: String,
    /// Whether the front-end should prompt for this option.
    pub prompt: bool,
}

/// One parameter of a [`Signature`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type, or `None` if unannotated.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub annotation: Option<FieldType>,
    /// Default value.
    #[serde(default, skip_serializing_if = "ParamDefault::is_absent")]
    pub default: ParamDefault,
    /// Command-line metadata (interactive mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<OptionMeta>,
}

impl Parameter {
    /// A parameter with no annotation and no default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: ParamDefault::Absent,
            option: None,
        }
    }

    /// A parameter declared with `annotation` and no default.
    pub fn typed(name: impl Into<String>, annotation: FieldType) -> Self {
        Self {
            annotation: Some(annotation),
            ..Self::new(name)
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = ParamDefault::Value(value.into());
        self
    }

    /// Returns true if the parameter has a default.
    #[must_use]
    pub fn has_default(&self) -> bool {
        !self.default.is_absent()
    }

    /// Returns the nested schema name if the parameter is schema-typed.
    #[must_use]
    pub fn nested_schema(&self) -> Option<&str> {
        self.annotation.as_ref().and_then(FieldType::as_nested)
    }

    /// Returns the annotation as source text (empty when unannotated).
    #[must_use]
    pub fn type_text(&self) -> String {
        self.annotation
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(annotation) = &self.annotation {
            write!(f, ": {annotation}")?;
        }
        if let ParamDefault::Value(v) = &self.default {
            write!(f, " = {v}")?;
        }
        Ok(())
    }
}

/// The externally visible parameter list of a callable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    /// Function name.
    pub name: String,
    /// Documentation string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl Signature {
    /// Creates a signature with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
        }
    }

    /// Sets the documentation string.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Looks a parameter up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Returns true if any parameter is still schema-typed.
    #[must_use]
    pub fn has_nested(&self) -> bool {
        self.params.iter().any(|p| p.nested_schema().is_some())
    }

    /// Iterates the parameter names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}
