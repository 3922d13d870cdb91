//! Name & default synthesis for flattened fields.

use unfurl_schema::{FieldDefault, OptionMeta, ParamDefault, Parameter};

use crate::options::ExpandOptions;
use crate::walker::{FlatField, Origin, PathSegment};

/// Builds the external parameter for one flattened entry.
///
/// The entry key is already qualified (or bare) by the walker, so the name is
/// taken as is. Defaults follow a fixed policy:
///
/// | field default | plain | interactive |
/// |---|---|---|
/// | required | none | none; prompt; help text |
/// | `None` | `None` | `None`; help text |
/// | literal | literal | literal; help text |
/// | unspecified | none | none; prompt; no help text |
///
/// Interactive options also prompt when the field asks for it. Function
/// parameters that were never schema-typed pass through unchanged.
#[must_use]
pub fn synthesize(entry: &FlatField, options: &ExpandOptions) -> Parameter {
    let field = match &entry.origin {
        Origin::Parameter(param) => {
            return Parameter {
                name: entry.key.clone(),
                ..param.clone()
            }
        }
        Origin::Field(field) => field,
    };

    let default = match field.default.value() {
        Some(value) => ParamDefault::Value(value),
        None => ParamDefault::Absent,
    };
    let option = options.interactive.then(|| OptionMeta {
        help: match field.default {
            FieldDefault::Unspecified => None,
            _ => Some(field.description.clone().unwrap_or_default()),
        },
        group: group_label(&entry.path),
        prompt: field.prompt || default.is_absent(),
    });

    Parameter {
        name: entry.key.clone(),
        annotation: Some(field.ty.clone()),
        default,
        option,
    }
}

/// Dot-joined ancestor schema names, e.g. `Person.Hair.Color`.
#[must_use]
pub fn group_label(path: &[PathSegment]) -> String {
    path.iter()
        .map(|s| s.schema.as_str())
        .collect::<Vec<_>>()
        .join(".")
}
