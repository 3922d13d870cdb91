//! Command-line front-end for expanded functions.
//!
//! Each flattened parameter becomes a `--<name>` option. Interactive
//! metadata supplies help text and a help heading per owning schema chain;
//! options without a default are required.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use unfurl_schema::{FieldType, Parameter, SchemaError, Value};

use crate::expand::{Arguments, Expanded};

/// Builds a clap command for `expanded`.
#[must_use]
pub fn command<R>(expanded: &Expanded<R>) -> Command {
    let mut cmd = Command::new(expanded.name().to_owned());
    if let Some(doc) = expanded.doc() {
        cmd = cmd.about(doc.to_owned());
    }
    expanded
        .signature()
        .params
        .iter()
        .fold(cmd, |cmd, param| cmd.arg(option(param)))
}

fn option(param: &Parameter) -> Arg {
    let mut arg = Arg::new(param.name.clone())
        .long(param.name.clone())
        .action(ArgAction::Set)
        .value_name(param.type_text().to_uppercase())
        .required(param.default.is_absent());
    if let Some(default) = param.default.value().filter(|v| !v.is_null()) {
        arg = arg.default_value(default.to_cli_string());
    }
    if let Some(meta) = &param.option {
        if let Some(help) = &meta.help {
            arg = arg.help(help.clone());
        }
        if !meta.group.is_empty() {
            arg = arg.help_heading(meta.group.clone());
        }
    }
    arg
}

/// Converts parsed command-line matches into call arguments.
///
/// Only values given on the command line are passed; defaults are filled
/// when the arguments are bound.
///
/// # Errors
///
/// Returns [`SchemaError::Parse`] when a value does not parse as the
/// parameter's declared scalar type.
pub fn arguments<R>(expanded: &Expanded<R>, matches: &ArgMatches) -> Result<Arguments, SchemaError> {
    let mut args = Arguments::new();
    for param in &expanded.signature().params {
        if matches.value_source(&param.name) != Some(ValueSource::CommandLine) {
            continue;
        }
        if let Some(text) = matches.get_one::<String>(&param.name) {
            args = args.kwarg(param.name.clone(), parse(param, text)?);
        }
    }
    Ok(args)
}

fn parse(param: &Parameter, text: &str) -> Result<Value, SchemaError> {
    match &param.annotation {
        Some(FieldType::Scalar(scalar)) => scalar.parse_value(text),
        _ => Ok(Value::from(text)),
    }
}
