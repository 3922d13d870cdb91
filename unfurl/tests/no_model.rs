//! Functions whose parameters are not schema-typed pass through unchanged.

use std::sync::Arc;

use unfurl::{
    Arguments, ExpandOptions, Expander, FieldType, Function, Kwargs, Parameter, Registry,
    ScalarKind, Signature, Value,
};

fn get_alpha(param: Parameter) -> Signature {
    Signature::new("get_alpha").doc("Mydocstring.").param(param)
}

fn expand_plain(signature: Signature) -> Result<Signature, unfurl::ExpandError> {
    let expanded = Expander::default().expand(
        Arc::new(Registry::new()),
        Function::new(signature, |kwargs: Kwargs| Ok(kwargs)),
    )?;
    Ok(expanded.signature().clone())
}

#[test]
fn untyped_without_default() -> Result<(), unfurl::ExpandError> {
    let signature = expand_plain(get_alpha(Parameter::new("alpha")))?;
    let alpha = signature.get("alpha");
    assert_eq!(alpha.map(|p| p.annotation.is_none()), Some(true));
    assert_eq!(alpha.map(Parameter::has_default), Some(false));
    Ok(())
}

#[test]
fn untyped_with_none_default() -> Result<(), unfurl::ExpandError> {
    let signature = expand_plain(get_alpha(Parameter::new("alpha").with_default(Value::Null)))?;
    assert_eq!(signature.to_string(), "get_alpha(alpha = None)");
    Ok(())
}

#[test]
fn typed_variants_keep_annotation_and_default() -> Result<(), unfurl::ExpandError> {
    let text = || Parameter::typed("alpha", FieldType::scalar(ScalarKind::Str));
    for (param, shown) in [
        (text(), "get_alpha(alpha: str)"),
        (text().with_default(Value::Null), "get_alpha(alpha: str = None)"),
        (text().with_default("hello"), "get_alpha(alpha: str = \"hello\")"),
    ] {
        assert_eq!(expand_plain(get_alpha(param))?.to_string(), shown);
    }
    Ok(())
}

#[test]
fn interactive_mode_leaves_plain_parameters_alone() -> Result<(), unfurl::ExpandError> {
    let expanded = Expander::new(ExpandOptions::default().interactive(true)).expand(
        Arc::new(Registry::new()),
        Function::new(
            get_alpha(Parameter::new("alpha").with_default("hello")),
            |kwargs: Kwargs| Ok(kwargs),
        ),
    )?;
    assert_eq!(expanded.signature().params[0].option, None);
    Ok(())
}

#[test]
fn defaults_reach_the_body() -> Result<(), Box<dyn std::error::Error>> {
    let expanded = Expander::default().expand(
        Arc::new(Registry::new()),
        Function::new(
            get_alpha(Parameter::new("alpha").with_default("hello")),
            |kwargs: Kwargs| Ok(kwargs),
        ),
    )?;
    let out = expanded.call(Arguments::new())?;
    assert_eq!(out.get("alpha"), Some(&Value::from("hello")));
    assert_eq!(expanded.doc(), Some("Mydocstring.\nalso accepts [alpha]"));
    Ok(())
}
