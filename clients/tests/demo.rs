//! The bundled demo document expands and runs end to end.

use std::path::PathBuf;

use anyhow::Result;
use unfurl::{Arguments, Value};
use unfurl_clients::{expand, select, ExpandArgs};

fn demo_args() -> ExpandArgs {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("demos");
    ExpandArgs {
        registry: root.join("people.json"),
        config: Some(root.join("unfurl.toml")),
        separator: None,
        bare: false,
        interactive: false,
        max_depth: None,
    }
}

#[test]
fn demo_functions_expand() -> Result<()> {
    let args = demo_args();
    let options = args.options()?;
    assert!(options.interactive);
    let (registry, functions) = args.load()?;
    assert_eq!(registry.len(), 6);

    for signature in functions {
        let expanded = expand(&registry, signature, &options, |_| Ok(()))?;
        assert!(!expanded.signature().has_nested());
        assert!(expanded
            .signature()
            .params
            .iter()
            .filter(|p| p.name != "thing")
            .all(|p| p.option.is_some()));
    }
    Ok(())
}

#[test]
fn demo_command_line_call() -> Result<()> {
    let args = demo_args();
    let options = args.options()?;
    let (registry, functions) = args.load()?;
    let signature = select(functions, Some("get_hero"))?.remove(0);
    let expanded = expand(&registry, signature, &options, |kwargs| Ok(kwargs))?;

    let matches = unfurl::cli::command(&expanded).try_get_matches_from([
        "get_hero",
        "--hero__name",
        "Ada",
        "--hero__pet__name",
        "Rex",
    ])?;
    let call_args: Arguments = unfurl::cli::arguments(&expanded, &matches)?;
    let condensed = expanded.call(call_args)?;
    let pet_name = condensed
        .get("hero")
        .and_then(Value::as_record)
        .and_then(|hero| hero.get("pet"))
        .and_then(Value::as_record)
        .and_then(|pet| pet.get("name"));
    assert_eq!(pet_name, Some(&Value::from("Rex")));
    Ok(())
}
