//! `Hero` and its `Pet` both have a `name`; flattening must keep them apart.

use std::sync::Arc;

use proptest::prelude::*;
use unfurl::{Arguments, ExpandOptions, Expanded, Expander, Function, Kwargs, Record, Value};
use unfurl_test_helpers::{functions, models, strategies};

fn get_hero(options: ExpandOptions) -> Result<Expanded<Kwargs>, Box<dyn std::error::Error>> {
    let registry = Arc::new(models::registry()?);
    Ok(Expander::new(options).expand(
        registry,
        Function::new(functions::get_hero(), |kwargs| Ok(kwargs)),
    )?)
}

#[test]
fn qualified_names_keep_owners_apart() -> Result<(), Box<dyn std::error::Error>> {
    let expanded = get_hero(ExpandOptions::default())?;
    let names: Vec<_> = expanded.signature().names().collect();
    assert!(names.contains(&"hero__name"));
    assert!(names.contains(&"hero__pet__name"));
    assert!(!names.contains(&"name"));
    assert!(!names.contains(&"pet__name"));

    let out = expanded.call(
        Arguments::new()
            .kwarg("hero__name", "Ada")
            .kwarg("hero__pet__name", "Rex"),
    )?;
    let expected = Record::new("Hero")
        .with("name", "Ada")
        .with("pet", Record::new("Pet").with("name", "Rex"));
    assert_eq!(out.get("hero"), Some(&Value::Record(expected)));
    Ok(())
}

#[test]
fn custom_separator() -> Result<(), Box<dyn std::error::Error>> {
    let expanded = get_hero(ExpandOptions::default().separator("."))?;
    assert_eq!(
        expanded.signature().names().collect::<Vec<_>>(),
        ["hero.name", "hero.pet.name"]
    );
    let out = expanded.call(
        [("hero.name", "Ada"), ("hero.pet.name", "Rex")]
            .into_iter()
            .collect(),
    )?;
    let pet = out
        .get("hero")
        .and_then(Value::as_record)
        .and_then(|h| h.get("pet"))
        .and_then(Value::as_record)
        .and_then(|p| p.get("name"));
    assert_eq!(pet, Some(&Value::from("Rex")));
    Ok(())
}

#[test]
fn bare_names_merge_into_one_parameter() -> Result<(), Box<dyn std::error::Error>> {
    let expanded = get_hero(ExpandOptions::default().bare())?;
    assert_eq!(expanded.signature().to_string(), "get_hero(name: str)");
    let out = expanded.call(Arguments::new().arg("Ada"))?;
    let expected = Record::new("Hero")
        .with("name", "Ada")
        .with("pet", Record::new("Pet").with("name", "Ada"));
    assert_eq!(out.get("hero"), Some(&Value::Record(expected)));
    Ok(())
}

#[test]
fn interactive_help_comes_from_descriptions() -> Result<(), Box<dyn std::error::Error>> {
    let expanded = get_hero(ExpandOptions::default().interactive(true))?;
    let help = |name: &str| {
        expanded
            .signature()
            .get(name)
            .and_then(|p| p.option.as_ref())
            .map(|o| (o.help.clone(), o.group.clone(), o.prompt))
    };
    assert_eq!(
        help("hero__name"),
        Some((Some("The hero's name.".into()), "Hero".into(), true))
    );
    assert_eq!(
        help("hero__pet__name"),
        Some((Some("The pet's name.".into()), "Hero.Pet".into(), true))
    );
    Ok(())
}

proptest! {
    /// Qualified flattening never mixes the hero's and the pet's names
    #[test]
    fn prop_hero_round_trips(hero in strategies::hero()) {
        let expanded = get_hero(ExpandOptions::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let kwargs = strategies::flatten_record("hero", &hero, Some("__"));
        let out = expanded.call(Arguments::from(kwargs))?;
        prop_assert_eq!(out.get("hero"), Some(&Value::Record(hero)));
    }
}
