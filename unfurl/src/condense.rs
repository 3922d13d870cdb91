//! Condensation: flattened keyword arguments → the original function's
//! schema-typed arguments.

use indexmap::IndexMap;
use tracing::trace;
use unfurl_schema::{FieldDefault, FieldType, Record, Registry, Schema, Signature, Value};

use crate::error::CallError;
use crate::options::ExpandOptions;

/// Rebuilds the original keyword arguments from flattened ones.
///
/// For each parameter of `original`, in order:
///
/// - a non-schema parameter present under its exact name is passed through;
/// - a schema-typed parameter whose value is already a record of that schema
///   is forwarded unchanged;
/// - any other schema-typed parameter is rebuilt bottom-up from the
///   flattened keys.
///
/// Parameters with nothing to pass are omitted.
///
/// # Errors
///
/// Returns [`CallError::Construct`] when a record cannot be built from the
/// supplied values and [`CallError::CyclicSchema`] for a self-nesting schema.
pub fn condense(
    registry: &Registry,
    original: &Signature,
    kwargs: &IndexMap<String, Value>,
    options: &ExpandOptions,
) -> Result<IndexMap<String, Value>, CallError> {
    let mut condensed = IndexMap::with_capacity(original.params.len());
    for param in &original.params {
        let supplied = kwargs.get(&param.name);
        let Some(schema_name) = param.nested_schema() else {
            if let Some(value) = supplied {
                condensed.insert(param.name.clone(), value.clone());
            }
            continue;
        };
        if let Some(value) = supplied.filter(|v| v.is_record_of(schema_name)) {
            trace!(param = %param.name, "forwarding pre-built record");
            condensed.insert(param.name.clone(), value.clone());
            continue;
        }
        let schema = registry.resolve(schema_name)?;
        let record = rebuild(registry, schema, &param.name, kwargs, options, &mut Vec::new())?;
        condensed.insert(param.name.clone(), Value::Record(record));
    }
    Ok(condensed)
}

/// Builds one record of `schema` whose flattened fields live under `prefix`.
fn rebuild(
    registry: &Registry,
    schema: &Schema,
    prefix: &str,
    kwargs: &IndexMap<String, Value>,
    options: &ExpandOptions,
    ancestry: &mut Vec<String>,
) -> Result<Record, CallError> {
    if ancestry.contains(&schema.name) {
        let mut chain = ancestry.clone();
        chain.push(schema.name.clone());
        return Err(CallError::CyclicSchema { chain });
    }
    ancestry.push(schema.name.clone());

    let mut values = IndexMap::with_capacity(schema.len());
    for field in schema.fields() {
        let key = options.child_key(prefix, &field.name);
        let supplied = kwargs.get(&key);
        match &field.ty {
            FieldType::Nested(nested) => {
                let prebuilt = supplied.filter(|v| {
                    v.is_record_of(nested) || (v.is_null() && field.default == FieldDefault::Null)
                });
                let value = match prebuilt {
                    Some(value) => value.clone(),
                    None => {
                        let child = registry.resolve(nested)?;
                        Value::Record(rebuild(registry, child, &key, kwargs, options, ancestry)?)
                    }
                };
                values.insert(field.name.clone(), value);
            }
            FieldType::Scalar(_) => {
                if let Some(value) = supplied {
                    values.insert(field.name.clone(), value.clone());
                }
            }
        }
    }

    ancestry.pop();
    let record = schema.construct(values)?;
    trace!(schema = %schema.name, prefix, "condensed record");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfurl_schema::SchemaError;
    use unfurl_test_helpers::{functions, models};

    fn kwargs<const N: usize>(pairs: [(&str, Value); N]) -> IndexMap<String, Value> {
        pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
    }

    #[test]
    fn qualified_hero_is_rebuilt() -> Result<(), CallError> {
        let registry = models::registry()?;
        let flat = kwargs([
            ("hero__name", Value::from("Ada")),
            ("hero__pet__name", Value::from("Rex")),
        ]);
        let condensed = condense(&registry, &functions::get_hero(), &flat, &ExpandOptions::default())?;
        let expected = Record::new("Hero")
            .with("name", "Ada")
            .with("pet", Record::new("Pet").with("name", "Rex"));
        assert_eq!(condensed.get("hero"), Some(&Value::Record(expected)));
        assert_eq!(condensed.len(), 1);
        Ok(())
    }

    #[test]
    fn bare_keys_feed_every_matching_field() -> Result<(), CallError> {
        let registry = models::registry()?;
        let flat = kwargs([("name", Value::from("Ada"))]);
        let condensed = condense(&registry, &functions::get_hero(), &flat, &ExpandOptions::default().bare())?;
        let expected = Record::new("Hero")
            .with("name", "Ada")
            .with("pet", Record::new("Pet").with("name", "Ada"));
        assert_eq!(condensed.get("hero"), Some(&Value::Record(expected)));
        Ok(())
    }

    #[test]
    fn prebuilt_records_are_forwarded() -> Result<(), CallError> {
        let registry = models::registry()?;
        let hero = Value::Record(
            Record::new("Hero")
                .with("name", "Ada")
                .with("pet", Record::new("Pet").with("name", "Rex")),
        );
        let flat = kwargs([("hero", hero.clone())]);
        let condensed = condense(&registry, &functions::get_hero(), &flat, &ExpandOptions::default())?;
        assert_eq!(condensed.get("hero"), Some(&hero));
        Ok(())
    }

    #[test]
    fn prebuilt_nested_field_is_accepted() -> Result<(), CallError> {
        let registry = models::registry()?;
        let flat = kwargs([
            ("hero__name", Value::from("Ada")),
            ("hero__pet", Value::Record(Record::new("Pet").with("name", "Rex"))),
        ]);
        let condensed = condense(&registry, &functions::get_hero(), &flat, &ExpandOptions::default())?;
        let pet = condensed
            .get("hero")
            .and_then(Value::as_record)
            .and_then(|hero| hero.get("pet"));
        assert_eq!(pet, Some(&Value::Record(Record::new("Pet").with("name", "Rex"))));
        Ok(())
    }

    #[test]
    fn pass_through_and_order() -> Result<(), CallError> {
        let registry = models::registry()?;
        let flat = kwargs([
            ("thing", Value::from("x")),
            ("person__name", Value::from("Ada")),
            ("person__age", Value::from(36)),
            ("person__hair__color__r", Value::from(1)),
            ("person__hair__color__g", Value::from(2)),
            ("person__hair__color__b", Value::from(3)),
            ("person__hair__color__alpha__a", Value::from(4)),
            ("person__hair__length", Value::from(5)),
        ]);
        let condensed = condense(&registry, &functions::get_person(), &flat, &ExpandOptions::default())?;
        assert_eq!(condensed.keys().collect::<Vec<_>>(), ["person", "thing"]);
        let person = condensed.get("person").and_then(Value::as_record);
        assert_eq!(person.and_then(|p| p.get("pet")), Some(&Value::from("dog")));
        assert_eq!(person.and_then(|p| p.get("alias")), Some(&Value::Null));
        Ok(())
    }

    #[test]
    fn missing_leaf_is_a_construct_error() -> Result<(), CallError> {
        let registry = models::registry()?;
        let flat = kwargs([("hero__name", Value::from("Ada"))]);
        let result = condense(&registry, &functions::get_hero(), &flat, &ExpandOptions::default());
        assert!(matches!(
            result,
            Err(CallError::Construct(SchemaError::MissingField { ref schema, ref field }))
                if schema == "Pet" && field == "name"
        ));
        Ok(())
    }

    #[test]
    fn cycles_are_reported() -> Result<(), CallError> {
        let registry = models::cyclic_registry()?;
        let signature = Signature::new("walk")
            .param(unfurl_schema::Parameter::typed("node", FieldType::nested("Node")));
        let result = condense(&registry, &signature, &IndexMap::new(), &ExpandOptions::default());
        assert!(matches!(result, Err(CallError::CyclicSchema { ref chain }) if chain.len() == 3));
        Ok(())
    }
}
