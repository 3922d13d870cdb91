//! Proptest strategies building records of the fixture schemas.

use indexmap::IndexMap;
use proptest::prelude::*;
use unfurl_schema::{Record, Value};

fn word() -> impl Strategy<Value = String> {
    "[a-z][a-z ]{0,11}"
}

fn small_int() -> impl Strategy<Value = i64> {
    -1_000i64..1_000
}

/// Any `Alpha`.
pub fn alpha() -> impl Strategy<Value = Record> {
    small_int().prop_map(|a| Record::new("Alpha").with("a", a))
}

/// Any `Color`.
pub fn color() -> impl Strategy<Value = Record> {
    (0i64..256, 0i64..256, 0i64..256, alpha()).prop_map(|(r, g, b, alpha)| {
        Record::new("Color")
            .with("r", r)
            .with("g", g)
            .with("b", b)
            .with("alpha", alpha)
    })
}

/// Any `Hair`.
pub fn hair() -> impl Strategy<Value = Record> {
    (color(), 0i64..100).prop_map(|(color, length)| {
        Record::new("Hair").with("color", color).with("length", length)
    })
}

/// Any `Person`.
pub fn person() -> impl Strategy<Value = Record> {
    (
        word(),
        proptest::option::of(word()),
        0i64..120,
        proptest::option::of(word()),
        word(),
        word(),
        hair(),
    )
        .prop_map(|(name, alias, age, email, pet, address, hair)| {
            Record::new("Person")
                .with("name", name)
                .with("alias", alias)
                .with("age", age)
                .with("email", email)
                .with("pet", pet)
                .with("address", address)
                .with("hair", hair)
        })
}

/// Any `Pet`.
pub fn pet() -> impl Strategy<Value = Record> {
    word().prop_map(|name| Record::new("Pet").with("name", name))
}

/// Any `Hero`.
pub fn hero() -> impl Strategy<Value = Record> {
    (word(), pet()).prop_map(|(name, pet)| Record::new("Hero").with("name", name).with("pet", pet))
}

/// Spreads `record`, passed as parameter `param`, into flattened keyword
/// arguments.
///
/// With a separator the keys are qualified (`param<sep>field<sep>...`);
/// without one they are bare field names, later fields overwriting earlier
/// ones.
#[must_use]
pub fn flatten_record(param: &str, record: &Record, separator: Option<&str>) -> IndexMap<String, Value> {
    let mut out = IndexMap::new();
    spread(param, record, separator, &mut out);
    out
}

fn spread(prefix: &str, record: &Record, separator: Option<&str>, out: &mut IndexMap<String, Value>) {
    for (name, value) in &record.fields {
        let key = match separator {
            Some(sep) => format!("{prefix}{sep}{name}"),
            None => name.clone(),
        };
        match value {
            Value::Record(nested) => spread(&key, nested, separator, out),
            scalar => {
                out.insert(key, scalar.clone());
            }
        }
    }
}
