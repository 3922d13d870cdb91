//! Fixture function signatures. Every docstring is `Mydocstring.`.

use unfurl_schema::{FieldType, Parameter, ScalarKind, Signature};

const DOC: &str = "Mydocstring.";

fn single(function: &str, param: &str, schema: &str) -> Signature {
    Signature::new(function)
        .doc(DOC)
        .param(Parameter::typed(param, FieldType::nested(schema)))
}

/// `get_person(person: Person, thing: str = None)`.
#[must_use]
pub fn get_person() -> Signature {
    get_person_only().param(
        Parameter::typed("thing", FieldType::scalar(ScalarKind::Str)).with_default(None::<String>),
    )
}

/// `get_person(person: Person)`.
#[must_use]
pub fn get_person_only() -> Signature {
    single("get_person", "person", "Person")
}

/// `get_hero(hero: Hero)`.
#[must_use]
pub fn get_hero() -> Signature {
    single("get_hero", "hero", "Hero")
}

/// `get_hair(hair: Hair)`.
#[must_use]
pub fn get_hair() -> Signature {
    single("get_hair", "hair", "Hair")
}

/// `get_color(color: Color)`.
#[must_use]
pub fn get_color() -> Signature {
    single("get_color", "color", "Color")
}

/// `get_alpha(alpha: Alpha)`.
#[must_use]
pub fn get_alpha() -> Signature {
    single("get_alpha", "alpha", "Alpha")
}

/// `get_date(date: MyDate)`.
#[must_use]
pub fn get_date() -> Signature {
    single("get_date", "date", "MyDate")
}

/// `get_alpha(alpha: int)`: nothing to flatten.
#[must_use]
pub fn no_model() -> Signature {
    Signature::new("get_alpha")
        .doc(DOC)
        .param(Parameter::typed("alpha", FieldType::scalar(ScalarKind::Int)))
}

/// `walk(node: Node)` over [`crate::models::cyclic_registry`].
#[must_use]
pub fn walk_node() -> Signature {
    single("walk", "node", "Node")
}
