//! Fixture schemas.
//!
//! `Person` owns `Hair`, which owns `Color`, which owns `Alpha`; `Hero` owns
//! `Pet` and both have a `name`.

use unfurl_schema::{Field, FieldType, Registry, ScalarKind, Schema, SchemaError};

fn int(name: &str) -> Field {
    Field::new(name, FieldType::scalar(ScalarKind::Int))
}

fn string(name: &str) -> Field {
    Field::new(name, FieldType::scalar(ScalarKind::Str))
}

fn optional_string(name: &str) -> Field {
    Field::new(name, FieldType::optional(ScalarKind::Str)).nullable()
}

/// `Alpha { a: int }`.
///
/// # Errors
///
/// Never in practice; schema building is fallible in general.
pub fn alpha() -> Result<Schema, SchemaError> {
    Schema::builder("Alpha")
        .doc("A class for representing an alpha value.")
        .field(int("a").describe("The alpha value."))
        .build()
}

/// `Color { r, g, b: int, alpha: Alpha }`.
///
/// # Errors
///
/// Never in practice.
pub fn color() -> Result<Schema, SchemaError> {
    Schema::builder("Color")
        .doc("A class for representing a color.")
        .fields([
            int("r").describe("The red component of the color."),
            int("g").describe("The green component of the color."),
            int("b").describe("The blue component of the color."),
            Field::new("alpha", FieldType::nested("Alpha")).describe("The alpha value of the color."),
        ])
        .build()
}

/// `Hair { color: Color, length: int }`.
///
/// # Errors
///
/// Never in practice.
pub fn hair() -> Result<Schema, SchemaError> {
    Schema::builder("Hair")
        .doc("A class for representing hair.")
        .fields([
            Field::new("color", FieldType::nested("Color")).describe("The color of the hair."),
            int("length").describe("The length of the hair."),
        ])
        .build()
}

/// `Person`, mixing required, nullable and literal defaults.
///
/// # Errors
///
/// Never in practice.
pub fn person() -> Result<Schema, SchemaError> {
    Schema::builder("Person")
        .doc("A class for representing a person.")
        .fields([
            string("name").describe("The name of the person."),
            optional_string("alias").describe("An optional other name for the person."),
            int("age").describe("The age of the person."),
            optional_string("email").describe("An optional email address for the person."),
            string("pet").with_default("dog").describe("The person's pet."),
            string("address")
                .with_default("123 Main St")
                .describe("Where the person calls home."),
            Field::new("hair", FieldType::nested("Hair")).describe("The person's hair."),
        ])
        .build()
}

/// `Pet { name: str }`.
///
/// # Errors
///
/// Never in practice.
pub fn pet() -> Result<Schema, SchemaError> {
    Schema::builder("Pet")
        .field(string("name").describe("The pet's name."))
        .build()
}

/// `Hero { name: str, pet: Pet }`.
///
/// # Errors
///
/// Never in practice.
pub fn hero() -> Result<Schema, SchemaError> {
    Schema::builder("Hero")
        .fields([
            string("name").describe("The hero's name."),
            Field::new("pet", FieldType::nested("Pet")).describe("The hero's pet."),
        ])
        .build()
}

/// `MyDate { date: datetime }`, with no description.
///
/// # Errors
///
/// Never in practice.
pub fn my_date() -> Result<Schema, SchemaError> {
    Schema::builder("MyDate")
        .field(Field::new("date", FieldType::scalar(ScalarKind::DateTime)))
        .build()
}

/// Every fixture schema.
///
/// # Errors
///
/// Never in practice.
pub fn registry() -> Result<Registry, SchemaError> {
    Registry::from_schemas([alpha()?, color()?, hair()?, person()?, pet()?, hero()?, my_date()?])
}

/// `Node { label: str, edge: Edge }` and `Edge { weight: int, node: Node }`.
///
/// # Errors
///
/// Never in practice.
pub fn cyclic_registry() -> Result<Registry, SchemaError> {
    let node = Schema::builder("Node")
        .fields([string("label"), Field::new("edge", FieldType::nested("Edge"))])
        .build()?;
    let edge = Schema::builder("Edge")
        .fields([int("weight"), Field::new("node", FieldType::nested("Node"))])
        .build()?;
    Registry::from_schemas([node, edge])
}
