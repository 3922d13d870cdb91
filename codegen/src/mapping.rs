//! Signature → Rust mapping tables.
//!
//! Deterministic mappings from flattened parameters to Rust identifiers and
//! field types.

use std::collections::HashSet;

use unfurl_schema::{FieldType, ParamDefault, Parameter, ScalarKind, Value};

/// Maps a scalar kind to its Rust type.
#[must_use]
pub fn scalar_rust_type(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Str | ScalarKind::DateTime | ScalarKind::Any => "String",
        ScalarKind::Int => "i64",
        ScalarKind::Float => "f64",
        ScalarKind::Bool => "bool",
    }
}

/// Returns the kind a parameter's values take; unannotated parameters are
/// carried as strings.
#[must_use]
pub fn param_kind(param: &Parameter) -> ScalarKind {
    match &param.annotation {
        Some(FieldType::Scalar(scalar)) => scalar.kind,
        _ => ScalarKind::Any,
    }
}

/// Returns true if the adapter field is an `Option`.
///
/// Nullable parameters always are. Other defaulted parameters are too unless
/// a clap `default_value` supplies the default.
#[must_use]
pub fn is_optional_field(param: &Parameter, interactive: bool) -> bool {
    let nullable = matches!(&param.annotation, Some(FieldType::Scalar(s)) if s.optional)
        || param.default == ParamDefault::Value(Value::Null);
    nullable || (param.has_default() && !interactive)
}

/// Returns true if an interactive adapter parses the option text through
/// [`unfurl::ScalarType::parse_value`], so that `None` reads as the null
/// value exactly as it does on the runtime command.
#[must_use]
pub fn parses_optional_text(param: &Parameter, interactive: bool) -> bool {
    interactive && matches!(&param.annotation, Some(FieldType::Scalar(s)) if s.optional)
}

/// Returns the Rust type of the adapter field for `param`.
#[must_use]
pub fn rust_type(param: &Parameter, interactive: bool) -> String {
    if parses_optional_text(param, interactive) {
        return "Option<unfurl::Value>".to_string();
    }
    let base = scalar_rust_type(param_kind(param));
    if is_optional_field(param, interactive) {
        format!("Option<{base}>")
    } else {
        base.to_string()
    }
}

/// Converts a camelCase or PascalCase label into a snake_case Rust identifier.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch.is_alphanumeric() {
            result.push(ch);
        } else {
            result.push('_');
        }
        prev = Some(ch);
    }
    escape_keyword(result)
}

/// Converts a flattened parameter name into a field identifier.
///
/// Separator runs collapse to one underscore, so `hero__pet__name` becomes
/// `hero_pet_name`.
#[must_use]
pub fn to_field_ident(name: &str) -> String {
    let snake = to_snake_case(name);
    let mut ident = String::with_capacity(snake.len());
    for part in snake.split('_').filter(|p| !p.is_empty()) {
        if !ident.is_empty() {
            ident.push('_');
        }
        ident.push_str(part);
    }
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    escape_keyword(ident)
}

/// Assigns a distinct field identifier to each name, suffixing repeats with
/// `_2`, `_3`, ...
#[must_use]
pub fn field_idents<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let base = to_field_ident(name);
            let mut ident = base.clone();
            let mut n = 2;
            while !taken.insert(ident.clone()) {
                ident = format!("{base}_{n}");
                n += 1;
            }
            ident
        })
        .collect()
}

/// Converts a snake_case function name into a PascalCase type name.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|p| !p.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn escape_keyword(ident: String) -> String {
    match ident.as_str() {
        "type" | "self" | "super" | "crate" | "mod" | "fn" | "pub" | "use" | "let" | "mut"
        | "ref" | "as" | "in" | "for" | "if" | "else" | "match" | "return" | "struct" | "enum"
        | "trait" | "impl" | "where" | "loop" | "while" | "break" | "continue" | "move" | "box"
        | "dyn" | "true" | "false" | "async" | "await" | "const" | "static" | "unsafe"
        | "extern" => format!("{ident}_"),
        _ => ident,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("getHero"), "get_hero");
        assert_eq!(to_snake_case("get_hero"), "get_hero");
        assert_eq!(to_snake_case("type"), "type_");
    }

    #[test]
    fn field_idents_collapse_separators() {
        assert_eq!(to_field_ident("hero__pet__name"), "hero_pet_name");
        assert_eq!(to_field_ident("hero.pet.name"), "hero_pet_name");
        assert_eq!(to_field_ident("2fa"), "_2fa");
        assert_eq!(
            field_idents(["hero__name", "hero_name", "hero__name_2"]),
            ["hero_name", "hero_name_2", "hero_name_2_2"]
        );
    }

    #[test]
    fn pascal_case_conversion() {
        assert_eq!(to_pascal_case("get_hero"), "GetHero");
        assert_eq!(to_pascal_case("place"), "Place");
    }

    #[test]
    fn field_types() {
        let age = Parameter::typed("age", FieldType::scalar(ScalarKind::Int));
        assert_eq!(rust_type(&age, false), "i64");
        let pet = Parameter::typed("pet", FieldType::scalar(ScalarKind::Str)).with_default("dog");
        assert_eq!(rust_type(&pet, false), "Option<String>");
        assert_eq!(rust_type(&pet, true), "String");
        let alias = Parameter::typed("alias", FieldType::optional(ScalarKind::Str)).with_default(Value::Null);
        assert_eq!(rust_type(&alias, false), "Option<String>");
        assert_eq!(rust_type(&alias, true), "Option<unfurl::Value>");
        let thing = Parameter::typed("thing", FieldType::scalar(ScalarKind::Str)).with_default(Value::Null);
        assert!(!parses_optional_text(&thing, true));
        assert_eq!(rust_type(&thing, true), "Option<String>");
        assert_eq!(rust_type(&Parameter::new("x"), false), "String");
    }
}
