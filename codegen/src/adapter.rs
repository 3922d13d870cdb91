//! Argument adapter generation.
//!
//! For an expanded function `get_hero`, emits:
//!
//! ```rust,ignore
//! pub struct GetHeroArgs {
//!     pub hero_name: String,
//!     pub hero_pet_name: String,
//! }
//!
//! impl GetHeroArgs {
//!     pub fn into_arguments(self) -> unfurl::Arguments { ... }
//! }
//! ```
//!
//! In interactive mode the struct derives `clap::Parser` and every field
//! carries its flattened long name, help text, help heading and default.

use std::fmt::Write as FmtWrite;

use unfurl::Expanded;
use unfurl_schema::{Parameter, ScalarKind};

use crate::emit::{normalize_comment, RustFile};
use crate::mapping::{
    field_idents, is_optional_field, param_kind, parses_optional_text, rust_type, to_pascal_case,
};

/// Name of the adapter struct generated for `function`.
#[must_use]
pub fn adapter_name(function: &str) -> String {
    format!("{}Args", to_pascal_case(function))
}

/// Generates the adapter module for `expanded`.
#[must_use]
pub fn generate_adapter<R>(expanded: &Expanded<R>) -> String {
    let interactive = expanded.options().interactive;
    let name = adapter_name(expanded.name());
    let params = &expanded.signature().params;
    let idents = field_idents(params.iter().map(|p| p.name.as_str()));

    let mut f = RustFile::new(&format!(
        "Flattened arguments for `{}`.\n\n`{}`",
        expanded.name(),
        expanded.signature()
    ));

    f.doc_comment(expanded.doc().unwrap_or_default());
    if interactive {
        f.line("#[derive(Debug, Clone, PartialEq, clap::Parser)]");
        let _ = writeln!(f.buf, "#[command(name = {:?})]", expanded.name());
    } else {
        f.line("#[derive(Debug, Clone, PartialEq)]");
    }
    let _ = writeln!(f.buf, "pub struct {name} {{");
    for (param, ident) in params.iter().zip(&idents) {
        emit_field(&mut f, param, ident, interactive);
    }
    f.line("}");
    f.blank();

    let _ = writeln!(f.buf, "impl {name} {{");
    f.indented_doc_comment("Converts into call arguments keyed by flattened parameter name.");
    f.line("    #[must_use]");
    f.line("    pub fn into_arguments(self) -> unfurl::Arguments {");
    if params.is_empty() {
        f.line("        unfurl::Arguments::new()");
    } else {
        f.line("        let mut args = unfurl::Arguments::new();");
        for (param, ident) in params.iter().zip(&idents) {
            if is_optional_field(param, interactive) {
                let _ = writeln!(f.buf, "        if let Some(value) = self.{ident} {{");
                let _ = writeln!(f.buf, "            args = args.kwarg({:?}, value);", param.name);
                f.line("        }");
            } else {
                let _ = writeln!(f.buf, "        args = args.kwarg({:?}, self.{ident});", param.name);
            }
        }
        f.line("        args");
    }
    f.line("    }");
    f.line("}");

    f.finish()
}

fn emit_field(f: &mut RustFile, param: &Parameter, ident: &str, interactive: bool) {
    let meta = param.option.as_ref();
    let help = meta
        .and_then(|m| m.help.as_deref())
        .map(normalize_comment)
        .filter(|h| !h.is_empty());
    match &help {
        Some(help) => f.indented_doc_comment(help),
        None => f.indented_doc_comment(&format!("`{param}`")),
    }
    if interactive {
        let mut attrs = vec![format!("long = {:?}", param.name)];
        if let Some(group) = meta.map(|m| m.group.as_str()).filter(|g| !g.is_empty()) {
            attrs.push(format!("help_heading = {group:?}"));
        }
        if let Some(default) = param.default.value().filter(|v| !v.is_null()) {
            attrs.push(format!("default_value = {:?}", default.to_cli_string()));
        }
        if parses_optional_text(param, interactive) {
            attrs.push(format!(
                "value_parser = |text: &str| unfurl::ScalarType::optional(unfurl::ScalarKind::{:?}).parse_value(text)",
                param_kind(param)
            ));
        }
        if param_kind(param) == ScalarKind::Bool {
            attrs.push("action = clap::ArgAction::Set".to_string());
        }
        let _ = writeln!(f.buf, "    #[arg({})]", attrs.join(", "));
    }
    let _ = writeln!(f.buf, "    pub {ident}: {},", rust_type(param, interactive));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use unfurl::{ExpandOptions, Expander, Function};
    use unfurl_test_helpers::{functions, models};

    fn adapter(
        signature: unfurl::Signature,
        options: ExpandOptions,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let expanded = Expander::new(options).expand(
            Arc::new(models::registry()?),
            Function::new(signature, |_| Ok(())),
        )?;
        Ok(generate_adapter(&expanded))
    }

    #[test]
    fn plain_adapter_for_hero() -> Result<(), Box<dyn std::error::Error>> {
        let code = adapter(functions::get_hero(), ExpandOptions::default())?;
        assert!(code.contains("#[derive(Debug, Clone, PartialEq)]\npub struct GetHeroArgs {\n"));
        assert!(code.contains("    /// `hero__name: str`\n    pub hero_name: String,\n"));
        assert!(code.contains("    pub hero_pet_name: String,\n"));
        assert!(code.contains("        args = args.kwarg(\"hero__pet__name\", self.hero_pet_name);\n"));
        assert!(!code.contains("clap"));
        Ok(())
    }

    #[test]
    fn plain_defaults_become_options() -> Result<(), Box<dyn std::error::Error>> {
        let code = adapter(functions::get_person(), ExpandOptions::default())?;
        assert!(code.contains("    pub person_pet: Option<String>,\n"));
        assert!(code.contains("    pub thing: Option<String>,\n"));
        assert!(code.contains("        if let Some(value) = self.person_pet {\n"));
        assert!(code.contains("    pub person_hair_color_alpha_a: i64,\n"));
        Ok(())
    }

    #[test]
    fn interactive_adapter_derives_parser() -> Result<(), Box<dyn std::error::Error>> {
        let code = adapter(functions::get_person(), ExpandOptions::default().interactive(true))?;
        assert!(code.contains("#[derive(Debug, Clone, PartialEq, clap::Parser)]\n#[command(name = \"get_person\")]\n"));
        assert!(code.contains(
            "    /// The person's pet.\n    #[arg(long = \"person__pet\", help_heading = \"Person\", default_value = \"dog\")]\n    pub person_pet: String,\n"
        ));
        assert!(code.contains(
            "    #[arg(long = \"person__hair__color__r\", help_heading = \"Person.Hair.Color\")]\n    pub person_hair_color_r: i64,\n"
        ));
        assert!(code.contains(
            "    #[arg(long = \"person__alias\", help_heading = \"Person\", value_parser = |text: &str| unfurl::ScalarType::optional(unfurl::ScalarKind::Str).parse_value(text))]\n    pub person_alias: Option<unfurl::Value>,\n"
        ));
        assert!(code.contains("        if let Some(value) = self.person_email {\n"));
        // A plain `str` parameter defaulting to None keeps its text as is.
        assert!(code.contains("    pub thing: Option<String>,\n"));
        Ok(())
    }

    #[test]
    fn bare_collisions_yield_one_field() -> Result<(), Box<dyn std::error::Error>> {
        let code = adapter(functions::get_hero(), ExpandOptions::default().bare())?;
        assert!(code.contains("    pub name: String,\n"));
        assert_eq!(code.matches("pub name").count(), 1);
        Ok(())
    }
}
