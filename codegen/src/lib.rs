//! unfurl code generator.
//!
//! Expands every function of a registry document and emits, per function, a
//! Rust module holding a statically typed argument adapter: one field per
//! flattened parameter plus an `into_arguments` conversion feeding
//! [`unfurl::Expanded::call`]. With interactive options the adapters derive
//! `clap::Parser`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod adapter;
pub mod emit;
pub mod mapping;

use std::fmt::Write as FmtWrite;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};
use unfurl::{ExpandOptions, Expander, Function};
use unfurl_schema::{Registry, Signature};

use emit::RustFile;
use mapping::to_snake_case;

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of adapter structs generated.
    pub adapter_count: usize,
    /// Number of adapter fields generated.
    pub field_count: usize,
    /// Files written, relative to the output directory.
    pub files: Vec<String>,
}

/// Generates one adapter module per function into `out_dir`, plus a
/// `mod.rs` declaring them.
///
/// # Errors
///
/// Returns an error if a function cannot be expanded or a file cannot be
/// written.
pub fn generate(
    registry: Arc<Registry>,
    functions: &[Signature],
    options: &ExpandOptions,
    out_dir: &Path,
) -> Result<GenerationReport> {
    let mut report = GenerationReport::default();
    let expander = Expander::new(options.clone());
    let mut modules = Vec::with_capacity(functions.len());

    for signature in functions {
        let expanded = expander
            .expand(Arc::clone(&registry), Function::new(signature.clone(), |_| Ok(())))
            .with_context(|| format!("Failed to expand `{}`", signature.name))?;

        let module = to_snake_case(&signature.name);
        let file = format!("{module}.rs");
        emit::write_file(&out_dir.join(&file), &adapter::generate_adapter(&expanded))?;
        debug!(function = %signature.name, file = %file, "wrote adapter");

        report.adapter_count += 1;
        report.field_count += expanded.signature().params.len();
        report.files.push(file);
        modules.push(module);
    }

    generate_mod_file(out_dir, &modules, &mut report)?;
    info!(
        adapters = report.adapter_count,
        fields = report.field_count,
        "generated adapters"
    );
    Ok(report)
}

/// Generates the `mod.rs` declaring every adapter module.
fn generate_mod_file(out_dir: &Path, modules: &[String], report: &mut GenerationReport) -> Result<()> {
    let mut f = RustFile::new("Generated argument adapters.");

    let mut sorted_modules: Vec<&str> = modules.iter().map(String::as_str).collect();
    sorted_modules.sort_unstable();
    sorted_modules.dedup();
    for module in &sorted_modules {
        let _ = writeln!(f.buf, "pub mod {module};");
    }

    emit::write_file(&out_dir.join("mod.rs"), &f.finish())?;
    report.files.push("mod.rs".to_string());
    Ok(())
}
