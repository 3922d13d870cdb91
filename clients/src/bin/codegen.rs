//! `unfurl-codegen`: Generates typed argument adapters for a registry document.
//!
//! **Usage:**
//! ```
//! unfurl-codegen --registry <path> [--out <path>] [--interactive]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use unfurl_clients::{init_tracing, ExpandArgs};

/// Generate argument adapter modules.
#[derive(Parser)]
#[command(
    name = "unfurl-codegen",
    about = "Generate typed argument adapters for expanded functions"
)]
struct Args {
    #[command(flatten)]
    expand: ExpandArgs,

    /// Output directory for generated modules.
    #[arg(long, default_value = "generated")]
    out: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let options = args.expand.options()?;
    let (registry, functions) = args.expand.load()?;

    println!(
        "Generating adapters for {} function(s) over {} schema(s)",
        functions.len(),
        registry.len()
    );

    let report = unfurl_codegen::generate(registry, &functions, &options, &args.out)?;

    println!(
        "Generated {} adapters with {} fields",
        report.adapter_count, report.field_count
    );
    println!("Files written ({}):", report.files.len());
    for file in &report.files {
        println!("  {}", file);
    }

    println!("Generation complete.");
    Ok(())
}
