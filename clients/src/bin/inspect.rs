//! `unfurl-inspect`: Prints the flattened signatures of a registry document.
//!
//! **Usage:**
//! ```
//! unfurl-inspect --registry <path> [--function <name>] [--format text|json]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::Result;
use clap::{Parser, ValueEnum};
use unfurl_clients::{expand, init_tracing, select, ExpandArgs};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One block per function: signature, docstring, option metadata.
    Text,
    /// The flattened signatures as a JSON array.
    Json,
}

/// Print flattened function signatures.
#[derive(Parser)]
#[command(
    name = "unfurl-inspect",
    about = "Print the flattened signatures of a registry document"
)]
struct Args {
    #[command(flatten)]
    expand: ExpandArgs,

    /// Only inspect this function.
    #[arg(long)]
    function: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let options = args.expand.options()?;
    let (registry, functions) = args.expand.load()?;

    let mut signatures = Vec::new();
    for signature in select(functions, args.function.as_deref())? {
        let expanded = expand(&registry, signature, &options, |_| Ok(()))?;
        signatures.push(expanded.signature().clone());
    }

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&signatures)?),
        Format::Text => {
            for signature in &signatures {
                println!("{signature}");
                if let Some(doc) = &signature.doc {
                    for line in doc.lines() {
                        println!("    {line}");
                    }
                }
                for param in &signature.params {
                    let Some(meta) = &param.option else { continue };
                    println!(
                        "  --{:<32} [{}]{}{}",
                        param.name,
                        meta.group,
                        if meta.prompt { " (prompt)" } else { "" },
                        meta.help.as_deref().map(|h| format!(" {h}")).unwrap_or_default()
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}
