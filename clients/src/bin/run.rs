//! `unfurl-run`: Calls an expanded function from the command line.
//!
//! Builds a command from the flattened signature, parses the options after
//! `--`, condenses them into records and prints the keyword arguments the
//! original function would receive, as JSON.
//!
//! **Usage:**
//! ```
//! unfurl-run --registry <path> --function <name> -- --hero__name Ada --hero__pet__name Rex
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use unfurl_clients::{expand, init_tracing, select, ExpandArgs};

/// Call an expanded function with flattened options.
#[derive(Parser)]
#[command(
    name = "unfurl-run",
    about = "Call an expanded function and print its condensed arguments"
)]
struct Args {
    #[command(flatten)]
    expand: ExpandArgs,

    /// Function to call.
    #[arg(long)]
    function: String,

    /// Options for the function itself.
    #[arg(last = true)]
    rest: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let options = args.expand.options()?;
    let (registry, functions) = args.expand.load()?;

    let signature = select(functions, Some(args.function.as_str()))?
        .into_iter()
        .next()
        .context("No function selected")?;
    let expanded = expand(&registry, signature, &options, |kwargs| Ok(kwargs))?;

    let argv = std::iter::once(args.function.clone()).chain(args.rest);
    let matches = match unfurl::cli::command(&expanded).try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(e) => e.exit(),
    };
    let call_args = unfurl::cli::arguments(&expanded, &matches)?;
    let condensed = expanded
        .call(call_args)
        .with_context(|| format!("Failed to call `{}`", expanded.name()))?;
    info!(function = %expanded.name(), args = condensed.len(), "called");

    println!("{}", serde_json::to_string_pretty(&condensed)?);
    Ok(())
}
