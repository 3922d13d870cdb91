//! Shared plumbing for the unfurl client binaries.
//!
//! Every binary reads a JSON registry document and expands its functions with
//! options taken from an optional TOML file, then overridden by flags.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unfurl::{ExpandOptions, Expanded, Expander, Function};
use unfurl_schema::{Registry, RegistryDocument, Signature};

/// Flags shared by every binary.
#[derive(Debug, Clone, clap::Args)]
pub struct ExpandArgs {
    /// JSON registry document with schemas and function signatures.
    #[arg(long)]
    pub registry: PathBuf,

    /// TOML file with expansion options; flags override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Separator between parent and field names.
    #[arg(long)]
    pub separator: Option<String>,

    /// Use bare field names instead of qualified ones.
    #[arg(long)]
    pub bare: bool,

    /// Attach help text, headings and prompts for a command-line front-end.
    #[arg(long)]
    pub interactive: bool,

    /// Schema levels expanded per walker run.
    #[arg(long)]
    pub max_depth: Option<usize>,
}

impl ExpandArgs {
    /// Resolves the expansion options: config file first, then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn options(&self) -> Result<ExpandOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                ExpandOptions::from_toml_str(&text)
                    .with_context(|| format!("Invalid options in {}", path.display()))?
            }
            None => ExpandOptions::default(),
        };
        if let Some(separator) = &self.separator {
            options.separator.clone_from(separator);
        }
        if self.bare {
            options.include_parent_name = false;
        }
        if self.interactive {
            options.interactive = true;
        }
        if let Some(depth) = self.max_depth {
            options.max_depth = Some(depth);
        }
        Ok(options)
    }

    /// Loads the registry document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid document.
    pub fn load(&self) -> Result<(Arc<Registry>, Vec<Signature>)> {
        let text = std::fs::read_to_string(&self.registry)
            .with_context(|| format!("Failed to read {}", self.registry.display()))?;
        let (registry, functions) = RegistryDocument::from_json(&text)
            .and_then(RegistryDocument::into_parts)
            .with_context(|| format!("Invalid registry document {}", self.registry.display()))?;
        debug!(
            schemas = registry.len(),
            functions = functions.len(),
            "loaded registry document"
        );
        Ok((Arc::new(registry), functions))
    }
}

/// Picks `name` out of `functions`, or all of them when `name` is `None`.
///
/// # Errors
///
/// Returns an error if no function is called `name`.
pub fn select(functions: Vec<Signature>, name: Option<&str>) -> Result<Vec<Signature>> {
    let Some(name) = name else {
        return Ok(functions);
    };
    let picked: Vec<_> = functions.into_iter().filter(|f| f.name == name).collect();
    if picked.is_empty() {
        bail!("No function named `{name}` in the registry document");
    }
    Ok(picked)
}

/// Expands `signature` with `body`.
///
/// # Errors
///
/// Returns an error naming the function if expansion fails.
pub fn expand<R, F>(
    registry: &Arc<Registry>,
    signature: Signature,
    options: &ExpandOptions,
    body: F,
) -> Result<Expanded<R>>
where
    F: Fn(unfurl::Kwargs) -> Result<R> + Send + Sync + 'static,
{
    let name = signature.name.clone();
    Expander::new(options.clone())
        .expand(Arc::clone(registry), Function::new(signature, body))
        .with_context(|| format!("Failed to expand `{name}`"))
}

/// Installs the stderr log subscriber, filtered by `RUST_LOG` (default
/// `warn`).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
