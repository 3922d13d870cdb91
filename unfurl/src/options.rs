//! Expansion options.

use serde::{Deserialize, Serialize};

use crate::error::ExpandError;

/// Default separator between a parent name and a field name.
pub const DEFAULT_SEPARATOR: &str = "__";

/// Configuration for one decoration.
///
/// Deserializes from TOML (or any serde format) with every key optional:
///
/// ```
/// let options = unfurl::ExpandOptions::from_toml_str("include_parent_name = false")?;
/// assert_eq!(options.separator, "__");
/// assert!(!options.include_parent_name);
/// # Ok::<(), unfurl::ExpandError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpandOptions {
    /// Joins parent and field names in qualified mode.
    pub separator: String,
    /// `true`: qualified names (`hero__pet__name`); `false`: bare names.
    pub include_parent_name: bool,
    /// Attach help, grouping, and prompt metadata for a command-line front-end.
    pub interactive: bool,
    /// Maximum schema levels expanded per walker run. `None` expands fully;
    /// a limit makes the signature synthesizer iterate until no schema-typed
    /// parameter remains.
    pub max_depth: Option<usize>,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_owned(),
            include_parent_name: true,
            interactive: false,
            max_depth: None,
        }
    }
}

impl ExpandOptions {
    /// Parses options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ExpandError::InvalidOptions`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ExpandError> {
        toml::from_str(text).map_err(|e| ExpandError::InvalidOptions(e.to_string()))
    }

    /// Sets the separator.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Switches to bare names.
    #[must_use]
    pub fn bare(mut self) -> Self {
        self.include_parent_name = false;
        self
    }

    /// Enables or disables interactive metadata.
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Limits expansion depth per walker run.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Returns the flattened key of `field` under the entry keyed `parent`.
    #[must_use]
    pub fn child_key(&self, parent: &str, field: &str) -> String {
        if self.include_parent_name {
            format!("{parent}{}{field}", self.separator)
        } else {
            field.to_owned()
        }
    }

    /// Checks the options before a decoration uses them.
    ///
    /// # Errors
    ///
    /// Returns [`ExpandError::InvalidOptions`] for an empty separator in
    /// qualified mode or a zero depth limit.
    pub fn validate(&self) -> Result<(), ExpandError> {
        if self.include_parent_name && self.separator.is_empty() {
            return Err(ExpandError::InvalidOptions(
                "separator must not be empty when parent names are included".into(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ExpandError::InvalidOptions(
                "max_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
