//! Rust source emission helpers.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use anyhow::{Context, Result};

/// Header written at the top of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by unfurl-codegen. Do not edit by hand.";

/// An in-memory Rust source file.
#[derive(Debug, Clone)]
pub struct RustFile {
    /// Source text written so far.
    pub buf: String,
}

impl RustFile {
    /// Starts a file with the generated header and a module doc comment.
    ///
    /// `module_doc` may span several lines; each becomes a `//!` line.
    #[must_use]
    pub fn new(module_doc: &str) -> Self {
        let mut buf = String::with_capacity(4096);
        buf.push_str(GENERATED_HEADER);
        buf.push('\n');
        for line in module_doc.lines() {
            if line.is_empty() {
                buf.push_str("//!\n");
            } else {
                let _ = writeln!(buf, "//! {line}");
            }
        }
        buf.push('\n');
        Self { buf }
    }

    /// Appends one line.
    pub fn line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    /// Appends an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Appends `text` as `///` doc comment lines.
    pub fn doc_comment(&mut self, text: &str) {
        self.doc_lines("", text);
    }

    /// Appends `text` as `///` doc comment lines indented one level.
    pub fn indented_doc_comment(&mut self, text: &str) {
        self.doc_lines("    ", text);
    }

    fn doc_lines(&mut self, indent: &str, text: &str) {
        if text.is_empty() {
            let _ = writeln!(self.buf, "{indent}///");
            return;
        }
        for line in text.lines() {
            if line.is_empty() {
                let _ = writeln!(self.buf, "{indent}///");
            } else {
                let _ = writeln!(self.buf, "{indent}/// {line}");
            }
        }
    }

    /// Returns the source text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}

/// Collapses runs of whitespace in a description into single spaces.
#[must_use]
pub fn normalize_comment(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_doc_and_doc_comments() {
        let mut f = RustFile::new("First line.\n\nSecond paragraph.");
        f.doc_comment("A struct.");
        f.line("pub struct A {");
        f.indented_doc_comment("A field.\nWith two lines.");
        f.line("    pub x: i64,");
        f.line("}");
        let text = f.finish();
        assert!(text.starts_with(GENERATED_HEADER));
        assert!(text.contains("//! First line.\n//!\n//! Second paragraph.\n\n"));
        assert!(text.contains("/// A struct.\npub struct A {\n"));
        assert!(text.contains("    /// A field.\n    /// With two lines.\n"));
    }

    #[test]
    fn comments_are_normalized() {
        assert_eq!(normalize_comment("  The   hero's\n name. "), "The hero's name.");
    }
}
