//! User-friendly diagnostic messages.
//!
//! Every error shown to the user names the file involved, what was wrong
//! with it and what to do about it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::format::{FragmentError, TemplateError};

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a fragment script cannot be parsed.
    pub const REGENERATE: &str = "Regenerate the documentation so the fragment is rewritten";

    /// Suggestion when the offset trailer no longer matches the payload.
    pub const STALE_TRAILER: &str =
        "Re-render the file with `implreg render` before merging into it";

    /// Suggestion when a JSON table input is malformed.
    pub const TABLE_SHAPE: &str =
        "Tables look like {\"lib\": [[\"impl ...\"]]} or [[\"lib\", [[\"impl ...\"]]]]";

    /// Suggestion when no fragments are found under a documentation root.
    pub const NO_FRAGMENTS: &str = "Point at the documentation root that contains `trait.impl/`";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    /// Describe a fragment that failed to load.
    pub fn for_fragment(err: &FragmentError, path: &Path) -> Self {
        let diag = Diagnostic::error("could not load implementor fragment").with_location(path);
        match err {
            FragmentError::MissingWrapper => diag
                .with_context("no `Object.fromEntries(...)` call found")
                .with_suggestion(suggestions::REGENERATE),
            FragmentError::MalformedTable(e) => diag
                .with_context(format!("payload is not a fragment table: {}", e))
                .with_suggestion(suggestions::TABLE_SHAPE)
                .with_suggestion(suggestions::REGENERATE),
            FragmentError::Template(TemplateError::MissingTrailer) => diag
                .with_context("file has no offset trailer")
                .with_suggestion(suggestions::STALE_TRAILER),
            FragmentError::Template(e) => diag
                .with_context(e.to_string())
                .with_suggestion(suggestions::STALE_TRAILER),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (self.severity, color) {
            (Severity::Error, true) => "\x1b[1;31merror\x1b[0m",
            (Severity::Warning, true) => "\x1b[1;33mwarning\x1b[0m",
            (Severity::Error, false) => "error",
            (Severity::Warning, false) => "warning",
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
