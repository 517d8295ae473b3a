//! User-friendly diagnostic messages.
//!
//! Every problem sbpt reports carries the root cause, the subprojects or
//! paths involved, and where possible a suggested next step.

use std::fmt;
use std::path::PathBuf;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, GraphicalTheme};

/// Common suggestion messages.
pub mod suggestions {
    /// Suggestion when a declared dependency is not on disk.
    pub const MISSING_DEPENDENCY: &str =
        "run `sbpt init <dir>` to attach missing dependencies as submodules";

    /// Suggestion when a dependency exports nothing.
    pub const NO_EXPORTS: &str = "add an `export = <header>` line to the dependency's sbpt.ini";

    /// Suggestion when two directories share a subproject name.
    pub const DUPLICATE_NAME: &str =
        "rename or remove one of the directories; the shorter path is used";

    /// Suggestion when acquisition was aborted.
    pub const ACQUISITION_ABORTED: &str =
        "attach the module manually with `git submodule add` and rerun `sbpt init`";

    /// Suggestion for remote lookups that failed.
    pub const FETCH_FAILED: &str =
        "check your network connection and try `sbpt refresh-known-repos`";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional context and suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related file or directory
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Note => "note",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help_prefix = if color { "\x1b[1;32mhelp\x1b[0m" } else { "help" };
            for suggestion in &self.suggestions {
                output.push_str(&format!("  {}: {}\n", help_prefix, suggestion));
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

/// Render a miette diagnostic (with its source snippet) to a string.
pub fn render_report(diagnostic: &dyn MietteDiagnostic, color: bool) -> String {
    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);

    let mut out = String::new();
    if handler.render_report(&mut out, diagnostic).is_err() {
        out = format!("{}\n", diagnostic);
    }
    out
}
