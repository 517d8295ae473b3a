//! Centralized shell output.
//!
//! The Shell owns every user-facing line sbpt prints:
//! - Status messages with a right-aligned, colored status word
//! - Spinners for blocking network calls (via indicatif)
//! - JSON mode for `list --json`: status lines are suppressed and events go
//!   to stdout as single-line documents
//!
//! Commands never format status prefixes themselves; they pick a [`Status`]
//! and let the shell decide color, alignment and whether to print at all.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::util::diagnostic::{Diagnostic, Severity};

/// Shell output mode - Human and Json are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellMode {
    /// Human-readable output with optional colors and spinners.
    Human {
        verbosity: Verbosity,
        color: ColorChoice,
    },
    /// Machine-readable JSON output only.
    Json,
}

impl Default for ShellMode {
    fn default() -> Self {
        ShellMode::Human {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
        }
    }
}

/// Output verbosity level (Human mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    #[default]
    Normal,
    /// --verbose: nested detail lines and no spinners
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status words for output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success (green)
    Added,
    Attached,
    Created,
    Finished,
    Generated,

    // In progress (cyan)
    Scanning,
    Verifying,
    Acquiring,
    Generating,
    Fetching,

    // Info (blue)
    Found,
    Info,

    // Warning (yellow)
    Missing,
    Skipped,

    // Error (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Added => "Added",
            Status::Attached => "Attached",
            Status::Created => "Created",
            Status::Finished => "Finished",
            Status::Generated => "Generated",
            Status::Scanning => "Scanning",
            Status::Verifying => "Verifying",
            Status::Acquiring => "Acquiring",
            Status::Generating => "Generating",
            Status::Fetching => "Fetching",
            Status::Found => "Found",
            Status::Info => "Info",
            Status::Missing => "Missing",
            Status::Skipped => "Skipped",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Added
            | Status::Attached
            | Status::Created
            | Status::Finished
            | Status::Generated => "\x1b[1;32m",
            Status::Scanning
            | Status::Verifying
            | Status::Acquiring
            | Status::Generating
            | Status::Fetching => "\x1b[1;36m",
            Status::Found | Status::Info => "\x1b[1;34m",
            Status::Missing | Status::Skipped => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }

    /// Alignment width of the status column.
    fn width(&self) -> usize {
        12
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    mode: ShellMode,
    use_color: bool,
}

impl Shell {
    pub fn new(mode: ShellMode) -> Self {
        let use_color = match &mode {
            ShellMode::Json => false,
            ShellMode::Human { color, .. } => match color {
                ColorChoice::Auto => io::stderr().is_terminal(),
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            },
        };

        Shell { mode, use_color }
    }

    /// Create a shell from CLI flags. JSON takes precedence over quiet/verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice, json: bool) -> Self {
        let mode = if json {
            ShellMode::Json
        } else {
            let verbosity = if quiet {
                Verbosity::Quiet
            } else if verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            };
            ShellMode::Human { verbosity, color }
        };

        Shell::new(mode)
    }

    /// A shell that prints nothing but errors, used by tests and library
    /// callers that do their own reporting.
    pub fn quiet() -> Self {
        Shell::new(ShellMode::Human {
            verbosity: Verbosity::Quiet,
            color: ColorChoice::Never,
        })
    }

    pub fn is_quiet(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Quiet,
                ..
            }
        )
    }

    pub fn is_verbose(&self) -> bool {
        matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Verbose,
                ..
            }
        )
    }

    pub fn is_json(&self) -> bool {
        matches!(self.mode, ShellMode::Json)
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status line: `{status:>12} {message}`.
    ///
    /// Quiet mode only lets errors through; JSON mode prints nothing here.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_json() {
            return;
        }
        if self.is_quiet() && status != Status::Error {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print an indented detail line, only in verbose mode.
    pub fn detail(&self, msg: impl Display) {
        if self.is_verbose() {
            eprintln!("{:>width$} {}", "", msg, width = 12);
        }
    }

    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// Print an error. In JSON mode this becomes an error event.
    pub fn error(&self, msg: impl Display) {
        if self.is_json() {
            let event = serde_json::json!({
                "reason": "error",
                "message": msg.to_string()
            });
            self.json_event(&event);
        } else {
            self.status(Status::Error, msg);
        }
    }

    /// Print a full diagnostic block on stderr.
    ///
    /// JSON mode keeps stdout for the command's document, so diagnostics
    /// stay human-readable (and uncolored) there.
    pub fn diagnostic(&self, diag: &Diagnostic) {
        if self.is_quiet() && diag.severity != Severity::Error {
            return;
        }

        eprint!("{}", diag.format(self.use_color));
    }

    /// Print a JSON value on stdout. Ignored in human mode.
    pub fn json_event(&self, event: &serde_json::Value) {
        if !self.is_json() {
            return;
        }

        let json_str = serde_json::to_string(event).unwrap_or_default();
        println!("{}", json_str);
        let _ = io::stdout().flush();
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        let width = status.width();

        if self.use_color {
            format!("{}{:>width$}\x1b[0m", status.color_code(), text, width = width)
        } else {
            format!("{:>width$}", text, width = width)
        }
    }

    /// Start a spinner for a blocking operation.
    ///
    /// Quiet, verbose and JSON modes get a plain status line instead.
    pub fn spinner(&self, status: Status, msg: impl Display) -> Spinner {
        let msg = msg.to_string();
        let interactive = matches!(
            self.mode,
            ShellMode::Human {
                verbosity: Verbosity::Normal,
                ..
            }
        ) && io::stderr().is_terminal();

        if !interactive {
            self.status(status, &msg);
            return Spinner { pb: None };
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{} {}", status.as_str(), msg));
        pb.enable_steady_tick(Duration::from_millis(100));
        Spinner { pb: Some(pb) }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(ShellMode::default())
    }
}

/// A spinner that clears itself when dropped.
pub struct Spinner {
    pb: Option<ProgressBar>,
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }
}
