//! `sbpt.ini` manifest parsing.
//!
//! A manifest is a small INI file with a single recognized section:
//!
//! ```ini
//! [subproject]
//! dependencies = glfw_window, shader_cache
//! export = batcher.hpp
//! tags = graphics
//! ```
//!
//! Every key holds a comma separated list, which may continue on indented
//! lines. Key names are case-insensitive. Missing keys or a missing section
//! simply produce empty lists; unknown keys and sections are ignored.

use std::io;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// File name that marks a directory as a subproject.
pub const MANIFEST_NAME: &str = "sbpt.ini";

/// The section all recognized keys live in.
pub const SECTION: &str = "subproject";

const KEY_DEPENDENCIES: &str = "dependencies";
const KEY_EXPORT: &str = "export";
const KEY_TAGS: &str = "tags";

/// Malformed manifest text.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("failed to parse `{}`: {message}", .path.display())]
#[diagnostic(
    code(sbpt::manifest::parse),
    help("manifests use `[subproject]` followed by `key = comma, separated, values` lines")
)]
pub struct ManifestParseError {
    /// Manifest file that failed to parse.
    pub path: PathBuf,
    /// Parser message.
    pub message: String,
    /// Line of the failure (1-based).
    pub line: usize,
    /// Column of the failure (1-based).
    pub column: usize,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
}

/// Failure to produce a declaration for a manifest on disk.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read `{}`", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ManifestParseError),
}

impl ManifestError {
    /// Path of the manifest involved.
    pub fn path(&self) -> &Path {
        match self {
            ManifestError::Read { path, .. } => path,
            ManifestError::Parse(e) => &e.path,
        }
    }
}

/// Structured content of one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDeclaration {
    /// Subproject name, taken from the directory holding the manifest.
    pub name: String,
    /// Names of subprojects this one depends on, in declaration order.
    pub dependencies: Vec<String>,
    /// Files (relative to the subproject directory) offered to dependents.
    pub exports: Vec<String>,
    /// Free-form classification; the first tag is a placement hint.
    pub tags: Vec<String>,
}

impl ManifestDeclaration {
    /// Load the manifest inside `dir`, naming the declaration after `name`.
    pub fn load(name: impl Into<String>, dir: &Path) -> Result<Self, ManifestError> {
        let path = dir.join(MANIFEST_NAME);
        let content = std::fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;

        Ok(Self::parse(name, &content, &path)?)
    }

    /// Parse manifest text. `path` is only used for error reporting.
    pub fn parse(
        name: impl Into<String>,
        content: &str,
        path: &Path,
    ) -> Result<Self, ManifestParseError> {
        let error_at = |line: usize, col: usize, message: String| ManifestParseError {
            path: path.to_path_buf(),
            message,
            line: line + 1,
            column: col + 1,
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span: span_at(content, line, col),
        };

        check_lines(content).map_err(|(line, col, message)| error_at(line, col, message))?;

        // Export paths may contain backslashes; keep values verbatim.
        let opts = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            enabled_indented_mutiline_value: true,
            ..ParseOption::default()
        };

        let ini = Ini::load_from_str_opt(content, opts)
            .map_err(|e| error_at(e.line, e.col, e.msg.to_string()))?;

        let list = |key: &str| {
            ini.section(Some(SECTION))
                .and_then(|props| {
                    props
                        .iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(key))
                        .map(|(_, v)| v)
                })
                .map(split_list)
                .unwrap_or_default()
        };

        Ok(ManifestDeclaration {
            name: name.into(),
            dependencies: list(KEY_DEPENDENCIES),
            exports: list(KEY_EXPORT),
            tags: list(KEY_TAGS),
        })
    }

    /// Render the declaration back into manifest text.
    pub fn render(&self) -> String {
        format!(
            "[{SECTION}]\n{KEY_EXPORT} = {}\n{KEY_DEPENDENCIES} = {}\n{KEY_TAGS} = {}\n",
            self.exports.join(", "),
            self.dependencies.join(", "),
            self.tags.join(", "),
        )
    }

    /// First tag, used to suggest where an acquired module should live.
    pub fn placement_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}

/// Split a comma list, trimming elements and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check that every line is blank, a comment, a section header, a
/// `key = value` / `key: value` line, or an indented continuation of the
/// value above it.
///
/// rust-ini reads a key up to the next separator even across newlines, so a
/// stray line would otherwise swallow the key after it. Failures carry a
/// zero-based line and column.
fn check_lines(content: &str) -> Result<(), (usize, usize, String)> {
    let mut after_value = false;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        let col = raw.len() - raw.trim_start().len();

        if line.is_empty() {
            after_value = false;
            continue;
        }
        if line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if after_value && col > 0 {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err((index, col, "unterminated section header".to_string()));
            }
            after_value = false;
            continue;
        }

        match line.find(|c: char| c == '=' || c == ':') {
            Some(0) => return Err((index, col, "missing key before separator".to_string())),
            Some(_) => after_value = true,
            None => {
                return Err((
                    index,
                    col,
                    format!("expected `key = value`, found `{}`", line),
                ))
            }
        }
    }

    Ok(())
}

/// Byte span of a zero-based line/column position, clamped to the content.
fn span_at(content: &str, line: usize, col: usize) -> SourceSpan {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line)
        .map(str::len)
        .sum();
    let offset = (line_start + col).min(content.len());
    let len = if offset < content.len() { 1 } else { 0 };
    SourceSpan::new(offset.into(), len)
}
