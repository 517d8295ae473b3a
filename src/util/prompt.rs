//! Interactive prompting.
//!
//! The resolver never talks to the terminal directly; it goes through a
//! [`Prompter`] so tests can answer questions deterministically.

use std::io::IsTerminal;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, InquireError, Select, Text};
use walkdir::WalkDir;

use crate::core::MANIFEST_NAME;

/// Questions the resolver may ask the operator.
pub trait Prompter {
    /// Pick one of `options`. `None` means the operator backed out.
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<Option<usize>>;

    /// Yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Pick a directory at or below `under`. `None` means the operator
    /// backed out.
    fn choose_directory(&mut self, prompt: &str, under: &Path) -> Result<Option<PathBuf>>;
}

/// Terminal prompter backed by inquire.
#[derive(Debug)]
pub struct InquirePrompter {
    /// How deep below the root directory candidates are offered.
    max_depth: usize,
}

impl Default for InquirePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl InquirePrompter {
    pub fn new() -> Self {
        InquirePrompter { max_depth: 2 }
    }

    /// Directories offered by [`Prompter::choose_directory`]: `under`
    /// itself, then non-hidden directories that are not subprojects.
    pub fn candidate_directories(&self, under: &Path) -> Vec<PathBuf> {
        let mut dirs = vec![under.to_path_buf()];

        let walker = WalkDir::new(under)
            .min_depth(1)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.file_type().is_dir()
                    && !e.file_name().to_string_lossy().starts_with('.')
                    && !e.path().join(MANIFEST_NAME).exists()
            });

        for entry in walker.flatten() {
            dirs.push(entry.into_path());
        }
        dirs
    }
}

/// Prompts need a terminal; piped or closed stdin cannot answer them.
fn ensure_interactive(prompt: &str) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!("cannot ask `{}`: stdin is not a terminal", prompt);
    }
    Ok(())
}

/// Map inquire's "escape pressed" into `None`; everything else is an error.
fn cancellable<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(e).context("prompt failed"),
    }
}

impl Prompter for InquirePrompter {
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        if options.is_empty() {
            return Ok(None);
        }
        ensure_interactive(prompt)?;

        let answer = Select::new(prompt, options.to_vec())
            .with_page_size(15)
            .raw_prompt();
        Ok(cancellable(answer)?.map(|choice| choice.index))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        ensure_interactive(prompt)?;
        let answer = Confirm::new(prompt).with_default(default).prompt();
        Ok(cancellable(answer)?.unwrap_or(false))
    }

    fn choose_directory(&mut self, prompt: &str, under: &Path) -> Result<Option<PathBuf>> {
        const CUSTOM: &str = "<enter a path>";

        let candidates = self.candidate_directories(under);
        let mut options: Vec<String> = candidates
            .iter()
            .map(|dir| dir.display().to_string())
            .collect();
        options.push(CUSTOM.to_string());

        let Some(index) = self.select(prompt, &options)? else {
            return Ok(None);
        };
        if let Some(dir) = candidates.get(index) {
            return Ok(Some(dir.clone()));
        }

        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let root = under.to_path_buf();
        let base = cwd.clone();
        let answer = Text::new("Directory (relative paths start at the root):")
            .with_default(".")
            .with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
                Ok(match directory_within(&root, &base, input) {
                    Some(_) => Validation::Valid,
                    None => Validation::Invalid(
                        format!("must be inside {}", root.display()).into(),
                    ),
                })
            })
            .prompt();

        Ok(cancellable(answer)?.and_then(|text| directory_within(under, &cwd, &text)))
    }
}

/// Resolve a typed directory against `under`.
///
/// Relative answers start at `under`; `.` and `..` are folded lexically
/// since the directory may not exist yet. Returns `None` for anything that
/// ends up outside `under`. The result keeps `under`'s own form (relative
/// or absolute); `cwd` anchors a relative `under` for the comparison.
pub fn directory_within(under: &Path, cwd: &Path, answer: &str) -> Option<PathBuf> {
    let base = normalize(&cwd.join(under));
    let answer = Path::new(answer.trim());
    let target = normalize(&base.join(answer));

    let rest = target.strip_prefix(&base).ok()?;
    if rest.as_os_str().is_empty() {
        Some(under.to_path_buf())
    } else {
        Some(under.join(rest))
    }
}

/// Fold `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_directories() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("graphics/opengl/deep/deeper")).unwrap();
        std::fs::create_dir_all(root.join(".git/modules")).unwrap();
        std::fs::create_dir_all(root.join("util")).unwrap();
        std::fs::write(root.join("util").join(MANIFEST_NAME), "[subproject]\n").unwrap();

        let dirs = InquirePrompter::new().candidate_directories(root);

        assert_eq!(
            dirs,
            vec![
                root.to_path_buf(),
                root.join("graphics"),
                root.join("graphics/opengl"),
            ]
        );
    }

    #[test]
    fn test_directory_within_relative_answers() {
        let cwd = Path::new("/work");
        let root = Path::new("/work/src");

        assert_eq!(
            directory_within(root, cwd, "libs/graphics"),
            Some(PathBuf::from("/work/src/libs/graphics"))
        );
        assert_eq!(
            directory_within(root, cwd, "./libs/../util"),
            Some(PathBuf::from("/work/src/util"))
        );
        assert_eq!(directory_within(root, cwd, ""), Some(root.to_path_buf()));
        assert_eq!(directory_within(root, cwd, "../elsewhere"), None);
        assert_eq!(directory_within(root, cwd, "libs/../../x"), None);
    }

    #[test]
    fn test_directory_within_absolute_answers() {
        let cwd = Path::new("/work");
        let root = Path::new("/work/src");

        assert_eq!(
            directory_within(root, cwd, "/work/src/libs"),
            Some(PathBuf::from("/work/src/libs"))
        );
        assert_eq!(directory_within(root, cwd, "/elsewhere"), None);
        assert_eq!(directory_within(root, cwd, "/work/srcx"), None);
    }

    #[test]
    fn test_directory_within_keeps_relative_root() {
        let cwd = Path::new("/work");

        assert_eq!(
            directory_within(Path::new("."), cwd, "libs"),
            Some(PathBuf::from("./libs"))
        );
        assert_eq!(
            directory_within(Path::new("."), cwd, "/work/libs"),
            Some(PathBuf::from("./libs"))
        );
        assert_eq!(directory_within(Path::new("."), cwd, ".."), None);
    }
}
