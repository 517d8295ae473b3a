//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{bail, Context, Result};

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }

    /// Execute the command and wait for completion, capturing output.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.output()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))
    }

    /// Execute and require success.
    pub fn exec_and_check(&self) -> Result<Output> {
        let output = self.exec()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "`{}` failed with exit code {:?}\n{}",
                self.display_command(),
                output.status.code(),
                stderr.trim_end()
            );
        }
        Ok(output)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find the git executable, honouring `SBPT_GIT`.
pub fn find_git() -> Option<PathBuf> {
    if let Ok(git) = std::env::var("SBPT_GIT") {
        if let Some(path) = find_executable(&git) {
            return Some(path);
        }
    }
    find_executable("git")
}
