//! Launch description of the supervised child.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

/// Everything needed to spawn the child process.
///
/// The environment defaults to "inherit all, override none": the child
/// sees the host's environment with `env` applied on top.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchSpec {
    /// Executable to run. Relative paths containing a separator resolve
    /// against `working_dir`.
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Relative directories are taken from the host's current directory.
    pub working_dir: PathBuf,
    /// Variables set on top of the (possibly inherited) environment.
    pub env: HashMap<String, String>,
    pub inherit_env: bool,
}

impl LaunchSpec {
    /// Launch `program` in `working_dir` with no arguments and the
    /// inherited environment.
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            env: HashMap::new(),
            inherit_env: true,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Start the child with only the variables in `env`.
    pub fn clear_env(mut self) -> Self {
        self.inherit_env = false;
        self
    }

    /// The absolute directory the child starts in.
    pub fn resolved_working_dir(&self) -> std::io::Result<PathBuf> {
        if self.working_dir.is_absolute() {
            Ok(self.working_dir.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.working_dir))
        }
    }

    /// The program path as it will be executed.
    ///
    /// Anchored at the absolute working directory, so the child's own
    /// directory change does not apply the relative part twice.
    pub fn resolved_program(&self) -> std::io::Result<PathBuf> {
        Ok(resolve_program(&self.program, &self.resolved_working_dir()?))
    }

    /// Human-readable command line, for logs.
    pub fn display_command(&self) -> String {
        let program = self
            .resolved_program()
            .unwrap_or_else(|_| resolve_program(&self.program, &self.working_dir));
        let mut parts = vec![program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Build the tokio command. Stdio is inherited from the host, and the
    /// child is killed if its handle is dropped without a shutdown.
    pub(crate) fn to_command(&self) -> std::io::Result<Command> {
        let working_dir = self.resolved_working_dir()?;
        let mut cmd = Command::new(resolve_program(&self.program, &working_dir));
        cmd.args(&self.args)
            .current_dir(&working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if !self.inherit_env {
            cmd.env_clear();
        }
        cmd.envs(&self.env);
        Ok(cmd)
    }
}

/// Bare names (`node`) are left to `PATH` lookup; anything with a
/// separator is anchored at the working directory unless absolute.
fn resolve_program(program: &Path, working_dir: &Path) -> PathBuf {
    if program.is_absolute() || program.components().count() <= 1 {
        program.to_path_buf()
    } else {
        working_dir.join(program)
    }
}
