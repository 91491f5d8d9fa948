//! Executing [`TcCommand`]s, either for real through [`std::process::Command`] or recorded by a
//! [`DryRun`].

use std::{fmt::Write as _, io, path::PathBuf, process};

use crate::command::TcCommand;

/// Default location of the `tc` binary.
pub const DEFAULT_TC_PATH: &str = "/sbin/tc";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty program provided")]
    Empty,
    #[error("io error")]
    Io(#[from] io::Error),
    #[error("non-zero exit status")]
    NonZero(Output),
}

#[derive(Debug, Clone, Default)]
pub struct Output {
    pub status: process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl From<process::Output> for Output {
    fn from(value: process::Output) -> Self {
        Self {
            status: value.status,
            stdout: String::from_utf8_lossy(&value.stdout).to_string(),
            stderr: String::from_utf8_lossy(&value.stderr).to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Something that can carry out `tc` commands.
pub trait Executor {
    /// Executes a single command.
    fn execute(&mut self, command: &TcCommand) -> Result<Output>;

    /// Executes `commands` in order.
    ///
    /// A failing deletion is logged and skipped: clearing an interface that has nothing
    /// configured is expected to fail. Any other failure stops execution and is returned. The
    /// commands before it stay applied.
    fn apply(&mut self, commands: &[TcCommand]) -> Result<()> {
        for (i, command) in commands.iter().enumerate() {
            match self.execute(command) {
                Ok(_) => {}
                Err(e) if command.is_delete() => {
                    tracing::debug!(%command, ?e, "ignoring failed deletion");
                }
                Err(e) => {
                    tracing::warn!(
                        %command,
                        applied = i,
                        total = commands.len(),
                        "command failed, device left partially configured"
                    );
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn execute(&mut self, command: &TcCommand) -> Result<Output> {
        (**self).execute(command)
    }
}

/// Runs commands by spawning the `tc` binary.
#[derive(Debug, Clone)]
pub struct Runner {
    program: PathBuf,
}

impl Default for Runner {
    fn default() -> Self {
        Self { program: PathBuf::from(DEFAULT_TC_PATH) }
    }
}

impl Runner {
    /// Create a runner spawning the given `tc` binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl Executor for Runner {
    fn execute(&mut self, command: &TcCommand) -> Result<Output> {
        if self.program.as_os_str().is_empty() {
            return Err(Error::Empty);
        }

        let mut cmd = process::Command::new(&self.program);
        cmd.args(command.args()).stderr(process::Stdio::piped()).stdout(process::Stdio::piped());

        tracing::debug!(?cmd, "running command");

        let output: Output = cmd.spawn()?.wait_with_output()?.into();

        if !output.status.success() {
            tracing::debug!(?output.stderr, ?output.status, ?cmd, "command returned non-zero status");
            return Err(Error::NonZero(output));
        }

        Ok(output)
    }
}

/// Records command lines instead of running them.
///
/// Every executed command is appended to the buffer as `<program> <args>\n` and reported as
/// successful.
#[derive(Debug, Clone)]
pub struct DryRun {
    program: String,
    buffer: String,
    commands: Vec<TcCommand>,
}

impl Default for DryRun {
    fn default() -> Self {
        Self::new(DEFAULT_TC_PATH)
    }
}

impl DryRun {
    /// Create a dry run prefixing each recorded line with `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), buffer: String::new(), commands: Vec::new() }
    }

    /// The command lines recorded so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The commands recorded so far.
    pub fn commands(&self) -> &[TcCommand] {
        &self.commands
    }

    /// Takes the recorded command lines, leaving the buffer empty.
    pub fn take_buffer(&mut self) -> String {
        self.commands.clear();
        std::mem::take(&mut self.buffer)
    }
}

impl Executor for DryRun {
    fn execute(&mut self, command: &TcCommand) -> Result<Output> {
        tracing::trace!(%command, "dry run");

        // Writing into a `String` can't fail.
        let _ = writeln!(self.buffer, "{} {}", self.program, command);
        self.commands.push(command.clone());

        Ok(Output::default())
    }
}
