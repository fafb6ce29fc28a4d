//! Subprocess execution for the external tools the workflow drives.
//!
//! Every external program (`openapi-generator-cli`, `npm`, `java`) is run
//! through the [`CommandRunner`] trait and reported back as a
//! [`ProcessOutcome`]. The outcome keeps both output streams apart; callers
//! decide which one carries the information they need (Java writes its
//! version to stderr, the generator logs to both).

use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;
use std::process::{Output, Stdio};

use tokio::process::Command;
use tracing::{debug, trace};
use which::which;

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// stdout, lossily decoded.
    pub stdout: String,
    /// stderr, lossily decoded.
    pub stderr: String,
}

impl ProcessOutcome {
    /// Creates a successful outcome with the given stdout.
    pub fn success_with(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Creates an outcome with the given exit code and stderr.
    pub fn failure_with(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns `true` when the process exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Human-readable exit status, e.g. `exit code 1`.
    pub fn status_label(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }

    /// Returns the first non-empty line of `preferred`, falling back to the
    /// other stream when `preferred` is blank.
    pub fn first_line(&self, preferred: Stream) -> Option<&str> {
        let (first, second) = match preferred {
            Stream::Stdout => (&self.stdout, &self.stderr),
            Stream::Stderr => (&self.stderr, &self.stdout),
        };
        let text = if first.trim().is_empty() { second } else { first };
        text.lines().map(str::trim).find(|line| !line.is_empty())
    }

    /// Both streams joined for display, skipping empty ones.
    pub fn combined_output(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Output> for ProcessOutcome {
    fn from(output: Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Output stream selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Formats a program and its arguments as a single display string.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs external programs to completion.
///
/// Uses native async functions in traits; implementations must be
/// `Send + Sync` so the returned futures are `Send`.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and waits for it to exit.
    ///
    /// ## Errors
    ///
    /// Returns an `io::Error` when the program cannot be started. A program
    /// that starts and exits non-zero is *not* an error here; inspect
    /// [`ProcessOutcome::success`].
    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> impl std::future::Future<Output = io::Result<ProcessOutcome>> + Send;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(
        &self,
        program: &str,
        args: &[String],
    ) -> impl std::future::Future<Output = io::Result<ProcessOutcome>> + Send {
        (**self).run(program, args)
    }
}

/// Finds a program by name in the system PATH.
///
/// Uses the `which` crate so Windows shims such as `npm.cmd` or
/// `openapi-generator-cli.cmd` resolve the same way they do in a shell.
pub fn find_program<P: AsRef<OsStr>>(program: P) -> Option<PathBuf> {
    which(program).ok()
}

/// [`CommandRunner`] backed by real child processes.
///
/// Children get a null stdin so they never consume the user's answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutcome> {
        let path = find_program(program).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("program '{program}' not found in PATH"),
            )
        })?;
        debug!(program, path = %path.display(), "Resolved program");

        let output = Command::new(&path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let outcome = ProcessOutcome::from(output);
        trace!(
            command = %command_line(program, args),
            exit_code = ?outcome.exit_code,
            "Process finished"
        );
        Ok(outcome)
    }
}
