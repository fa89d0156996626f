//! Shellkit - job-control shell engine
//!
//! One iteration of the engine reaps finished background jobs, parses a
//! line, and dispatches it: builtins run in-process, everything else is
//! forked and either waited on synchronously (foreground) or registered in
//! a bounded job table (background). Two process-wide signals steer the
//! engine: SIGINT, which the shell ignores and foreground children die to,
//! and SIGTSTP, which toggles foreground-only mode.
//!
//! # Example
//!
//! ```no_run
//! use shellkit::{LineOutcome, Shell};
//!
//! fn main() -> shellkit::Result<()> {
//!     let mut shell = Shell::new();
//!     shell.install_signal_handlers()?;
//!     for done in shell.reap_background() {
//!         println!("{done}");
//!     }
//!     assert_eq!(shell.run_line("echo hello")?, LineOutcome::Continue);
//!     shell.shutdown();
//!     Ok(())
//! }
//! ```

mod builtins;
mod error;
mod interpreter;
mod launcher;
mod limits;
mod parser;
mod signals;

pub use error::{Error, Result};
pub use interpreter::{EvictionPolicy, ForegroundStatus, JobCompletion, JobTable, LineOutcome};
pub use limits::ShellLimits;
pub use parser::{BACKGROUND_MARKER, CommandDescriptor, CommandLine, PID_MARKER, Parser};
pub use signals::ShellMode;

/// Re-exported so callers can construct and compare process ids without
/// depending on nix directly.
pub use nix::unistd::Pid;

use interpreter::Interpreter;
use nix::unistd::getpid;

/// Main entry point for Shellkit.
///
/// Owns the parser and the interpreter for one shell process.
pub struct Shell {
    parser: Parser,
    interpreter: Interpreter,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Create a shell with default limits and eviction policy.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new ShellBuilder for customized configuration.
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// Install the SIGINT and SIGTSTP dispositions. Call once, before the
    /// first prompt; forked children inherit and adjust them.
    pub fn install_signal_handlers(&self) -> Result<()> {
        signals::install()
    }

    /// Reap finished background jobs without blocking. Call once per
    /// iteration, before prompting, and report each completion record.
    pub fn reap_background(&mut self) -> Vec<JobCompletion> {
        self.interpreter.reap_background()
    }

    /// Parse and execute one input line.
    pub fn run_line(&mut self, line: &str) -> Result<LineOutcome> {
        self.interpreter.run(self.parser.parse(line))
    }

    /// How the most recent foreground command ended.
    pub fn status(&self) -> ForegroundStatus {
        self.interpreter.status()
    }

    /// Number of background jobs still tracked as unreaped.
    pub fn background_jobs(&self) -> usize {
        self.interpreter.background_jobs()
    }

    /// Shutdown sequence: every tracked background job is sent SIGKILL.
    /// No wait is performed; the shell exits independently.
    pub fn shutdown(&mut self) {
        self.interpreter.shutdown();
    }
}

/// Builder for customized Shell configuration.
#[derive(Default)]
pub struct ShellBuilder {
    limits: ShellLimits,
    eviction: EvictionPolicy,
}

impl ShellBuilder {
    /// Set parsing and job-table limits.
    pub fn limits(mut self, limits: ShellLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Choose what happens when the job table wraps onto an unreaped pid.
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction = policy;
        self
    }

    /// Build the Shell instance.
    pub fn build(self) -> Shell {
        Shell {
            parser: Parser::new(getpid(), self.limits.max_args),
            interpreter: Interpreter::new(&self.limits, self.eviction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        let mut shell = Shell::new();
        assert_eq!(shell.run_line("").unwrap(), LineOutcome::Continue);
        assert_eq!(shell.run_line("   ").unwrap(), LineOutcome::Continue);
        assert_eq!(
            shell.run_line("# background pid bookkeeping").unwrap(),
            LineOutcome::Continue
        );
        assert_eq!(shell.status(), ForegroundStatus::NotYetRun);
    }

    #[test]
    fn test_exit_requests_shutdown() {
        let mut shell = Shell::new();
        assert_eq!(shell.run_line("exit").unwrap(), LineOutcome::Exit);
    }

    #[test]
    fn test_status_before_any_foreground_command() {
        let shell = Shell::new();
        assert_eq!(shell.status().to_string(), "exit value 0");
    }

    #[test]
    #[serial]
    fn test_cd_builtin_changes_directory() {
        let dir = tempfile::tempdir().unwrap();
        let original = std::env::current_dir().unwrap();

        let mut shell = Shell::new();
        let line = format!("cd {}", dir.path().display());
        assert_eq!(shell.run_line(&line).unwrap(), LineOutcome::Continue);
        assert_eq!(
            std::env::current_dir().unwrap().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );

        std::env::set_current_dir(original).unwrap();
    }
}
