//! Interpreter state types

use std::fmt;

/// What the prompt loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Keep prompting.
    Continue,
    /// `exit` was requested; run the shutdown sequence and stop.
    Exit,
}

/// Exit disposition of the most recent foreground command.
///
/// Process-wide from the user's point of view: written only by the
/// foreground wait path, read by the `status` builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForegroundStatus {
    /// No foreground command has completed yet. `status` reports this as
    /// exit value 0.
    #[default]
    NotYetRun,
    /// The child exited normally with this code.
    Exited(i32),
    /// The child was terminated by this signal.
    Signaled(i32),
}

impl ForegroundStatus {
    /// Decode a raw wait status, as captured by the SIGTSTP handler's own
    /// `waitpid`.
    pub(crate) fn from_raw(raw: libc::c_int) -> Self {
        if libc::WIFEXITED(raw) {
            Self::Exited(libc::WEXITSTATUS(raw))
        } else if libc::WIFSIGNALED(raw) {
            Self::Signaled(libc::WTERMSIG(raw))
        } else {
            // Without WUNTRACED a wait only reports exit or signal death.
            Self::Exited(1)
        }
    }
}

impl fmt::Display for ForegroundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotYetRun => write!(f, "exit value 0"),
            Self::Exited(code) => write!(f, "exit value {code}"),
            Self::Signaled(signal) => write!(f, "terminated by signal {signal}"),
        }
    }
}
