//! Built-in shell commands
//!
//! Builtins run inside the shell process itself, before any fork: they
//! exist to mutate or read state a child could not (the working directory,
//! the foreground status record, the loop itself). They see the raw token
//! sequence; background markers and redirection are not resolved for them.

mod exit;
mod navigation;
mod status;

pub use exit::Exit;
pub use navigation::Cd;
pub use status::Status;

use crate::interpreter::{ForegroundStatus, LineOutcome};

/// Execution context handed to a builtin.
pub struct Context<'a> {
    /// Arguments after the command name.
    pub args: &'a [String],
    /// Last foreground disposition, for `status`.
    pub status: ForegroundStatus,
}

/// A command handled in-process.
pub trait Builtin {
    fn execute(&self, ctx: Context<'_>) -> LineOutcome;
}
