//! The exit builtin

use super::{Builtin, Context};
use crate::interpreter::LineOutcome;

/// Ends the prompt loop. The caller runs the shutdown sequence, which
/// forcibly terminates any tracked background jobs.
pub struct Exit;

impl Builtin for Exit {
    fn execute(&self, _ctx: Context<'_>) -> LineOutcome {
        LineOutcome::Exit
    }
}
