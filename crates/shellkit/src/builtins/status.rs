//! The status builtin

use std::io::{self, Write};

use super::{Builtin, Context};
use crate::interpreter::LineOutcome;

/// Reports how the most recent foreground command ended: `exit value %d`
/// or `terminated by signal %d`. Before any foreground command has run it
/// reports exit value 0.
pub struct Status;

impl Builtin for Status {
    fn execute(&self, ctx: Context<'_>) -> LineOutcome {
        println!("{}", ctx.status);
        let _ = io::stdout().flush();
        LineOutcome::Continue
    }
}
