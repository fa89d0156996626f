//! Navigation builtins (cd)

use std::env;

use tracing::debug;

use super::{Builtin, Context};
use crate::interpreter::LineOutcome;

/// The cd builtin - change directory. With no argument, the target comes
/// from the `HOME` environment variable.
pub struct Cd;

impl Builtin for Cd {
    fn execute(&self, ctx: Context<'_>) -> LineOutcome {
        let target = ctx
            .args
            .first()
            .cloned()
            .or_else(|| env::var("HOME").ok());

        let Some(target) = target else {
            // No argument and no HOME: nowhere to go.
            return LineOutcome::Continue;
        };

        debug!(%target, "cd");
        if env::set_current_dir(&target).is_err() {
            eprintln!("cd: {target}: No such file or directory");
        }
        LineOutcome::Continue
    }
}
