//! Command dispatch
//!
//! One interpreter iteration: classify the line, run builtins in-process,
//! and fork everything else. The foreground path blocks on the
//! signal-coordinated gate; the background path registers the child for
//! the next reap pass and returns to the prompt immediately.

mod jobs;
mod state;

pub use jobs::{EvictionPolicy, JobCompletion, JobTable};
pub use state::{ForegroundStatus, LineOutcome};

use std::collections::HashMap;
use std::io::{self, Write};
use std::process;

use nix::unistd::{ForkResult, fork};
use tracing::debug;

use crate::builtins::{self, Builtin, Context};
use crate::error::{Error, Result};
use crate::launcher::{self, LAUNCH_FAILURE_STATUS};
use crate::limits::ShellLimits;
use crate::parser::{CommandDescriptor, CommandLine};
use crate::signals::{
    ForegroundGate, ShellMode, prepare_background_child, prepare_foreground_child,
};

/// Interpreter state: the builtin registry, the background job table, and
/// the foreground status record.
pub struct Interpreter {
    builtins: HashMap<&'static str, Box<dyn Builtin>>,
    jobs: JobTable,
    status: ForegroundStatus,
}

impl Interpreter {
    pub fn new(limits: &ShellLimits, policy: EvictionPolicy) -> Self {
        let mut builtins: HashMap<&'static str, Box<dyn Builtin>> = HashMap::new();
        builtins.insert("cd", Box::new(builtins::Cd));
        builtins.insert("status", Box::new(builtins::Status));
        builtins.insert("exit", Box::new(builtins::Exit));

        Self {
            builtins,
            jobs: JobTable::new(limits.job_capacity, policy),
            status: ForegroundStatus::default(),
        }
    }

    /// Last foreground disposition.
    pub fn status(&self) -> ForegroundStatus {
        self.status
    }

    /// Non-blocking reap pass over the job table. Call once per iteration,
    /// before prompting, so completions surface promptly without ever
    /// blocking the prompt.
    pub fn reap_background(&mut self) -> Vec<JobCompletion> {
        self.jobs.reap_completed()
    }

    /// Number of background jobs still tracked as unreaped.
    pub fn background_jobs(&self) -> usize {
        self.jobs.occupied()
    }

    /// Execute one parsed line.
    pub fn run(&mut self, line: CommandLine) -> Result<LineOutcome> {
        if line.is_empty() || line.is_comment() {
            return Ok(LineOutcome::Continue);
        }

        if let Some(name) = line.program() {
            if let Some(builtin) = self.builtins.get(name) {
                debug!(command = name, "running builtin");
                return Ok(builtin.execute(Context {
                    args: &line.tokens()[1..],
                    status: self.status,
                }));
            }
        }

        // The mode flag is consulted exactly once per dispatch, here.
        let cmd = line.resolve(ShellMode::foreground_only());
        if cmd.argv().is_empty() {
            // The line was nothing but redirections and markers.
            return Ok(LineOutcome::Continue);
        }
        self.spawn(cmd)
    }

    /// Shutdown sequence: forcibly terminate all tracked background jobs.
    pub fn shutdown(&mut self) {
        self.jobs.terminate_all();
    }

    fn spawn(&mut self, cmd: CommandDescriptor) -> Result<LineOutcome> {
        if cmd.background() && !self.jobs.can_register() {
            return Err(Error::JobTableFull(self.jobs.capacity()));
        }

        debug!(program = cmd.program(), background = cmd.background(), "forking");
        // Anything buffered would be duplicated into the child.
        let _ = io::stdout().flush();

        match unsafe { fork() }.map_err(Error::Fork)? {
            ForkResult::Child => {
                if cmd.background() {
                    prepare_background_child();
                } else {
                    prepare_foreground_child();
                }
                // Reached only when program replacement failed.
                let err = launcher::launch(&cmd);
                println!("{err}");
                let _ = io::stdout().flush();
                process::exit(LAUNCH_FAILURE_STATUS);
            }
            ForkResult::Parent { child } => {
                if cmd.background() {
                    println!("background pid is {child}");
                    let _ = io::stdout().flush();
                    self.jobs.register(child)?;
                } else {
                    let status = ForegroundGate::wait(child);
                    if let ForegroundStatus::Signaled(signal) = status {
                        println!("terminated by signal {signal}");
                        let _ = io::stdout().flush();
                    }
                    self.status = status;
                }
                Ok(LineOutcome::Continue)
            }
        }
    }
}
