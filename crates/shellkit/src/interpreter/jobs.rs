//! Background job table
//!
//! A fixed-capacity ring of unreaped background pids, polled non-blockingly
//! once per prompt cycle. The insertion cursor advances monotonically and
//! wraps; what happens when it lands on a slot still holding an unreaped
//! pid is the table's eviction policy.

use std::fmt;

use nix::sys::signal::{Signal, kill};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// What to do when the wrapping cursor reaches an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Overwrite the slot. The evicted pid keeps running but can no longer
    /// be reaped or reported; the loss is logged, never user-visible.
    #[default]
    EvictOldest,
    /// Refuse the registration when no slot is free.
    Reject,
}

/// Completion record for a reaped background process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobCompletion {
    /// `pid` exited normally with `code`.
    Exited { pid: Pid, code: i32 },
    /// `pid` was terminated by `signal`.
    Signaled { pid: Pid, signal: i32 },
}

impl fmt::Display for JobCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited { pid, code } => {
                write!(f, "background pid {pid} is done: exit value {code}")
            }
            Self::Signaled { pid, signal } => {
                write!(f, "background pid {pid} is done: terminated by signal {signal}")
            }
        }
    }
}

/// Bounded registry of outstanding background pids.
pub struct JobTable {
    slots: Vec<Option<Pid>>,
    cursor: usize,
    policy: EvictionPolicy,
}

impl JobTable {
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        assert!(capacity > 0, "job table capacity must be nonzero");
        Self {
            slots: vec![None; capacity],
            cursor: 0,
            policy,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently holding an unreaped pid.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether a registration would be accepted right now.
    pub fn can_register(&self) -> bool {
        match self.policy {
            EvictionPolicy::EvictOldest => true,
            EvictionPolicy::Reject => self.slots.iter().any(|slot| slot.is_none()),
        }
    }

    /// Insert a freshly forked background pid.
    ///
    /// Under `EvictOldest` the cursor slot is overwritten unconditionally
    /// and the displaced pid, if any, is returned. Under `Reject` the first
    /// free slot at or after the cursor is used, or `JobTableFull` if none.
    pub fn register(&mut self, pid: Pid) -> Result<Option<Pid>> {
        let capacity = self.capacity();
        let slot_idx = match self.policy {
            EvictionPolicy::EvictOldest => self.cursor,
            EvictionPolicy::Reject => (0..capacity)
                .map(|offset| (self.cursor + offset) % capacity)
                .find(|&idx| self.slots[idx].is_none())
                .ok_or(Error::JobTableFull(capacity))?,
        };

        let evicted = self.slots[slot_idx].replace(pid);
        self.cursor = (slot_idx + 1) % capacity;

        debug!(%pid, slot = slot_idx, "registered background job");
        if let Some(lost) = evicted {
            warn!(%lost, slot = slot_idx, "job table wrapped; evicted unreaped pid");
        }
        Ok(evicted)
    }

    /// Non-blocking reap pass over every occupied slot.
    ///
    /// Finished processes are cleared from the table and reported as
    /// completion records. Entries whose pid is no longer a waitable child
    /// release their slot without a record.
    pub fn reap_completed(&mut self) -> Vec<JobCompletion> {
        let mut completed = Vec::new();
        for slot in &mut self.slots {
            let Some(pid) = *slot else { continue };
            match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(_, code)) => {
                    completed.push(JobCompletion::Exited { pid, code });
                    *slot = None;
                }
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    completed.push(JobCompletion::Signaled {
                        pid,
                        signal: signal as i32,
                    });
                    *slot = None;
                }
                Ok(_) => {} // still running
                Err(errno) => {
                    debug!(%pid, %errno, "dropping stale job table entry");
                    *slot = None;
                }
            }
        }
        completed
    }

    /// Shutdown: tell every tracked pid to terminate. No wait is performed;
    /// the shell exits independently of their actual death.
    pub fn terminate_all(&mut self) {
        for slot in &mut self.slots {
            if let Some(pid) = slot.take() {
                debug!(%pid, "killing background job on shutdown");
                let _ = kill(pid, Signal::SIGKILL);
            }
        }
    }
}
