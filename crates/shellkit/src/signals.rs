//! Signal coordination
//!
//! The shell owns two signal channels. SIGINT it ignores permanently; a
//! foreground child restores the default disposition after fork so Ctrl-C
//! kills only the running program. SIGTSTP toggles foreground-only mode,
//! first waiting out any foreground child the main loop is blocked on.
//!
//! Everything shared with handler context is a single-word atomic below;
//! the handler touches nothing else except fd 1. The job table and file
//! descriptors are never reached from a handler.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use nix::errno::Errno;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::Pid;
use tracing::debug;

use crate::error::{Error, Result};
use crate::interpreter::ForegroundStatus;

/// Foreground-only mode flag. Written by the SIGTSTP handler, read at
/// dispatch time before every non-builtin command.
static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

/// Pid of the foreground child the main loop is currently waiting on;
/// 0 when no foreground wait is in flight.
static FOREGROUND_PID: AtomicI32 = AtomicI32::new(0);

/// Raw wait status captured when the handler reaps the foreground child
/// before the main loop's own wait resolves.
static COLLECTED_STATUS: AtomicI32 = AtomicI32::new(0);
static COLLECTED: AtomicBool = AtomicBool::new(false);

const ENTER_FOREGROUND_ONLY: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n";
const EXIT_FOREGROUND_ONLY: &[u8] = b"\nExiting foreground-only mode\n";

/// The process-wide foreground-only toggle.
///
/// Single-word state with a set/get/toggle contract. The SIGTSTP handler
/// is the only writer during normal operation; reads and writes are
/// individually atomic, so no further synchronization exists or is needed.
pub struct ShellMode;

impl ShellMode {
    /// Whether background requests are currently downgraded to foreground.
    pub fn foreground_only() -> bool {
        FOREGROUND_ONLY.load(Ordering::SeqCst)
    }

    pub fn set(on: bool) {
        FOREGROUND_ONLY.store(on, Ordering::SeqCst);
    }

    /// Flip the mode, returning the new value. Async-signal-safe.
    pub fn toggle() -> bool {
        let on = !FOREGROUND_ONLY.load(Ordering::SeqCst);
        FOREGROUND_ONLY.store(on, Ordering::SeqCst);
        on
    }
}

/// Rendezvous between the main loop's foreground wait and the SIGTSTP
/// handler's wait on the same pid.
///
/// Either side may end up reaping the child; the loser of the race reads
/// the captured status instead of double-counting the completion.
pub struct ForegroundGate;

impl ForegroundGate {
    /// Block until `pid` terminates and return its disposition.
    ///
    /// Publishes `pid` as the active foreground wait target so the SIGTSTP
    /// handler can wait on it too. If the handler reaps it first, our own
    /// `waitpid` comes back EINTR or ECHILD and the captured status is
    /// used instead.
    pub(crate) fn wait(pid: Pid) -> ForegroundStatus {
        COLLECTED.store(false, Ordering::SeqCst);
        FOREGROUND_PID.store(pid.as_raw(), Ordering::SeqCst);

        let status = loop {
            match waitpid(pid, None) {
                Ok(WaitStatus::Exited(_, code)) => break ForegroundStatus::Exited(code),
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    break ForegroundStatus::Signaled(signal as i32);
                }
                Ok(_) => {}
                Err(Errno::EINTR) => {}
                Err(_) => {
                    // ECHILD: the handler won the race and reaped pid.
                    break Self::collected().unwrap_or(ForegroundStatus::Exited(1));
                }
            }
            if let Some(status) = Self::collected() {
                break status;
            }
        };

        FOREGROUND_PID.store(0, Ordering::SeqCst);
        status
    }

    fn collected() -> Option<ForegroundStatus> {
        COLLECTED
            .load(Ordering::SeqCst)
            .then(|| ForegroundStatus::from_raw(COLLECTED_STATUS.load(Ordering::SeqCst)))
    }
}

/// SIGTSTP handler: wait out the active foreground child if there is one,
/// then flip the mode and announce it straight to fd 1, bypassing any
/// buffered output path.
///
/// Runs with every signal masked. Only async-signal-safe calls here:
/// `waitpid`, `write`, and the atomics.
extern "C" fn handle_sigtstp(_: libc::c_int) {
    let fg = FOREGROUND_PID.load(Ordering::SeqCst);
    if fg > 0 {
        let mut raw: libc::c_int = 0;
        let reaped = unsafe { libc::waitpid(fg, &mut raw, 0) };
        if reaped == fg {
            COLLECTED_STATUS.store(raw, Ordering::SeqCst);
            COLLECTED.store(true, Ordering::SeqCst);
        }
    }

    let message: &[u8] = if ShellMode::toggle() {
        ENTER_FOREGROUND_ONLY
    } else {
        EXIT_FOREGROUND_ONLY
    };
    unsafe {
        libc::write(libc::STDOUT_FILENO, message.as_ptr().cast(), message.len());
    }
}

/// Install both channels. Must run before the first prompt.
///
/// Forking duplicates these dispositions into children, which then adjust
/// them via [`prepare_foreground_child`] / [`prepare_background_child`].
/// SIGTSTP is installed without SA_RESTART so a toggle interrupts a
/// blocking read or wait, which the callers re-issue.
pub fn install() -> Result<()> {
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    unsafe { sigaction(Signal::SIGINT, &ignore) }.map_err(Error::Signal)?;

    let toggle = SigAction::new(
        SigHandler::Handler(handle_sigtstp),
        SaFlags::empty(),
        SigSet::all(),
    );
    unsafe { sigaction(Signal::SIGTSTP, &toggle) }.map_err(Error::Signal)?;

    debug!("installed SIGINT and SIGTSTP dispositions");
    Ok(())
}

/// Post-fork, pre-exec reset for a foreground child: an external interrupt
/// must terminate only the running program, and the mode toggle stays a
/// shell-only concern.
pub(crate) fn prepare_foreground_child() {
    set_disposition(Signal::SIGINT, SigHandler::SigDfl);
    set_disposition(Signal::SIGTSTP, SigHandler::SigIgn);
}

/// Post-fork, pre-exec reset for a background child: SIGTSTP is ignored,
/// and the inherited SIGINT ignore is kept so terminal interrupts never
/// reach background jobs.
pub(crate) fn prepare_background_child() {
    set_disposition(Signal::SIGTSTP, SigHandler::SigIgn);
}

fn set_disposition(signal: Signal, handler: SigHandler) {
    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    // Child context; failure here leaves the inherited disposition, which
    // is still safe to exec with.
    let _ = unsafe { sigaction(signal, &action) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_mode_set_get_toggle() {
        ShellMode::set(false);
        assert!(!ShellMode::foreground_only());

        assert!(ShellMode::toggle());
        assert!(ShellMode::foreground_only());

        assert!(!ShellMode::toggle());
        assert!(!ShellMode::foreground_only());
    }

    #[test]
    #[serial]
    fn test_collected_status_roundtrip() {
        COLLECTED.store(false, Ordering::SeqCst);
        assert_eq!(ForegroundGate::collected(), None);

        // Raw status for "exited with code 3" on Linux.
        COLLECTED_STATUS.store(3 << 8, Ordering::SeqCst);
        COLLECTED.store(true, Ordering::SeqCst);
        assert_eq!(
            ForegroundGate::collected(),
            Some(ForegroundStatus::Exited(3))
        );
        COLLECTED.store(false, Ordering::SeqCst);
    }
}
