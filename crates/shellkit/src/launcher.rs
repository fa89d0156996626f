//! Child-side program launch
//!
//! Everything here runs between fork and exec: redirections are wired onto
//! fds 0 and 1, then the process image is replaced. The fd table mutation
//! is irreversible but child-local; the parent never observes it. On
//! success control never returns — returning a [`LaunchError`] at all is
//! the failure path, and the caller exits the child with
//! [`LAUNCH_FAILURE_STATUS`].

use std::ffi::{CStr, CString};
use std::path::{Path, PathBuf};

use nix::fcntl::{OFlag, open};
use nix::sys::stat::Mode;
use nix::unistd::{dup2, execvp};
use thiserror::Error;

use crate::parser::CommandDescriptor;

/// Exit status for a child whose launch failed.
pub const LAUNCH_FAILURE_STATUS: i32 = 1;

/// Silent-discard target for unredirected background I/O.
const DEV_NULL: &str = "/dev/null";

/// Why a child could not be launched. The messages are the user-facing
/// report, printed by the child before it exits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LaunchError {
    #[error("cannot open {} for input", .0.display())]
    Input(PathBuf),

    #[error("cannot open {} for output", .0.display())]
    Output(PathBuf),

    #[error("{0}: no such file or directory")]
    Exec(String),
}

/// Apply the descriptor's redirections and replace the process image,
/// searching `PATH` for the program.
pub fn launch(cmd: &CommandDescriptor) -> LaunchError {
    if let Err(err) = wire_stdin(cmd) {
        return err;
    }
    if let Err(err) = wire_stdout(cmd) {
        return err;
    }

    let program = cmd.program().unwrap_or_default().to_string();
    let Ok(argv) = to_cstrings(cmd.argv()) else {
        return LaunchError::Exec(program);
    };
    let argv_refs: Vec<&CStr> = argv.iter().map(CString::as_c_str).collect();
    let Some(file) = argv_refs.first() else {
        return LaunchError::Exec(program);
    };

    let _ = execvp(file, &argv_refs);
    LaunchError::Exec(program)
}

/// Stdin: explicit target, else the null device for background commands so
/// they never block on terminal input, else the inherited terminal.
fn wire_stdin(cmd: &CommandDescriptor) -> Result<(), LaunchError> {
    let fd = match cmd.input() {
        Some(path) => open(path, OFlag::O_RDONLY, Mode::empty())
            .map_err(|_| LaunchError::Input(path.to_path_buf()))?,
        None if cmd.background() => open(Path::new(DEV_NULL), OFlag::O_RDONLY, Mode::empty())
            .map_err(|_| LaunchError::Input(PathBuf::from(DEV_NULL)))?,
        None => return Ok(()),
    };
    let _ = dup2(fd, libc::STDIN_FILENO);
    Ok(())
}

/// Stdout: explicit target created/truncated, else the null device for
/// background commands, else the inherited terminal.
fn wire_stdout(cmd: &CommandDescriptor) -> Result<(), LaunchError> {
    let create = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC;
    let fd = match cmd.output() {
        Some(path) => open(path, create, Mode::from_bits_truncate(0o644))
            .map_err(|_| LaunchError::Output(path.to_path_buf()))?,
        None if cmd.background() => open(Path::new(DEV_NULL), OFlag::O_WRONLY, Mode::empty())
            .map_err(|_| LaunchError::Output(PathBuf::from(DEV_NULL)))?,
        None => return Ok(()),
    };
    let _ = dup2(fd, libc::STDOUT_FILENO);
    Ok(())
}

fn to_cstrings(argv: &[String]) -> Result<Vec<CString>, std::ffi::NulError> {
    argv.iter().map(|arg| CString::new(arg.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failure_wording() {
        assert_eq!(
            LaunchError::Input(PathBuf::from("missing.txt")).to_string(),
            "cannot open missing.txt for input"
        );
        assert_eq!(
            LaunchError::Output(PathBuf::from("ro/out.txt")).to_string(),
            "cannot open ro/out.txt for output"
        );
        assert_eq!(
            LaunchError::Exec("frobnicate".to_string()).to_string(),
            "frobnicate: no such file or directory"
        );
    }

    #[test]
    fn test_cstring_conversion_rejects_interior_nul() {
        assert!(to_cstrings(&["ok".to_string()]).is_ok());
        assert!(to_cstrings(&["bad\0arg".to_string()]).is_err());
    }
}
