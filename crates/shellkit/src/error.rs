//! Error types for Shellkit
//!
//! User-facing launch failures (bad redirection targets, unknown programs)
//! are not errors at this level: they are reported by the child and only
//! surface to the parent as a nonzero exit status. The variants here cover
//! failures of the shell process itself.

use thiserror::Error;

/// Result type alias using Shellkit's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Shellkit error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Process creation failed. Fatal: the shell cannot continue without
    /// fork capability.
    #[error("fork failed: {0}")]
    Fork(#[source] nix::Error),

    /// Installing a signal disposition failed.
    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] nix::Error),

    /// The job table has no free slot and the eviction policy is `Reject`.
    #[error("job table full ({0} slots)")]
    JobTableFull(usize),

    /// I/O error from the prompt loop.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
