//! Resource limits for shell execution
//!
//! These bound the per-line argument vector and the background job table.

/// Limits applied to parsing and job tracking.
#[derive(Debug, Clone)]
pub struct ShellLimits {
    /// Maximum number of arguments per command, program name excluded.
    /// Tokens past the cap are dropped. Default: 511
    pub max_args: usize,

    /// Background job table capacity.
    /// Default: 200
    pub job_capacity: usize,
}

impl Default for ShellLimits {
    fn default() -> Self {
        Self {
            max_args: 511,
            job_capacity: 200,
        }
    }
}

impl ShellLimits {
    /// Create new limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum argument count.
    pub fn max_args(mut self, count: usize) -> Self {
        self.max_args = count;
        self
    }

    /// Set the job table capacity.
    pub fn job_capacity(mut self, capacity: usize) -> Self {
        self.job_capacity = capacity;
        self
    }
}
