//! Command line parsing
//!
//! Turns one raw input line into a [`CommandLine`]: the pid marker is
//! expanded first, then the result is split on whitespace into a capped
//! token sequence. There is no quoting; a token is never subdivided.

mod command;

pub use command::{BACKGROUND_MARKER, CommandDescriptor, CommandLine};

use nix::unistd::Pid;

/// The two-character marker expanded to the shell's own pid.
pub const PID_MARKER: &str = "$$";

/// Parser for raw input lines.
pub struct Parser {
    /// Decimal form of the shell pid, substituted for each marker.
    pid_text: String,
    max_args: usize,
}

impl Parser {
    /// Create a parser expanding the marker to `pid`, keeping at most
    /// `max_args` arguments after the program name.
    pub fn new(pid: Pid, max_args: usize) -> Self {
        Self {
            pid_text: pid.as_raw().to_string(),
            max_args,
        }
    }

    /// Parse one raw line. An empty or all-whitespace line yields an empty
    /// token sequence.
    pub fn parse(&self, line: &str) -> CommandLine {
        let expanded = self.expand_pid(line);
        let tokens = expanded
            .split_whitespace()
            .take(self.max_args + 1)
            .map(String::from)
            .collect();
        CommandLine::new(tokens)
    }

    /// Replace each complete marker with the decimal pid, left to right.
    /// Adjacent markers expand independently; a lone trailing `$` is not a
    /// match and stays literal.
    fn expand_pid(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'$') {
                chars.next();
                out.push_str(&self.pid_text);
            } else {
                out.push(c);
            }
        }
        out
    }
}
