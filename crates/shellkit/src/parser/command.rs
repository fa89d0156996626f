//! Command descriptors
//!
//! A tokenized line is a [`CommandLine`]. Resolving background intent and
//! trailing redirection operators turns it into an immutable
//! [`CommandDescriptor`], which is what the dispatcher forks on.

use std::path::{Path, PathBuf};

/// Final token requesting background execution.
pub const BACKGROUND_MARKER: &str = "&";

const REDIRECT_INPUT: &str = "<";
const REDIRECT_OUTPUT: &str = ">";

/// One tokenized input line, prior to resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    pub(crate) fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// The raw token sequence, program name first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Comment lines start their first token with `#` and are skipped
    /// without dispatch.
    pub fn is_comment(&self) -> bool {
        self.tokens
            .first()
            .is_some_and(|token| token.starts_with('#'))
    }

    pub fn program(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Resolve the trailing background marker and redirection operators.
    ///
    /// A final `&` is always dropped; it marks the command background only
    /// when `foreground_only` is off. Redirection operators are recognized
    /// in the trailing pair of positions and the pair before it, each
    /// consumed at most once; an operator anywhere else passes through as
    /// an ordinary argument.
    pub fn resolve(self, foreground_only: bool) -> CommandDescriptor {
        let mut tokens = self.tokens;
        let mut background = false;

        if tokens.last().map(String::as_str) == Some(BACKGROUND_MARKER) {
            tokens.pop();
            background = !foreground_only;
        }

        let mut input = None;
        let mut output = None;
        let mut consumed: Vec<usize> = Vec::new();

        // Trailing pair first, then the second-to-last pair. Positions are
        // fixed against the length after `&` removal, so a pair closer to
        // the front overrides a duplicate operator behind it.
        let n = tokens.len();
        for op_idx in [n.checked_sub(2), n.checked_sub(4)].into_iter().flatten() {
            let target = || PathBuf::from(&tokens[op_idx + 1]);
            match tokens[op_idx].as_str() {
                REDIRECT_INPUT => input = Some(target()),
                REDIRECT_OUTPUT => output = Some(target()),
                _ => continue,
            }
            consumed.push(op_idx);
            consumed.push(op_idx + 1);
        }

        consumed.sort_unstable_by(|a, b| b.cmp(a));
        for idx in consumed {
            tokens.remove(idx);
        }

        CommandDescriptor {
            argv: tokens,
            input,
            output,
            background,
        }
    }
}

/// A fully resolved command, ready for dispatch. Immutable once built;
/// owned by the current iteration and dropped after the fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    argv: Vec<String>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    background: bool,
}

impl CommandDescriptor {
    /// Argument vector passed to program replacement, program name first.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// Input redirection target, if one was given.
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// Output redirection target, if one was given.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn background(&self) -> bool {
        self.background
    }
}
