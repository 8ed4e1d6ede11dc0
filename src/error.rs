//! Error types shared across the parser, program builder, and machine bootstrap.
//!
//! Run-time halt-by-error (a clause lookup that finds nothing to match) is
//! deliberately *not* represented here: it is a normal terminal outcome of
//! [`crate::machine::step`], surfaced as `Machine::current_state() == None`,
//! never as an `Err`.

use thiserror::Error;

/// Errors raised while parsing, finalizing, or bootstrapping a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurError {
    /// Malformed source text: bad token, missing delimiter, duplicate or
    /// missing header declaration, empty state body, invalid literal.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Structurally well-formed but semantically invalid program, caught at
    /// `finalize()` time (unknown initial state, zero states, negative input
    /// count).
    #[error("program validation failed: {0}")]
    Finalize(String),

    /// The number of bootstrap inputs handed to [`crate::machine::Machine::new`]
    /// did not match the program's declared `num_inputs`.
    #[error("expected {expected} input value(s), got {got}")]
    Arity { expected: usize, got: usize },

    /// A file or directory could not be read.
    #[error("I/O error: {0}")]
    Io(String),
}
