//! # Core Result and Error Types
//!
//! This module defines the failure model shared by the whole engine.
//!
//! Parse-time mismatches are ordinary return values: every combinator
//! returns a [`ParseResult`] and the caller inspects it, short-circuiting
//! on failure. Nothing is ever panicked or thrown for an expected mismatch.
//!
//! Compile-time rejection of a malformed grammar specification is a
//! separate concern with its own error type, [`CompileError`].

use thiserror::Error;

use crate::compiler::ExprKind;
use crate::value::Value;

/// Result type for parsing operations.
///
/// On success, the combinator-specific [`Value`]. On failure, a
/// [`ParseFailure`] describing the mismatch.
pub type ParseResult = Result<Value, ParseFailure>;

/// A non-fatal parse mismatch.
///
/// There is deliberately a single failure kind: unexpected characters and
/// unexpected end of input are both folded into the message text, which
/// includes the source position. The `state` field carries the best-effort
/// partial result at the point of failure, e.g. the prefix a literal had
/// matched or a sequence's accumulation so far.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseFailure {
    /// Human-readable diagnostic.
    pub message: String,
    /// Best-effort partial result at the point of failure.
    pub state: Value,
}

impl ParseFailure {
    /// Creates a failure from a diagnostic message and partial state.
    pub fn new(message: impl Into<String>, state: Value) -> Self {
        Self {
            message: message.into(),
            state,
        }
    }
}

/// Error raised while compiling a grammar specification.
///
/// Distinct from [`ParseFailure`]: these reject the grammar itself, before
/// any input is parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// An option was set on a node kind it does not apply to.
    #[error("option `{option}` is not valid on a `{kind}` node")]
    InvalidOption {
        kind: ExprKind,
        option: &'static str,
    },
    /// Range bounds in the wrong order.
    #[error("range bounds are inverted: {min:?} > {max:?}")]
    InvertedRange { min: char, max: char },
    /// An `or` node with nothing to try.
    #[error("`or` requires at least one alternative")]
    EmptyAlternation,
}
