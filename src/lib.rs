//! # peglet: Backtracking Parser Combinator Engine
//!
//! peglet compiles a declarative grammar specification into an immutable
//! tree of composable combinator nodes, then executes that tree against a
//! character source with unlimited backtracking, producing a structured
//! [`Value`] or a diagnostic [`ParseFailure`].
//!
//! ## Processing Pipeline
//!
//! ```text
//! Spec → compile → Combinator tree (built once, reusable)
//!                       │
//!                       ▼  per input
//!              CharSource (pushback stream)
//!                       │
//!                       ▼
//!              Value | ParseFailure
//! ```
//!
//! ## Core Components
//!
//! * [`source`]: the pushback character source that makes backtracking
//!   possible - a failed match unreads everything it consumed
//! * [`core`]: the result/failure protocol - mismatches are ordinary
//!   return values, never exceptions
//! * [`value`]: the closed result type, including the explicit skip marker
//!   and the tag/metadata envelope
//! * [`accumulator`]: sequence- and text-building strategies used by
//!   sequencing and repetition nodes
//! * [`combinator`]: the combinator kinds (literal, range, tuple, or,
//!   optional, zero-or-more, one-or-more, times) behind one uniform
//!   post-processing pipeline
//! * [`compiler`]: the specification type and the exhaustive compile
//!   function
//! * [`prelude`]: free-function builders for authoring grammars
//!
//! ## Usage Example
//!
//! ```
//! use peglet::prelude::*;
//!
//! // A signed integer: optional sign, then one or more digits,
//! // concatenated into text and tagged for downstream interpretation.
//! let number = tuple(vec![
//!     optional(choice(vec![ch('+'), ch('-')])),
//!     many1(range('0', '9')),
//! ])
//! .text()
//! .tag("number");
//!
//! let grammar = number.compile().unwrap();
//! let value = grammar.parse_str("-42").unwrap();
//! assert_eq!(value.tag(), Some("number"));
//! assert_eq!(value.to_text(), "-42");
//!
//! // The compiled tree is reentrant: reuse it for independent parses.
//! assert!(grammar.parse_str("x").is_err());
//! assert_eq!(grammar.parse_str("7").unwrap().to_text(), "7");
//! ```
//!
//! ## Concurrency
//!
//! Parsing is single-threaded and synchronous. Compiled trees are immutable
//! and `Send + Sync`; the only supported concurrency is independent parses
//! of the same tree against distinct sources.

pub mod accumulator;
pub mod combinator;
pub mod compiler;
pub mod core;
pub mod prelude;
pub mod source;
pub mod value;

pub use crate::accumulator::{Accumulator, AccumulatorKind};
pub use crate::combinator::{CoerceFn, Combinator};
pub use crate::compiler::{Expr, ExprKind, Spec, SpecOptions};
pub use crate::core::{CompileError, ParseFailure, ParseResult};
pub use crate::source::CharSource;
pub use crate::value::{Annotated, Metadata, Value};
