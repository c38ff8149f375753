//! # Grammar Builder Prelude
//!
//! Free-function constructors for authoring grammar specifications, meant
//! to be glob-imported:
//!
//! ```
//! use peglet::prelude::*;
//!
//! let digit = range('0', '9');
//! let grammar = many1(digit).text().compile().unwrap();
//! assert_eq!(grammar.parse_str("2026").unwrap().to_text(), "2026");
//! ```

use crate::compiler::Expr;

pub use crate::accumulator::AccumulatorKind;
pub use crate::compiler::{Spec, SpecOptions};
pub use crate::combinator::Combinator;
pub use crate::core::{CompileError, ParseFailure, ParseResult};
pub use crate::source::CharSource;
pub use crate::value::{Annotated, Metadata, Value};

/// Matches an exact string.
pub fn lit(text: impl Into<String>) -> Spec {
    Spec::of(Expr::Literal(text.into()))
}

/// Matches a single character; a literal of length one.
pub fn ch(c: char) -> Spec {
    Spec::of(Expr::Literal(c.to_string()))
}

/// Matches one character with a code point in `[min, max]`.
pub fn range(min: char, max: char) -> Spec {
    Spec::of(Expr::Range { min, max })
}

/// Matches every child in order.
pub fn tuple(children: Vec<Spec>) -> Spec {
    Spec::of(Expr::Tuple(children))
}

/// Matches the first child that succeeds, in given order.
pub fn choice(children: Vec<Spec>) -> Spec {
    Spec::of(Expr::Or(children))
}

/// Matches the child once, or succeeds with a skip.
pub fn optional(child: Spec) -> Spec {
    Spec::of(Expr::Optional(Box::new(child)))
}

/// Matches the child zero or more times.
pub fn many(child: Spec) -> Spec {
    Spec::of(Expr::ZeroOrMore(Box::new(child)))
}

/// Matches the child one or more times.
pub fn many1(child: Spec) -> Spec {
    Spec::of(Expr::OneOrMore(Box::new(child)))
}

/// Matches the child exactly `count` times.
pub fn times(count: usize, child: Spec) -> Spec {
    Spec::of(Expr::Times {
        count,
        child: Box::new(child),
    })
}
