//! # Grammar Specification Compiler
//!
//! A grammar is authored as a [`Spec`]: a nested, declarative value with a
//! closed expression sum type ([`Expr`]) plus per-node options. The
//! compiler turns it into an immutable [`Combinator`] tree by structural
//! recursion - children first, then the enclosing node - and rejects
//! malformed specifications with a [`CompileError`] before any input is
//! parsed.
//!
//! Because [`Expr`] is a closed sum type, `compile` is a single exhaustive
//! match: adding a combinator kind without teaching the compiler about it
//! does not build. Option validation covers what the type system still
//! allows, e.g. `exclude` on a node that is not a range.
//!
//! Specifications carry no parse state and are consumed by compilation; the
//! compiled tree is what gets reused across parses. All of a `Spec` except
//! the `coerce` closure is serde-(de)serializable, so grammars can be
//! authored as plain data.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::accumulator::AccumulatorKind;
use crate::combinator::{CoerceFn, Combinator, Matcher, NodeOptions};
use crate::core::CompileError;
use crate::value::{Metadata, Value};

/// A declarative grammar specification node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spec {
    /// What this node matches.
    pub expr: Expr,
    /// Post-processing and matching options.
    #[serde(default)]
    pub options: SpecOptions,
}

/// The closed set of grammar expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Match an exact string (a single-character literal is just a
    /// one-character string).
    Literal(String),
    /// Match one character with a code point in `[min, max]`.
    Range { min: char, max: char },
    /// Match every child in order.
    Tuple(Vec<Spec>),
    /// Match the first child that succeeds, in given order.
    Or(Vec<Spec>),
    /// Match the child once, or succeed with a skip.
    Optional(Box<Spec>),
    /// Match the child zero or more times.
    ZeroOrMore(Box<Spec>),
    /// Match the child one or more times.
    OneOrMore(Box<Spec>),
    /// Match the child exactly `count` times.
    Times { count: usize, child: Box<Spec> },
}

/// The kind of a grammar expression, used in compile diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ExprKind {
    Literal,
    Range,
    Tuple,
    Or,
    Optional,
    ZeroOrMore,
    OneOrMore,
    Times,
}

impl Expr {
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Literal(_) => ExprKind::Literal,
            Expr::Range { .. } => ExprKind::Range,
            Expr::Tuple(_) => ExprKind::Tuple,
            Expr::Or(_) => ExprKind::Or,
            Expr::Optional(_) => ExprKind::Optional,
            Expr::ZeroOrMore(_) => ExprKind::ZeroOrMore,
            Expr::OneOrMore(_) => ExprKind::OneOrMore,
            Expr::Times { .. } => ExprKind::Times,
        }
    }
}

/// Options recognized on a specification node.
///
/// `case_insensitive` applies to literals only and `exclude` to ranges
/// only; `accumulator` applies to the sequencing and repetition kinds.
/// Setting an option on a node it does not apply to is a compile error.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecOptions {
    /// Case-fold literal comparison.
    pub case_insensitive: bool,
    /// Accumulation strategy for tuple, `+`, `*`, and `times` nodes.
    pub accumulator: Option<AccumulatorKind>,
    /// Label wrapped around every successful result.
    pub tag: Option<String>,
    /// Attributes attached to every successful result.
    pub metadata: Option<Metadata>,
    /// Discard the matched value, yielding the skip marker.
    pub skip: bool,
    /// Characters rejected by a range node.
    pub exclude: Option<BTreeSet<char>>,
    /// Value transform applied before tagging. Not serializable.
    #[serde(skip)]
    pub coerce: Option<CoerceFn>,
}

impl fmt::Debug for SpecOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecOptions")
            .field("case_insensitive", &self.case_insensitive)
            .field("accumulator", &self.accumulator)
            .field("tag", &self.tag)
            .field("metadata", &self.metadata)
            .field("skip", &self.skip)
            .field("exclude", &self.exclude)
            .field("coerce", &self.coerce.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Spec {
    pub(crate) fn of(expr: Expr) -> Self {
        Self {
            expr,
            options: SpecOptions::default(),
        }
    }

    /// Compiles this specification into a reusable combinator tree.
    pub fn compile(self) -> Result<Combinator, CompileError> {
        let kind = self.expr.kind();
        validate_options(kind, &self.options)?;
        let Spec { expr, options } = self;

        let matcher = match expr {
            Expr::Literal(text) => Matcher::Literal {
                text,
                case_insensitive: options.case_insensitive,
            },
            Expr::Range { min, max } => {
                if min > max {
                    return Err(CompileError::InvertedRange { min, max });
                }
                Matcher::Range {
                    min,
                    max,
                    exclude: options.exclude.clone().unwrap_or_default(),
                }
            }
            Expr::Tuple(children) => Matcher::Tuple(compile_children(children)?),
            Expr::Or(children) => {
                if children.is_empty() {
                    return Err(CompileError::EmptyAlternation);
                }
                Matcher::Or(compile_children(children)?)
            }
            Expr::Optional(child) => Matcher::Optional(Box::new(child.compile()?)),
            Expr::ZeroOrMore(child) => Matcher::ZeroOrMore(Box::new(child.compile()?)),
            Expr::OneOrMore(child) => Matcher::OneOrMore(Box::new(child.compile()?)),
            Expr::Times { count, child } => Matcher::Times {
                count,
                child: Box::new(child.compile()?),
            },
        };

        Ok(Combinator::new(
            matcher,
            NodeOptions {
                accumulator: options.accumulator.unwrap_or_default(),
                tag: options.tag,
                metadata: options.metadata,
                coerce: options.coerce,
                skip: options.skip,
            },
        ))
    }

    /// Labels every successful result of this node.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.options.tag = Some(tag.into());
        self
    }

    /// Discards this node's value, yielding the skip marker on success.
    pub fn skip(mut self) -> Self {
        self.options.skip = true;
        self
    }

    /// Selects the text accumulation strategy.
    pub fn text(mut self) -> Self {
        self.options.accumulator = Some(AccumulatorKind::Text);
        self
    }

    /// Selects an accumulation strategy explicitly.
    pub fn accumulate(mut self, kind: AccumulatorKind) -> Self {
        self.options.accumulator = Some(kind);
        self
    }

    /// Attaches one metadata attribute.
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options
            .metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    /// Installs a value transform applied before tagging.
    pub fn coerce(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.options.coerce = Some(Arc::new(f));
        self
    }

    /// Rejects specific characters on a range node.
    pub fn exclude(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.options.exclude = Some(chars.into_iter().collect());
        self
    }

    /// Case-folds comparison on a literal node.
    pub fn case_insensitive(mut self) -> Self {
        self.options.case_insensitive = true;
        self
    }
}

fn compile_children(children: Vec<Spec>) -> Result<Vec<Combinator>, CompileError> {
    children.into_iter().map(Spec::compile).collect()
}

fn validate_options(kind: ExprKind, options: &SpecOptions) -> Result<(), CompileError> {
    if options.case_insensitive && kind != ExprKind::Literal {
        return Err(CompileError::InvalidOption {
            kind,
            option: "case_insensitive",
        });
    }
    if options.exclude.is_some() && kind != ExprKind::Range {
        return Err(CompileError::InvalidOption {
            kind,
            option: "exclude",
        });
    }
    let accumulates = matches!(
        kind,
        ExprKind::Tuple | ExprKind::ZeroOrMore | ExprKind::OneOrMore | ExprKind::Times
    );
    if options.accumulator.is_some() && !accumulates {
        return Err(CompileError::InvalidOption {
            kind,
            option: "accumulator",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::value::Value;

    #[test]
    fn test_compile_rejects_exclude_off_range() {
        let err = lit("abc").exclude(['a']).compile().unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidOption {
                kind: ExprKind::Literal,
                option: "exclude",
            }
        );
    }

    #[test]
    fn test_compile_rejects_case_fold_off_literal() {
        let err = range('a', 'z').case_insensitive().compile().unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidOption {
                kind: ExprKind::Range,
                option: "case_insensitive",
            }
        );
    }

    #[test]
    fn test_compile_rejects_accumulator_on_leaf() {
        let err = lit("x").text().compile().unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidOption {
                kind: ExprKind::Literal,
                option: "accumulator",
            }
        );
    }

    #[test]
    fn test_compile_rejects_inverted_range() {
        let err = range('9', '0').compile().unwrap_err();
        assert_eq!(err, CompileError::InvertedRange { min: '9', max: '0' });
    }

    #[test]
    fn test_compile_rejects_empty_alternation() {
        let err = choice(vec![]).compile().unwrap_err();
        assert_eq!(err, CompileError::EmptyAlternation);
    }

    #[test]
    fn test_compile_error_display_names_the_kind() {
        let err = many(lit("x")).exclude(['x']).compile().unwrap_err();
        assert_eq!(
            err.to_string(),
            "option `exclude` is not valid on a `zero-or-more` node"
        );
    }

    #[test]
    fn test_spec_round_trips_through_json() {
        let spec = tuple(vec![
            optional(choice(vec![lit("+"), lit("-")])),
            many1(range('0', '9')),
        ])
        .text()
        .tag("number");

        let json = serde_json::to_string(&spec).unwrap();
        let back: Spec = serde_json::from_str(&json).unwrap();
        let grammar = back.compile().unwrap();
        let value = grammar.parse_str("-42").unwrap();
        assert_eq!(value.tag(), Some("number"));
        assert_eq!(value.to_text(), "-42");
    }

    #[test]
    fn test_compiled_tree_is_reusable_across_parses() {
        let grammar = many1(range('0', '9')).text().compile().unwrap();
        assert_eq!(grammar.parse_str("12"), Ok(Value::Text("12".into())));
        assert_eq!(grammar.parse_str("345"), Ok(Value::Text("345".into())));
    }
}
