//! # Combinator Nodes
//!
//! This module implements the compiled combinator tree and its execution.
//!
//! ## Node Kinds
//!
//! * **Leaf matchers**: `Literal`, `Range`
//! * **Sequential**: `Tuple`, `Times`
//! * **Alternative**: `Or`
//! * **Repetition**: `Optional`, `ZeroOrMore`, `OneOrMore`
//!
//! ## Uniform Execution Pipeline
//!
//! Every node's [`Combinator::parse`] follows the same contract:
//!
//! 1. Run the kind-specific matching routine.
//! 2. On failure, propagate unchanged - failures are never tagged, coerced,
//!    or annotated.
//! 3. If the node's `skip` option is set, discard the value and yield the
//!    skip marker.
//! 4. Otherwise apply the `coerce` transform if present, then wrap the
//!    value in its tag/metadata envelope if either is configured.
//!
//! ## Backtracking Contract
//!
//! A failing leaf matcher unreads everything it consumed, so alternatives
//! observe the source at its pre-attempt position. `or`, `optional`, and the
//! repetition nodes rely on this transitively. `tuple` and `times` are the
//! deliberate exception: a mid-sequence failure does not unwind input
//! already consumed by earlier children - backtracking a whole sequence is
//! the grammar author's job.
//!
//! Compiled trees are immutable and reentrant: one tree may serve any
//! number of independent parses, each against its own [`CharSource`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::accumulator::{Accumulator, AccumulatorKind};
use crate::core::{ParseFailure, ParseResult};
use crate::source::CharSource;
use crate::value::{Annotated, Metadata, Value};

/// A value-to-value transform applied by the post-processing pipeline.
pub type CoerceFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A compiled, reusable parser node.
///
/// Built once by the compiler from a grammar specification; immutable and
/// reentrant afterwards.
#[derive(Debug, Clone)]
pub struct Combinator {
    matcher: Matcher,
    options: NodeOptions,
}

/// Kind-specific matching parameters. Closed: the compiler matches this
/// exhaustively.
#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Literal {
        text: String,
        case_insensitive: bool,
    },
    Range {
        min: char,
        max: char,
        exclude: BTreeSet<char>,
    },
    Tuple(Vec<Combinator>),
    Or(Vec<Combinator>),
    Optional(Box<Combinator>),
    ZeroOrMore(Box<Combinator>),
    OneOrMore(Box<Combinator>),
    Times {
        count: usize,
        child: Box<Combinator>,
    },
}

/// Post-processing options shared by every node kind.
#[derive(Clone, Default)]
pub(crate) struct NodeOptions {
    pub(crate) accumulator: AccumulatorKind,
    pub(crate) tag: Option<String>,
    pub(crate) metadata: Option<Metadata>,
    pub(crate) coerce: Option<CoerceFn>,
    pub(crate) skip: bool,
}

impl NodeOptions {
    /// Wraps a value in its tag/metadata envelope, if either is configured.
    fn annotate(&self, value: Value) -> Value {
        if self.tag.is_none() && self.metadata.is_none() {
            return value;
        }
        Value::Annotated(Box::new(Annotated {
            tag: self.tag.clone(),
            metadata: self.metadata.clone().unwrap_or_default(),
            value,
        }))
    }
}

impl fmt::Debug for NodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeOptions")
            .field("accumulator", &self.accumulator)
            .field("tag", &self.tag)
            .field("metadata", &self.metadata)
            .field("coerce", &self.coerce.as_ref().map(|_| "<fn>"))
            .field("skip", &self.skip)
            .finish()
    }
}

impl Combinator {
    pub(crate) fn new(matcher: Matcher, options: NodeOptions) -> Self {
        Self { matcher, options }
    }

    /// Parses input from the given source.
    ///
    /// # Returns
    ///
    /// * `Ok(value)` - The matched value after post-processing
    /// * `Err(failure)` - The mismatch diagnostic; post-processing is never
    ///   applied to failures
    pub fn parse<I: Iterator<Item = char>>(&self, source: &mut CharSource<I>) -> ParseResult {
        let raw = self.run(source)?;
        if self.options.skip || raw.is_skip() {
            // The skip marker stays a pure marker: it is never coerced or
            // annotated, so accumulators can reliably elide it.
            return Ok(Value::Skip);
        }
        let value = match &self.options.coerce {
            Some(coerce) => coerce(raw),
            None => raw,
        };
        Ok(self.options.annotate(value))
    }

    /// Parses an in-memory string with a fresh source.
    pub fn parse_str(&self, input: &str) -> ParseResult {
        let mut source = CharSource::from(input);
        self.parse(&mut source)
    }

    /// Dispatches to the kind-specific matching routine.
    fn run<I: Iterator<Item = char>>(&self, source: &mut CharSource<I>) -> ParseResult {
        match &self.matcher {
            Matcher::Literal {
                text,
                case_insensitive,
            } => Self::match_literal(text, *case_insensitive, source),
            Matcher::Range { min, max, exclude } => {
                Self::match_range(*min, *max, exclude, source)
            }
            Matcher::Tuple(children) => self.match_tuple(children, source),
            Matcher::Or(children) => Self::match_or(children, source),
            Matcher::Optional(child) => Self::match_optional(child, source),
            Matcher::ZeroOrMore(child) => self.match_zero_or_more(child, source),
            Matcher::OneOrMore(child) => self.match_one_or_more(child, source),
            Matcher::Times { count, child } => self.match_times(*count, child, source),
        }
    }

    /// Matches an exact string, character by character.
    ///
    /// All-or-nothing: on mismatch or premature end of input, everything
    /// consumed (matched prefix plus the offending character) is unread
    /// before failing.
    fn match_literal<I: Iterator<Item = char>>(
        text: &str,
        case_insensitive: bool,
        source: &mut CharSource<I>,
    ) -> ParseResult {
        let mut taken = String::with_capacity(text.len());
        for expected in text.chars() {
            let Some(found) = source.read() else {
                let at = source.position();
                source.unread_all(&taken);
                return Err(ParseFailure::new(
                    format!("literal {text:?}: unexpected end of input at position {at}"),
                    Value::Text(taken),
                ));
            };
            let hit = if case_insensitive {
                found.to_lowercase().eq(expected.to_lowercase())
            } else {
                found == expected
            };
            if !hit {
                let at = source.position().saturating_sub(1);
                source.unread(found);
                source.unread_all(&taken);
                return Err(ParseFailure::new(
                    format!("literal {text:?}: expected {expected:?}, found {found:?} at position {at}"),
                    Value::Text(taken),
                ));
            }
            taken.push(found);
        }
        Ok(Value::Text(taken))
    }

    /// Matches one character inside `[min, max]` and outside `exclude`.
    /// The offending character is unread and carried as failure state.
    fn match_range<I: Iterator<Item = char>>(
        min: char,
        max: char,
        exclude: &BTreeSet<char>,
        source: &mut CharSource<I>,
    ) -> ParseResult {
        let Some(found) = source.read() else {
            return Err(ParseFailure::new(
                format!(
                    "range [{min:?}-{max:?}]: unexpected end of input at position {}",
                    source.position()
                ),
                Value::Skip,
            ));
        };
        if (min..=max).contains(&found) && !exclude.contains(&found) {
            Ok(Value::Char(found))
        } else {
            let at = source.position().saturating_sub(1);
            source.unread(found);
            Err(ParseFailure::new(
                format!("range [{min:?}-{max:?}]: {found:?} not accepted at position {at}"),
                Value::Char(found),
            ))
        }
    }

    /// Parses each child in order against the same source, accumulating.
    ///
    /// The first child failure aborts the sequence, reporting the failing
    /// child's 0-based index and the accumulation so far. Input consumed by
    /// earlier successful children is not unwound.
    fn match_tuple<I: Iterator<Item = char>>(
        &self,
        children: &[Combinator],
        source: &mut CharSource<I>,
    ) -> ParseResult {
        let mut acc = Accumulator::new(self.options.accumulator);
        for (index, child) in children.iter().enumerate() {
            match child.parse(source) {
                Ok(value) => acc.step(value),
                Err(failure) => {
                    return Err(ParseFailure::new(
                        format!("tuple: child {index} failed: {}", failure.message),
                        acc.snapshot(),
                    ));
                }
            }
        }
        Ok(acc.finish())
    }

    /// Tries each child in order, returning the first success.
    ///
    /// Relies on failing children having restored the source to its
    /// pre-attempt position. If all alternatives fail, the last child's
    /// failure is returned.
    fn match_or<I: Iterator<Item = char>>(
        children: &[Combinator],
        source: &mut CharSource<I>,
    ) -> ParseResult {
        let mut last_failure: Option<ParseFailure> = None;
        for (index, child) in children.iter().enumerate() {
            match child.parse(source) {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    tracing::debug!(
                        target: "peglet::or",
                        alternative = index,
                        error = %failure,
                        "alternative failed, trying next"
                    );
                    last_failure = Some(failure);
                }
            }
        }
        // The compiler rejects empty alternations, so this fallback is
        // unreachable through compiled grammars.
        Err(last_failure
            .unwrap_or_else(|| ParseFailure::new("or: no alternatives", Value::Skip)))
    }

    /// Parses the child once; a failure becomes a successful skip.
    fn match_optional<I: Iterator<Item = char>>(
        child: &Combinator,
        source: &mut CharSource<I>,
    ) -> ParseResult {
        match child.parse(source) {
            Ok(value) => Ok(value),
            Err(failure) => {
                tracing::debug!(
                    target: "peglet::optional",
                    error = %failure,
                    "optional match failed, yielding skip"
                );
                Ok(Value::Skip)
            }
        }
    }

    /// Repeats the child until it fails. An immediate failure is an empty
    /// match, reported as the skip marker.
    fn match_zero_or_more<I: Iterator<Item = char>>(
        &self,
        child: &Combinator,
        source: &mut CharSource<I>,
    ) -> ParseResult {
        let mut acc = Accumulator::new(self.options.accumulator);
        let matches = Self::accumulate_repeats(child, source, &mut acc);
        if matches == 0 {
            Ok(Value::Skip)
        } else {
            Ok(acc.finish())
        }
    }

    /// Like zero-or-more, but an immediate failure is a failure.
    fn match_one_or_more<I: Iterator<Item = char>>(
        &self,
        child: &Combinator,
        source: &mut CharSource<I>,
    ) -> ParseResult {
        let mut acc = Accumulator::new(self.options.accumulator);
        let before = source.position();
        match child.parse(source) {
            Ok(value) => acc.step(value),
            Err(failure) => {
                return Err(ParseFailure::new(
                    format!("one-or-more: required at least one match: {}", failure.message),
                    acc.snapshot(),
                ));
            }
        }
        if source.position() > before {
            let _ = Self::accumulate_repeats(child, source, &mut acc);
        }
        Ok(acc.finish())
    }

    /// Parses the child exactly `count` times, like a fixed-length tuple of
    /// identical children.
    fn match_times<I: Iterator<Item = char>>(
        &self,
        count: usize,
        child: &Combinator,
        source: &mut CharSource<I>,
    ) -> ParseResult {
        let mut acc = Accumulator::new(self.options.accumulator);
        for round in 0..count {
            match child.parse(source) {
                Ok(value) => acc.step(value),
                Err(failure) => {
                    return Err(ParseFailure::new(
                        format!("times: match {round} of {count} failed: {}", failure.message),
                        acc.snapshot(),
                    ));
                }
            }
        }
        Ok(acc.finish())
    }

    /// Repetition loop shared by `*` and the tail of `+`.
    ///
    /// Each iteration folds in the newest successful match. A successful
    /// match that consumes no input is accumulated once and then ends the
    /// loop, since repeating it could never make progress.
    fn accumulate_repeats<I: Iterator<Item = char>>(
        child: &Combinator,
        source: &mut CharSource<I>,
        acc: &mut Accumulator,
    ) -> usize {
        let mut matches = 0;
        loop {
            let before = source.position();
            match child.parse(source) {
                Ok(value) => {
                    matches += 1;
                    acc.step(value);
                    if source.position() == before {
                        break;
                    }
                }
                Err(failure) => {
                    tracing::debug!(
                        target: "peglet::repeat",
                        error = %failure,
                        position = source.position(),
                        matches,
                        "repetition stopped"
                    );
                    break;
                }
            }
        }
        matches
    }
}
