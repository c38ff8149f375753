//! # Accumulator Strategies
//!
//! Sequencing and repetition combinators fold their child results into one
//! value through a pluggable seed/step/finish strategy:
//!
//! * **Sequence** (the default): seed an empty `Vec`, append each child
//!   value, finish as [`Value::Seq`].
//! * **Text**: seed an empty string buffer, append each child's character
//!   content, finish as [`Value::Text`].
//!
//! Both strategies elide the skip marker: a child that yields
//! [`Value::Skip`] contributes nothing. The strategy is selected per node
//! and applies uniformly to `tuple`, `+`, `*`, and `times`.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Which accumulation strategy a sequencing or repetition node uses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccumulatorKind {
    /// Collect child values into a sequence.
    #[default]
    Sequence,
    /// Concatenate the character content of child values.
    Text,
}

/// A running accumulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accumulator {
    Sequence(Vec<Value>),
    Text(String),
}

impl Accumulator {
    /// Seeds an empty accumulation for the given strategy.
    pub fn new(kind: AccumulatorKind) -> Self {
        match kind {
            AccumulatorKind::Sequence => Accumulator::Sequence(Vec::new()),
            AccumulatorKind::Text => Accumulator::Text(String::new()),
        }
    }

    /// Folds one child value in. Skip markers are elided.
    pub fn step(&mut self, value: Value) {
        if value.is_skip() {
            return;
        }
        match self {
            Accumulator::Sequence(items) => items.push(value),
            Accumulator::Text(buffer) => value.write_text(buffer),
        }
    }

    /// The accumulation so far, as a value. Used as the partial state of a
    /// mid-sequence failure.
    pub fn snapshot(&self) -> Value {
        match self {
            Accumulator::Sequence(items) => Value::Seq(items.clone()),
            Accumulator::Text(buffer) => Value::Text(buffer.clone()),
        }
    }

    /// Finishes the accumulation into its final value.
    pub fn finish(self) -> Value {
        match self {
            Accumulator::Sequence(items) => Value::Seq(items),
            Accumulator::Text(buffer) => Value::Text(buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_elides_skip() {
        let mut acc = Accumulator::new(AccumulatorKind::Sequence);
        acc.step(Value::Char('a'));
        acc.step(Value::Skip);
        acc.step(Value::Char('b'));
        assert_eq!(acc.finish(), Value::Seq(vec![Value::Char('a'), Value::Char('b')]));
    }

    #[test]
    fn test_text_concatenates_content() {
        let mut acc = Accumulator::new(AccumulatorKind::Text);
        acc.step(Value::Char('a'));
        acc.step(Value::Skip);
        acc.step(Value::Text("bc".into()));
        acc.step(Value::Seq(vec![Value::Char('d')]));
        assert_eq!(acc.finish(), Value::Text("abcd".into()));
    }

    #[test]
    fn test_snapshot_is_partial_state() {
        let mut acc = Accumulator::new(AccumulatorKind::Sequence);
        acc.step(Value::Char('x'));
        assert_eq!(acc.snapshot(), Value::Seq(vec![Value::Char('x')]));
        // Snapshot does not consume the accumulation.
        acc.step(Value::Char('y'));
        assert_eq!(
            acc.finish(),
            Value::Seq(vec![Value::Char('x'), Value::Char('y')])
        );
    }
}
