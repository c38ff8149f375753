//! # Parse Values
//!
//! Every successful parse yields a [`Value`]. The type is a closed sum over
//! everything a combinator can produce:
//!
//! * `Skip` - matched, but contributes nothing to an enclosing accumulation
//!   (an explicit variant rather than a magic sentinel value)
//! * `Char` / `Text` - leaf matches from range and literal nodes
//! * `Seq` - sequence-accumulated results from tuple and repetition nodes
//! * `Annotated` - a result wrapped in its tag/metadata envelope
//!
//! Tags and metadata are carried by the explicit [`Annotated`] envelope so
//! attachment never depends on whether a value "supports" it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attributes attached to a parse result alongside its tag.
pub type Metadata = BTreeMap<String, String>;

/// A successful parse result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Matched, but contributes nothing to the enclosing accumulation.
    Skip,
    /// A single matched character.
    Char(char),
    /// Matched or accumulated text.
    Text(String),
    /// Sequence-accumulated child results.
    Seq(Vec<Value>),
    /// A result carrying a tag and/or metadata.
    Annotated(Box<Annotated>),
}

/// Envelope attaching a tag and metadata to a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotated {
    /// Label marking the result for downstream interpretation, e.g. as a
    /// syntax-tree node kind.
    pub tag: Option<String>,
    /// Attached attributes; empty when none were configured.
    #[serde(default)]
    pub metadata: Metadata,
    /// The wrapped result.
    pub value: Value,
}

impl Value {
    /// Whether this is the skip marker.
    pub fn is_skip(&self) -> bool {
        matches!(self, Value::Skip)
    }

    /// The tag of an annotated result, if any.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Value::Annotated(annotated) => annotated.tag.as_deref(),
            _ => None,
        }
    }

    /// Collects the character content of this value into a string.
    ///
    /// Sequences and annotated values are flattened recursively; the skip
    /// marker contributes nothing.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    pub(crate) fn write_text(&self, out: &mut String) {
        match self {
            Value::Skip => {}
            Value::Char(c) => out.push(*c),
            Value::Text(text) => out.push_str(text),
            Value::Seq(items) => {
                for item in items {
                    item.write_text(out);
                }
            }
            Value::Annotated(annotated) => annotated.value.write_text(out),
        }
    }
}
