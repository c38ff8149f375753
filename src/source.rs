//! # Character Source
//!
//! This module implements the backtracking character source that every
//! combinator reads from. A [`CharSource`] wraps an arbitrary character
//! stream and adds a last-in-first-out pushback buffer, giving combinators
//! unlimited lookahead: any characters consumed by a failed match can be
//! pushed back so that siblings and alternatives observe the exact same
//! input position.
//!
//! ## Invariants
//!
//! * A read always drains the pushback buffer before touching the
//!   underlying stream.
//! * After `unread_all(s)`, a sequence of reads reproduces `s` in its
//!   original forward order.
//! * `position()` reflects the net number of characters consumed (reads
//!   minus unreads), so a failing parse that fully restores its input
//!   leaves the position unchanged. This is what the restoration tests
//!   assert against.
//!
//! One `CharSource` serves exactly one top-level parse and is passed
//! `&mut` down the whole combinator call tree.

use std::str::Chars;

/// A character stream with a pushback buffer for backtracking.
#[derive(Debug)]
pub struct CharSource<I: Iterator<Item = char>> {
    /// The underlying character stream.
    stream: I,
    /// Characters pushed back for re-reading, last-in-first-out.
    pushback: Vec<char>,
    /// Net characters consumed so far.
    position: usize,
}

impl<I: Iterator<Item = char>> CharSource<I> {
    /// Creates a source over an arbitrary character stream.
    pub fn new(stream: I) -> Self {
        Self {
            stream,
            pushback: Vec::new(),
            position: 0,
        }
    }

    /// Reads the next character.
    ///
    /// Pops the pushback buffer if it is non-empty, otherwise pulls from the
    /// underlying stream.
    ///
    /// # Returns
    ///
    /// * `Some(c)` - The next character
    /// * `None` - End of input. This is a sentinel, not a failure; only the
    ///   calling combinator decides whether reaching it is an error.
    pub fn read(&mut self) -> Option<char> {
        let next = self.pushback.pop().or_else(|| self.stream.next());
        if next.is_some() {
            self.position += 1;
        }
        next
    }

    /// Pushes one character back so the next read returns it again.
    pub fn unread(&mut self, c: char) {
        self.pushback.push(c);
        self.position = self.position.saturating_sub(1);
    }

    /// Pushes a whole string back.
    ///
    /// Characters are pushed in reverse so that replaying reads reproduces
    /// `s` in its original order.
    pub fn unread_all(&mut self, s: &str) {
        for c in s.chars().rev() {
            self.unread(c);
        }
    }

    /// Net number of characters consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the source is exhausted. Peeks by reading one character and
    /// pushing it straight back.
    pub fn at_end(&mut self) -> bool {
        match self.read() {
            Some(c) => {
                self.unread(c);
                false
            }
            None => true,
        }
    }
}

impl<'a> From<&'a str> for CharSource<Chars<'a>> {
    /// Thin adapter for parsing in-memory strings.
    fn from(input: &'a str) -> Self {
        Self::new(input.chars())
    }
}
