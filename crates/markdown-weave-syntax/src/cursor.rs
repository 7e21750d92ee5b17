//! # Cursors
//!
//! Minimal read-heads used by the lexer and the parser. Both borrow their
//! backing sequence for their whole lifetime and only ever own a position,
//! which makes speculative matching a matter of saving and restoring one
//! integer.
//!
//! - [`StringCursor`] walks raw input one `char` at a time. Its position is a
//!   byte offset, so every slice it hands out borrows straight from the input.
//! - [`SequenceCursor`] walks a slice of elements (the lexer's tokens).

/// A cursor over raw input text.
///
/// Offsets passed to [`peek_at`](Self::peek_at) and
/// [`expect_at`](Self::expect_at) are counted in characters relative to the
/// current position, so `-1` is the character just consumed.
#[derive(Debug, Clone)]
pub struct StringCursor<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> StringCursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// The full input this cursor walks.
    pub fn source(&self) -> &'a str {
        self.s
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.i
    }

    /// Move back (or forward) to a position previously obtained from
    /// [`position`](Self::position).
    pub fn set_position(&mut self, position: usize) {
        debug_assert!(self.s.is_char_boundary(position));
        self.i = position;
    }

    /// Returns true if all input has been consumed.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// The part of the input that has already been consumed.
    pub fn consumed(&self) -> &'a str {
        &self.s[..self.i]
    }

    /// The part of the input that has not been consumed yet.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    /// Peeks at the current character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peeks `offset` characters away from the current position.
    pub fn peek_at(&self, offset: isize) -> Option<char> {
        if offset >= 0 {
            self.rest().chars().nth(offset as usize)
        } else {
            self.consumed().chars().rev().nth(offset.unsigned_abs() - 1)
        }
    }

    /// Returns true if the character `offset` away is exactly `expected`.
    /// Out-of-range offsets never match.
    pub fn expect_at(&self, offset: isize, expected: char) -> bool {
        self.peek_at(offset) == Some(expected)
    }

    /// Checks if the remaining input starts with `pat`.
    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Advances by one character, returning it.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` characters, stopping early at the end of input.
    pub fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Consumes `expected` if it is the current character.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.i += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes `expected` if the remaining input starts with it.
    pub fn eat_str(&mut self, expected: &str) -> bool {
        if self.starts_with(expected) {
            self.i += expected.len();
            true
        } else {
            false
        }
    }

    /// Consumes characters while `pred` holds and returns them. Returns an
    /// empty slice if the current character does not match.
    pub fn consume_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let start = self.i;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.i += c.len_utf8();
        }
        &self.s[start..self.i]
    }

    /// Consumes up to `delimiter` and past it, returning what came before.
    ///
    /// If the delimiter never shows up, nothing is consumed and `None` is
    /// returned.
    pub fn consume_until(&mut self, delimiter: char) -> Option<&'a str> {
        let found = self.rest().find(delimiter)?;
        let read = &self.rest()[..found];
        self.i += found + delimiter.len_utf8();
        Some(read)
    }

    /// Consumes up to `terminator`, treating `\` + terminator as a literal
    /// terminator. The terminator itself is consumed.
    ///
    /// If the input ends first, the text read so far is returned when
    /// `allow_unterminated` is set and `None` otherwise. In the `None` case
    /// the cursor is left where it was.
    pub fn consume_escaped(&mut self, terminator: char, allow_unterminated: bool) -> Option<String> {
        let start = self.i;
        let mut read = String::new();

        while let Some(c) = self.bump() {
            if c == '\\' && self.eat(terminator) {
                read.push(terminator);
            } else if c == terminator {
                return Some(read);
            } else {
                read.push(c);
            }
        }

        if allow_unterminated {
            Some(read)
        } else {
            self.i = start;
            None
        }
    }

    /// Runs `matcher` and keeps its progress only if it returns true;
    /// otherwise the cursor is restored to where it was before.
    pub fn try_match(&mut self, matcher: impl FnOnce(&mut Self) -> bool) -> bool {
        let saved = self.i;
        if matcher(self) {
            true
        } else {
            self.i = saved;
            false
        }
    }
}

/// A cursor over a borrowed slice of elements.
///
/// Element references handed out live as long as the slice, not as long as
/// the cursor borrow, so a caller can hold on to a token while continuing to
/// advance.
#[derive(Debug)]
pub struct SequenceCursor<'t, T> {
    items: &'t [T],
    pos: usize,
}

impl<'t, T> Clone for SequenceCursor<'t, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            pos: self.pos,
        }
    }
}

impl<'t, T> SequenceCursor<'t, T> {
    pub fn new(items: &'t [T]) -> Self {
        Self { items, pos: 0 }
    }

    /// Consumes and returns the next element, or `None` when exhausted.
    pub fn bump(&mut self) -> Option<&'t T> {
        let item = self.items.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }

    /// Skips `n` elements.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` elements remain. Callers are expected to have
    /// peeked at what they skip.
    pub fn skip(&mut self, n: usize) {
        assert!(
            self.pos + n <= self.items.len(),
            "skipped {n} elements with only {} remaining",
            self.remaining()
        );
        self.pos += n;
    }

    /// The next element, without consuming it.
    pub fn peek(&self) -> Option<&'t T> {
        self.peek_at(0)
    }

    /// The element `offset` away from the current position. `-1` is the
    /// element most recently consumed.
    pub fn peek_at(&self, offset: isize) -> Option<&'t T> {
        let index = self.pos.checked_add_signed(offset)?;
        self.items.get(index)
    }

    /// Returns true if there are elements left to consume.
    pub fn has_remaining(&self) -> bool {
        self.pos < self.items.len()
    }

    /// Number of elements left to consume.
    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Restores a position previously obtained from [`position`](Self::position).
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.items.len());
        self.pos = pos;
    }
}
