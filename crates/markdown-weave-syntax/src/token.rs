//! # Tokens
//!
//! The lexer produces a flat list of boxed [`Token`]s. The core only knows two
//! concrete kinds, [`TextToken`] and [`NewlineToken`]; every feature brings its
//! own token types and recognises them again in its parse rules by
//! downcasting (`token.downcast_ref::<MyToken>()`).
//!
//! ## Boundaries
//!
//! A token that reports [`Token::is_boundary`] stops any enclosing
//! "parse until" scope that does not explicitly expect it. Blank lines, list
//! markers and quote markers are boundaries, which is what keeps emphasis
//! opened in one list item from being closed in the next.

use std::fmt::Debug;

use crate::as_any::AsAny;

/// A unit of lexer output.
pub trait Token: AsAny + Debug + 'static {
    /// The literal source text of this token. Used when the token ends up
    /// not taking part in any construct and degrades to plain text.
    fn content(&self) -> &str;

    /// Whether this token terminates enclosing "parse until" scopes.
    fn is_boundary(&self) -> bool {
        false
    }
}

impl dyn Token {
    /// Returns true if this token is a `T`.
    pub fn is<T: Token>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Token>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// A run of plain text. Adjacent runs are merged by the lexer, so two text
/// tokens are never neighbours in lexer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToken {
    content: String,
}

impl TextToken {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.content.push_str(text);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.content.truncate(len);
    }
}

impl Token for TextToken {
    fn content(&self) -> &str {
        &self.content
    }
}

/// One or more line breaks.
///
/// A single line break is a soft wrap: it is not a boundary and its content
/// is a single space. A blank line (two or more breaks) is a boundary and
/// keeps all but one of its breaks as content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewlineToken {
    content: String,
    boundary: bool,
}

impl NewlineToken {
    pub fn new(content: impl Into<String>, boundary: bool) -> Self {
        Self {
            content: content.into(),
            boundary,
        }
    }

    /// A soft line wrap, rendered as a space.
    pub fn soft() -> Self {
        Self::new(" ", false)
    }
}

impl Token for NewlineToken {
    fn content(&self) -> &str {
        &self.content
    }

    fn is_boundary(&self) -> bool {
        self.boundary
    }
}
