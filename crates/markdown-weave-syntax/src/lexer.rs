//! # Lexer - Trigger-Character Dispatch
//!
//! The lexer turns raw input into a flat list of [`Token`]s. It knows almost
//! nothing about Markdown itself: features register [`LexFunction`]s against
//! the characters that can start their syntax, and the lexer tries them
//! whenever it meets one of those characters.
//!
//! ## Dispatch
//!
//! ```text
//! input: "a **b**"
//!         │ └─ '*' has candidates → try each, newest first
//!         └─── 'a' has none → consume the whole run up to the next trigger
//! ```
//!
//! Every attempt runs inside a speculative wrapper: if the candidate returns
//! `false`, both the cursor and the token buffer are rewound to where they
//! were, so a candidate may push tokens and consume input freely before
//! deciding it does not match. When every candidate fails, the trigger
//! character degrades to plain text. Lexing never fails.
//!
//! ## Ordering
//!
//! For a given trigger, **the most recently registered candidate is tried
//! first**. A feature installed later can therefore shadow a built-in
//! interpretation of a character without removing it. Note that the parser
//! uses the opposite rule (first registered wins), see [`crate::parser`].
//!
//! ## Built-ins
//!
//! - `\n`: a run of two or more breaks becomes a boundary [`NewlineToken`]
//!   holding all but one break; a single break becomes a soft wrap.
//! - `\`: escapes the next character if, and only if, that character is
//!   itself a trigger. An escaped break is a non-boundary literal break; any
//!   other escaped trigger becomes plain text.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cursor::StringCursor;
use crate::token::{NewlineToken, TextToken, Token};

/// A candidate lex rule for a trigger character.
///
/// Called with the cursor positioned on the trigger. Returns `true` after
/// consuming its input and pushing zero or more tokens, or `false` if the
/// input does not match (any progress is rolled back by the lexer).
pub type LexFunction = Arc<dyn Fn(&mut StringCursor<'_>, &mut TokenBuffer) -> bool + Send + Sync>;

/// Wraps a closure as a [`LexFunction`].
pub fn lex_fn<F>(f: F) -> LexFunction
where
    F: Fn(&mut StringCursor<'_>, &mut TokenBuffer) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A [`LexFunction`] that consumes the trigger character and pushes the
/// token built by `factory`.
pub fn lex_from_char<T, F>(factory: F) -> LexFunction
where
    T: Token,
    F: Fn() -> T + Send + Sync + 'static,
{
    lex_fn(move |cursor, tokens| {
        cursor.bump();
        tokens.push(factory());
        true
    })
}

/// Registration surface the lexer exposes to features.
pub trait TokenRegistrar {
    /// Register `lexer` to be tried whenever `trigger` is encountered.
    fn register_token(&mut self, lexer: LexFunction, trigger: char);

    /// Register `lexer` for each of `triggers`.
    fn register_token_for(&mut self, lexer: LexFunction, triggers: &[char]) {
        for &trigger in triggers {
            self.register_token(lexer.clone(), trigger);
        }
    }
}

/// Output of a single lex pass.
///
/// Plain text pushed through [`push_text`](Self::push_text) is merged into a
/// trailing [`TextToken`], so the finished token list never holds two text
/// tokens in a row.
#[derive(Debug, Default)]
pub struct TokenBuffer {
    tokens: Vec<Box<dyn Token>>,
}

/// Restore point for [`TokenBuffer::rewind`].
#[derive(Debug, Clone, Copy)]
struct TokenMark {
    len: usize,
    text_len: Option<usize>,
}

impl TokenBuffer {
    pub fn push(&mut self, token: impl Token) {
        self.tokens.push(Box::new(token));
    }

    /// Append plain text, merging into the preceding text token if any.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        match self.trailing_text_mut() {
            Some(last) => last.push_str(text),
            None => self.push(TextToken::new(text)),
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.push_text(c.encode_utf8(&mut [0; 4]));
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The most recently pushed token.
    pub fn last(&self) -> Option<&dyn Token> {
        self.tokens.last().map(|t| &**t)
    }

    pub fn into_tokens(self) -> Vec<Box<dyn Token>> {
        self.tokens
    }

    fn trailing_text_mut(&mut self) -> Option<&mut TextToken> {
        self.tokens
            .last_mut()
            .and_then(|t| (**t).as_any_mut().downcast_mut::<TextToken>())
    }

    fn mark(&self) -> TokenMark {
        TokenMark {
            len: self.tokens.len(),
            text_len: self.last().and_then(|t| t.downcast_ref::<TextToken>()).map(|t| t.content().len()),
        }
    }

    fn rewind(&mut self, mark: TokenMark) {
        self.tokens.truncate(mark.len);
        if let (Some(len), Some(last)) = (mark.text_len, self.trailing_text_mut()) {
            last.truncate(len);
        }
    }
}

/// The trigger-dispatch lexer. Immutable once its features are registered,
/// so one instance can serve any number of concurrent lex passes.
pub struct Lexer {
    lex_functions: HashMap<char, Vec<LexFunction>>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Lexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut triggers: Vec<_> = self.lex_functions.keys().collect();
        triggers.sort();
        f.debug_struct("Lexer").field("triggers", &triggers).finish()
    }
}

impl Lexer {
    /// A lexer with only the built-in newline and escape handling.
    pub fn new() -> Self {
        let mut lexer = Self {
            lex_functions: HashMap::new(),
        };

        lexer.register_token(lex_fn(lex_newlines), '\n');
        // Escapes are handled in `lex` since they need to see the trigger set.
        lexer.lex_functions.entry('\\').or_default();

        lexer
    }

    /// Returns true if any lex function is registered for `c`.
    pub fn is_trigger(&self, c: char) -> bool {
        self.lex_functions.contains_key(&c)
    }

    /// All registered trigger characters, in no particular order.
    pub fn triggers(&self) -> impl Iterator<Item = char> + '_ {
        self.lex_functions.keys().copied()
    }

    /// Lex `input` into tokens. Leading and trailing whitespace of the whole
    /// input is ignored and `\r\n` line endings are treated as `\n`.
    pub fn lex(&self, input: &str) -> Vec<Box<dyn Token>> {
        let normalized;
        let input = if input.contains('\r') {
            normalized = input.replace("\r\n", "\n");
            normalized.as_str()
        } else {
            input
        };

        let mut tokens = TokenBuffer::default();
        let mut cursor = StringCursor::new(input.trim());

        while let Some(current) = cursor.peek() {
            let Some(candidates) = self.lex_functions.get(&current) else {
                let run = cursor.consume_while(|c| !self.is_trigger(c));
                tokens.push_text(run);
                continue;
            };

            let matched = candidates
                .iter()
                .any(|function| attempt(&mut cursor, &mut tokens, |c, t| function(c, t)))
                || (current == '\\'
                    && attempt(&mut cursor, &mut tokens, |c, t| self.lex_escape(c, t)));

            if !matched {
                cursor.bump();
                tokens.push_char(current);
            }
        }

        log::trace!("lexed {} tokens from {} bytes", tokens.len(), input.len());
        tokens.into_tokens()
    }

    fn lex_escape(&self, cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
        cursor.bump();
        let Some(escaped) = cursor.bump() else {
            return false;
        };
        if !self.is_trigger(escaped) {
            return false;
        }

        if escaped == '\n' {
            tokens.push(NewlineToken::new("\n", false));
        } else {
            tokens.push_char(escaped);
        }
        true
    }
}

impl TokenRegistrar for Lexer {
    fn register_token(&mut self, lexer: LexFunction, trigger: char) {
        self.lex_functions.entry(trigger).or_default().insert(0, lexer);
    }
}

/// Runs one candidate speculatively. A candidate that claims success without
/// consuming anything is treated as a failure, since accepting it would stall
/// the lexer on the same character forever.
fn attempt(
    cursor: &mut StringCursor<'_>,
    tokens: &mut TokenBuffer,
    function: impl FnOnce(&mut StringCursor<'_>, &mut TokenBuffer) -> bool,
) -> bool {
    let position = cursor.position();
    let mark = tokens.mark();

    if function(cursor, tokens) && cursor.position() > position {
        true
    } else {
        cursor.set_position(position);
        tokens.rewind(mark);
        false
    }
}

fn lex_newlines(cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
    let newlines = cursor.consume_while(|c| c == '\n').len();
    if newlines > 1 {
        tokens.push(NewlineToken::new("\n".repeat(newlines - 1), true));
    } else {
        tokens.push(NewlineToken::soft());
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct MarkerToken;

    impl Token for MarkerToken {
        fn content(&self) -> &str {
            "@"
        }
    }

    /// Render tokens as `Kind(content)` for compact assertions.
    fn describe(tokens: &[Box<dyn Token>]) -> Vec<String> {
        tokens
            .iter()
            .map(|token| {
                let token = &**token;
                let kind = if token.is::<TextToken>() {
                    "Text"
                } else if token.is::<NewlineToken>() {
                    if token.is_boundary() { "Break" } else { "Wrap" }
                } else {
                    "Other"
                };
                format!("{kind}({:?})", token.content())
            })
            .collect()
    }

    fn marker_lexer() -> Lexer {
        let mut lexer = Lexer::new();
        lexer.register_token(lex_from_char(|| MarkerToken), '@');
        lexer
    }

    #[test]
    fn lex_empty_input() {
        assert!(Lexer::new().lex("").is_empty());
        assert!(Lexer::new().lex("  \n\n ").is_empty());
    }

    #[test]
    fn lex_plain_text_is_one_token() {
        let tokens = Lexer::new().lex("hello world");
        assert_eq!(describe(&tokens), vec![r#"Text("hello world")"#]);
    }

    #[test]
    fn input_is_trimmed() {
        let tokens = Lexer::new().lex("  \n hello \n\n");
        assert_eq!(describe(&tokens), vec![r#"Text("hello")"#]);
    }

    #[test]
    fn single_newline_is_soft_wrap() {
        let tokens = Lexer::new().lex("a\nb");
        assert_eq!(
            describe(&tokens),
            vec![r#"Text("a")"#, r#"Wrap(" ")"#, r#"Text("b")"#]
        );
    }

    #[test]
    fn newline_runs_become_boundaries() {
        let tokens = Lexer::new().lex("a\n\n\nb");
        assert_eq!(
            describe(&tokens),
            vec![r#"Text("a")"#, r#"Break("\n\n")"#, r#"Text("b")"#]
        );
    }

    #[test]
    fn crlf_is_normalized() {
        let tokens = Lexer::new().lex("a\r\n\r\nb");
        assert_eq!(
            describe(&tokens),
            vec![r#"Text("a")"#, r#"Break("\n")"#, r#"Text("b")"#]
        );
    }

    #[test]
    fn registered_trigger_produces_token() {
        let tokens = marker_lexer().lex("a@b");
        assert_eq!(
            describe(&tokens),
            vec![r#"Text("a")"#, r#"Other("@")"#, r#"Text("b")"#]
        );
    }

    #[test]
    fn escaped_trigger_is_literal_and_merges_with_text() {
        let tokens = marker_lexer().lex(r"a\@b");
        assert_eq!(describe(&tokens), vec![r#"Text("a@b")"#]);
    }

    #[test]
    fn escaping_a_non_trigger_keeps_the_backslash() {
        let tokens = marker_lexer().lex(r"a\b");
        assert_eq!(describe(&tokens), vec![r#"Text("a\\b")"#]);
    }

    #[test]
    fn escaped_backslash() {
        let tokens = Lexer::new().lex(r"a\\b");
        assert_eq!(describe(&tokens), vec![r#"Text("a\\b")"#]);
    }

    #[test]
    fn escaped_newline_is_literal_break() {
        let tokens = Lexer::new().lex("a\\\nb");
        assert_eq!(
            describe(&tokens),
            vec![r#"Text("a")"#, r#"Wrap("\n")"#, r#"Text("b")"#]
        );
    }

    #[test]
    fn trailing_backslash_is_text() {
        let tokens = Lexer::new().lex(r"a\");
        assert_eq!(describe(&tokens), vec![r#"Text("a\\")"#]);
    }

    #[test]
    fn failed_candidate_is_rolled_back() {
        let mut lexer = Lexer::new();
        lexer.register_token(
            lex_fn(|cursor, tokens| {
                cursor.bump_n(2);
                tokens.push(MarkerToken);
                tokens.push_text("garbage");
                false
            }),
            '@',
        );

        let tokens = lexer.lex("x@yz");
        assert_eq!(describe(&tokens), vec![r#"Text("x@yz")"#]);
    }

    #[test]
    fn newest_candidate_is_tried_first() {
        let mut lexer = Lexer::new();
        lexer.register_token(lex_from_char(|| MarkerToken), '@');
        lexer.register_token(
            lex_fn(|cursor, tokens| {
                cursor.bump();
                tokens.push_text("shadowed");
                true
            }),
            '@',
        );

        let tokens = lexer.lex("@");
        assert_eq!(describe(&tokens), vec![r#"Text("shadowed")"#]);
    }

    #[test]
    fn older_candidate_runs_when_newer_fails() {
        let mut lexer = Lexer::new();
        lexer.register_token(lex_from_char(|| MarkerToken), '@');
        lexer.register_token(lex_fn(|_, _| false), '@');

        let tokens = lexer.lex("@");
        assert_eq!(describe(&tokens), vec![r#"Other("@")"#]);
    }

    #[test]
    fn success_without_progress_degrades_to_text() {
        let mut lexer = Lexer::new();
        lexer.register_token(
            lex_fn(|_, tokens| {
                tokens.push(MarkerToken);
                true
            }),
            '@',
        );

        let tokens = lexer.lex("@@");
        assert_eq!(describe(&tokens), vec![r#"Text("@@")"#]);
    }

    #[test]
    fn register_for_many_triggers() {
        let mut lexer = Lexer::new();
        lexer.register_token_for(lex_from_char(|| MarkerToken), &['1', '2']);
        assert!(lexer.is_trigger('1'));
        assert!(lexer.is_trigger('2'));
        assert!(lexer.is_trigger('\n'));
        assert!(lexer.is_trigger('\\'));
        assert!(!lexer.is_trigger('3'));
    }
}
