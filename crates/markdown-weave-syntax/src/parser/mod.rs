//! # Parser - Rule Dispatch Over the Token Stream
//!
//! The parser turns the lexer's flat token list into a tree of [`Node`]s.
//! Like the lexer it carries no grammar of its own beyond plain text: every
//! construct is a [`ParseRule`] contributed by a feature.
//!
//! ## Rules
//!
//! A rule is a pair of functions:
//!
//! 1. a **trigger** that looks at the token just consumed (and, read only,
//!    at the tokens around it) and either declines or returns a match value;
//! 2. a **parse** function that receives the match value and the cursor,
//!    positioned just past the trigger token, and builds a node, consuming as
//!    many further tokens as it needs.
//!
//! ```text
//! tokens: Star(2) Text("bold") Star(2)
//!         │       └─ parsed by the emphasis rule through `parse_until`
//!         └─ trigger matches, parse function runs
//! ```
//!
//! **Rules are tried in registration order and the first match wins.** This
//! is the opposite of the lexer, where the most recently registered candidate
//! is tried first. A token no rule accepts becomes a text node holding its
//! literal content.
//!
//! ## Scoped sub-parses
//!
//! Constructs with an extent (emphasis, links, quotes, list items) call
//! [`Parser::parse_until`], which keeps parsing nodes until a terminator
//! shows up. The terminator is left unconsumed so the caller can check
//! whether it is the closer it wanted. If it is not, the caller rewinds the
//! cursor to just after its opener and emits the opener as text:
//!
//! ```ignore
//! let start = tokens.position();
//! let content = parser.parse_until_token::<CloseToken>(tokens);
//! if tokens.peek_is::<CloseToken>() {
//!     tokens.bump();
//!     Node::formatting(style).with_child(content)
//! } else {
//!     tokens.set_position(start);
//!     Node::text(opener_content)
//! }
//! ```
//!
//! [`Parser::parse_until_token`] also stops at any boundary token, which is
//! what keeps an opener in one list item from pairing with a closer in the
//! next.

mod node;

pub use node::{Element, EmptyElement, FormattingElement, Node, TextElement};

use std::fmt;

use crate::cursor::SequenceCursor;
use crate::token::{NewlineToken, TextToken, Token};

/// Cursor over lexer output.
pub type TokenCursor<'t> = SequenceCursor<'t, Box<dyn Token>>;

impl<'t> SequenceCursor<'t, Box<dyn Token>> {
    pub fn peek_token(&self) -> Option<&'t dyn Token> {
        self.peek().map(|token| &**token)
    }

    pub fn peek_token_at(&self, offset: isize) -> Option<&'t dyn Token> {
        self.peek_at(offset).map(|token| &**token)
    }

    pub fn bump_token(&mut self) -> Option<&'t dyn Token> {
        self.bump().map(|token| &**token)
    }

    /// Returns true if the next token is a `T`.
    pub fn peek_is<T: Token>(&self) -> bool {
        self.peek_token().is_some_and(|token| token.is::<T>())
    }

    pub fn peek_as<T: Token>(&self) -> Option<&'t T> {
        self.peek_token().and_then(|token| token.downcast_ref::<T>())
    }
}

type RuleFn = dyn Fn(&Parser, &dyn Token, &mut TokenCursor<'_>) -> Option<Node> + Send + Sync;

/// A trigger predicate paired with the parse function it unlocks.
pub struct ParseRule {
    rule: Box<RuleFn>,
}

impl ParseRule {
    /// Build a rule from a `trigger`, which inspects the consumed token and
    /// returns a match value, and a `parse` function that turns the match
    /// value into a node.
    pub fn new<M, T, P>(trigger: T, parse: P) -> Self
    where
        M: 'static,
        T: Fn(&dyn Token, &TokenCursor<'_>) -> Option<M> + Send + Sync + 'static,
        P: Fn(&Parser, M, &mut TokenCursor<'_>) -> Node + Send + Sync + 'static,
    {
        Self {
            rule: Box::new(move |parser: &Parser, token: &dyn Token, tokens: &mut TokenCursor<'_>| {
                let matched = trigger(token, tokens)?;
                Some(parse(parser, matched, tokens))
            }),
        }
    }

    /// A rule that fires for every `T` and hands it to `parse`.
    pub fn for_token<T, P>(parse: P) -> Self
    where
        T: Token + Clone,
        P: Fn(&Parser, T, &mut TokenCursor<'_>) -> Node + Send + Sync + 'static,
    {
        Self::new(|token, _| token.downcast_ref::<T>().cloned(), parse)
    }
}

impl fmt::Debug for ParseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseRule").finish_non_exhaustive()
    }
}

/// Registration surface the parser exposes to features.
pub trait NodeRegistrar {
    fn register_node(&mut self, rule: ParseRule);
}

/// The rule-dispatch parser. Immutable once its features are registered.
pub struct Parser {
    rules: Vec<ParseRule>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl NodeRegistrar for Parser {
    fn register_node(&mut self, rule: ParseRule) {
        self.rules.push(rule);
    }
}

impl Parser {
    /// A parser that only knows plain text.
    pub fn new() -> Self {
        let mut parser = Self { rules: Vec::new() };
        parser.register_node(text_rule());
        parser
    }

    /// Parse a whole token list into a root container node.
    pub fn parse(&self, tokens: &[Box<dyn Token>]) -> Node {
        let mut cursor = TokenCursor::new(tokens);

        let mut root = Node::empty();
        while cursor.has_remaining() {
            root.add_child(self.parse_node(&mut cursor));
        }

        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "parsed {} tokens into {} nodes",
                tokens.len(),
                root.node_count()
            );
        }
        root
    }

    /// Consume one token and build the node it starts. Returns an empty node
    /// if no tokens remain.
    pub fn parse_node(&self, tokens: &mut TokenCursor<'_>) -> Node {
        let Some(token) = tokens.bump_token() else {
            return Node::empty();
        };

        self.rules
            .iter()
            .find_map(|rule| (rule.rule)(self, token, tokens))
            .unwrap_or_else(|| Node::text(token.content()))
    }

    /// Parse nodes until the next token satisfies `until`, discarding tokens
    /// that satisfy `skip` along the way. The terminator is not consumed.
    ///
    /// At least one node is always parsed. Nodes after the first are attached
    /// as children of the first, so the returned node visits the whole run in
    /// document order.
    pub fn parse_until(
        &self,
        tokens: &mut TokenCursor<'_>,
        until: impl Fn(&dyn Token) -> bool,
        skip: impl Fn(&dyn Token) -> bool,
    ) -> Node {
        let mut node = self.parse_node(tokens);
        while let Some(next) = tokens.peek_token() {
            if skip(next) {
                tokens.bump();
                continue;
            }

            if until(next) {
                break;
            }

            node.add_child(self.parse_node(tokens));
        }

        node
    }

    /// [`parse_until`](Self::parse_until) that stops at the next `T` or at
    /// any boundary token.
    pub fn parse_until_token<T: Token>(&self, tokens: &mut TokenCursor<'_>) -> Node {
        self.parse_until(
            tokens,
            |token| token.is_boundary() || token.is::<T>(),
            |_| false,
        )
    }
}

/// Plain text. Leading whitespace is dropped at the start of the input or of
/// a line, trailing whitespace before a soft line wrap.
fn text_rule() -> ParseRule {
    ParseRule::new(
        |token, _| token.downcast_ref::<TextToken>().map(|text| text.content().to_owned()),
        |_, content, tokens| {
            let mut content = content.as_str();

            // -1 is the text token itself
            if tokens
                .peek_token_at(-2)
                .is_none_or(|previous| previous.is::<NewlineToken>())
            {
                content = content.trim_start();
            }

            if tokens
                .peek_token()
                .is_some_and(|next| next.is::<NewlineToken>() && !next.is_boundary())
            {
                content = content.trim_end();
            }

            Node::text(content)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Lexer, TokenRegistrar, lex_from_char};
    use crate::test_support::RecordingCompiler;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone)]
    struct AtToken;

    impl Token for AtToken {
        fn content(&self) -> &str {
            "@"
        }
    }

    #[derive(Debug, Clone)]
    struct BarToken;

    impl Token for BarToken {
        fn content(&self) -> &str {
            "|"
        }

        fn is_boundary(&self) -> bool {
            true
        }
    }

    /// `@text@` makes bold text, `|` is a boundary.
    fn at_syntax() -> (Lexer, Parser) {
        let mut lexer = Lexer::new();
        lexer.register_token(lex_from_char(|| AtToken), '@');
        lexer.register_token(lex_from_char(|| BarToken), '|');

        let mut parser = Parser::new();
        parser.register_node(ParseRule::for_token::<AtToken, _>(|parser, opener, tokens| {
            let start = tokens.position();
            let content = parser.parse_until_token::<AtToken>(tokens);

            if tokens.peek_is::<AtToken>() {
                tokens.bump();
                Node::formatting(|style| style.with_bold(true)).with_child(content)
            } else {
                tokens.set_position(start);
                Node::text(opener.content())
            }
        }));

        (lexer, parser)
    }

    fn events(lexer: &Lexer, parser: &Parser, input: &str) -> Vec<String> {
        let tokens = lexer.lex(input);
        let mut compiler = RecordingCompiler::default();
        parser.parse(&tokens).visit(&mut compiler);
        compiler.events
    }

    #[test]
    fn parse_plain_text() {
        let (lexer, parser) = (Lexer::new(), Parser::new());
        assert_eq!(events(&lexer, &parser, "hello"), vec!["text(hello)"]);
    }

    #[test]
    fn parse_empty_input() {
        let root = Parser::new().parse(&[]);
        assert!(root.children().is_empty());
    }

    #[test]
    fn parse_node_without_tokens_is_empty() {
        let tokens: Vec<Box<dyn Token>> = Vec::new();
        let mut cursor = TokenCursor::new(&tokens);
        let node = Parser::new().parse_node(&mut cursor);
        assert!(node.element().is::<EmptyElement>());
    }

    #[test]
    fn whitespace_is_trimmed_around_soft_wraps() {
        let (lexer, parser) = (Lexer::new(), Parser::new());
        assert_eq!(
            events(&lexer, &parser, "hello  \n  world"),
            vec!["text(hello)", "text( )", "text(world)"]
        );
    }

    #[test]
    fn trailing_whitespace_kept_before_blank_line() {
        let (lexer, parser) = (Lexer::new(), Parser::new());
        assert_eq!(
            events(&lexer, &parser, "a \n\nb"),
            vec!["text(a )", "text(\n)", "text(b)"]
        );
    }

    #[test]
    fn matched_rule_builds_formatting() {
        let (lexer, parser) = at_syntax();
        assert_eq!(
            events(&lexer, &parser, "a @b c@ d"),
            vec!["text(a )", "style(bold)", "text(b c)", "style_end", "text( d)"]
        );
    }

    #[test]
    fn unmatched_opener_degrades_to_text() {
        let (lexer, parser) = at_syntax();
        assert_eq!(
            events(&lexer, &parser, "a @b"),
            vec!["text(a )", "text(@)", "text(b)"]
        );
    }

    #[test]
    fn boundary_stops_scoped_parse() {
        let (lexer, parser) = at_syntax();
        assert_eq!(
            events(&lexer, &parser, "@a|b@"),
            vec!["text(@)", "text(a)", "text(|)", "text(b)", "text(@)"]
        );
    }

    #[test]
    fn parse_until_attaches_siblings_to_first_node() {
        let (lexer, parser) = at_syntax();
        let tokens = lexer.lex("a@b|c");
        let mut cursor = TokenCursor::new(&tokens);

        let node = parser.parse_until(&mut cursor, |token| token.is::<BarToken>(), |_| false);

        assert!(node.element().is::<TextElement>());
        assert_eq!(node.children().len(), 2);
        assert!(cursor.peek_is::<BarToken>());
    }

    #[test]
    fn parse_until_skips_tokens() {
        let (lexer, parser) = at_syntax();
        let tokens = lexer.lex("a|b|c");
        let mut cursor = TokenCursor::new(&tokens);

        let node = parser.parse_until(&mut cursor, |_| false, |token| token.is::<BarToken>());

        let mut compiler = RecordingCompiler::default();
        node.visit(&mut compiler);
        assert_eq!(compiler.events, vec!["text(a)", "text(b)", "text(c)"]);
        assert!(!cursor.has_remaining());
    }

    #[test]
    fn first_registered_rule_wins() {
        let (lexer, mut parser) = at_syntax();
        parser.register_node(ParseRule::for_token::<AtToken, _>(|_, _, _| {
            Node::text("never")
        }));

        assert_eq!(
            events(&lexer, &parser, "@x@"),
            vec!["style(bold)", "text(x)", "style_end"]
        );
    }

    #[test]
    fn trigger_sees_following_tokens() {
        let mut lexer = Lexer::new();
        lexer.register_token(lex_from_char(|| AtToken), '@');

        let mut parser = Parser::new();
        parser.register_node(ParseRule::new(
            |token, tokens| (token.is::<AtToken>() && tokens.peek_is::<AtToken>()).then_some(()),
            |_, (), tokens| {
                tokens.bump();
                Node::text("pair")
            },
        ));

        assert_eq!(
            events(&lexer, &parser, "@@ @"),
            vec!["text(pair)", "text( )", "text(@)"]
        );
    }
}
