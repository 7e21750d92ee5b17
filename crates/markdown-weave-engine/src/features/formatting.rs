//! Emphasis, strikethrough, underline and horizontal rules.
//!
//! Emphasis is lexed as one [`StarToken`] per run of stars, so `***` is a
//! single token rather than three. A run with whitespace on both sides is
//! not emphasis at all; `a * b` stays literal. Otherwise a run opens when
//! its right side touches text and closes when its left side does, so
//! `a* b*` stays literal too. A run at the start or end of a line counts
//! as touching on that side. An opener of `n` stars is closed by the next
//! closing run of exactly `n` stars:
//!
//! | stars | style |
//! |---|---|
//! | 1 | italic |
//! | 2 | bold |
//! | 3 | bold italic |

use markdown_weave_syntax::{
    Compiler, Element, MarkdownFeature, Node, NodeRegistrar, ParseRule, StringCursor, Style,
    Token, TokenBuffer, TokenRegistrar, lex_fn, lex_from_char,
};

/// Longest run of stars that still means emphasis.
const MAX_STARS: usize = 3;

#[derive(Debug, Clone)]
struct StarToken {
    count: usize,
    opens: bool,
    closes: bool,
    content: String,
}

impl StarToken {
    fn new(count: usize, opens: bool, closes: bool) -> Self {
        Self {
            count,
            opens,
            closes,
            content: "*".repeat(count),
        }
    }
}

impl Token for StarToken {
    fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone)]
struct TildeToken;

impl Token for TildeToken {
    fn content(&self) -> &str {
        "~"
    }
}

#[derive(Debug, Clone)]
struct UnderscoreToken;

impl Token for UnderscoreToken {
    fn content(&self) -> &str {
        "_"
    }
}

#[derive(Debug, Clone)]
struct HorizontalRuleToken;

impl Token for HorizontalRuleToken {
    fn content(&self) -> &str {
        "---"
    }
}

#[derive(Debug)]
struct HorizontalRuleElement;

impl Element for HorizontalRuleElement {
    fn visit_start(&self, compiler: &mut dyn Compiler) {
        compiler.visit_horizontal_rule();
    }
}

/// `*italic*`, `**bold**`, `***both***`, `~~strikethrough~~`,
/// `__underline__` and, unless disabled, `---` on a line of its own as a
/// horizontal rule.
#[derive(Debug, Clone)]
pub struct BasicFormattingFeature {
    horizontal_rules: bool,
}

impl Default for BasicFormattingFeature {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicFormattingFeature {
    pub fn new() -> Self {
        Self {
            horizontal_rules: true,
        }
    }

    /// Inline formatting only, for outputs that cannot draw a rule.
    pub fn without_horizontal_rules() -> Self {
        Self {
            horizontal_rules: false,
        }
    }

    pub fn horizontal_rules(&self) -> bool {
        self.horizontal_rules
    }
}

impl MarkdownFeature for BasicFormattingFeature {
    fn name(&self) -> &str {
        "basic_formatting"
    }

    fn supports_compiler(&self, _compiler: &dyn Compiler) -> bool {
        true
    }

    fn register_tokens(&self, registrar: &mut dyn TokenRegistrar) {
        registrar.register_token(lex_fn(lex_stars), '*');
        registrar.register_token(lex_from_char(|| TildeToken), '~');
        registrar.register_token(lex_from_char(|| UnderscoreToken), '_');

        if self.horizontal_rules {
            registrar.register_token(lex_fn(lex_horizontal_rule), '-');
        }
    }

    fn register_nodes(&self, registrar: &mut dyn NodeRegistrar) {
        registrar.register_node(emphasis_rule());
        registrar.register_node(double_marker_rule::<TildeToken>("~~", |style| {
            style.with_strikethrough(true)
        }));
        registrar.register_node(double_marker_rule::<UnderscoreToken>("__", |style| {
            style.with_underline(true)
        }));

        if self.horizontal_rules {
            registrar.register_node(ParseRule::for_token::<HorizontalRuleToken, _>(
                |_, _, _| Node::new(HorizontalRuleElement),
            ));
        }
    }
}

fn lex_stars(cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
    let before = cursor.peek_at(-1);
    let count = cursor.consume_while(|c| c == '*').len();
    let after = cursor.peek();

    let left_edge = is_line_edge(before);
    let right_edge = is_line_edge(after);
    let left_adjacent = touches_text(before);
    let right_adjacent = touches_text(after);
    if count > MAX_STARS || !(left_adjacent || right_adjacent || left_edge || right_edge) {
        return false;
    }

    tokens.push(StarToken::new(
        count,
        right_adjacent || left_edge,
        left_adjacent || right_edge,
    ));
    true
}

fn touches_text(c: Option<char>) -> bool {
    c.is_some_and(|c| !c.is_whitespace())
}

fn is_line_edge(c: Option<char>) -> bool {
    c.is_none_or(|c| c == '\n')
}

/// Exactly three dashes with a blank line on either side.
fn lex_horizontal_rule(cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
    if !(cursor.expect_at(-1, '\n') && cursor.expect_at(-2, '\n')) {
        return false;
    }

    let dashes = cursor.consume_while(|c| c == '-');
    if dashes.len() != 3 || !(cursor.expect_at(0, '\n') && cursor.expect_at(1, '\n')) {
        return false;
    }

    tokens.push(HorizontalRuleToken);
    true
}

fn closes_emphasis(token: &dyn Token, count: usize) -> bool {
    token
        .downcast_ref::<StarToken>()
        .is_some_and(|star| star.closes && star.count == count)
}

fn emphasis(mut style: Style, count: usize) -> Style {
    if count % 2 == 1 {
        style = style.with_italic(true);
    }
    if count > 1 {
        style = style.with_bold(true);
    }
    style
}

fn emphasis_rule() -> ParseRule {
    ParseRule::new(
        |token, _| {
            token
                .downcast_ref::<StarToken>()
                .filter(|star| star.opens)
                .map(|star| star.count)
        },
        |parser, count, tokens| {
            let start = tokens.position();
            let content = parser.parse_until(
                tokens,
                |token| token.is_boundary() || closes_emphasis(token, count),
                |_| false,
            );

            if tokens
                .peek_token()
                .is_some_and(|token| closes_emphasis(token, count))
            {
                tokens.bump();
                Node::formatting(move |style| emphasis(style, count)).with_child(content)
            } else {
                tokens.set_position(start);
                Node::text("*".repeat(count))
            }
        },
    )
}

/// A rule for markers written as two `T` tokens on both sides, such as
/// `~~text~~`. An unclosed opener becomes the literal `marker`.
fn double_marker_rule<T: Token>(marker: &'static str, formatting: fn(Style) -> Style) -> ParseRule {
    ParseRule::new(
        |token, tokens| (token.is::<T>() && tokens.peek_is::<T>()).then_some(()),
        move |parser, (), tokens| {
            tokens.bump();
            let start = tokens.position();
            let content = parser.parse_until_token::<T>(tokens);

            if tokens.peek_is::<T>() && tokens.peek_token_at(1).is_some_and(|next| next.is::<T>()) {
                tokens.skip(2);
                Node::formatting(formatting).with_child(content)
            } else {
                tokens.set_position(start);
                Node::text(marker)
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::trace;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    fn formatting(input: &str) -> Vec<String> {
        trace(vec![Arc::new(BasicFormattingFeature::new())], input)
    }

    #[rstest]
    #[case("*a*", "style italic")]
    #[case("**a**", "style bold")]
    #[case("***a***", "style bold italic")]
    #[case("~~a~~", "style strikethrough")]
    #[case("__a__", "style underline")]
    fn single_style(#[case] input: &str, #[case] style: &str) {
        assert_eq!(formatting(input), vec![style, r#"text "a""#, "end_style"]);
    }

    #[test]
    fn italic_nested_in_bold() {
        assert_eq!(
            formatting("** *italic* **"),
            vec![
                "style bold",
                r#"text " ""#,
                "style bold italic",
                r#"text "italic""#,
                "end_style",
                r#"text " ""#,
                "end_style",
            ]
        );
    }

    #[test]
    fn detached_star_is_literal() {
        assert_eq!(formatting("a * b"), vec![r#"text "a * b""#]);
    }

    #[test]
    fn run_followed_by_space_does_not_open() {
        assert_eq!(
            formatting("a* b*"),
            vec![r#"text "a""#, r#"text "*""#, r#"text " b""#, r#"text "*""#]
        );
    }

    #[test]
    fn run_preceded_by_space_does_not_close() {
        assert_eq!(
            formatting("*a *b*"),
            vec![
                r#"text "*""#,
                r#"text "a ""#,
                "style italic",
                r#"text "b""#,
                "end_style",
            ]
        );
    }

    #[rstest]
    #[case("* a*")]
    #[case("*a *")]
    fn runs_at_line_edges_may_face_a_space(#[case] input: &str) {
        assert_eq!(formatting(input)[0], "style italic");
    }

    #[test]
    fn unclosed_emphasis_is_literal() {
        assert_eq!(formatting("**a"), vec![r#"text "**""#, r#"text "a""#]);
    }

    #[test]
    fn mismatched_runs_do_not_close() {
        assert_eq!(
            formatting("**a*"),
            vec![r#"text "**""#, r#"text "a""#, r#"text "*""#]
        );
    }

    #[test]
    fn single_tilde_is_literal() {
        assert_eq!(
            formatting("~a~"),
            vec![r#"text "~""#, r#"text "a""#, r#"text "~""#]
        );
    }

    #[test]
    fn unclosed_strikethrough_is_literal() {
        assert_eq!(formatting("~~a"), vec![r#"text "~~""#, r#"text "a""#]);
    }

    #[test]
    fn emphasis_stops_at_blank_line() {
        assert_eq!(
            formatting("*a\n\nb*"),
            vec![
                r#"text "*""#,
                r#"text "a""#,
                r#"text "\n""#,
                r#"text "b""#,
                r#"text "*""#,
            ]
        );
    }

    #[test]
    fn horizontal_rule_between_blank_lines() {
        assert_eq!(
            formatting("a\n\n---\n\nb"),
            vec![
                r#"text "a""#,
                r#"text "\n""#,
                "rule",
                r#"text "\n""#,
                r#"text "b""#,
            ]
        );
    }

    #[rstest]
    #[case("a\n---\n\nb")]
    #[case("a\n\n----\n\nb")]
    fn malformed_rule_is_text(#[case] input: &str) {
        assert!(!formatting(input).contains(&"rule".to_owned()));
    }

    #[test]
    fn rules_can_be_disabled() {
        let events = trace(
            vec![Arc::new(BasicFormattingFeature::without_horizontal_rules())],
            "a\n\n---\n\nb",
        );
        assert!(!events.contains(&"rule".to_owned()));
    }
}
