//! `[link text](https://example.com)`.

use markdown_weave_syntax::{
    Compiler, MarkdownFeature, NamedColor, Node, NodeRegistrar, ParseRule, StringCursor, Style,
    Token, TokenBuffer, TokenRegistrar, lex_fn, lex_from_char,
};

#[derive(Debug, Clone)]
struct OpenLinkToken;

impl Token for OpenLinkToken {
    fn content(&self) -> &str {
        "["
    }
}

#[derive(Debug, Clone)]
struct CloseLinkToken {
    url: String,
    content: String,
}

impl Token for CloseLinkToken {
    fn content(&self) -> &str {
        &self.content
    }
}

/// Blue link text that shows its target as a tooltip.
#[derive(Debug, Clone, Default)]
pub struct LinkFeature;

impl MarkdownFeature for LinkFeature {
    fn name(&self) -> &str {
        "links"
    }

    fn supports_compiler(&self, _compiler: &dyn Compiler) -> bool {
        true
    }

    fn register_tokens(&self, registrar: &mut dyn TokenRegistrar) {
        registrar.register_token(lex_from_char(|| OpenLinkToken), '[');
        registrar.register_token(lex_fn(lex_link_target), ']');
    }

    fn register_nodes(&self, registrar: &mut dyn NodeRegistrar) {
        registrar.register_node(ParseRule::for_token::<OpenLinkToken, _>(
            |parser, _, tokens| {
                let start = tokens.position();
                let content = parser.parse_until_token::<CloseLinkToken>(tokens);

                match tokens.peek_as::<CloseLinkToken>() {
                    Some(close) => {
                        tokens.bump();
                        let url = close.url.clone();
                        Node::formatting(move |style| link(style, &url)).with_child(content)
                    }
                    None => {
                        tokens.set_position(start);
                        Node::text("[")
                    }
                }
            },
        ));
    }
}

fn link(style: Style, url: &str) -> Style {
    style
        .with_link(url)
        .with_tooltip(url)
        .with_color(NamedColor::Blue)
}

/// `](url)`, the part of a link after its text.
fn lex_link_target(cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
    let start = cursor.position();
    cursor.bump();

    if !cursor.eat('(') {
        return false;
    }
    let Some(url) = cursor.consume_until(')') else {
        return false;
    };

    tokens.push(CloseLinkToken {
        url: url.to_owned(),
        content: cursor.source()[start..cursor.position()].to_owned(),
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::BasicFormattingFeature;
    use crate::test_support::trace;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn links(input: &str) -> Vec<String> {
        trace(
            vec![Arc::new(BasicFormattingFeature::new()), Arc::new(LinkFeature)],
            input,
        )
    }

    #[test]
    fn link_styles_its_text() {
        assert_eq!(
            links("[docs](https://example.com)"),
            vec![
                r#"style color=blue link="https://example.com" tooltip="https://example.com""#,
                r#"text "docs""#,
                "end_style",
            ]
        );
    }

    #[test]
    fn link_text_can_be_formatted() {
        assert_eq!(
            links("[**docs**](x)"),
            vec![
                r#"style color=blue link="x" tooltip="x""#,
                r#"style bold color=blue link="x" tooltip="x""#,
                r#"text "docs""#,
                "end_style",
                "end_style",
            ]
        );
    }

    #[test]
    fn missing_target_is_literal() {
        assert_eq!(links("[label"), vec![r#"text "[""#, r#"text "label""#]);
    }

    #[test]
    fn bracket_without_parenthesis_is_literal() {
        assert_eq!(links("[a] b"), vec![r#"text "[""#, r#"text "a] b""#]);
    }
}
