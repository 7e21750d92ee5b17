//! `{gold}colored text{}` and `{#FF8800}colored text{}`.

use markdown_weave_syntax::{
    Color, Compiler, MarkdownFeature, NamedColor, Node, NodeRegistrar, ParseRule, StringCursor,
    Token, TokenBuffer, TokenRegistrar, lex_fn,
};

#[derive(Debug, Clone)]
struct OpenColorToken {
    color: Color,
    content: String,
}

impl Token for OpenColorToken {
    fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone)]
struct CloseColorToken;

impl Token for CloseColorToken {
    fn content(&self) -> &str {
        "{}"
    }
}

/// Colors text with a named color or a six digit hex code. `{}` ends the
/// innermost color.
#[derive(Debug, Clone, Default)]
pub struct ColorFeature;

impl MarkdownFeature for ColorFeature {
    fn name(&self) -> &str {
        "colors"
    }

    fn supports_compiler(&self, _compiler: &dyn Compiler) -> bool {
        true
    }

    fn register_tokens(&self, registrar: &mut dyn TokenRegistrar) {
        registrar.register_token(lex_fn(lex_color), '{');
    }

    fn register_nodes(&self, registrar: &mut dyn NodeRegistrar) {
        registrar.register_node(ParseRule::for_token::<OpenColorToken, _>(
            |parser, open, tokens| {
                let start = tokens.position();
                let content = parser.parse_until_token::<CloseColorToken>(tokens);

                if tokens.peek_is::<CloseColorToken>() {
                    tokens.bump();
                    let color = open.color;
                    Node::formatting(move |style| style.with_color(color)).with_child(content)
                } else {
                    tokens.set_position(start);
                    Node::text(open.content)
                }
            },
        ));
    }
}

fn lex_color(cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
    let start = cursor.position();
    cursor.bump();

    if cursor.eat('}') {
        tokens.push(CloseColorToken);
        return true;
    }

    let hex = cursor.eat('#');
    let Some(name) = cursor.consume_until('}') else {
        return false;
    };

    let color = if hex {
        Color::from_hex(name)
    } else {
        NamedColor::from_name(name).map(Color::from)
    };
    let Some(color) = color else {
        return false;
    };

    tokens.push(OpenColorToken {
        color,
        content: cursor.source()[start..cursor.position()].to_owned(),
    });
    true
}
