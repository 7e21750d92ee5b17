//! `- unordered` and `1. ordered` list items.
//!
//! A marker only counts at the start of a line, after nothing but
//! indentation. The indentation width is the item's depth: an item keeps
//! going until the next boundary that is not a more deeply indented
//! marker, so deeper items nest inside it.

use markdown_weave_syntax::{
    Compiler, Element, MarkdownFeature, Node, NodeRegistrar, ParseRule, StringCursor, Token,
    TokenBuffer, TokenRegistrar, lex_fn,
};

use super::whitespace_since_line_break;

#[derive(Debug, Clone)]
struct ListToken {
    depth: usize,
    ordinal: Option<u32>,
    content: String,
}

impl Token for ListToken {
    fn content(&self) -> &str {
        &self.content
    }

    fn is_boundary(&self) -> bool {
        true
    }
}

#[derive(Debug)]
struct ListItemElement {
    ordinal: Option<u32>,
}

impl Element for ListItemElement {
    fn visit_start(&self, compiler: &mut dyn Compiler) {
        compiler.visit_list_item(self.ordinal);
    }

    fn visit_end(&self, compiler: &mut dyn Compiler) {
        compiler.visit_list_item_end();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListFeature;

impl MarkdownFeature for ListFeature {
    fn name(&self) -> &str {
        "lists"
    }

    fn supports_compiler(&self, _compiler: &dyn Compiler) -> bool {
        true
    }

    fn register_tokens(&self, registrar: &mut dyn TokenRegistrar) {
        registrar.register_token(lex_fn(lex_unordered), '-');
        registrar.register_token_for(
            lex_fn(lex_ordered),
            &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'],
        );
    }

    fn register_nodes(&self, registrar: &mut dyn NodeRegistrar) {
        registrar.register_node(ParseRule::for_token::<ListToken, _>(
            |parser, item, tokens| {
                let content = parser.parse_until(
                    tokens,
                    |token| {
                        token.is_boundary()
                            && !token
                                .downcast_ref::<ListToken>()
                                .is_some_and(|nested| nested.depth > item.depth)
                    },
                    |_| false,
                );

                Node::new(ListItemElement {
                    ordinal: item.ordinal,
                })
                .with_child(content)
            },
        ));
    }
}

fn lex_unordered(cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
    let start = cursor.position();
    let Some(depth) = whitespace_since_line_break(cursor) else {
        return false;
    };

    cursor.bump();
    if !cursor.eat(' ') {
        return false;
    }

    tokens.push(ListToken {
        depth,
        ordinal: None,
        content: cursor.source()[start..cursor.position()].to_owned(),
    });
    true
}

fn lex_ordered(cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
    let start = cursor.position();
    let Some(depth) = whitespace_since_line_break(cursor) else {
        return false;
    };

    let digits = cursor.consume_while(|c| c.is_ascii_digit());
    let Ok(ordinal) = digits.parse::<u32>() else {
        return false;
    };
    if !cursor.eat_str(". ") {
        return false;
    }

    tokens.push(ListToken {
        depth,
        ordinal: Some(ordinal),
        content: cursor.source()[start..cursor.position()].to_owned(),
    });
    true
}
