//! `> quoted` lines, nested with `>>`.

use markdown_weave_syntax::{
    Compiler, Element, MarkdownFeature, NewlineToken, Node, NodeRegistrar, ParseRule,
    StringCursor, Token, TokenBuffer, TokenRegistrar, lex_fn,
};

#[derive(Debug, Clone)]
struct QuoteToken {
    depth: usize,
    content: String,
}

impl Token for QuoteToken {
    fn content(&self) -> &str {
        &self.content
    }

    fn is_boundary(&self) -> bool {
        true
    }
}

#[derive(Debug)]
struct BlockQuoteElement;

impl Element for BlockQuoteElement {
    fn visit_start(&self, compiler: &mut dyn Compiler) {
        compiler.visit_block_quote();
    }

    fn visit_end(&self, compiler: &mut dyn Compiler) {
        compiler.visit_block_quote_end();
    }
}

/// Consecutive lines with the same marker form one quote. A line with a
/// longer marker opens a nested quote; a blank line or a shorter marker
/// ends it.
#[derive(Debug, Clone, Default)]
pub struct BlockQuoteFeature;

impl MarkdownFeature for BlockQuoteFeature {
    fn name(&self) -> &str {
        "block_quotes"
    }

    fn supports_compiler(&self, _compiler: &dyn Compiler) -> bool {
        true
    }

    fn register_tokens(&self, registrar: &mut dyn TokenRegistrar) {
        registrar.register_token(lex_fn(lex_quote), '>');
    }

    fn register_nodes(&self, registrar: &mut dyn NodeRegistrar) {
        registrar.register_node(ParseRule::new(
            |token, tokens| {
                let quote = token.downcast_ref::<QuoteToken>()?;
                // -1 is the quote token itself
                let line_start = tokens
                    .peek_token_at(-2)
                    .is_none_or(|previous| previous.is::<NewlineToken>());
                line_start.then_some(quote.depth)
            },
            |parser, depth, tokens| {
                let content = parser.parse_until(
                    tokens,
                    |token| {
                        token.is_boundary()
                            && token
                                .downcast_ref::<QuoteToken>()
                                .is_none_or(|quote| quote.depth < depth)
                    },
                    |token| {
                        token
                            .downcast_ref::<QuoteToken>()
                            .is_some_and(|quote| quote.depth == depth)
                    },
                );

                Node::new(BlockQuoteElement).with_child(content)
            },
        ));
    }
}

fn lex_quote(cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
    if cursor.peek_at(-1).is_some_and(|c| c != '\n') {
        return false;
    }

    let depth = cursor.consume_while(|c| c == '>').len();
    if !cursor.eat(' ') {
        return false;
    }

    tokens.push(QuoteToken {
        depth,
        content: format!("{} ", ">".repeat(depth)),
    });
    true
}
