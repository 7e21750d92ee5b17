//! `![alt text](namespace:path/to/image.png)`, with an optional `,fit`
//! suffix on the target to stretch the image to the output width.

use std::sync::OnceLock;

use markdown_weave_syntax::{
    Compiler, Element, MarkdownFeature, Node, NodeRegistrar, ParseRule, StringCursor, Token,
    TokenBuffer, TokenRegistrar, lex_fn,
};
use regex::Regex;

const FIT_SUFFIX: &str = ",fit";

/// Returns true for resource ids of the form `path` or `namespace:path`.
pub fn is_image_id(id: &str) -> bool {
    static IMAGE_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = IMAGE_ID_REGEX.get_or_init(|| {
        Regex::new(r"^(?:[a-z0-9_.-]+:)?[a-z0-9_./-]+$").expect("Invalid image id regex")
    });
    regex.is_match(id)
}

#[derive(Debug, Clone)]
struct ImageToken {
    image: String,
    description: String,
    fit: bool,
    content: String,
}

impl Token for ImageToken {
    fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug)]
struct ImageElement {
    image: String,
    description: String,
    fit: bool,
}

impl Element for ImageElement {
    fn visit_start(&self, compiler: &mut dyn Compiler) {
        compiler.visit_image(&self.image, &self.description, self.fit);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageFeature;

impl MarkdownFeature for ImageFeature {
    fn name(&self) -> &str {
        "images"
    }

    fn supports_compiler(&self, _compiler: &dyn Compiler) -> bool {
        true
    }

    fn register_tokens(&self, registrar: &mut dyn TokenRegistrar) {
        registrar.register_token(lex_fn(lex_image), '!');
    }

    fn register_nodes(&self, registrar: &mut dyn NodeRegistrar) {
        registrar.register_node(ParseRule::for_token::<ImageToken, _>(|_, image, _| {
            Node::new(ImageElement {
                image: image.image,
                description: image.description,
                fit: image.fit,
            })
        }));
    }
}

fn lex_image(cursor: &mut StringCursor<'_>, tokens: &mut TokenBuffer) -> bool {
    let start = cursor.position();
    cursor.bump();

    if !cursor.eat('[') {
        return false;
    }
    let Some(description) = cursor.consume_until(']') else {
        return false;
    };
    if !cursor.eat('(') {
        return false;
    }
    let Some(target) = cursor.consume_until(')') else {
        return false;
    };

    let (image, fit) = match target.strip_suffix(FIT_SUFFIX) {
        Some(image) => (image, true),
        None => (target, false),
    };
    if !is_image_id(image) {
        return false;
    }

    tokens.push(ImageToken {
        image: image.to_owned(),
        description: description.to_owned(),
        fit,
        content: cursor.source()[start..cursor.position()].to_owned(),
    });
    true
}
