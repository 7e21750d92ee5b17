//! Host templates inserted as pre-built blocks.
//!
//! ```text
//! <|name@source|>
//! <|name@source|key=value,other=with\, comma|>
//! ```
//!
//! `source` must be known to the [`TemplateProvider`] when the document is
//! lexed, otherwise the tag stays plain text. The template itself is only
//! expanded when the document is compiled; an expansion failure is logged
//! and replaced by a [`Block::Error`] placeholder. Templates can only be
//! inserted into a [`BlockCompiler`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use markdown_weave_syntax::{
    Compiler, Element, MarkdownFeature, Node, NodeRegistrar, ParseRule, StringCursor, Token,
    TokenBuffer, TokenRegistrar, lex_fn,
};
use thiserror::Error;

use crate::compilers::{Block, BlockCompiler};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("No template source '{location}' is loaded")]
    UnknownSource { location: String },

    #[error("Template '{template}' does not exist in '{location}'")]
    UnknownTemplate { template: String, location: String },

    #[error("Malformed template parameters: '{0}'")]
    MalformedParameters(String),

    #[error("Failed to expand template '{template}': {message}")]
    Expansion { template: String, message: String },
}

/// Host side of the template feature.
pub trait TemplateProvider: Send + Sync {
    /// Returns true if templates can be expanded from `source`.
    fn has_source(&self, source: &str) -> bool;

    /// Expand `template` from `source` with the given parameters.
    fn expand(
        &self,
        source: &str,
        template: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<Block, TemplateError>;
}

/// Parse `key=value` pairs separated by commas. `\,` is a literal comma
/// inside a value.
pub fn parse_template_params(params: &str) -> Result<BTreeMap<String, String>, TemplateError> {
    let mut cursor = StringCursor::new(params);
    let mut parsed = BTreeMap::new();

    while !cursor.eof() {
        let Some(name) = cursor.consume_until('=') else {
            return Err(TemplateError::MalformedParameters(cursor.rest().to_owned()));
        };
        let value = cursor.consume_escaped(',', true).unwrap_or_default();
        parsed.insert(name.to_owned(), value);
    }

    Ok(parsed)
}

#[derive(Debug, Clone)]
struct TemplateToken {
    template: String,
    source: String,
    params: String,
    content: String,
}

impl Token for TemplateToken {
    fn content(&self) -> &str {
        &self.content
    }

    fn is_boundary(&self) -> bool {
        true
    }
}

struct TemplateElement {
    provider: Arc<dyn TemplateProvider>,
    template: String,
    source: String,
    params: String,
}

impl fmt::Debug for TemplateElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateElement")
            .field("template", &self.template)
            .field("source", &self.source)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl TemplateElement {
    fn expand(&self) -> Block {
        parse_template_params(&self.params)
            .and_then(|params| self.provider.expand(&self.source, &self.template, &params))
            .unwrap_or_else(|error| {
                log::warn!(
                    "Failed to build template '{}@{}': {error}",
                    self.template,
                    self.source
                );
                Block::Error(error.to_string())
            })
    }
}

impl Element for TemplateElement {
    fn visit_start(&self, compiler: &mut dyn Compiler) {
        let Some(compiler) = compiler.downcast_mut::<BlockCompiler>() else {
            log::warn!(
                "Template '{}@{}' visited by a compiler that cannot hold blocks",
                self.template,
                self.source
            );
            return;
        };
        compiler.visit_component(self.expand());
    }
}

pub struct TemplateFeature {
    provider: Arc<dyn TemplateProvider>,
}

impl fmt::Debug for TemplateFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateFeature").finish_non_exhaustive()
    }
}

impl TemplateFeature {
    pub fn new(provider: impl TemplateProvider + 'static) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    pub fn from_shared(provider: Arc<dyn TemplateProvider>) -> Self {
        Self { provider }
    }
}

impl MarkdownFeature for TemplateFeature {
    fn name(&self) -> &str {
        "templates"
    }

    fn supports_compiler(&self, compiler: &dyn Compiler) -> bool {
        compiler.is::<BlockCompiler>()
    }

    fn register_tokens(&self, registrar: &mut dyn TokenRegistrar) {
        let provider = Arc::clone(&self.provider);
        registrar.register_token(
            lex_fn(move |cursor, tokens| lex_template(provider.as_ref(), cursor, tokens)),
            '<',
        );
    }

    fn register_nodes(&self, registrar: &mut dyn NodeRegistrar) {
        let provider = Arc::clone(&self.provider);
        registrar.register_node(ParseRule::for_token::<TemplateToken, _>(
            move |_, token, _| {
                Node::new(TemplateElement {
                    provider: Arc::clone(&provider),
                    template: token.template,
                    source: token.source,
                    params: token.params,
                })
            },
        ));
    }
}

fn lex_template(
    provider: &dyn TemplateProvider,
    cursor: &mut StringCursor<'_>,
    tokens: &mut TokenBuffer,
) -> bool {
    let start = cursor.position();
    cursor.bump();

    if !cursor.eat('|') {
        return false;
    }
    let Some(location) = cursor.consume_until('|') else {
        return false;
    };
    let Some((template, source)) = location.split_once('@') else {
        return false;
    };
    if template.is_empty() || source.is_empty() || source.contains('@') {
        return false;
    }
    if !provider.has_source(source) {
        log::debug!("template source '{source}' is not loaded");
        return false;
    }

    let params = if cursor.eat('>') {
        ""
    } else {
        let Some(params) = cursor.consume_until('|') else {
            return false;
        };
        if !cursor.eat('>') {
            return false;
        }
        params
    };

    tokens.push(TemplateToken {
        template: template.to_owned(),
        source: source.to_owned(),
        params: params.to_owned(),
        content: cursor.source()[start..cursor.position()].to_owned(),
    });
    true
}
