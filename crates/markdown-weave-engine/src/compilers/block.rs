//! Compiles a document into a tree of [`Block`]s for structured renderers.
//!
//! Text is gathered into a [`TextBuilder`] and flushed into a
//! [`Block::Text`] whenever a structural block starts or ends, so one text
//! block holds everything between two structural events. Quotes and list
//! items become containers holding the blocks visited inside them.

use std::collections::BTreeMap;

use markdown_weave_syntax::{Compiler, MarkdownCompiler, NamedColor, Style};

use super::styled_text::{StyledText, TextBuilder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(StyledText),
    Quote(Vec<Block>),
    ListItem {
        ordinal: Option<u32>,
        children: Vec<Block>,
    },
    HorizontalRule,
    Image {
        image: String,
        description: String,
        fit: bool,
    },
    /// Content built outside the pipeline and inserted as is.
    Component {
        kind: String,
        properties: BTreeMap<String, String>,
    },
    /// Inline error placeholder for content that failed to build.
    Error(String),
}

impl Block {
    /// The list marker rendered in front of a list item.
    pub fn list_marker(ordinal: Option<u32>) -> String {
        match ordinal {
            Some(ordinal) => format!(" {ordinal}. "),
            None => " • ".to_owned(),
        }
    }
}

/// An open quote or list item collecting its children.
#[derive(Debug)]
struct Container {
    /// `None` for a quote, the list item's ordinal otherwise.
    list_item: Option<Option<u32>>,
    children: Vec<Block>,
}

impl Container {
    fn into_block(self) -> Block {
        match self.list_item {
            Some(ordinal) => Block::ListItem {
                ordinal,
                children: self.children,
            },
            None => Block::Quote(self.children),
        }
    }
}

#[derive(Debug, Default)]
pub struct BlockCompiler {
    blocks: Vec<Block>,
    open: Vec<Container>,
    text: TextBuilder,
}

impl BlockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pre-built block to the current container.
    pub fn visit_component(&mut self, block: Block) {
        self.append(block);
    }

    fn children(&mut self) -> &mut Vec<Block> {
        match self.open.last_mut() {
            Some(container) => &mut container.children,
            None => &mut self.blocks,
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = self.text.take();
        self.children().push(Block::Text(text));
    }

    fn append(&mut self, block: Block) {
        self.flush_text();
        self.children().push(block);
    }

    fn push(&mut self, list_item: Option<Option<u32>>) {
        self.flush_text();
        self.open.push(Container {
            list_item,
            children: Vec::new(),
        });
    }

    /// # Panics
    ///
    /// Panics if no quote or list item is open.
    fn pop(&mut self) {
        self.flush_text();
        let Some(container) = self.open.pop() else {
            panic!("closed a block that was never opened");
        };
        self.children().push(container.into_block());
    }
}

impl Compiler for BlockCompiler {
    fn name(&self) -> &str {
        "weave_blocks"
    }

    fn visit_text(&mut self, text: &str) {
        self.text.append_plain(text);
    }

    fn visit_style(&mut self, style: &dyn Fn(Style) -> Style) {
        self.text.push_style(style);
    }

    fn visit_style_end(&mut self) {
        self.text.pop_style();
    }

    fn visit_block_quote(&mut self) {
        self.text.push_style(&|style| style.with_color(NamedColor::Gray));
        self.push(None);
    }

    fn visit_block_quote_end(&mut self) {
        self.text.pop_style();
        self.pop();
    }

    fn visit_horizontal_rule(&mut self) {
        self.append(Block::HorizontalRule);
    }

    fn visit_image(&mut self, image: &str, description: &str, fit: bool) {
        self.append(Block::Image {
            image: image.to_owned(),
            description: description.to_owned(),
            fit,
        });
    }

    fn visit_list_item(&mut self, ordinal: Option<u32>) {
        self.push(Some(ordinal));
    }

    fn visit_list_item_end(&mut self) {
        self.pop();
    }
}

impl MarkdownCompiler for BlockCompiler {
    type Output = Vec<Block>;

    fn compile(mut self) -> Self::Output {
        self.flush_text();
        assert!(
            self.open.is_empty(),
            "unbalanced blocks: {} still open",
            self.open.len()
        );
        self.text.finish();
        self.blocks
    }
}
