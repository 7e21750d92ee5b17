//! AST nodes.
//!
//! A [`Node`] pairs an [`Element`], the part that knows which compiler
//! events to emit, with an ordered list of children. The core ships text,
//! formatting and empty elements; features add their own element types.

use std::fmt;

use crate::as_any::AsAny;
use crate::compiler::Compiler;
use crate::style::Style;

/// The compiler-facing half of an AST node.
pub trait Element: AsAny + fmt::Debug + 'static {
    /// Emitted before the node's children are visited.
    fn visit_start(&self, compiler: &mut dyn Compiler);

    /// Emitted after the node's children are visited.
    fn visit_end(&self, _compiler: &mut dyn Compiler) {}
}

impl dyn Element {
    pub fn is<E: Element>(&self) -> bool {
        self.as_any().is::<E>()
    }

    pub fn downcast_ref<E: Element>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}

/// A node of the parsed document.
///
/// Children keep document order. They are only appended while parsing; once
/// [`Parser::parse`](crate::parser::Parser::parse) returns the tree is read
/// only.
#[derive(Debug)]
pub struct Node {
    element: Box<dyn Element>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(element: impl Element) -> Self {
        Self {
            element: Box::new(element),
            children: Vec::new(),
        }
    }

    /// A container that emits no events of its own.
    pub fn empty() -> Self {
        Self::new(EmptyElement)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(TextElement::new(content))
    }

    /// A node that pushes `formatting` for the duration of its children.
    pub fn formatting(formatting: impl Fn(Style) -> Style + 'static) -> Self {
        Self::new(FormattingElement::new(formatting))
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn element(&self) -> &dyn Element {
        &*self.element
    }

    /// Total number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Visits this node: start event, every child in order, end event.
    pub fn visit(&self, compiler: &mut dyn Compiler) {
        self.element.visit_start(compiler);
        for child in &self.children {
            child.visit(compiler);
        }
        self.element.visit_end(compiler);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyElement;

impl Element for EmptyElement {
    fn visit_start(&self, _compiler: &mut dyn Compiler) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    content: String,
}

impl TextElement {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Element for TextElement {
    fn visit_start(&self, compiler: &mut dyn Compiler) {
        compiler.visit_text(&self.content);
    }
}

pub struct FormattingElement {
    formatting: Box<dyn Fn(Style) -> Style>,
}

impl FormattingElement {
    pub fn new(formatting: impl Fn(Style) -> Style + 'static) -> Self {
        Self {
            formatting: Box::new(formatting),
        }
    }

    pub fn apply(&self, style: Style) -> Style {
        (self.formatting)(style)
    }
}

impl fmt::Debug for FormattingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormattingElement")
            .field("formatting", &(self.formatting)(Style::EMPTY))
            .finish()
    }
}

impl Element for FormattingElement {
    fn visit_start(&self, compiler: &mut dyn Compiler) {
        compiler.visit_style(&*self.formatting);
    }

    fn visit_end(&self, compiler: &mut dyn Compiler) {
        compiler.visit_style_end();
    }
}
