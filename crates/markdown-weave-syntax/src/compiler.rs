//! # Compiler Contract
//!
//! A compiler is the stateful visitor an AST is walked against. It receives
//! a fixed set of events and accumulates a backend-specific result, which is
//! taken out with [`MarkdownCompiler::compile`].
//!
//! The event surface is split in two traits:
//!
//! - [`Compiler`] holds the visit events and is object safe. AST nodes only
//!   ever see a `&mut dyn Compiler`.
//! - [`MarkdownCompiler`] adds the typed result. `compile` consumes the
//!   compiler, so one instance produces exactly one result.
//!
//! Features that need more than the common events (for example inserting
//! pre-built content) downcast the compiler to its concrete type with
//! [`downcast_mut`](dyn Compiler::downcast_mut). The feature must have
//! rejected every other compiler type in its compatibility check.

use crate::as_any::AsAny;
use crate::style::Style;

/// The visit events every compiler accepts.
pub trait Compiler: AsAny + 'static {
    /// A name for this compiler, used in log and error messages.
    fn name(&self) -> &str;

    /// Append `text` using the currently active style.
    fn visit_text(&mut self, text: &str);

    /// Push a style transform. The new active style is `style` applied to
    /// the currently active one.
    fn visit_style(&mut self, style: &dyn Fn(Style) -> Style);

    /// Pop the most recently pushed style.
    fn visit_style_end(&mut self);

    /// Begin a new, one deeper, level of block quote.
    fn visit_block_quote(&mut self);

    fn visit_block_quote_end(&mut self);

    fn visit_horizontal_rule(&mut self);

    /// Append the image identified by `image`, with `description` as alt
    /// text. `fit` asks for the image to be stretched to the output width.
    fn visit_image(&mut self, image: &str, description: &str, fit: bool);

    /// Begin a list item, nested in the current one if any. `None` means an
    /// unordered item.
    fn visit_list_item(&mut self, ordinal: Option<u32>);

    fn visit_list_item_end(&mut self);
}

impl dyn Compiler {
    pub fn is<C: Compiler>(&self) -> bool {
        self.as_any().is::<C>()
    }

    pub fn downcast_ref<C: Compiler>(&self) -> Option<&C> {
        self.as_any().downcast_ref::<C>()
    }

    pub fn downcast_mut<C: Compiler>(&mut self) -> Option<&mut C> {
        self.as_any_mut().downcast_mut::<C>()
    }
}

/// A compiler with a typed result.
pub trait MarkdownCompiler: Compiler {
    type Output;

    /// Finish compilation and return the result.
    ///
    /// # Panics
    ///
    /// Implementations panic if style pushes and pops were not balanced,
    /// which points at a node that emitted a start event without its end.
    fn compile(self) -> Self::Output;
}
