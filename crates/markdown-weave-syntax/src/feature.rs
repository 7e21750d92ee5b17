//! The contract grammar extensions implement.
//!
//! A feature contributes lex functions through a [`TokenRegistrar`] and
//! parse rules through a [`NodeRegistrar`]. It is installed once, when a
//! processor is assembled, and must not keep per-document state: the same
//! registered functions serve every document the processor handles.

use crate::as_any::AsAny;
use crate::compiler::Compiler;

pub use crate::lexer::TokenRegistrar;
pub use crate::parser::NodeRegistrar;

pub trait MarkdownFeature: AsAny + Send + Sync + 'static {
    /// A name for this feature, used in log and error messages.
    fn name(&self) -> &str;

    /// Returns true if this feature's nodes know how to drive `compiler`.
    ///
    /// Nodes may rely on this check: if it only accepts one concrete
    /// compiler type, every compiler those nodes are visited with is of that
    /// type.
    fn supports_compiler(&self, compiler: &dyn Compiler) -> bool;

    fn register_tokens(&self, registrar: &mut dyn TokenRegistrar);

    fn register_nodes(&self, registrar: &mut dyn NodeRegistrar);
}

impl dyn MarkdownFeature {
    pub fn is<F: MarkdownFeature>(&self) -> bool {
        self.as_any().is::<F>()
    }

    pub fn downcast_ref<F: MarkdownFeature>(&self) -> Option<&F> {
        self.as_any().downcast_ref::<F>()
    }
}
