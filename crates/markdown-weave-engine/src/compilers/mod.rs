//! Shipped compiler backends.
//!
//! - [`TextCompiler`]: one block of styled text, laid out for a terminal.
//! - [`BlockCompiler`]: a structured block tree, the only backend that
//!   accepts inserted components.
//! - [`TraceCompiler`]: the raw visit events, for diagnostics and tests.

pub mod block;
pub mod styled_text;
pub mod text;
pub mod trace;

pub use block::{Block, BlockCompiler};
pub use styled_text::{Span, StyledText, TextBuilder};
pub use text::{DEFAULT_OUTPUT_WIDTH, TextCompiler};
pub use trace::{CompileEvent, TraceCompiler};
