//! # markdown-weave-engine
//!
//! Ready-to-use Markdown processing on top of `markdown-weave-syntax`:
//! processor assembly, the built-in grammar features and the shipped
//! compilers.
//!
//! ```
//! use markdown_weave_engine::MarkdownProcessor;
//!
//! let processor = MarkdownProcessor::rich_text(40)?;
//! let text = processor.process("**bold** and *italic*");
//! assert_eq!(text.plain(), "bold and italic");
//! # Ok::<(), markdown_weave_engine::ProcessorError>(())
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! markdown-weave-engine/src/
//! ├── lib.rs          # This file - crate docs and re-exports
//! ├── processor.rs    # MarkdownProcessor: assembly, presets, composition
//! ├── error.rs        # ProcessorError
//! ├── features/       # Built-in MarkdownFeature implementations
//! └── compilers/      # TextCompiler, BlockCompiler, TraceCompiler
//! ```

pub mod compilers;
pub mod error;
pub mod features;
pub mod processor;

#[cfg(test)]
mod test_support;

pub use compilers::{Block, BlockCompiler, CompileEvent, StyledText, TextCompiler, TraceCompiler};
pub use error::ProcessorError;
pub use processor::MarkdownProcessor;
