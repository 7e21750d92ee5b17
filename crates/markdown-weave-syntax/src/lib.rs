//! # markdown-weave-syntax
//!
//! The extensible core of markdown-weave: a lexer and a parser that know
//! nothing about Markdown until features teach them, and the AST and
//! compiler contract the parsed document is rendered through.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Node tree → visit(Compiler) → Output
//!               (trigger chars)  (parse rules)        (visitor events)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! The lexer dispatches on **trigger characters**. Features register lex
//! functions for the characters that can start their syntax; every other
//! run of characters becomes plain text.
//!
//! ```text
//! "a **b**" → [Text("a "), Star(2), Text("b"), Star(2)]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser dispatches on **tokens**. Features register [`ParseRule`]s;
//! each one checks whether a token starts its construct and then consumes
//! as much of the stream as that construct covers. Constructs that need a
//! closer probe for it with [`Parser::parse_until`] and fall back to plain
//! text when it is missing. Malformed markup never fails, it just stays
//! literal.
//!
//! ### 3. Compilers ([`compiler`] module)
//!
//! The finished tree is walked once against a [`Compiler`], a stateful
//! visitor receiving text, style push/pop, block quote, list item, image and
//! horizontal rule events. Each backend produces its own output type through
//! [`MarkdownCompiler::compile`].
//!
//! ### Features ([`feature`] module)
//!
//! A [`MarkdownFeature`] bundles the lex functions and parse rules of one
//! construct, plus a check of which compilers it can drive.
//!
//! ## Ordering
//!
//! The two dispatch tables resolve conflicts in opposite directions:
//!
//! | table  | same trigger registered twice |
//! |--------|-------------------------------|
//! | lexer  | **last** registered is tried first |
//! | parser | **first** registered wins     |
//!
//! ## Module Structure
//!
//! ```text
//! markdown-weave-syntax/
//! ├── lib.rs        # This file - public API and integration tests
//! ├── as_any.rs     # Downcasting support for trait objects
//! ├── cursor.rs     # StringCursor and SequenceCursor
//! ├── token.rs      # Token trait, TextToken, NewlineToken
//! ├── lexer.rs      # Trigger-dispatch lexer, TokenBuffer, TokenRegistrar
//! ├── style.rs      # Style, Color, NamedColor palette
//! ├── compiler.rs   # Compiler and MarkdownCompiler traits
//! ├── feature.rs    # MarkdownFeature trait
//! └── parser/
//!     ├── mod.rs    # Parser, ParseRule, NodeRegistrar, TokenCursor
//!     └── node.rs   # Node, Element and the core elements
//! ```

pub mod as_any;
pub mod compiler;
pub mod cursor;
pub mod feature;
pub mod lexer;
pub mod parser;
pub mod style;
pub mod token;

#[cfg(test)]
mod test_support;

pub use compiler::{Compiler, MarkdownCompiler};
pub use cursor::{SequenceCursor, StringCursor};
pub use feature::MarkdownFeature;
pub use lexer::{LexFunction, Lexer, TokenBuffer, TokenRegistrar, lex_fn, lex_from_char};
pub use parser::{Element, Node, NodeRegistrar, ParseRule, Parser, TokenCursor};
pub use style::{Color, NamedColor, Style};
pub use token::{NewlineToken, TextToken, Token};
