//! Built-in grammar features.
//!
//! | feature | syntax | compilers |
//! |---|---|---|
//! | [`BasicFormattingFeature`] | `*italic*`, `**bold**`, `~~strike~~`, `__underline__`, `---` | all |
//! | [`ColorFeature`] | `{gold}text{}`, `{#RRGGBB}text{}` | all |
//! | [`LinkFeature`] | `[text](url)` | all |
//! | [`ListFeature`] | `- item`, `1. item` | all |
//! | [`BlockQuoteFeature`] | `> quote` | all |
//! | [`ImageFeature`] | `![alt](namespace:path,fit)` | all |
//! | [`KeybindFeature`] | `<keybind;translation.key>` | all |
//! | [`TemplateFeature`] | `<\|name@source\|k=v\|>` | [`BlockCompiler`](crate::compilers::BlockCompiler) |

mod block_quote;
mod color;
mod formatting;
mod image;
mod keybind;
mod link;
mod list;
mod template;

use std::sync::Arc;

pub use block_quote::BlockQuoteFeature;
pub use color::ColorFeature;
pub use formatting::BasicFormattingFeature;
pub use image::ImageFeature;
pub use keybind::{KeyBinding, KeyBindingLookup, KeybindFeature};
pub use link::LinkFeature;
pub use list::ListFeature;
pub use template::{TemplateError, TemplateFeature, TemplateProvider, parse_template_params};

use markdown_weave_syntax::{MarkdownFeature, StringCursor};

/// Emphasis, strike/underline and colors, without horizontal rules.
pub fn text_features() -> Vec<Arc<dyn MarkdownFeature>> {
    vec![
        Arc::new(BasicFormattingFeature::without_horizontal_rules()),
        Arc::new(ColorFeature),
    ]
}

/// Everything in [`text_features`] plus horizontal rules, links, lists and
/// block quotes.
pub fn rich_text_features() -> Vec<Arc<dyn MarkdownFeature>> {
    vec![
        Arc::new(BasicFormattingFeature::new()),
        Arc::new(ColorFeature),
        Arc::new(LinkFeature),
        Arc::new(ListFeature),
        Arc::new(BlockQuoteFeature),
    ]
}

/// Number of whitespace characters between the last line break (or the
/// start of input) and the cursor, or `None` if anything else is in
/// between.
pub(crate) fn whitespace_since_line_break(cursor: &StringCursor<'_>) -> Option<usize> {
    let mut whitespace = 0;
    for c in cursor.consumed().chars().rev() {
        if c == '\n' {
            return Some(whitespace);
        }
        if !c.is_whitespace() {
            return None;
        }
        whitespace += 1;
    }
    Some(whitespace)
}
