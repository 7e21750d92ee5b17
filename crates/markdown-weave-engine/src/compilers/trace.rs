//! A compiler that records every visit event.
//!
//! Style pushes are recorded with the composed style they produce, so a
//! trace shows what a run of text would actually look like. Each event
//! renders as one line:
//!
//! ```text
//! style bold
//! text "bold"
//! end_style
//! ```

use std::fmt;

use markdown_weave_syntax::{Compiler, MarkdownCompiler, Style};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileEvent {
    Text(String),
    /// A style push, carrying the style active after it.
    Style(Style),
    StyleEnd,
    BlockQuote,
    BlockQuoteEnd,
    HorizontalRule,
    Image {
        image: String,
        description: String,
        fit: bool,
    },
    ListItem(Option<u32>),
    ListItemEnd,
}

struct StyleSummary<'a>(&'a Style);

impl fmt::Display for StyleSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.0;
        let mut parts = Vec::new();
        if style.is_bold() {
            parts.push("bold".to_owned());
        }
        if style.is_italic() {
            parts.push("italic".to_owned());
        }
        if style.is_underline() {
            parts.push("underline".to_owned());
        }
        if style.is_strikethrough() {
            parts.push("strikethrough".to_owned());
        }
        if let Some(color) = style.color {
            parts.push(format!("color={color}"));
        }
        if let Some(link) = &style.link {
            parts.push(format!("link={link:?}"));
        }
        if let Some(tooltip) = &style.tooltip {
            parts.push(format!("tooltip={tooltip:?}"));
        }

        if parts.is_empty() {
            f.write_str("plain")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

impl fmt::Display for CompileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileEvent::Text(text) => write!(f, "text {text:?}"),
            CompileEvent::Style(style) => write!(f, "style {}", StyleSummary(style)),
            CompileEvent::StyleEnd => f.write_str("end_style"),
            CompileEvent::BlockQuote => f.write_str("quote"),
            CompileEvent::BlockQuoteEnd => f.write_str("end_quote"),
            CompileEvent::HorizontalRule => f.write_str("rule"),
            CompileEvent::Image {
                image,
                description,
                fit,
            } => {
                write!(f, "image {image} {description:?}")?;
                if *fit {
                    f.write_str(" fit")?;
                }
                Ok(())
            }
            CompileEvent::ListItem(Some(ordinal)) => write!(f, "item {ordinal}"),
            CompileEvent::ListItem(None) => f.write_str("item"),
            CompileEvent::ListItemEnd => f.write_str("end_item"),
        }
    }
}

#[derive(Debug)]
pub struct TraceCompiler {
    events: Vec<CompileEvent>,
    styles: Vec<Style>,
}

impl Default for TraceCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceCompiler {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            styles: vec![Style::EMPTY],
        }
    }
}

impl Compiler for TraceCompiler {
    fn name(&self) -> &str {
        "weave_trace"
    }

    fn visit_text(&mut self, text: &str) {
        self.events.push(CompileEvent::Text(text.to_owned()));
    }

    fn visit_style(&mut self, style: &dyn Fn(Style) -> Style) {
        let current = self.styles[self.styles.len() - 1].clone();
        let next = style(current);
        self.events.push(CompileEvent::Style(next.clone()));
        self.styles.push(next);
    }

    fn visit_style_end(&mut self) {
        assert!(self.styles.len() > 1, "popped a style that was never pushed");
        self.styles.pop();
        self.events.push(CompileEvent::StyleEnd);
    }

    fn visit_block_quote(&mut self) {
        self.events.push(CompileEvent::BlockQuote);
    }

    fn visit_block_quote_end(&mut self) {
        self.events.push(CompileEvent::BlockQuoteEnd);
    }

    fn visit_horizontal_rule(&mut self) {
        self.events.push(CompileEvent::HorizontalRule);
    }

    fn visit_image(&mut self, image: &str, description: &str, fit: bool) {
        self.events.push(CompileEvent::Image {
            image: image.to_owned(),
            description: description.to_owned(),
            fit,
        });
    }

    fn visit_list_item(&mut self, ordinal: Option<u32>) {
        self.events.push(CompileEvent::ListItem(ordinal));
    }

    fn visit_list_item_end(&mut self) {
        self.events.push(CompileEvent::ListItemEnd);
    }
}

impl MarkdownCompiler for TraceCompiler {
    type Output = Vec<CompileEvent>;

    fn compile(self) -> Self::Output {
        assert_eq!(
            self.styles.len(),
            1,
            "unbalanced style stack: {} styles still pushed",
            self.styles.len() - 1
        );
        self.events
    }
}
