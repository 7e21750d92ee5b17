use crate::compiler::{Compiler, MarkdownCompiler};
use crate::style::Style;

/// Records visit events as short strings.
#[derive(Debug, Default)]
pub struct RecordingCompiler {
    pub events: Vec<String>,
}

fn describe(style: &Style) -> String {
    let mut parts = Vec::new();
    if style.is_bold() {
        parts.push("bold".to_string());
    }
    if style.is_italic() {
        parts.push("italic".to_string());
    }
    if style.is_underline() {
        parts.push("underline".to_string());
    }
    if style.is_strikethrough() {
        parts.push("strikethrough".to_string());
    }
    if let Some(color) = style.color {
        parts.push(color.to_string());
    }
    parts.join(",")
}

impl Compiler for RecordingCompiler {
    fn name(&self) -> &str {
        "recording"
    }

    fn visit_text(&mut self, text: &str) {
        self.events.push(format!("text({text})"));
    }

    fn visit_style(&mut self, style: &dyn Fn(Style) -> Style) {
        self.events.push(format!("style({})", describe(&style(Style::EMPTY))));
    }

    fn visit_style_end(&mut self) {
        self.events.push("style_end".to_string());
    }

    fn visit_block_quote(&mut self) {
        self.events.push("quote".to_string());
    }

    fn visit_block_quote_end(&mut self) {
        self.events.push("quote_end".to_string());
    }

    fn visit_horizontal_rule(&mut self) {
        self.events.push("rule".to_string());
    }

    fn visit_image(&mut self, image: &str, description: &str, fit: bool) {
        self.events.push(format!("image({image},{description},{fit})"));
    }

    fn visit_list_item(&mut self, ordinal: Option<u32>) {
        self.events.push(format!("item({ordinal:?})"));
    }

    fn visit_list_item_end(&mut self) {
        self.events.push("item_end".to_string());
    }
}

impl MarkdownCompiler for RecordingCompiler {
    type Output = Vec<String>;

    fn compile(self) -> Self::Output {
        self.events
    }
}
