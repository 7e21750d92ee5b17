//! Compiles a document into a single block of [`StyledText`], laid out for
//! a fixed-width output such as a terminal.

use markdown_weave_syntax::{Compiler, MarkdownCompiler, NamedColor, Style};

use super::styled_text::{StyledText, TextBuilder};

pub const DEFAULT_OUTPUT_WIDTH: usize = 50;

#[derive(Debug)]
pub struct TextCompiler {
    builder: TextBuilder,
    output_width: usize,
    quote_depth: usize,
    list_depth: usize,
}

impl Default for TextCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCompiler {
    pub fn new() -> Self {
        Self::with_width(DEFAULT_OUTPUT_WIDTH)
    }

    /// A compiler assuming output `output_width` columns wide, which is
    /// how long horizontal rules are drawn.
    pub fn with_width(output_width: usize) -> Self {
        Self {
            builder: TextBuilder::new(),
            output_width,
            quote_depth: 0,
            list_depth: 0,
        }
    }

    fn quote_marker(&mut self) {
        let marker = format!("\n >{} ", ">".repeat(self.quote_depth));
        self.builder
            .append(&marker, Style::EMPTY.with_color(NamedColor::DarkGray));
    }

    fn list_indent(&self) -> String {
        "  ".repeat(self.list_depth.saturating_sub(1))
    }
}

/// Splits on line breaks, dropping trailing empty lines.
fn lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

impl Compiler for TextCompiler {
    fn name(&self) -> &str {
        "weave_text"
    }

    fn visit_text(&mut self, text: &str) {
        if self.quote_depth != 0 && text.contains('\n') {
            if text == "\n" {
                self.quote_marker();
            } else {
                for line in lines(text) {
                    self.quote_marker();
                    self.builder.append_plain(line);
                }
            }
        } else if self.list_depth != 0 && text.contains('\n') {
            let indent = self.list_indent();
            if text == "\n" {
                self.builder.append_plain(&format!("\n   {indent}"));
            } else {
                for (i, line) in lines(text).into_iter().enumerate() {
                    let prefix = if i > 0 { "\n   " } else { "   " };
                    self.builder.append_plain(&format!("{prefix}{indent}{line}"));
                }
            }
        } else {
            self.builder.append_plain(text);
        }
    }

    fn visit_style(&mut self, style: &dyn Fn(Style) -> Style) {
        self.builder.push_style(style);
    }

    fn visit_style_end(&mut self) {
        self.builder.pop_style();
    }

    fn visit_block_quote(&mut self) {
        self.quote_depth += 1;
        self.quote_marker();
        self.builder
            .push_style(&|style| style.with_color(NamedColor::Gray).with_italic(true));
    }

    fn visit_block_quote_end(&mut self) {
        self.builder.pop_style();
        self.quote_depth = self.quote_depth.saturating_sub(1);

        if self.quote_depth > 0 {
            self.quote_marker();
        } else {
            self.builder.append_plain("\n");
        }
    }

    fn visit_horizontal_rule(&mut self) {
        self.builder.append(
            &"-".repeat(self.output_width),
            Style::EMPTY.with_color(NamedColor::DarkGray),
        );
    }

    fn visit_image(&mut self, _image: &str, description: &str, _fit: bool) {
        self.builder.append(
            &format!("[{description}]"),
            Style::EMPTY.with_color(NamedColor::Yellow),
        );
    }

    fn visit_list_item(&mut self, ordinal: Option<u32>) {
        let prefix = match ordinal {
            Some(ordinal) => format!(" {ordinal}. "),
            None => " • ".to_owned(),
        };

        if self.list_depth > 0 {
            let indent = "   ".repeat(self.list_depth);
            self.builder.append_plain(&format!("\n{indent}{prefix}"));
        } else {
            self.builder.append_plain(&prefix);
        }

        self.list_depth += 1;
    }

    fn visit_list_item_end(&mut self) {
        self.list_depth = self.list_depth.saturating_sub(1);

        if self.list_depth > 0 {
            self.builder.append_plain(&"   ".repeat(self.list_depth));
        } else {
            self.builder.append_plain("\n");
        }
    }
}

impl MarkdownCompiler for TextCompiler {
    type Output = StyledText;

    fn compile(self) -> Self::Output {
        self.builder.finish()
    }
}
