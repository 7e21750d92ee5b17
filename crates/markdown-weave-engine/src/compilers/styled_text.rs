//! Styled text output and the builder compilers accumulate it with.

use std::fmt;

use markdown_weave_syntax::Style;

/// A run of text with one resolved style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// An ordered list of styled spans. Neighbouring spans always differ in
/// style; pushing text in the style of the last span extends it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }

        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.spans.push(Span {
                text: text.to_owned(),
                style,
            }),
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The text with all styling dropped.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

/// Accumulates [`StyledText`] under a stack of styles.
///
/// The stack starts out with one empty style that can never be popped.
/// Every style pushed is derived from the one on top of the stack.
#[derive(Debug)]
pub struct TextBuilder {
    styles: Vec<Style>,
    text: StyledText,
}

impl Default for TextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuilder {
    pub fn new() -> Self {
        Self {
            styles: vec![Style::EMPTY],
            text: StyledText::new(),
        }
    }

    fn current(&self) -> &Style {
        // the root style is never popped
        &self.styles[self.styles.len() - 1]
    }

    /// Append `text` in `style`, with anything `style` leaves unset taken
    /// from the active style.
    pub fn append(&mut self, text: &str, style: Style) {
        let resolved = style.with_parent(self.current());
        self.text.push(text, resolved);
    }

    pub fn append_plain(&mut self, text: &str) {
        self.append(text, Style::EMPTY);
    }

    pub fn push_style(&mut self, style: &dyn Fn(Style) -> Style) {
        let next = style(self.current().clone());
        self.styles.push(next);
    }

    /// # Panics
    ///
    /// Panics if only the root style is left.
    pub fn pop_style(&mut self) {
        assert!(self.styles.len() > 1, "popped a style that was never pushed");
        self.styles.pop();
    }

    /// Number of styles pushed on top of the root style.
    pub fn depth(&self) -> usize {
        self.styles.len() - 1
    }

    /// Returns true if nothing was appended since creation or the last
    /// [`take`](Self::take).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Take the text built so far, leaving the style stack untouched. A
    /// result that is just one line break is turned into a single space.
    pub fn take(&mut self) -> StyledText {
        let mut text = std::mem::take(&mut self.text);
        if let [span] = text.spans.as_mut_slice() {
            if span.text == "\n" {
                span.text = " ".to_owned();
            }
        }
        text
    }

    /// Take the final text.
    ///
    /// # Panics
    ///
    /// Panics if styles are still pushed.
    pub fn finish(mut self) -> StyledText {
        assert_eq!(
            self.depth(),
            0,
            "unbalanced style stack: {} styles still pushed",
            self.depth()
        );
        self.take()
    }
}
