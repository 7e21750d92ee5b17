use std::sync::Arc;

use markdown_weave_syntax::MarkdownFeature;

use crate::MarkdownProcessor;
use crate::compilers::TraceCompiler;

/// Process `input` with `features` and return the trace event lines.
pub(crate) fn trace(features: Vec<Arc<dyn MarkdownFeature>>, input: &str) -> Vec<String> {
    MarkdownProcessor::new(TraceCompiler::new, features)
        .expect("features support the trace compiler")
        .process(input)
        .iter()
        .map(ToString::to_string)
        .collect()
}
