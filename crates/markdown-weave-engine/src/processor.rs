//! Processor assembly.
//!
//! A [`MarkdownProcessor`] owns a compiler factory, the installed features
//! and the lexer and parser they were registered into. Assembly is the only
//! place features are checked against the compiler; once built, a processor
//! is immutable and can serve any number of documents, from any number of
//! threads.
//!
//! ```text
//! process(input) → Lexer::lex → Parser::parse → Node::visit(fresh compiler) → compile()
//! ```

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use markdown_weave_syntax::{Lexer, MarkdownCompiler, MarkdownFeature, Parser};

use crate::compilers::{BlockCompiler, TextCompiler};
use crate::error::ProcessorError;
use crate::features::{ImageFeature, rich_text_features, text_features};

type CompilerFactory<C> = Arc<dyn Fn() -> C + Send + Sync>;

pub struct MarkdownProcessor<C: MarkdownCompiler> {
    compiler_factory: CompilerFactory<C>,
    features: Vec<Arc<dyn MarkdownFeature>>,
    lexer: Lexer,
    parser: Parser,
}

impl<C: MarkdownCompiler> fmt::Debug for MarkdownProcessor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let features: Vec<&str> = self.features.iter().map(|feature| feature.name()).collect();
        f.debug_struct("MarkdownProcessor")
            .field("features", &features)
            .field("lexer", &self.lexer)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

fn feature_type(feature: &dyn MarkdownFeature) -> TypeId {
    feature.as_any().type_id()
}

impl<C: MarkdownCompiler> MarkdownProcessor<C> {
    /// Assemble a processor from a compiler factory and features, in
    /// installation order. A feature type listed more than once is only
    /// installed the first time.
    ///
    /// Fails if any feature does not support the compiler `compiler_factory`
    /// builds.
    pub fn new(
        compiler_factory: impl Fn() -> C + Send + Sync + 'static,
        features: impl IntoIterator<Item = Arc<dyn MarkdownFeature>>,
    ) -> Result<Self, ProcessorError> {
        Self::assemble(Arc::new(compiler_factory), features)
    }

    fn assemble(
        compiler_factory: CompilerFactory<C>,
        features: impl IntoIterator<Item = Arc<dyn MarkdownFeature>>,
    ) -> Result<Self, ProcessorError> {
        let mut installed: Vec<Arc<dyn MarkdownFeature>> = Vec::new();
        for feature in features {
            let id = feature_type(&*feature);
            if installed.iter().any(|existing| feature_type(&**existing) == id) {
                log::debug!("skipping duplicate feature '{}'", feature.name());
                continue;
            }
            installed.push(feature);
        }

        let probe = compiler_factory();
        if let Some(feature) = installed
            .iter()
            .find(|feature| !feature.supports_compiler(&probe))
        {
            return Err(ProcessorError::IncompatibleFeature {
                feature: feature.name().to_owned(),
                compiler: probe.name().to_owned(),
            });
        }

        let mut lexer = Lexer::new();
        let mut parser = Parser::new();
        for feature in &installed {
            feature.register_tokens(&mut lexer);
            feature.register_nodes(&mut parser);
        }

        log::debug!(
            "assembled processor for '{}' with features [{}]",
            probe.name(),
            installed
                .iter()
                .map(|feature| feature.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            compiler_factory,
            features: installed,
            lexer,
            parser,
        })
    }

    /// Lex, parse and compile `input` with a fresh compiler.
    pub fn process(&self, input: &str) -> C::Output {
        let tokens = self.lexer.lex(input);
        let document = self.parser.parse(&tokens);

        let mut compiler = (self.compiler_factory)();
        document.visit(&mut compiler);

        log::trace!(
            "processed {} bytes: {} tokens, {} nodes",
            input.len(),
            tokens.len(),
            document.node_count()
        );
        compiler.compile()
    }

    pub fn installed_features(&self) -> &[Arc<dyn MarkdownFeature>] {
        &self.features
    }

    pub fn has_feature<F: MarkdownFeature>(&self) -> bool {
        self.features.iter().any(|feature| (**feature).is::<F>())
    }

    /// A new processor with `features` installed after the current ones.
    /// Feature types that are already installed are skipped.
    pub fn copy_with(
        &self,
        features: impl IntoIterator<Item = Arc<dyn MarkdownFeature>>,
    ) -> Result<Self, ProcessorError> {
        Self::assemble(
            Arc::clone(&self.compiler_factory),
            self.features.iter().cloned().chain(features),
        )
    }

    /// A new processor with the same features driving a different compiler.
    pub fn with_compiler<C2: MarkdownCompiler>(
        &self,
        compiler_factory: impl Fn() -> C2 + Send + Sync + 'static,
    ) -> Result<MarkdownProcessor<C2>, ProcessorError> {
        MarkdownProcessor::new(compiler_factory, self.features.iter().cloned())
    }
}

impl MarkdownProcessor<TextCompiler> {
    /// Inline formatting and colors, compiled to styled text.
    pub fn text() -> Result<Self, ProcessorError> {
        Self::new(TextCompiler::new, text_features())
    }

    /// The full text feature set: inline formatting, colors, horizontal
    /// rules, links, lists and block quotes, laid out `output_width` columns
    /// wide.
    pub fn rich_text(output_width: usize) -> Result<Self, ProcessorError> {
        Self::new(
            move || TextCompiler::with_width(output_width),
            rich_text_features(),
        )
    }
}

impl MarkdownProcessor<BlockCompiler> {
    /// The rich text feature set plus images, compiled to blocks.
    pub fn blocks() -> Result<Self, ProcessorError> {
        let mut features = rich_text_features();
        features.push(Arc::new(ImageFeature));
        Self::new(BlockCompiler::new, features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compilers::{Block, CompileEvent, TraceCompiler};
    use crate::features::{
        BasicFormattingFeature, BlockQuoteFeature, ColorFeature, LinkFeature, ListFeature,
        TemplateError, TemplateFeature, TemplateProvider,
    };
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    struct NoTemplates;

    impl TemplateProvider for NoTemplates {
        fn has_source(&self, _source: &str) -> bool {
            false
        }

        fn expand(
            &self,
            source: &str,
            _template: &str,
            _params: &BTreeMap<String, String>,
        ) -> Result<Block, TemplateError> {
            Err(TemplateError::UnknownSource {
                location: source.to_owned(),
            })
        }
    }

    fn names<C: MarkdownCompiler>(processor: &MarkdownProcessor<C>) -> Vec<String> {
        processor
            .installed_features()
            .iter()
            .map(|feature| feature.name().to_owned())
            .collect()
    }

    fn trace_lines(events: Vec<CompileEvent>) -> Vec<String> {
        events.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn duplicate_feature_types_are_installed_once() {
        let processor = MarkdownProcessor::new(
            TraceCompiler::new,
            vec![
                Arc::new(ColorFeature) as Arc<dyn MarkdownFeature>,
                Arc::new(LinkFeature),
                Arc::new(ColorFeature),
            ],
        )
        .expect("processor");

        assert_eq!(names(&processor), vec!["colors", "links"]);
    }

    #[test]
    fn first_configuration_of_a_feature_type_wins() {
        let processor = MarkdownProcessor::new(
            TraceCompiler::new,
            vec![
                Arc::new(BasicFormattingFeature::without_horizontal_rules())
                    as Arc<dyn MarkdownFeature>,
                Arc::new(BasicFormattingFeature::new()),
            ],
        )
        .expect("processor");

        let installed = processor.installed_features()[0]
            .as_ref()
            .downcast_ref::<BasicFormattingFeature>()
            .map(BasicFormattingFeature::horizontal_rules);
        assert_eq!(installed, Some(false));
    }

    #[test]
    fn incompatible_feature_fails_assembly() {
        let error = MarkdownProcessor::new(
            TraceCompiler::new,
            vec![Arc::new(TemplateFeature::new(NoTemplates)) as Arc<dyn MarkdownFeature>],
        )
        .expect_err("templates need the block compiler");

        assert_eq!(
            error,
            ProcessorError::IncompatibleFeature {
                feature: "templates".to_owned(),
                compiler: "weave_trace".to_owned(),
            }
        );
        assert_eq!(
            error.to_string(),
            "Feature 'templates' is incompatible with compiler 'weave_trace'"
        );
    }

    #[test]
    fn has_feature_checks_type() {
        let processor = MarkdownProcessor::text().expect("text processor");
        assert!(processor.has_feature::<BasicFormattingFeature>());
        assert!(processor.has_feature::<ColorFeature>());
        assert!(!processor.has_feature::<ListFeature>());
    }

    #[test]
    fn copy_with_is_idempotent() {
        let base = MarkdownProcessor::text().expect("text processor");
        let extended = base
            .copy_with(vec![
                Arc::new(ListFeature) as Arc<dyn MarkdownFeature>,
                Arc::new(ColorFeature),
                Arc::new(ListFeature),
            ])
            .expect("extended processor");
        let again = extended
            .copy_with(vec![Arc::new(ListFeature) as Arc<dyn MarkdownFeature>])
            .expect("extended twice");

        assert_eq!(names(&extended), vec!["basic_formatting", "colors", "lists"]);
        assert_eq!(names(&again), names(&extended));
        assert_eq!(names(&base), vec!["basic_formatting", "colors"]);
    }

    #[test]
    fn duplicate_feature_does_not_fire_twice() {
        let processor = MarkdownProcessor::new(
            TraceCompiler::new,
            vec![Arc::new(BlockQuoteFeature) as Arc<dyn MarkdownFeature>],
        )
        .expect("processor")
        .copy_with(vec![Arc::new(BlockQuoteFeature) as Arc<dyn MarkdownFeature>])
        .expect("copy");

        assert_eq!(
            trace_lines(processor.process("> a")),
            vec!["quote", r#"text "a""#, "end_quote"]
        );
    }

    #[test]
    fn with_compiler_keeps_features() {
        let text = MarkdownProcessor::rich_text(10).expect("rich text processor");
        let trace = text.with_compiler(TraceCompiler::new).expect("trace processor");

        assert_eq!(names(&trace), names(&text));
        assert_eq!(
            trace_lines(trace.process("**a**")),
            vec!["style bold", r#"text "a""#, "end_style"]
        );
    }

    #[test]
    fn with_compiler_rechecks_compatibility() {
        let blocks = MarkdownProcessor::blocks()
            .expect("block processor")
            .copy_with(vec![
                Arc::new(TemplateFeature::new(NoTemplates)) as Arc<dyn MarkdownFeature>,
            ])
            .expect("templates on blocks");

        assert!(blocks.with_compiler(TextCompiler::new).is_err());
    }

    #[test]
    fn process_is_repeatable() {
        let processor = MarkdownProcessor::text().expect("text processor");
        let first = processor.process("*a* b");
        let second = processor.process("*a* b");
        assert_eq!(first, second);
        assert_eq!(first.plain(), "a b");
    }

    #[test]
    fn presets_have_expected_features() {
        assert_eq!(
            names(&MarkdownProcessor::text().expect("text")),
            vec!["basic_formatting", "colors"]
        );
        assert_eq!(
            names(&MarkdownProcessor::rich_text(50).expect("rich text")),
            vec!["basic_formatting", "colors", "links", "lists", "block_quotes"]
        );
        assert_eq!(
            names(&MarkdownProcessor::blocks().expect("blocks")),
            vec![
                "basic_formatting",
                "colors",
                "links",
                "lists",
                "block_quotes",
                "images"
            ]
        );
    }

    #[test]
    fn processor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MarkdownProcessor<TextCompiler>>();
        assert_send_sync::<MarkdownProcessor<BlockCompiler>>();

        let processor = Arc::new(MarkdownProcessor::text().expect("text processor"));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let processor = Arc::clone(&processor);
                std::thread::spawn(move || processor.process(&format!("**{i}**")).plain())
            })
            .collect();

        let outputs: Vec<String> = handles
            .into_iter()
            .map(|handle| handle.join().expect("worker thread"))
            .collect();
        assert_eq!(outputs, vec!["0", "1", "2", "3"]);
    }
}
