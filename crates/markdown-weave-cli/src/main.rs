use anyhow::{Context, Result, bail};
use crossterm::{
    queue,
    style::{Attribute, Color as TermColor, ContentStyle, PrintStyledContent, StyledContent},
};
use markdown_weave_config::{Config, FeatureKind, Preset};
use markdown_weave_engine::{
    MarkdownProcessor, StyledText, TextCompiler,
    features::{
        BasicFormattingFeature, ImageFeature, KeyBinding, KeybindFeature, rich_text_features,
        text_features,
    },
};
use markdown_weave_syntax::{MarkdownFeature, Style};
use std::{
    collections::BTreeMap,
    env,
    io::{self, IsTerminal, Read, Write},
    path::PathBuf,
    process,
    sync::Arc,
};

const USAGE: &str = "[--plain] [--width <columns>] [--config <path>] [file]";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    plain: bool,
    width: Option<usize>,
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--plain" => parsed.plain = true,
            "--width" => {
                let value = args.next().context("--width needs a value")?;
                let width = value
                    .parse()
                    .with_context(|| format!("Invalid width '{value}'"))?;
                parsed.width = Some(width);
            }
            "--config" => {
                let value = args.next().context("--config needs a path")?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            flag if flag.starts_with("--") => bail!("Unknown option '{flag}'"),
            _ => {
                if parsed.input.is_some() {
                    bail!("Only one input file can be given");
                }
                parsed.input = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(parsed)
}

fn load_config(config_path: Option<&PathBuf>) -> Result<Config> {
    let Some(config_path) = config_path else {
        return Ok(Config::load()?.unwrap_or_default());
    };

    let config_path = Config::expand_path(config_path)
        .with_context(|| format!("Cannot expand config path '{}'", config_path.display()))?;
    match Config::load_from_path(&config_path)? {
        Some(config) => Ok(config),
        None => bail!("No config file at {}", config_path.display()),
    }
}

fn features_for(config: &Config) -> Vec<Arc<dyn MarkdownFeature>> {
    let mut features: Vec<Arc<dyn MarkdownFeature>> = Vec::new();

    // The first configuration of a feature wins, so the rule-less variant
    // has to come before the preset.
    if !config.horizontal_rules {
        features.push(Arc::new(BasicFormattingFeature::without_horizontal_rules()));
    }

    features.extend(match config.preset {
        Preset::Text => text_features(),
        Preset::RichText => rich_text_features(),
    });

    if config.has_feature(FeatureKind::Images) {
        features.push(Arc::new(ImageFeature));
    }
    if config.has_feature(FeatureKind::Keybindings) {
        let bindings: BTreeMap<String, KeyBinding> = config
            .keybindings
            .iter()
            .map(|(key, binding)| {
                let binding = KeyBinding {
                    category: binding.category.clone(),
                    name: binding.name.clone(),
                    bound_key: binding.bound_key.clone(),
                };
                (key.clone(), binding)
            })
            .collect();
        features.push(Arc::new(KeybindFeature::new(bindings)));
    }

    features
}

fn build_processor(config: &Config) -> Result<MarkdownProcessor<TextCompiler>> {
    let width = config.output_width;
    let processor = MarkdownProcessor::new(
        move || TextCompiler::with_width(width),
        features_for(config),
    )?;
    log::debug!("Processor ready: {processor:?}");
    Ok(processor)
}

fn term_color(rgb: u32) -> TermColor {
    TermColor::Rgb {
        r: (rgb >> 16) as u8,
        g: (rgb >> 8) as u8,
        b: rgb as u8,
    }
}

fn content_style(style: &Style) -> ContentStyle {
    let mut content_style = ContentStyle::new();
    if style.is_bold() {
        content_style.attributes.set(Attribute::Bold);
    }
    if style.is_italic() {
        content_style.attributes.set(Attribute::Italic);
    }
    if style.is_underline() {
        content_style.attributes.set(Attribute::Underlined);
    }
    if style.is_strikethrough() {
        content_style.attributes.set(Attribute::CrossedOut);
    }
    content_style.foreground_color = style.color.map(|color| term_color(color.rgb()));
    content_style
}

fn write_styled(out: &mut impl Write, text: &StyledText) -> io::Result<()> {
    for span in text.spans() {
        let content = StyledContent::new(content_style(&span.style), span.text.as_str());
        queue!(out, PrintStyledContent(content))?;
    }
    writeln!(out)?;
    out.flush()
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    let mut content = String::new();
    match input {
        Some(path) => {
            let path = Config::expand_path(path).unwrap_or_else(|| path.clone());
            content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read standard input")?;
        }
    }
    Ok(content)
}

fn run(args: Args) -> Result<()> {
    let mut config = load_config(args.config_path.as_ref())?;
    if let Some(width) = args.width {
        config.output_width = width;
    }

    let processor = build_processor(&config)?;
    let input = read_input(args.input.as_ref())?;
    let text = processor.process(&input);

    let mut stdout = io::stdout().lock();
    if args.plain || !stdout.is_terminal() {
        writeln!(stdout, "{}", text.plain())?;
    } else {
        write_styled(&mut stdout, &text)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "markdown-weave".to_owned());

    let args = match parse_args(args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {program} {USAGE}");
            process::exit(1);
        }
    };

    run(args)
}
