//! CLI tool for building slide decks from Markdown and HTML reports.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use deck_core::{DeckAssembler, DeckConfig, Document, OutlineFormatter, Policy, Slide, SourceFormat};
use deck_html::HtmlParser;
use deck_markdown::MarkdownParser;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Build slide decks from Markdown or HTML reports.
#[derive(Parser, Debug)]
#[command(name = "deck-build")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input report file(s) (.md or .html)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Build a deck of exactly N slides (default: one group per section)
    #[arg(long, value_name = "N")]
    slides: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Source format (default: detect from extension, then content)
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Bullets per content slide when the length is not fixed
    #[arg(long, value_name = "K")]
    chunk_size: Option<usize>,

    /// Only treat HTML subsection headings with this class as boundaries
    #[arg(long, value_name = "CLASS")]
    major_class: Option<String>,

    /// Deck configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            Self::Json => "deck.json",
            Self::Text => "deck.txt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Markdown,
    Html,
}

impl From<SourceArg> for SourceFormat {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Markdown => SourceFormat::Markdown,
            SourceArg::Html => SourceFormat::Html,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = load_config(args.config.as_deref(), args.chunk_size)?;
    let assembler = DeckAssembler::new(config);
    let policy = match args.slides {
        Some(target) => Policy::Bounded { target },
        None => Policy::Unbounded,
    };

    let failed = process_inputs(&args, &assembler, policy);
    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, args.input.len());
    }
    Ok(())
}

/// Process every input, reporting failures on stderr. Returns the number of
/// files that failed.
fn process_inputs(args: &Args, assembler: &DeckAssembler, policy: Policy) -> usize {
    let mut failed = 0;
    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        let result = process_file(input_path, args, assembler, policy)
            .and_then(|output| emit_output(input_path, args, &output));
        if let Err(e) = result {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
            failed += 1;
        }
    }
    failed
}

/// Print the output or write it next to the input (or under `--output`).
fn emit_output(input_path: &Path, args: &Args, output: &str) -> Result<()> {
    if args.print {
        print!("{}", output);
        return Ok(());
    }

    let output_path = get_output_path(input_path, args.output.as_ref(), args.format)?;
    write_output(&output_path, output)?;
    if args.verbose {
        eprintln!("Written to: {}", output_path.display());
    }
    Ok(())
}

/// Load the deck configuration, applying command-line overrides.
fn load_config(path: Option<&Path>, chunk_size: Option<usize>) -> Result<DeckConfig> {
    let mut config: DeckConfig = match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => DeckConfig::default(),
    };

    if let Some(chunk_size) = chunk_size {
        config = config.with_chunk_size(chunk_size);
    }
    config.validate()?;
    Ok(config)
}

/// Build the deck for a single report file.
fn process_file(
    input_path: &Path,
    args: &Args,
    assembler: &DeckAssembler,
    policy: Policy,
) -> Result<String> {
    let source = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let format: SourceFormat = match args.source {
        Some(arg) => arg.into(),
        None => detect_format(input_path, &source)?,
    };
    let document = parse_document(format, &source, args.major_class.as_deref());

    if args.verbose {
        eprintln!(
            "  Found {} sections ({})",
            document.sections.len(),
            format.as_str()
        );
    }

    let slides = assembler.assemble(&document, policy)?;

    if args.verbose {
        eprintln!("  Built {} slides", slides.len());
    }

    render(&slides, args.format)
}

/// Pick the source format from the file extension, falling back to the
/// content itself.
fn detect_format(input_path: &Path, source: &str) -> Result<SourceFormat> {
    input_path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SourceFormat::from_extension)
        .or_else(|| SourceFormat::from_content(source))
        .ok_or_else(|| {
            deck_core::Error::UnsupportedFormat(format!(
                "could not detect source format of {}",
                input_path.display()
            ))
            .into()
        })
}

fn parse_document(format: SourceFormat, source: &str, major_class: Option<&str>) -> Document {
    match format {
        SourceFormat::Markdown => {
            log::debug!("Parsing as Markdown");
            MarkdownParser::new().parse_str(source)
        }
        SourceFormat::Html => {
            log::debug!("Parsing as HTML");
            let mut parser = HtmlParser::new();
            if let Some(class) = major_class {
                parser = parser.with_major_class(class);
            }
            parser.parse_str(source)
        }
    }
}

fn render(slides: &[Slide], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(slides).context("Failed to serialize deck")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => Ok(OutlineFormatter::new().format_with_newline(slides)),
    }
}

/// Determine the output path for a processed file.
fn get_output_path(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.{}", stem, format.extension());

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => match input_path.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        },
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::SlideKind;
    use std::ffi::OsStr;

    #[test]
    fn test_output_path_next_to_input() {
        let path = get_output_path(Path::new("reports/ai.md"), None, OutputFormat::Json).unwrap();
        assert_eq!(path, PathBuf::from("reports/ai.deck.json"));

        let path = get_output_path(Path::new("ai.html"), None, OutputFormat::Text).unwrap();
        assert_eq!(path, PathBuf::from("ai.deck.txt"));
    }

    #[test]
    fn test_output_path_in_output_dir() {
        let dir = std::env::temp_dir().join("deck-build-output-path-test");
        let path = get_output_path(Path::new("reports/ai.md"), Some(&dir), OutputFormat::Text).unwrap();

        assert_eq!(path, dir.join("ai.deck.txt"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_detect_format_by_extension_then_content() {
        assert_eq!(
            detect_format(Path::new("a.MD"), "<html></html>").unwrap(),
            SourceFormat::Markdown
        );
        assert_eq!(
            detect_format(Path::new("a.htm"), "# title").unwrap(),
            SourceFormat::Html
        );
        assert_eq!(
            detect_format(Path::new("report"), "<!DOCTYPE html><html></html>").unwrap(),
            SourceFormat::Html
        );
        assert_eq!(
            detect_format(Path::new("report.out"), "## Section").unwrap(),
            SourceFormat::Markdown
        );
    }

    #[test]
    fn test_detect_format_fails_on_empty_unknown() {
        assert!(detect_format(Path::new("report.bin"), "   ").is_err());
    }

    #[test]
    fn test_load_config_overrides_chunk_size() {
        let config = load_config(None, Some(3)).unwrap();
        assert_eq!(config.unbounded.chunk_size, 3);
        assert!(load_config(None, Some(0)).is_err());
    }

    #[test]
    fn test_render_formats() {
        let slides = vec![Slide::new(SlideKind::Cover, "Report").with_subtitle("Overview")];

        let json = render(&slides, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["kind"], "cover");
        assert_eq!(parsed[0]["title"], "Report");

        let text = render(&slides, OutputFormat::Text).unwrap();
        assert_eq!(text, "[01] (cover) Report\n    Overview\n");
    }

    #[test]
    fn test_failed_inputs_do_not_stop_the_batch() {
        let dir = std::env::temp_dir().join("deck-build-batch-test");
        std::fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.md");
        std::fs::write(&good, "## One\ntext\n").unwrap();
        let missing = dir.join("missing.md");
        let _ = std::fs::remove_file(&missing);

        let args = Args::parse_from([
            OsStr::new("deck-build"),
            missing.as_os_str(),
            good.as_os_str(),
        ]);
        let failed = process_inputs(&args, &DeckAssembler::default(), Policy::Unbounded);

        assert_eq!(failed, 1);
        assert!(dir.join("good.deck.json").is_file());
    }

    #[test]
    fn test_write_failures_are_counted_per_file() {
        let dir = std::env::temp_dir().join("deck-build-write-failure-test");
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("first.md");
        let second = dir.join("second.md");
        std::fs::write(&first, "## One\ntext\n").unwrap();
        std::fs::write(&second, "## Two\ntext\n").unwrap();

        // A regular file where the output directory should be.
        let blocker = dir.join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let args = Args::parse_from([
            OsStr::new("deck-build"),
            OsStr::new("--output"),
            blocker.as_os_str(),
            first.as_os_str(),
            second.as_os_str(),
        ]);
        let failed = process_inputs(&args, &DeckAssembler::default(), Policy::Unbounded);

        assert_eq!(failed, 2);
    }

    #[test]
    fn test_parse_document_dispatch() {
        let md = parse_document(SourceFormat::Markdown, "## One\ntext\n", None);
        assert_eq!(md.section_titles(), vec!["One"]);

        let html = parse_document(
            SourceFormat::Html,
            "<h2>One</h2><h3>minor</h3><h3 class=\"major\">Two</h3>",
            Some("major"),
        );
        assert_eq!(html.sections[0].subsections.len(), 1);
        assert_eq!(html.sections[0].intro_fragments, vec!["minor"]);
    }
}
