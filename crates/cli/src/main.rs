mod echo;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use gleaner_core::{
    BlockOrder, ExtractedArticle, JsonConfig, MarkdownConfig, ScrapeConfig, Scraper, TextConfig, convert_to_json,
    convert_to_markdown, convert_to_text, fetch_file, fetch_stdin, fetch_url, validate_url,
};
use owo_colors::OwoColorize;
use url::Url;

use echo::*;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the scraped article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Markdown,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, markdown, text", s)),
        }
    }
}

/// Order of content blocks in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OrderArg(BlockOrder);

impl FromStr for OrderArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "document" => Ok(Self(BlockOrder::Document)),
            "grouped" => Ok(Self(BlockOrder::GroupedByKind)),
            _ => Err(format!("Invalid order: {}. Valid options: document, grouped", s)),
        }
    }
}

/// Scrape a web article into structured content blocks and metadata
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "Scrape web articles into structured content", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (json, markdown, text)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Include TOML frontmatter (Markdown only)
    #[arg(long)]
    frontmatter: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Block order (document, grouped)
    #[arg(long, default_value = "document", value_name = "ORDER")]
    order: OrderArg,

    /// Also collect <img> tags from the content region
    #[arg(long)]
    inline_images: bool,

    /// Source URL to record for file or stdin input
    #[arg(long, value_name = "URL")]
    source_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn scrape_config(&self) -> ScrapeConfig {
        let mut builder = ScrapeConfig::builder()
            .timeout(self.timeout)
            .order(self.order.0)
            .collect_inline_images(self.inline_images);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder.build()
    }

    fn is_url(&self) -> bool {
        self.input.starts_with("http://") || self.input.starts_with("https://")
    }
}

/// Source URL recorded for a local file: `file://` URL of its absolute path
fn file_source_url(path: &str) -> String {
    fs::canonicalize(Path::new(path))
        .ok()
        .and_then(|absolute| Url::from_file_path(absolute).ok())
        .map(String::from)
        .unwrap_or_else(|| path.to_string())
}

fn render(article: &ExtractedArticle, args: &Args) -> anyhow::Result<String> {
    let output = match args.format {
        OutputFormat::Json => {
            let mut json = convert_to_json(article, &JsonConfig { envelope: false, pretty: args.pretty })
                .context("Failed to convert to JSON")?;
            json.push('\n');
            json
        }
        OutputFormat::Markdown => {
            let config = MarkdownConfig {
                include_frontmatter: args.frontmatter,
                include_title_heading: false,
                include_images: false,
            };
            convert_to_markdown(article, &config).context("Failed to convert to Markdown")?
        }
        OutputFormat::Text => {
            let mut text = convert_to_text(article, &TextConfig { include_header: true, line_width: 0 })
                .context("Failed to convert to text")?;
            text.push('\n');
            text
        }
    };
    Ok(output)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut timings: Vec<(&str, Duration)> = Vec::new();

    if args.verbose {
        print_banner();
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("gleaner_core=debug"))
            .with_writer(std::io::stderr)
            .init();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let scraper = Scraper::with_config(args.scrape_config());
    let step = Instant::now();

    let (html, source_url) = if args.input == "-" {
        if args.verbose {
            print_step(1, 3, "Reading from stdin");
        }
        let html = fetch_stdin().context("Failed to read from stdin")?;
        (html, args.source_url.clone().unwrap_or_default())
    } else if args.is_url() {
        if args.verbose {
            print_step(1, 3, &format!("Fetching from {}", args.input.bright_white().underline()));
        }
        let url = validate_url(&args.input).with_context(|| format!("Invalid URL: {}", args.input))?;
        let html = fetch_url(url.as_str(), &scraper.config().fetch)
            .await
            .with_context(|| format!("Failed to scrape {}", args.input))?;
        (html, args.input.trim().to_string())
    } else {
        if args.verbose {
            print_step(1, 3, &format!("Reading from file {}", args.input.bright_white()));
        }
        let html = fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
        let source_url = args.source_url.clone().unwrap_or_else(|| file_source_url(&args.input));
        (html, source_url)
    };
    timings.push(("Read", step.elapsed()));

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), format_size(html.len()).bright_white());
        eprintln!();
        print_step(2, 3, "Extracting article");
    }

    let step = Instant::now();
    let article = scraper.extract(&html, &source_url);
    timings.push(("Extract", step.elapsed()));

    if args.verbose {
        print_article_details(&article);
    }
    if article.content.is_empty() {
        print_warning("No content blocks were found");
    }

    if args.verbose {
        print_step(3, 3, "Writing output");
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!();
    }

    let step = Instant::now();
    let output = render(&article, &args)?;

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }
    timings.push(("Write", step.elapsed()));

    if args.verbose {
        print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
