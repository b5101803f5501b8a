use time::format_description::well_known::Rfc3339;

use crate::article::ExtractedArticle;
use crate::blocks::ContentBlock;
use crate::{GleanError, Result};

/// Configuration for Markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownConfig {
    /// Include TOML frontmatter with metadata
    pub include_frontmatter: bool,
    /// Include title as H1 heading at the start of content
    pub include_title_heading: bool,
    /// Append the article images after the content
    pub include_images: bool,
}

/// Render an article's blocks as Markdown with optional frontmatter
pub fn convert_to_markdown(article: &ExtractedArticle, config: &MarkdownConfig) -> Result<String> {
    let mut output = String::new();

    if config.include_frontmatter {
        output.push_str(&generate_frontmatter(article)?);
        output.push('\n');
    }

    if config.include_title_heading && !article.title.is_empty() {
        output.push_str(&format!("# {}\n\n", article.title));
    }

    let body: Vec<String> = article.content.iter().map(block_to_markdown).collect();
    output.push_str(&body.join("\n\n"));

    if config.include_images && !article.images.is_empty() {
        output.push_str("\n\n");
        let images: Vec<String> = article
            .images
            .iter()
            .map(|image| format!("![{}]({})", image.alt.as_deref().unwrap_or_default(), image.url))
            .collect();
        output.push_str(&images.join("\n"));
    }

    output.push('\n');
    Ok(output)
}

fn block_to_markdown(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Heading { level, text } => format!("{} {}", "#".repeat(usize::from(*level)), text),
        ContentBlock::Paragraph { text } => text.clone(),
        ContentBlock::List { ordered, items } => items
            .iter()
            .enumerate()
            .map(|(i, item)| if *ordered { format!("{}. {}", i + 1, item) } else { format!("- {}", item) })
            .collect::<Vec<_>>()
            .join("\n"),
        ContentBlock::Quote { text } => text.lines().map(|line| format!("> {}", line.trim())).collect::<Vec<_>>().join("\n"),
    }
}

/// Generate TOML frontmatter from article metadata
fn generate_frontmatter(article: &ExtractedArticle) -> Result<String> {
    let mut frontmatter = String::from("+++");

    frontmatter.push_str(&format!("\ntitle = {}", toml_escape_string(&article.title)));

    if let Some(author) = &article.author {
        frontmatter.push_str(&format!("\nauthor = {}", toml_escape_string(author)));
    }

    if let Some(date) = &article.published_date {
        let formatted = date.format(&Rfc3339).map_err(|e| GleanError::Serialization(e.to_string()))?;
        frontmatter.push_str(&format!("\ndate = {}", formatted));
    }

    if let Some(summary) = &article.summary {
        frontmatter.push_str(&format!("\nsummary = {}", toml_escape_string(summary)));
    }

    frontmatter.push_str(&format!("\nsource_url = {}", toml_escape_string(&article.source_url)));
    frontmatter.push_str(&format!("\nword_count = {}", article.word_count()));
    frontmatter.push_str("\n+++\n");

    Ok(frontmatter)
}

/// Escape a string as a TOML basic string, quotes included
fn toml_escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('"');
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

/// Markdown formatter with configurable options
pub struct MarkdownFormatter {
    config: MarkdownConfig,
}

impl MarkdownFormatter {
    pub fn new(config: MarkdownConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, article: &ExtractedArticle) -> Result<String> {
        convert_to_markdown(article, &self.config)
    }
}
