use crate::Result;
use crate::article::ExtractedArticle;
use crate::blocks::ContentBlock;

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,

    /// Include title and byline header
    pub include_header: bool,
}

/// Plain text formatter
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, article: &ExtractedArticle) -> Result<String> {
        convert_to_text(article, &self.config)
    }
}

/// Render an article's blocks as plain text, one block per paragraph
pub fn convert_to_text(article: &ExtractedArticle, config: &TextConfig) -> Result<String> {
    let mut output = String::new();

    if config.include_header {
        output.push_str(&generate_header(article));
        output.push_str("\n\n");
    }

    let body: Vec<String> = article
        .content
        .iter()
        .map(|block| {
            let text = block_to_text(block);
            if config.line_width > 0 { wrap_text(&text, config.line_width) } else { text }
        })
        .collect();
    output.push_str(&body.join("\n\n"));

    Ok(output.trim().to_string())
}

fn block_to_text(block: &ContentBlock) -> String {
    match block {
        ContentBlock::List { ordered, items } => items
            .iter()
            .enumerate()
            .map(|(i, item)| if *ordered { format!("{}. {}", i + 1, item) } else { format!("* {}", item) })
            .collect::<Vec<_>>()
            .join("\n"),
        ContentBlock::Quote { text } => format!("\"{}\"", text),
        other => other.text(),
    }
}

/// Generate a header from article metadata
fn generate_header(article: &ExtractedArticle) -> String {
    let mut header = String::new();

    if !article.title.is_empty() {
        header.push_str(&article.title);
        header.push('\n');
        header.push_str(&"=".repeat(article.title.chars().count()));
        header.push('\n');
    }

    let mut meta_parts = Vec::new();

    if let Some(author) = &article.author {
        meta_parts.push(format!("By: {}", author));
    }

    if let Some(date) = &article.published_date {
        meta_parts.push(format!("Date: {}", date.date()));
    }

    meta_parts.push(format!("Source: {}", article.source_url));
    header.push_str(&meta_parts.join(" | "));

    header
}

/// Wrap each line of `text` to the given width
fn wrap_text(text: &str, width: usize) -> String {
    text.lines().map(|line| wrap_line(line, width)).collect::<Vec<_>>().join("\n")
}

fn wrap_line(line: &str, width: usize) -> String {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_length = 0;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push_str(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_length += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line.push_str(word);
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines.join("\n")
}
