use serde::Serialize;

use crate::Result;
use crate::article::ExtractedArticle;

/// `{"article": ...}` wrapper returned by the scrape endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ArticleEnvelope<'a> {
    pub article: &'a ExtractedArticle,
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Wrap the article as `{"article": ...}`
    pub envelope: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Convert an article to JSON
pub fn convert_to_json(article: &ExtractedArticle, config: &JsonConfig) -> Result<String> {
    let json = match (config.envelope, config.pretty) {
        (true, true) => serde_json::to_string_pretty(&ArticleEnvelope { article })?,
        (true, false) => serde_json::to_string(&ArticleEnvelope { article })?,
        (false, true) => serde_json::to_string_pretty(article)?,
        (false, false) => serde_json::to_string(article)?,
    };
    Ok(json)
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, article: &ExtractedArticle) -> Result<String> {
        convert_to_json(article, &self.config)
    }
}
