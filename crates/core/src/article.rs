//! Article output type.
//!
//! This module defines the [`ExtractedArticle`] record produced by a
//! successful scrape, and the title cleanup applied while assembling it.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::blocks::ContentBlock;
use crate::{GleanError, Result};

static SITE_NAME_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[|\-–—]\s*[^|]*$").expect("SITE_NAME_SUFFIX regex"));

/// An image associated with an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// The result of scraping one page.
///
/// Serializes to the camelCase JSON shape consumed by the admin and mobile
/// clients; absent optional fields are written as `null`. Missing fields
/// deserialize to their empty values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractedArticle {
    /// Cleaned title, empty when the page has none.
    pub title: String,
    pub author: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_date: Option<OffsetDateTime>,
    pub summary: Option<String>,
    pub meta_description: Option<String>,
    /// Body content in emission order. Never contains images.
    pub content: Vec<ContentBlock>,
    /// Featured image first, then any collected inline images.
    pub images: Vec<ArticleImage>,
    /// The URL the article was scraped from.
    pub source_url: String,
}

impl ExtractedArticle {
    /// Number of words across all content blocks.
    pub fn word_count(&self) -> usize {
        self.content.iter().map(|block| block.text().split_whitespace().count()).sum()
    }

    /// Estimated reading time in minutes (assuming 200 words per minute).
    pub fn reading_time(&self) -> f64 {
        self.word_count() as f64 / 200.0
    }

    /// Gets the article as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(GleanError::from)
    }
}

/// Strip a trailing site-name suffix such as `" | News Site"` and trim.
///
/// The suffix starts at the first separator (`|`, `-`, `–`, `—`) after which
/// no `|` appears. Separators need no surrounding spaces, so a hyphenated
/// first word also ends the title.
pub fn clean_title(raw: &str) -> String {
    SITE_NAME_SUFFIX.replace(raw, "").trim().to_string()
}
