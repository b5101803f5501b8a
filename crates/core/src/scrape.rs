//! Main scraping API.
//!
//! This module composes the pipeline: metadata extraction on the raw
//! markup, then sanitization, content-region location and block
//! classification, and finally assembly of the [`ExtractedArticle`].
//!
//! # Example
//!
//! ```rust
//! use gleaner_core::Scraper;
//!
//! let html = r#"<html><head><title>Hello | Site</title></head>
//!     <body><article><p>A paragraph that is long enough to keep.</p></article></body></html>"#;
//!
//! let article = Scraper::new().extract(html, "https://example.com/hello");
//! assert_eq!(article.title, "Hello");
//! assert_eq!(article.content.len(), 1);
//! ```

use url::Url;

use crate::article::{ExtractedArticle, clean_title};
use crate::blocks::{BlockOrder, ClassifyConfig, classify_with_config};
use crate::fetch::FetchConfig;
#[cfg(feature = "fetch")]
use crate::fetch::{fetch_url, validate_url};
use crate::images::{featured_image, inline_images, merge_images};
use crate::locate::locate_content_region;
use crate::metadata::extract_metadata;
use crate::sanitize::{SanitizeConfig, sanitize_html};
#[cfg(feature = "fetch")]
use crate::Result;

/// Configuration for the whole scrape pipeline.
///
/// # Example
///
/// ```rust
/// use gleaner_core::{BlockOrder, ScrapeConfig};
///
/// let config = ScrapeConfig::builder()
///     .timeout(10)
///     .order(BlockOrder::GroupedByKind)
///     .collect_inline_images(true)
///     .build();
/// assert_eq!(config.fetch.timeout, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScrapeConfig {
    /// HTTP settings used by [`Scraper::scrape`].
    pub fetch: FetchConfig,
    /// Which non-content regions to remove.
    pub sanitize: SanitizeConfig,
    /// Block classification settings.
    pub classify: ClassifyConfig,
    /// Whether `<img>` tags in the content region are added to `images` (default: false).
    pub collect_inline_images: bool,
}

impl ScrapeConfig {
    /// Creates a new builder for ScrapeConfig.
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::new()
    }
}

/// Builder for ScrapeConfig.
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ScrapeConfig::default() }
    }

    /// Sets the request timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Sets the block emission order.
    pub fn order(mut self, value: BlockOrder) -> Self {
        self.config.classify.order = value;
        self
    }

    /// Sets the paragraph noise threshold.
    pub fn min_paragraph_chars(mut self, value: usize) -> Self {
        self.config.classify.min_paragraph_chars = value;
        self
    }

    /// Sets whether inline images are collected.
    pub fn collect_inline_images(mut self, value: bool) -> Self {
        self.config.collect_inline_images = value;
        self
    }

    /// Replaces the sanitizer configuration.
    pub fn sanitize(mut self, value: SanitizeConfig) -> Self {
        self.config.sanitize = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ScrapeConfig {
        self.config
    }
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main entry point for scraping.
///
/// A `Scraper` holds only configuration; calls share no state and may run
/// concurrently.
#[derive(Debug, Clone, Default)]
pub struct Scraper {
    config: ScrapeConfig,
}

impl Scraper {
    /// Creates a new Scraper with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new Scraper with a custom configuration.
    pub fn with_config(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Fetch `url` and extract its article.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GleanError::InvalidInput`] for an empty or unusable URL and
    /// [`crate::GleanError::FetchFailed`] when the page cannot be retrieved. Once
    /// the page is read, extraction always produces an article.
    #[cfg(feature = "fetch")]
    pub async fn scrape(&self, url: &str) -> Result<ExtractedArticle> {
        let base = validate_url(url)?;
        let html = fetch_url(base.as_str(), &self.config.fetch).await?;
        Ok(self.extract_with_base(&html, url.trim(), Some(&base)))
    }

    /// Extract an article from markup that has already been retrieved.
    ///
    /// `source_url` is recorded verbatim and, when it parses, used to resolve
    /// relative inline image URLs.
    pub fn extract(&self, html: &str, source_url: &str) -> ExtractedArticle {
        let base = Url::parse(source_url).ok();
        self.extract_with_base(html, source_url, base.as_ref())
    }

    fn extract_with_base(&self, html: &str, source_url: &str, base: Option<&Url>) -> ExtractedArticle {
        let metadata = extract_metadata(html);

        let sanitized = sanitize_html(html, &self.config.sanitize);
        let (region, region_kind) = locate_content_region(&sanitized);
        tracing::debug!(region = ?region_kind, bytes = region.len(), "located content region");

        let content = classify_with_config(region, &self.config.classify);

        let mut images: Vec<_> = featured_image(metadata.og_image.as_deref()).into_iter().collect();
        if self.config.collect_inline_images {
            merge_images(&mut images, inline_images(region, base));
        }

        ExtractedArticle {
            title: metadata.preferred_title().map(clean_title).unwrap_or_default(),
            author: metadata.author.clone(),
            published_date: metadata.published_date(),
            summary: metadata.summary().map(str::to_string),
            meta_description: metadata.meta_description.clone(),
            content,
            images,
            source_url: source_url.to_string(),
        }
    }
}

/// Convenience function: extract with default settings.
pub fn extract_article(html: &str, source_url: &str) -> ExtractedArticle {
    Scraper::new().extract(html, source_url)
}

/// Convenience function: fetch and extract with default settings.
#[cfg(feature = "fetch")]
pub async fn scrape_article(url: &str) -> Result<ExtractedArticle> {
    Scraper::new().scrape(url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::ContentBlock;

    const SAMPLE: &str = r#"<html><head><title>Sample Article | News Site</title>
<meta property="og:description" content="A short summary."></head>
<body><nav>ignored</nav><article><h1>Main Heading</h1>
<p>This paragraph has more than twenty characters easily.</p>
<ul><li>Item one</li><li>Item two</li></ul></article></body></html>"#;

    #[test]
    fn test_end_to_end_sample() {
        let article = extract_article(SAMPLE, "https://news.example.com/sample");

        assert_eq!(article.title, "Sample Article");
        assert_eq!(article.summary.as_deref(), Some("A short summary."));
        assert_eq!(article.meta_description, None);
        assert_eq!(article.author, None);
        assert!(article.images.is_empty());
        assert_eq!(article.source_url, "https://news.example.com/sample");
        assert_eq!(
            article.content,
            vec![
                ContentBlock::Heading { level: 1, text: "Main Heading".to_string() },
                ContentBlock::Paragraph { text: "This paragraph has more than twenty characters easily.".to_string() },
                ContentBlock::List { ordered: false, items: vec!["Item one".to_string(), "Item two".to_string()] },
            ]
        );
    }

    #[test]
    fn test_script_text_never_reaches_content() {
        let html = "<script>alert('x')</script><p>This is a sufficiently long real paragraph text.</p>";
        let article = extract_article(html, "https://example.com");

        assert_eq!(
            article.content,
            vec![ContentBlock::Paragraph { text: "This is a sufficiently long real paragraph text.".to_string() }]
        );
        assert!(article.content.iter().all(|block| !block.text().contains("alert")));
    }

    #[test]
    fn test_og_title_wins() {
        let html = r#"<title>Foo | Site</title><meta property="og:title" content="Bar">"#;
        assert_eq!(extract_article(html, "https://example.com").title, "Bar");
    }

    #[test]
    fn test_og_title_is_also_cleaned() {
        let html = r#"<meta property="og:title" content="Story | Paper">"#;
        assert_eq!(extract_article(html, "https://example.com").title, "Story");
    }

    #[test]
    fn test_featured_image_only() {
        let html = r#"<meta property="og:image" content="https://cdn.example.com/hero.jpg">
            <article><img src="/inline.png"><p>Paragraph that is long enough to count.</p></article>"#;
        let article = extract_article(html, "https://example.com/post");

        assert_eq!(article.images.len(), 1);
        assert_eq!(article.images[0].url, "https://cdn.example.com/hero.jpg");
        assert_eq!(article.images[0].alt.as_deref(), Some("Featured image"));
        assert!(article.content.iter().all(|block| block.kind() != "image"));
    }

    #[test]
    fn test_inline_images_when_enabled() {
        let html = r#"<meta property="og:image" content="https://cdn.example.com/hero.jpg">
            <article><img src="/inline.png" alt="Chart"><img src="https://cdn.example.com/hero.jpg"></article>"#;
        let scraper = Scraper::with_config(ScrapeConfig::builder().collect_inline_images(true).build());
        let article = scraper.extract(html, "https://example.com/post");

        assert_eq!(article.images.len(), 2);
        assert_eq!(article.images[1].url, "https://example.com/inline.png");
        assert_eq!(article.images[1].alt.as_deref(), Some("Chart"));
    }

    #[test]
    fn test_empty_page_still_produces_article() {
        let article = extract_article("", "https://example.com/empty");

        assert_eq!(article.title, "");
        assert_eq!(article.author, None);
        assert_eq!(article.published_date, None);
        assert_eq!(article.summary, None);
        assert!(article.content.is_empty());
        assert!(article.images.is_empty());
        assert_eq!(article.source_url, "https://example.com/empty");
    }

    #[test]
    fn test_metadata_read_from_raw_markup() {
        // meta tags inside a header are removed by sanitization but still count
        let html = r#"<header><meta name="author" content="Staff Writer"></header>"#;
        assert_eq!(extract_article(html, "x").author.as_deref(), Some("Staff Writer"));
    }

    #[test]
    fn test_builder() {
        let config = ScrapeConfig::builder()
            .timeout(5)
            .user_agent("custom/1.0")
            .order(BlockOrder::GroupedByKind)
            .min_paragraph_chars(0)
            .collect_inline_images(true)
            .build();

        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.fetch.user_agent, "custom/1.0");
        assert_eq!(config.classify.order, BlockOrder::GroupedByKind);
        assert_eq!(config.classify.min_paragraph_chars, 0);
        assert!(config.collect_inline_images);
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_scrape_rejects_empty_url() {
        let result = scrape_article("  ").await;
        assert!(matches!(result, Err(crate::GleanError::InvalidInput(_))));
    }
}
