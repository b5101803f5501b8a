//! Scrape web articles into structured content blocks and metadata.
//!
//! The pipeline reads metadata from the raw page, strips non-content markup,
//! narrows to the main content region and classifies what remains into
//! headings, paragraphs, lists and quotes.

pub mod article;
pub mod blocks;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod images;
pub mod locate;
pub mod markup;
pub mod metadata;
pub mod sanitize;
pub mod scrape;

pub use article::{ArticleImage, ExtractedArticle, clean_title};
pub use blocks::{BlockOrder, ClassifyConfig, ContentBlock, MIN_PARAGRAPH_CHARS, classify, classify_with_config};
pub use error::{ErrorClass, GleanError, Result};
pub use fetch::{BROWSER_USER_AGENT, FetchConfig, fetch_file, fetch_stdin, validate_url};
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use formatters::{JsonConfig, JsonFormatter, MarkdownConfig, MarkdownFormatter, TextConfig, TextFormatter};
pub use formatters::{convert_to_json, convert_to_markdown, convert_to_text};
pub use images::{FEATURED_IMAGE_ALT, featured_image, inline_images};
pub use locate::{ContentRegion, locate_content, locate_content_region};
pub use metadata::{Metadata, extract_metadata, parse_published_date};
pub use sanitize::{SanitizeConfig, sanitize, sanitize_html};
pub use scrape::{ScrapeConfig, ScrapeConfigBuilder, Scraper, extract_article};
#[cfg(feature = "fetch")]
pub use scrape::scrape_article;
