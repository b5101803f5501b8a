//! Main-content region selection.

use std::sync::LazyLock;

use crate::markup::TagPattern;

static ARTICLE: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("article").expect("article pattern"));
static MAIN: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("main").expect("main pattern"));

/// Where [`locate_content`] found the content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRegion {
    Article,
    Main,
    Document,
}

/// Narrow sanitized markup to the region most likely to hold the article body.
///
/// Returns the inner markup of the first `<article>`, else of the first
/// `<main>`, else the whole input.
pub fn locate_content(sanitized: &str) -> &str {
    locate_content_region(sanitized).0
}

/// Like [`locate_content`], also reporting which rule matched.
pub fn locate_content_region(sanitized: &str) -> (&str, ContentRegion) {
    if let Some(article) = ARTICLE.first(sanitized) {
        return (article.inner, ContentRegion::Article);
    }

    if let Some(main) = MAIN.first(sanitized) {
        return (main.inner, ContentRegion::Main);
    }

    (sanitized, ContentRegion::Document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_article() {
        let html = "<main><p>outer</p><article class=\"post\"><p>inner</p></article></main>";
        let (region, kind) = locate_content_region(html);
        assert_eq!(region, "<p>inner</p>");
        assert_eq!(kind, ContentRegion::Article);
    }

    #[test]
    fn test_falls_back_to_main() {
        let html = "<body><MAIN id=\"content\"><p>text</p></MAIN></body>";
        let (region, kind) = locate_content_region(html);
        assert_eq!(region, "<p>text</p>");
        assert_eq!(kind, ContentRegion::Main);
    }

    #[test]
    fn test_falls_back_to_document() {
        let html = "<body><div><p>text</p></div></body>";
        assert_eq!(locate_content(html), html);
    }

    #[test]
    fn test_first_article_wins() {
        let html = "<article>first</article><article>second</article>";
        assert_eq!(locate_content(html), "first");
    }

    #[test]
    fn test_unclosed_article_is_ignored() {
        let html = "<article><p>never closed</p><main>m</main>";
        assert_eq!(locate_content(html), "m");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(locate_content(""), "");
    }
}
