//! Removal of non-content regions from raw markup.

use std::sync::LazyLock;

use regex::Regex;

use crate::markup::{TagPattern, attribute};

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("COMMENT regex"));

static SCRIPT: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("script").expect("script pattern"));
static STYLE: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("style").expect("style pattern"));

static LANDMARKS: LazyLock<Vec<TagPattern>> = LazyLock::new(|| {
    ["nav", "header", "footer", "aside"]
        .into_iter()
        .map(|tag| TagPattern::new(tag).expect("landmark pattern"))
        .collect()
});

/// Class-name fragments that mark a container as boilerplate.
pub const BOILERPLATE_CLASS_NEEDLES: [&str; 7] =
    ["sidebar", "advertisement", "ads", "comments", "related", "social", "share"];

/// Configuration for markup sanitization
#[derive(Debug, Clone)]
pub struct SanitizeConfig {
    /// Whether to remove script elements
    pub remove_scripts: bool,
    /// Whether to remove style elements
    pub remove_styles: bool,
    /// Whether to remove HTML comments
    pub remove_comments: bool,
    /// Whether to remove nav, header, footer and aside elements
    pub remove_landmarks: bool,
    /// Whether to remove containers whose class marks them as boilerplate
    pub remove_boilerplate: bool,
    /// Substrings looked for (case-insensitively) in a container's class attribute
    pub boilerplate_needles: Vec<String>,
    /// Element names checked against `boilerplate_needles`
    pub container_tags: Vec<String>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            remove_scripts: true,
            remove_styles: true,
            remove_comments: true,
            remove_landmarks: true,
            remove_boilerplate: true,
            boilerplate_needles: BOILERPLATE_CLASS_NEEDLES.iter().map(|s| s.to_string()).collect(),
            container_tags: vec!["div".to_string(), "section".to_string()],
        }
    }
}

/// Sanitize markup with the default configuration.
pub fn sanitize(html: &str) -> String {
    sanitize_html(html, &SanitizeConfig::default())
}

/// Remove non-content regions from raw markup.
///
/// Never fails: patterns that do not match leave the markup untouched.
/// Comments go before landmarks and containers so a commented-out closing
/// tag cannot cut an element short.
pub fn sanitize_html(html: &str, config: &SanitizeConfig) -> String {
    let mut processed = if config.remove_scripts || config.remove_styles {
        remove_raw_text_elements(html, config)
    } else {
        html.to_string()
    };

    if config.remove_comments {
        processed = remove_comments(&processed);
    }

    if config.remove_landmarks {
        processed = remove_landmarks(&processed);
    }

    if config.remove_boilerplate {
        processed = remove_boilerplate_containers(&processed, config);
    }

    tracing::debug!(before = html.len(), after = processed.len(), "sanitized markup");
    processed
}

/// Remove script and style elements, body included.
///
/// The HTML tokenizer treats their bodies as raw text, so markup-looking
/// strings inside a script never end it early. If the rewriter bails out the
/// elements are cut with the pattern scanner instead.
fn remove_raw_text_elements(html: &str, config: &SanitizeConfig) -> String {
    let mut output = Vec::with_capacity(html.len());
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                if config.remove_scripts {
                    Some(lol_html::element!("script", |el| {
                        el.remove();
                        Ok(())
                    }))
                } else {
                    None
                },
                if config.remove_styles {
                    Some(lol_html::element!("style", |el| {
                        el.remove();
                        Ok(())
                    }))
                } else {
                    None
                },
            ]
            .into_iter()
            .flatten()
            .collect(),
            ..Default::default()
        },
        |c: &[u8]| {
            output.extend_from_slice(c);
        },
    );

    let rewritten = rewriter.write(html.as_bytes()).and_then(|_| rewriter.end());
    if let Err(e) = rewritten {
        tracing::debug!(error = %e, "rewriter failed, falling back to pattern removal");
        return remove_raw_text_elements_by_pattern(html, config);
    }

    match String::from_utf8(output) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn remove_raw_text_elements_by_pattern(html: &str, config: &SanitizeConfig) -> String {
    let mut processed = html.to_string();
    if config.remove_scripts {
        processed = SCRIPT.remove_all(&processed);
    }
    if config.remove_styles {
        processed = STYLE.remove_all(&processed);
    }
    processed
}

/// Remove HTML comments from the document
fn remove_comments(html: &str) -> String {
    COMMENT.replace_all(html, "").into_owned()
}

/// Remove nav, header, footer and aside elements
fn remove_landmarks(html: &str) -> String {
    LANDMARKS.iter().fold(html.to_string(), |acc, pattern| pattern.remove_all(&acc))
}

/// Remove containers whose class attribute contains one of the configured needles
fn remove_boilerplate_containers(html: &str, config: &SanitizeConfig) -> String {
    let needles: Vec<String> = config.boilerplate_needles.iter().map(|n| n.to_lowercase()).collect();
    if needles.is_empty() {
        return html.to_string();
    }

    let mut processed = html.to_string();
    for tag in &config.container_tags {
        let pattern = match TagPattern::new(tag) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!(%tag, error = %e, "skipping unusable container tag");
                continue;
            }
        };

        processed = pattern.remove_where(&processed, |attrs| {
            attribute(attrs, "class")
                .map(|class| class.to_lowercase())
                .is_some_and(|class| needles.iter().any(|needle| class.contains(needle.as_str())))
        });
    }
    processed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_scripts_and_styles() {
        let html = r#"
            <html>
                <head><script>alert('test');</script><style>body{color:red;}</style></head>
                <body><p>Content</p></body>
            </html>
        "#;

        let result = sanitize(html);
        assert!(!result.contains("<script"));
        assert!(!result.contains("<style"));
        assert!(!result.contains("alert"), "Script content should be removed");
        assert!(!result.contains("color:red"), "Style content should be removed");
        assert!(result.contains("<p>Content</p>"));
    }

    #[test]
    fn test_script_body_with_markup_strings() {
        let html = r#"<script>var s = "<p>not a paragraph</p>"; if (a < b) {}</script><p>Real</p>"#;
        let result = sanitize(html);
        assert!(!result.contains("not a paragraph"));
        assert!(result.contains("<p>Real</p>"));
    }

    #[test]
    fn test_uppercase_script_tags() {
        let result = sanitize("<SCRIPT type=\"text/javascript\">evil()</SCRIPT><p>kept</p>");
        assert!(!result.contains("evil"));
        assert!(result.contains("kept"));
    }

    #[test]
    fn test_pattern_fallback_removes_scripts() {
        let config = SanitizeConfig::default();
        let result = remove_raw_text_elements_by_pattern("<script>x()</script><style>p{}</style><p>ok</p>", &config);
        assert_eq!(result, "<p>ok</p>");
    }

    #[test]
    fn test_remove_comments() {
        let html = "<body><!-- This is a\nmultiline comment --><p>Visible content</p><!-- Another --></body>";
        let result = remove_comments(html);
        assert!(!result.contains("<!--"));
        assert!(!result.contains("multiline"));
        assert!(result.contains("Visible content"));
    }

    #[test]
    fn test_remove_landmarks() {
        let html = "<NAV class=\"top\">menu</NAV><header>Site</header><main><p>Body</p></main>\
                    <aside>extra</aside><footer>copyright</footer>";
        let result = remove_landmarks(html);
        assert_eq!(result, "<main><p>Body</p></main>");
    }

    #[test]
    fn test_head_is_not_a_header() {
        let html = "<head><title>T</title></head><header>drop</header>";
        let result = remove_landmarks(html);
        assert_eq!(result, "<head><title>T</title></head>");
    }

    #[test]
    fn test_remove_boilerplate_containers() {
        let html = r#"
            <div class="post-sidebar">Sidebar</div>
            <div class="Social-Links">Follow</div>
            <section class='related-stories'>More</section>
            <div class="story-body"><p>Kept</p></div>
            <div id="share">id does not count</div>
        "#;

        let result = remove_boilerplate_containers(html, &SanitizeConfig::default());
        assert!(!result.contains("Sidebar"));
        assert!(!result.contains("Follow"));
        assert!(!result.contains("More"));
        assert!(result.contains("Kept"));
        assert!(result.contains("id does not count"));
    }

    #[test]
    fn test_boilerplate_nested_in_wrapper_div() {
        let html = r#"<div class="page"><div class="social-share">Share this story</div><p>Body text</p></div>"#;
        let result = sanitize(html);
        assert!(!result.contains("Share this story"));
        assert_eq!(result, r#"<div class="page"><p>Body text</p></div>"#);
    }

    #[test]
    fn test_needle_is_a_plain_substring() {
        // "downloads" contains "ads"
        let html = r#"<div class="downloads">gone</div><div class="body">stays</div>"#;
        let result = remove_boilerplate_containers(html, &SanitizeConfig::default());
        assert_eq!(result, r#"<div class="body">stays</div>"#);
    }

    #[test]
    fn test_disabled_steps_leave_markup() {
        let config = SanitizeConfig {
            remove_scripts: false,
            remove_styles: false,
            remove_comments: false,
            remove_landmarks: false,
            remove_boilerplate: false,
            ..Default::default()
        };
        let html = "<script>x</script><!-- c --><nav>n</nav><div class=\"ads\">a</div>";
        assert_eq!(sanitize_html(html, &config), html);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let html = r#"
            <script>track()</script>
            <nav>Home</nav>
            <!-- promo -->
            <div class="comments">Reply</div>
            <article><p>The article body stays intact.</p></article>
        "#;
        let once = sanitize(html);
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_unmatched_markup_untouched() {
        let html = "<p>Just a paragraph with <b>bold</b> text.</p>";
        assert_eq!(sanitize(html), html);
    }
}
