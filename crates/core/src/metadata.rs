use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::markup::{TagPattern, attribute};

static META_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<meta(\s[^>]*)?>").expect("META_TAG regex"));
static TITLE: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("title").expect("title pattern"));

/// Head-level metadata found in a page.
///
/// Every field is independent and absent when no matching tag exists;
/// an empty `content` attribute counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Text of the first `<title>` element.
    pub title: Option<String>,
    /// `og:title`
    pub og_title: Option<String>,
    /// `description`
    pub meta_description: Option<String>,
    /// `og:description`
    pub og_description: Option<String>,
    /// `author`
    pub author: Option<String>,
    /// Raw `article:published_time` value, unparsed.
    pub published_time: Option<String>,
    /// `og:image`
    pub og_image: Option<String>,
}

impl Metadata {
    /// Title to show for the article: `og:title` overrides `<title>`.
    ///
    /// Site-name suffixes are not removed here; see [`crate::clean_title`].
    pub fn preferred_title(&self) -> Option<&str> {
        self.og_title.as_deref().or(self.title.as_deref())
    }

    /// Summary: `og:description`, falling back to `description`.
    pub fn summary(&self) -> Option<&str> {
        self.og_description.as_deref().or(self.meta_description.as_deref())
    }

    /// Parsed publication timestamp, in UTC.
    ///
    /// An unparsable value is reported as absent.
    pub fn published_date(&self) -> Option<OffsetDateTime> {
        let raw = self.published_time.as_deref()?;
        let parsed = parse_published_date(raw);
        if parsed.is_none() {
            tracing::warn!(value = raw, "ignoring unparsable article:published_time");
        }
        parsed
    }
}

/// Extract head-level metadata from raw (unsanitized) markup.
///
/// The first matching tag wins for every field. Tag and attribute names are
/// matched case-insensitively, in any attribute order, and the key may sit
/// in either a `name` or a `property` attribute.
pub fn extract_metadata(html: &str) -> Metadata {
    let mut metadata = Metadata {
        title: TITLE
            .first(html)
            .map(|title| title.inner.trim().to_string())
            .filter(|title| !title.is_empty()),
        ..Default::default()
    };

    for caps in META_TAG.captures_iter(html) {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let Some(content) = attribute(attrs, "content").map(str::trim).filter(|c| !c.is_empty()) else {
            continue;
        };

        for key in [attribute(attrs, "property"), attribute(attrs, "name")].into_iter().flatten() {
            let slot = match key.trim().to_ascii_lowercase().as_str() {
                "og:title" => &mut metadata.og_title,
                "description" => &mut metadata.meta_description,
                "og:description" => &mut metadata.og_description,
                "author" => &mut metadata.author,
                "article:published_time" => &mut metadata.published_time,
                "og:image" => &mut metadata.og_image,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(content.to_string());
            }
        }
    }

    metadata
}

/// Parse an `article:published_time` value.
///
/// Accepts RFC 3339, other ISO 8601 forms, date-times without an offset
/// (taken as UTC) and bare dates (midnight UTC).
pub fn parse_published_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();

    if let Ok(date_time) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(date_time.to_offset(UtcOffset::UTC));
    }

    if let Ok(date_time) = OffsetDateTime::parse(raw, &Iso8601::DEFAULT) {
        return Some(date_time.to_offset(UtcOffset::UTC));
    }

    let naive_formats = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ];
    for format in naive_formats {
        if let Ok(date_time) = PrimitiveDateTime::parse(raw, format) {
            return Some(date_time.assume_utc());
        }
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    const HTML_WITH_META: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page Title | Example</title>
            <meta name="author" content="John Doe">
            <meta name="description" content="This is a test description of the page.">
            <meta property="og:title" content="OG Title">
            <meta property="og:description" content="OG Description">
            <meta property="og:image" content="https://example.com/cover.jpg">
            <meta property="article:published_time" content="2024-01-15T10:30:00Z">
        </head>
        <body>
            <h1>Main Heading</h1>
            <p>This is the first paragraph of the content.</p>
        </body>
        </html>
    "#;

    const HTML_WITHOUT_META: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Simple Page</title>
        </head>
        <body>
            <h1>Heading</h1>
        </body>
        </html>
    "#;

    #[test]
    fn test_extract_all_metadata() {
        let metadata = extract_metadata(HTML_WITH_META);

        assert_eq!(metadata.title.as_deref(), Some("Test Page Title | Example"));
        assert_eq!(metadata.og_title.as_deref(), Some("OG Title"));
        assert_eq!(metadata.meta_description.as_deref(), Some("This is a test description of the page."));
        assert_eq!(metadata.og_description.as_deref(), Some("OG Description"));
        assert_eq!(metadata.author.as_deref(), Some("John Doe"));
        assert_eq!(metadata.published_time.as_deref(), Some("2024-01-15T10:30:00Z"));
        assert_eq!(metadata.og_image.as_deref(), Some("https://example.com/cover.jpg"));
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let metadata = extract_metadata(HTML_WITHOUT_META);

        assert_eq!(metadata.title.as_deref(), Some("Simple Page"));
        assert_eq!(metadata.author, None);
        assert_eq!(metadata.og_title, None);
        assert_eq!(metadata.summary(), None);
        assert_eq!(metadata.published_date(), None);
        assert_eq!(metadata.og_image, None);
    }

    #[test]
    fn test_og_title_overrides_title() {
        let metadata = extract_metadata(HTML_WITH_META);
        assert_eq!(metadata.preferred_title(), Some("OG Title"));

        let metadata = extract_metadata(HTML_WITHOUT_META);
        assert_eq!(metadata.preferred_title(), Some("Simple Page"));
    }

    #[test]
    fn test_summary_falls_back_to_description() {
        let html = r#"<meta name="description" content="Plain description">"#;
        assert_eq!(extract_metadata(html).summary(), Some("Plain description"));

        assert_eq!(extract_metadata(HTML_WITH_META).summary(), Some("OG Description"));
    }

    #[test]
    fn test_attribute_order_and_quotes() {
        let html = r#"<META CONTENT='Reversed Author' NAME='Author'><meta content="Img" property="og:image"/>"#;
        let metadata = extract_metadata(html);
        assert_eq!(metadata.author.as_deref(), Some("Reversed Author"));
        assert_eq!(metadata.og_image.as_deref(), Some("Img"));
    }

    #[test]
    fn test_first_match_wins() {
        let html = r#"<meta name="author" content="First"><meta name="author" content="Second">"#;
        assert_eq!(extract_metadata(html).author.as_deref(), Some("First"));
    }

    #[test]
    fn test_empty_content_is_absent() {
        let html = r#"<meta name="author" content=""><meta name="author" content="  "><meta name="author" content="Real">"#;
        assert_eq!(extract_metadata(html).author.as_deref(), Some("Real"));
    }

    #[test]
    fn test_empty_title_is_absent() {
        assert_eq!(extract_metadata("<title>   </title>").title, None);
    }

    #[test]
    fn test_multiline_title_trimmed() {
        let metadata = extract_metadata("<title>\n    Spread Out\n  </title>");
        assert_eq!(metadata.title.as_deref(), Some("Spread Out"));
    }

    #[test]
    fn test_unrelated_meta_ignored() {
        let html = r#"<meta name="viewport" content="width=device-width"><meta itemprop="author" content="X">"#;
        assert_eq!(extract_metadata(html), Metadata::default());
    }

    #[test]
    fn test_published_date() {
        let metadata = extract_metadata(HTML_WITH_META);
        assert_eq!(metadata.published_date(), Some(datetime!(2024-01-15 10:30:00 UTC)));
    }

    #[rstest]
    #[case("2024-01-15T10:30:00Z", Some(datetime!(2024-01-15 10:30:00 UTC)))]
    #[case("2024-01-15T12:30:00+02:00", Some(datetime!(2024-01-15 10:30:00 UTC)))]
    #[case("2024-01-15T10:30:00", Some(datetime!(2024-01-15 10:30:00 UTC)))]
    #[case("2024-01-15T10:30", Some(datetime!(2024-01-15 10:30:00 UTC)))]
    #[case("2024-01-15", Some(datetime!(2024-01-15 00:00:00 UTC)))]
    #[case(" 2024-01-15 ", Some(datetime!(2024-01-15 00:00:00 UTC)))]
    #[case("yesterday", None)]
    #[case("15/01/2024", None)]
    #[case("", None)]
    fn test_parse_published_date(#[case] raw: &str, #[case] expected: Option<OffsetDateTime>) {
        assert_eq!(parse_published_date(raw), expected);
    }

    #[test]
    fn test_unparsable_published_date_is_absent() {
        let html = r#"<meta property="article:published_time" content="last Tuesday">"#;
        let metadata = extract_metadata(html);
        assert_eq!(metadata.published_time.as_deref(), Some("last Tuesday"));
        assert_eq!(metadata.published_date(), None);
    }
}
