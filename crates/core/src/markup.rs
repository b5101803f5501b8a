//! Lightweight pattern scanning over raw markup.
//!
//! Gleaner deliberately avoids building a DOM. Elements are located by
//! pairing an opening tag with the first closing tag of the same name that
//! follows it, which is exact for flat markup and a known approximation for
//! nested elements of the same name.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("TAG regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][A-Za-z0-9_:.\-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("ATTRIBUTE regex")
});

/// One element found by a [`TagPattern`] scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    /// Byte offset of the opening `<`.
    pub start: usize,
    /// Byte offset just past the closing tag.
    pub end: usize,
    /// Raw attribute text of the opening tag.
    pub attrs: &'a str,
    /// Markup between the opening and closing tags.
    pub inner: &'a str,
}

/// Case-insensitive opening/closing tag pair for one element name.
#[derive(Debug, Clone)]
pub struct TagPattern {
    open: Regex,
    close: Regex,
}

impl TagPattern {
    /// Builds the pattern pair for `tag`.
    ///
    /// The opening tag must be followed by whitespace or `>`, so `p` does
    /// not match `<pre>` and `header` does not match `<head>`.
    pub fn new(tag: &str) -> Result<Self, regex::Error> {
        let name = regex::escape(tag);
        Ok(Self {
            open: Regex::new(&format!(r"(?i)<{name}(\s[^>]*)?>"))?,
            close: Regex::new(&format!(r"(?i)</{name}\s*>"))?,
        })
    }

    /// Iterates over non-overlapping elements in document order.
    ///
    /// Opening tags with no closing tag after them are skipped.
    pub fn elements<'a>(&'a self, html: &'a str) -> Elements<'a> {
        Elements { pattern: self, html, pos: 0 }
    }

    /// First element in `html`, if any.
    pub fn first<'a>(&'a self, html: &'a str) -> Option<Element<'a>> {
        self.elements(html).next()
    }

    /// Removes every element whose opening-tag attributes satisfy `keep_out`,
    /// tags and content included.
    ///
    /// Each opening tag is tested on its own before it is paired with a
    /// closing tag, so a matching element nested inside a non-matching one of
    /// the same name is still found.
    pub fn remove_where(&self, html: &str, keep_out: impl Fn(&str) -> bool) -> String {
        let mut output = String::with_capacity(html.len());
        let mut copied_to = 0;
        let mut pos = 0;

        while let Some(caps) = self.open.captures_at(html, pos) {
            let Some(open) = caps.get(0) else { break };
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            pos = open.end();

            if !keep_out(attrs) {
                continue;
            }
            if let Some(close) = self.close.find_at(html, open.end()) {
                output.push_str(&html[copied_to..open.start()]);
                copied_to = close.end();
                pos = close.end();
            }
        }

        output.push_str(&html[copied_to..]);
        output
    }

    /// Removes every element of this name.
    pub fn remove_all(&self, html: &str) -> String {
        self.remove_where(html, |_| true)
    }
}

/// Iterator returned by [`TagPattern::elements`].
pub struct Elements<'a> {
    pattern: &'a TagPattern,
    html: &'a str,
    pos: usize,
}

impl<'a> Iterator for Elements<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.html.len() {
            let caps = self.pattern.open.captures_at(self.html, self.pos)?;
            let open = caps.get(0)?;
            let attrs = caps.get(1).map_or("", |m| m.as_str());

            match self.pattern.close.find_at(self.html, open.end()) {
                Some(close) => {
                    self.pos = close.end();
                    return Some(Element {
                        start: open.start(),
                        end: close.end(),
                        attrs,
                        inner: &self.html[open.end()..close.start()],
                    });
                }
                None => self.pos = open.end(),
            }
        }
        None
    }
}

/// Removes every `<...>` tag, leaving only the text runs between them.
///
/// Applying it twice gives the same result as applying it once.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Looks up an attribute value in raw attribute text, ignoring name case.
///
/// Accepts double-quoted, single-quoted and unquoted values.
pub fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTRIBUTE.captures_iter(attrs).find_map(|caps| {
        let key = caps.get(1)?.as_str();
        if !key.eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4)).map(|m| m.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_elements_in_document_order() {
        let pattern = TagPattern::new("p").unwrap();
        let html = "<p>one</p><div><p class=\"x\">two</p></div><P>three</P>";
        let inner: Vec<&str> = pattern.elements(html).map(|e| e.inner).collect();
        assert_eq!(inner, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_element_offsets_and_attrs() {
        let pattern = TagPattern::new("p").unwrap();
        let html = "xx<p id='a'>body</p>yy";
        let element = pattern.first(html).unwrap();
        assert_eq!(element.start, 2);
        assert_eq!(&html[element.end..], "yy");
        assert_eq!(element.attrs, " id='a'");
        assert_eq!(element.inner, "body");
    }

    #[test]
    fn test_tag_name_must_end_at_boundary() {
        let pattern = TagPattern::new("p").unwrap();
        assert!(pattern.first("<pre>code</pre><param>x</param>").is_none());

        let header = TagPattern::new("header").unwrap();
        assert!(header.first("<head><title>t</title></head>").is_none());
    }

    #[test]
    fn test_unclosed_element_is_skipped() {
        let pattern = TagPattern::new("p").unwrap();
        let html = "<p>dangling";
        assert!(pattern.first(html).is_none());
    }

    #[test]
    fn test_first_closing_tag_wins() {
        let pattern = TagPattern::new("div").unwrap();
        let html = "<div>a<div>b</div>c</div>";
        let element = pattern.first(html).unwrap();
        assert_eq!(element.inner, "a<div>b");
    }

    #[test]
    fn test_remove_where() {
        let pattern = TagPattern::new("div").unwrap();
        let html = r#"<div class="keep">A</div><div class="drop">B</div><p>C</p>"#;
        let result = pattern.remove_where(html, |attrs| attribute(attrs, "class") == Some("drop"));
        assert_eq!(result, r#"<div class="keep">A</div><p>C</p>"#);
    }

    #[test]
    fn test_remove_where_reaches_nested_element() {
        let pattern = TagPattern::new("div").unwrap();
        let html = r#"<div class="page"><div class="drop">B</div><p>C</p></div>"#;
        let result = pattern.remove_where(html, |attrs| attribute(attrs, "class") == Some("drop"));
        assert_eq!(result, r#"<div class="page"><p>C</p></div>"#);
    }

    #[test]
    fn test_remove_all_skips_unclosed() {
        let pattern = TagPattern::new("nav").unwrap();
        assert_eq!(pattern.remove_all("<nav>open<nav>x</nav>y"), "y");
        assert_eq!(pattern.remove_all("<nav>dangling"), "<nav>dangling");
    }

    #[rstest]
    #[case("<b>bold</b> text", "bold text")]
    #[case("no tags", "no tags")]
    #[case("<a href=\"x\"><span>nested</span></a>", "nested")]
    #[case("a < b", "a < b")]
    #[case("<<b>>", ">")]
    #[case("", "")]
    fn test_strip_tags(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_tags(input), expected);
    }

    #[rstest]
    #[case("<p>Hello <em>world</em></p>")]
    #[case("a<<b>>c<")]
    #[case("<<<>>>")]
    #[case("x <y z> < w > >")]
    #[case("<a<b>c>d")]
    fn test_strip_tags_idempotent(#[case] input: &str) {
        let once = strip_tags(input);
        assert_eq!(strip_tags(&once), once);
    }

    #[rstest]
    #[case(r#" name="author" content="Jane""#, "content", Some("Jane"))]
    #[case(r#" CONTENT='single' "#, "content", Some("single"))]
    #[case(r#" content=bare property="og:x""#, "content", Some("bare"))]
    #[case(r#" content="a name=b" name="c""#, "name", Some("c"))]
    #[case(r#" property="og:title""#, "content", None)]
    fn test_attribute(#[case] attrs: &str, #[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(attribute(attrs, name), expected);
    }
}
