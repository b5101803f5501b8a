//! Content block classification.
//!
//! The located content region is scanned once per block kind. Every scan
//! records where each block starts, so the final sequence can be emitted
//! either in reading order or grouped by kind.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::markup::{TagPattern, strip_tags};

static HEADINGS: LazyLock<Vec<(u8, TagPattern)>> = LazyLock::new(|| {
    (1..=6u8)
        .map(|level| (level, TagPattern::new(&format!("h{level}")).expect("heading pattern")))
        .collect()
});
static PARAGRAPH: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("p").expect("p pattern"));
static UNORDERED_LIST: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("ul").expect("ul pattern"));
static ORDERED_LIST: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("ol").expect("ol pattern"));
static LIST_ITEM: LazyLock<TagPattern> = LazyLock::new(|| TagPattern::new("li").expect("li pattern"));
static BLOCKQUOTE: LazyLock<TagPattern> =
    LazyLock::new(|| TagPattern::new("blockquote").expect("blockquote pattern"));

/// Paragraphs this short or shorter are treated as noise.
pub const MIN_PARAGRAPH_CHARS: usize = 20;

/// One classified unit of article body content.
///
/// All text is free of markup and trimmed. On the wire a block is a flat
/// object with a `type` discriminator and a `content` summary string:
///
/// ```rust
/// use gleaner_core::ContentBlock;
///
/// let block = ContentBlock::List { ordered: true, items: vec!["one".into(), "two".into()] };
/// let json = serde_json::to_value(&block).unwrap();
/// assert_eq!(json["type"], "ordered-list");
/// assert_eq!(json["content"], "one, two");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireBlock", try_from = "WireBlock")]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { ordered: bool, items: Vec<String> },
    Quote { text: String },
}

impl ContentBlock {
    /// Wire name of the block kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::List { ordered: true, .. } => "ordered-list",
            ContentBlock::List { ordered: false, .. } => "unordered-list",
            ContentBlock::Quote { .. } => "quote",
        }
    }

    /// Text summary of the block; list items are joined with `", "`.
    pub fn text(&self) -> String {
        match self {
            ContentBlock::Heading { text, .. } | ContentBlock::Paragraph { text } | ContentBlock::Quote { text } => {
                text.clone()
            }
            ContentBlock::List { items, .. } => items.join(", "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum WireKind {
    Heading,
    Paragraph,
    OrderedList,
    UnorderedList,
    Quote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireBlock {
    #[serde(rename = "type")]
    kind: WireKind,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Vec<String>>,
}

impl From<ContentBlock> for WireBlock {
    fn from(block: ContentBlock) -> Self {
        match block {
            ContentBlock::Heading { level, text } => {
                WireBlock { kind: WireKind::Heading, content: text, level: Some(level), items: None }
            }
            ContentBlock::Paragraph { text } => {
                WireBlock { kind: WireKind::Paragraph, content: text, level: None, items: None }
            }
            ContentBlock::List { ordered, items } => WireBlock {
                kind: if ordered { WireKind::OrderedList } else { WireKind::UnorderedList },
                content: items.join(", "),
                level: None,
                items: Some(items),
            },
            ContentBlock::Quote { text } => WireBlock { kind: WireKind::Quote, content: text, level: None, items: None },
        }
    }
}

impl TryFrom<WireBlock> for ContentBlock {
    type Error = String;

    fn try_from(wire: WireBlock) -> Result<Self, Self::Error> {
        match wire.kind {
            WireKind::Heading => match wire.level {
                Some(level @ 1..=6) => Ok(ContentBlock::Heading { level, text: wire.content }),
                Some(level) => Err(format!("heading level {level} is outside 1..=6")),
                None => Err("heading block is missing its level".to_string()),
            },
            WireKind::Paragraph => Ok(ContentBlock::Paragraph { text: wire.content }),
            WireKind::OrderedList | WireKind::UnorderedList => {
                let items = wire.items.ok_or_else(|| "list block is missing its items".to_string())?;
                Ok(ContentBlock::List { ordered: wire.kind == WireKind::OrderedList, items })
            }
            WireKind::Quote => Ok(ContentBlock::Quote { text: wire.content }),
        }
    }
}

/// Order in which classified blocks are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockOrder {
    /// Reading order of the source markup.
    #[default]
    Document,
    /// All headings, then paragraphs, then lists, then quotes, each in reading order.
    GroupedByKind,
}

/// Configuration for block classification
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    /// Paragraphs must be strictly longer than this many characters
    pub min_paragraph_chars: usize,
    /// Emission order
    pub order: BlockOrder,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self { min_paragraph_chars: MIN_PARAGRAPH_CHARS, order: BlockOrder::default() }
    }
}

/// A block along with the scan it came from and where it starts.
struct Located {
    rank: u8,
    offset: usize,
    block: ContentBlock,
}

/// Classify a content region with the default configuration.
pub fn classify(html: &str) -> Vec<ContentBlock> {
    classify_with_config(html, &ClassifyConfig::default())
}

/// Classify a content region into an ordered sequence of blocks.
pub fn classify_with_config(html: &str, config: &ClassifyConfig) -> Vec<ContentBlock> {
    let mut located = Vec::new();
    scan_headings(html, &mut located);
    scan_paragraphs(html, config.min_paragraph_chars, &mut located);
    scan_lists(html, &mut located);
    scan_quotes(html, &mut located);

    match config.order {
        BlockOrder::Document => located.sort_by_key(|l| (l.offset, l.rank)),
        BlockOrder::GroupedByKind => located.sort_by_key(|l| (l.rank, l.offset)),
    }

    tracing::debug!(blocks = located.len(), order = ?config.order, "classified content");
    located.into_iter().map(|l| l.block).collect()
}

fn clean_text(inner: &str) -> String {
    strip_tags(inner).trim().to_string()
}

fn scan_headings(html: &str, out: &mut Vec<Located>) {
    for (level, pattern) in HEADINGS.iter() {
        for element in pattern.elements(html) {
            let text = clean_text(element.inner);
            if !text.is_empty() {
                out.push(Located { rank: 0, offset: element.start, block: ContentBlock::Heading { level: *level, text } });
            }
        }
    }
}

fn scan_paragraphs(html: &str, min_chars: usize, out: &mut Vec<Located>) {
    for element in PARAGRAPH.elements(html) {
        let text = clean_text(element.inner);
        if text.chars().count() > min_chars {
            out.push(Located { rank: 1, offset: element.start, block: ContentBlock::Paragraph { text } });
        }
    }
}

fn scan_lists(html: &str, out: &mut Vec<Located>) {
    for (ordered, pattern) in [(false, &*UNORDERED_LIST), (true, &*ORDERED_LIST)] {
        for element in pattern.elements(html) {
            let items: Vec<String> = LIST_ITEM
                .elements(element.inner)
                .map(|item| clean_text(item.inner))
                .filter(|item| !item.is_empty())
                .collect();

            if !items.is_empty() {
                out.push(Located { rank: 2, offset: element.start, block: ContentBlock::List { ordered, items } });
            }
        }
    }
}

fn scan_quotes(html: &str, out: &mut Vec<Located>) {
    for element in BLOCKQUOTE.elements(html) {
        let text = clean_text(element.inner);
        if !text.is_empty() {
            out.push(Located { rank: 3, offset: element.start, block: ContentBlock::Quote { text } });
        }
    }
}
