//! Image collection: the `og:image` featured image and opt-in inline images.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::article::ArticleImage;
use crate::markup::attribute;

static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img(\s[^>]*)?>").expect("IMG_TAG regex"));

/// Alt text given to the `og:image` entry.
pub const FEATURED_IMAGE_ALT: &str = "Featured image";

/// The `og:image` entry, if the page declared one.
pub fn featured_image(og_image: Option<&str>) -> Option<ArticleImage> {
    og_image.map(|url| ArticleImage { url: url.to_string(), alt: Some(FEATURED_IMAGE_ALT.to_string()) })
}

/// Collect `<img>` tags from a content region.
///
/// Relative `src` values are resolved against `base` when it is given; `data:`
/// URIs and images without a `src` are skipped. Empty `alt` text is absent.
pub fn inline_images(html: &str, base: Option<&Url>) -> Vec<ArticleImage> {
    IMG_TAG
        .captures_iter(html)
        .filter_map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let src = attribute(attrs, "src").map(str::trim).filter(|s| !s.is_empty())?;
            if src.starts_with("data:") {
                return None;
            }

            let url = match base {
                Some(base) => base.join(src).map(String::from).unwrap_or_else(|_| src.to_string()),
                None => src.to_string(),
            };
            let alt = attribute(attrs, "alt").map(str::trim).filter(|a| !a.is_empty()).map(str::to_string);

            Some(ArticleImage { url, alt })
        })
        .collect()
}

/// Append `extra` to `images`, skipping URLs already present.
pub fn merge_images(images: &mut Vec<ArticleImage>, extra: Vec<ArticleImage>) {
    for image in extra {
        if !images.iter().any(|existing| existing.url == image.url) {
            images.push(image);
        }
    }
}
