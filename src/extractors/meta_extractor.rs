//! Meta tag extraction
//!
//! Reads `<meta property="..." content="...">` tags, which carry the
//! OpenGraph title and image plus the `book:` namespace (author, isbn).

use scraper::{ElementRef, Html};

use super::css_extractor::select_all;
use crate::field::Field;

/// Every `meta` tag in the document, in document order
pub fn collect_meta_tags(document: &Html) -> Vec<ElementRef<'_>> {
    select_all(document, "meta")
}

/// Trimmed `attr` of the first meta tag whose `property` equals `property`
pub fn meta_attr(metas: &[ElementRef<'_>], property: &str, attr: &str) -> Field<String> {
    metas
        .iter()
        .find(|el| el.value().attr("property") == Some(property))
        .and_then(|el| el.value().attr(attr))
        .map(|value| Field::text(value.trim()))
        .unwrap_or_default()
}

/// Trimmed `content` of the first meta tag with the given property
pub fn meta_content(metas: &[ElementRef<'_>], property: &str) -> Field<String> {
    meta_attr(metas, property, "content")
}

/// Trimmed `content` of every meta tag with the given property
pub fn meta_contents(metas: &[ElementRef<'_>], property: &str) -> Vec<String> {
    metas
        .iter()
        .filter(|el| el.value().attr("property") == Some(property))
        .filter_map(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .collect()
}
