//! Summary and author intro sections
//!
//! Both sections follow an `h2` heading ("内容简介", "作者简介"). The
//! element after the heading holds one or two `div.intro` blocks: a
//! collapsed teaser ending in "(展开全部)" and the full text.

use scraper::{ElementRef, Html};

use super::css_extractor::{element_text, next_element_sibling, select_all_in, select_first};
use crate::field::Field;
use crate::format::escape_markdown;

/// Heading text of the book summary section
pub const SUMMARY_SECTION: &str = "内容简介";
/// Heading text of the author intro section
pub const AUTHOR_SECTION: &str = "作者简介";

const COLLAPSED_MARKER: &str = "(展开全部)";

fn section_body<'a>(headings: &[ElementRef<'a>], section: &str) -> Option<ElementRef<'a>> {
    let heading = headings
        .iter()
        .find(|h2| element_text(**h2).contains(section))?;
    next_element_sibling(*heading)
}

fn paragraphs(intro: ElementRef<'_>, escape: bool) -> Vec<String> {
    select_all_in(intro, "p")
        .into_iter()
        .map(|p| element_text(p).trim().to_string())
        .filter(|text| !text.is_empty())
        .map(|text| if escape { escape_markdown(&text) } else { text })
        .collect()
}

/// Paragraphs of the full intro under the heading containing `section`.
///
/// Collapsed teaser blocks are skipped. Paragraphs are joined with newlines.
pub fn intro_section(headings: &[ElementRef<'_>], section: &str, escape: bool) -> Field<String> {
    let Some(body) = section_body(headings, section) else {
        return Field::Unknown;
    };

    let text = select_all_in(body, "div.intro")
        .into_iter()
        .filter(|intro| !element_text(*intro).contains(COLLAPSED_MARKER))
        .map(|intro| paragraphs(intro, escape).join("\n"))
        .collect::<Vec<_>>()
        .join("\n");

    Field::text(text.trim())
}

/// Every paragraph under the heading containing `section`, unfiltered
pub fn flat_intro_section(headings: &[ElementRef<'_>], section: &str) -> Field<String> {
    let Some(body) = section_body(headings, section) else {
        return Field::Unknown;
    };

    let text = select_all_in(body, "div.intro p")
        .into_iter()
        .map(|p| element_text(p).trim().to_string())
        .collect::<Vec<_>>()
        .join("\n");

    Field::text(text)
}

/// Text of the first intro block in the related-info column that is not
/// the author intro
pub fn flat_summary(document: &Html) -> Field<String> {
    select_first(document, ".related_info .indent .intro:not(.author-info)")
        .map(|intro| Field::text(element_text(intro).trim()))
        .unwrap_or_default()
}
