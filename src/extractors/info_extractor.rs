//! `#info` block and other labeled text on the detail page
//!
//! The info block is a run of `label: value` lines separated by `<br>`.
//! Its text content is matched against one pattern per label.

use std::sync::LazyLock;

use regex::Regex;
use scraper::node::Node;
use scraper::Html;

use super::css_extractor::{element_text, select_first};
use crate::field::Field;

static SUBTITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"副标题:\s*([\S ]+)").expect("subtitle pattern is valid"));
static PUBLISHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"出版社:\s*([^\n\r]+)").expect("publisher pattern is valid"));
static ORIGINAL_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"原作名:\s*([^\n\r]+)").expect("original title pattern is valid"));
static TRANSLATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"译者:\s*([^\n\r]+)").expect("translator pattern is valid"));
static PUBLICATION_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"出版年:\s*([^\n\r]+)").expect("year pattern is valid"));
static PAGE_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"页数:\s*([^\n\r]+)").expect("page count pattern is valid"));
static RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.]+").expect("rating pattern is valid"));

/// A labeled line of the `#info` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoLabel {
    Subtitle,
    Publisher,
    OriginalTitle,
    Translators,
    PublicationYear,
    PageCount,
}

impl InfoLabel {
    /// Pattern capturing the value after the label
    pub fn pattern(self) -> &'static Regex {
        match self {
            Self::Subtitle => &SUBTITLE,
            Self::Publisher => &PUBLISHER,
            Self::OriginalTitle => &ORIGINAL_TITLE,
            Self::Translators => &TRANSLATORS,
            Self::PublicationYear => &PUBLICATION_YEAR,
            Self::PageCount => &PAGE_COUNT,
        }
    }
}

/// First capture of `pattern` in the block text, trimmed
pub fn labeled_text(info: Option<&str>, pattern: &Regex) -> Field<String> {
    info.and_then(|text| pattern.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| Field::text(m.as_str().trim()))
        .unwrap_or_default()
}

/// Like [`labeled_text`], split on `delimiter` into trimmed items
pub fn labeled_list(info: Option<&str>, pattern: &Regex, delimiter: char) -> Field<Vec<String>> {
    match labeled_text(info, pattern) {
        Field::Known(value) => Field::list(value.split(delimiter).map(|item| item.trim().to_string())),
        Field::Unknown => Field::Unknown,
    }
}

/// Average rating shown in the interest section, e.g. `9.4`
pub fn rating_value(document: &Html) -> Field<String> {
    select_first(document, "#interest_sectl strong.rating_num")
        .map(element_text)
        .and_then(|text| RATING.find(&text).map(|m| m.as_str().to_string()))
        .into()
}

/// Lines of the expanded table of contents, `#dir_{id}_full`.
///
/// Text is gathered across inline markup and each `<br>` ends a line. The
/// trailing `· · · (收起)` collapse control is dropped.
pub fn table_of_contents(document: &Html, book_id: &str) -> Field<String> {
    let Some(block) = select_first(document, &format!("#dir_{}_full", book_id)) else {
        return Field::Unknown;
    };

    let mut lines = Vec::new();
    let mut current = String::new();
    for node in block.descendants() {
        match node.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(el) if el.name() == "br" => lines.push(std::mem::take(&mut current)),
            _ => {}
        }
    }
    lines.push(current);

    let mut lines: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();
    if lines.last().is_some_and(|line| is_collapse_control(line)) {
        lines.pop();
    }

    Field::text(lines.join("\n"))
}

fn is_collapse_control(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.trim_start_matches('·') == "(收起)"
}
