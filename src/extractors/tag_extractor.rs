//! User tag extraction
//!
//! The page carries its tags inside an inline script as
//! `criteria = '7:小说|7:文学|...'`. Which script holds it is not stable, so
//! the lookup sits behind [`TagExtractor`] and can be replaced.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::css_extractor::{element_text, select_all};
use crate::field::Field;

static TAG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([\x{4e00}-\x{9fa5}·]+)").expect("tag pattern is valid"));

/// Source of the comma-joined tag list for a detail page
pub trait TagExtractor: Send + Sync {
    fn extract_tags(&self, document: &Html) -> Field<String>;
}

/// Reads the script at a fixed distance from the end of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptTagHeuristic {
    /// 1-based position counted from the last script
    pub from_end: usize,
}

impl Default for ScriptTagHeuristic {
    fn default() -> Self {
        Self { from_end: 3 }
    }
}

impl TagExtractor for ScriptTagHeuristic {
    fn extract_tags(&self, document: &Html) -> Field<String> {
        if self.from_end == 0 {
            return Field::Unknown;
        }
        let scripts = select_all(document, "script");
        let Some(index) = scripts.len().checked_sub(self.from_end) else {
            return Field::Unknown;
        };
        tags_from_script(&element_text(scripts[index]))
    }
}

/// Every CJK run directly after a colon, joined with ", "
pub fn tags_from_script(script: &str) -> Field<String> {
    let tags: Vec<&str> = TAG_RUN
        .captures_iter(script)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect();
    Field::text(tags.join(", "))
}
