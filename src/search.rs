//! Search-results page parsing
//!
//! Turns the site search page into an ordered list of labeled candidates.
//! Result nodes without a recoverable book id are skipped.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};
use serde::Serialize;
use tracing::debug;

use crate::config::SiteConfig;
use crate::extractors::css_extractor::{element_text, first_text_in, select_all, select_first_in};
use crate::format::sanitize_title;

/// Digits immediately followed by a comma, e.g. `sid: 4913064,`
static BOOK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+),").expect("book id pattern is valid"));

const RESULT_NODE: &str = ".result-list .result";
const TITLE_LINK: &str = "h3 a";
const DESCRIPTOR: &str = ".subject-cast";
const RATING: &str = ".rating_nums";
const RATING_COUNT: &str = ".rating-info span:nth-of-type(3)";

/// Descriptor shown when a result has no contributor/year line
pub const NO_DETAILS: &str = "信息不详";
/// Rating shown for unrated books
pub const NOT_RATED: &str = "暂无评分";
/// Rater count shown when a rating exists but the count is missing
pub const TOO_FEW_RATINGS: &str = "评价人数不足";

/// One selectable search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCandidate {
    /// Human-readable line shown in the picklist
    pub display_label: String,
    /// Detail page of the book
    pub detail_url: String,
}

impl SearchCandidate {
    /// Label function handed to the picklist
    pub fn display_label(&self) -> &str {
        &self.display_label
    }
}

/// Parser for the site search page
#[derive(Debug, Clone)]
pub struct SearchResultParser {
    config: SiteConfig,
}

impl Default for SearchResultParser {
    fn default() -> Self {
        Self::new(&SiteConfig::default())
    }
}

impl SearchResultParser {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Candidates in document order. Never fails; an unrelated page yields
    /// an empty list.
    pub fn parse(&self, html: &str) -> Vec<SearchCandidate> {
        let document = Html::parse_document(html);
        let nodes = select_all(&document, RESULT_NODE);
        debug!("Found {} result nodes", nodes.len());

        let candidates: Vec<SearchCandidate> = nodes
            .into_iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let candidate = self.candidate(node);
                if candidate.is_none() {
                    debug!("Skipping result {} without a book id", index);
                }
                candidate
            })
            .collect();

        debug!("Parsed {} candidates", candidates.len());
        candidates
    }

    fn candidate(&self, node: ElementRef<'_>) -> Option<SearchCandidate> {
        let link = select_first_in(node, TITLE_LINK)?;
        let id = link
            .value()
            .attr("onclick")
            .and_then(|onclick| BOOK_ID.captures(onclick))
            .and_then(|caps| caps.get(1))?
            .as_str();

        let mut title = element_text(link).trim().to_string();
        if self.config.record.clean_titles {
            title = sanitize_title(&title);
        }

        let descriptor = first_text_in(node, DESCRIPTOR).unwrap_or_else(|| NO_DETAILS.to_string());
        let rating = first_text_in(node, RATING)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NOT_RATED.to_string());

        let mut display_label = format!("📚 《{}》 {} / {}", title, descriptor, rating);
        if self.config.record.show_rating_count && rating != NOT_RATED {
            let count = first_text_in(node, RATING_COUNT)
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| TOO_FEW_RATINGS.to_string());
            display_label.push(' ');
            display_label.push_str(&count);
        }

        Some(SearchCandidate {
            display_label,
            detail_url: self.config.detail_url_for(id),
        })
    }
}

/// Parse a search page with the default configuration
pub fn parse_search_results(html: &str) -> Vec<SearchCandidate> {
    SearchResultParser::default().parse(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordOptions;
    use proptest::prelude::*;

    fn result_node(onclick: &str, title: &str, extra: &str) -> String {
        format!(
            r#"<div class="result">
                <div class="content">
                    <div class="title">
                        <h3><span>[书籍]</span>&nbsp;<a href="https://www.douban.com/link2/?url=x" onclick="{}">{}</a></h3>
                        {}
                    </div>
                </div>
            </div>"#,
            onclick, title, extra
        )
    }

    fn search_page(nodes: &[String]) -> String {
        format!(
            r#"<html><body><div class="search-result"><div class="result-list">{}</div></div></body></html>"#,
            nodes.concat()
        )
    }

    #[test]
    fn test_candidate_from_onclick_id() {
        let html = search_page(&[result_node(
            "rating('book',123456,'search')",
            "Example Book",
            "",
        )]);

        let candidates = parse_search_results(&html);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].detail_url.ends_with("/123456"));
        assert_eq!(candidates[0].detail_url, "https://book.douban.com/subject/123456");
    }

    #[test]
    fn test_label_with_rating_and_count() {
        let extra = r#"
            <div class="rating-info">
                <span class="allstar45"></span>
                <span class="rating_nums">9.4</span>
                <span>(812345人评价)</span>
                <span class="subject-cast">余华 / 作家出版社 / 2012</span>
            </div>"#;
        let html = search_page(&[result_node(
            "moreurl(this,{i: '0', query: 'x', from: 'dou_search_book', sid: 4913064, qcat: '1001'})",
            "活着",
            extra,
        )]);

        let candidates = parse_search_results(&html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].display_label,
            "📚 《活着》 余华 / 作家出版社 / 2012 / 9.4 (812345人评价)"
        );
        assert_eq!(candidates[0].detail_url, "https://book.douban.com/subject/4913064");
    }

    #[test]
    fn test_fallback_strings() {
        let html = search_page(&[result_node("rating('book',42,'x')", "冷门书", "")]);

        let candidates = parse_search_results(&html);
        assert_eq!(candidates[0].display_label, "📚 《冷门书》 信息不详 / 暂无评分");
    }

    #[test]
    fn test_rating_without_count() {
        let extra = r#"<div class="rating-info"><span class="rating_nums">7.1</span></div>"#;
        let html = search_page(&[result_node("rating('book',7,'x')", "书", extra)]);

        let candidates = parse_search_results(&html);
        assert_eq!(candidates[0].display_label, "📚 《书》 信息不详 / 7.1 评价人数不足");

        let config = SiteConfig {
            record: RecordOptions {
                show_rating_count: false,
                ..RecordOptions::default()
            },
            ..SiteConfig::default()
        };
        let candidates = SearchResultParser::new(&config).parse(&html);
        assert_eq!(candidates[0].display_label, "📚 《书》 信息不详 / 7.1");
    }

    #[test]
    fn test_nodes_without_id_are_dropped() {
        let html = search_page(&[
            result_node("rating('book',1,'x')", "一", ""),
            result_node("no digits here", "二", ""),
            result_node("rating('book',3,'x')", "三", ""),
            result_node("rating('book',1,'x')", "一", ""),
        ]);

        let candidates = parse_search_results(&html);
        let urls: Vec<&str> = candidates.iter().map(|c| c.detail_url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://book.douban.com/subject/1",
                "https://book.douban.com/subject/3",
                "https://book.douban.com/subject/1",
            ]
        );
    }

    #[test]
    fn test_clean_titles_option() {
        let html = search_page(&[result_node("rating('book',5,'x')", "A/B: \"C\"", "")]);
        let config = SiteConfig {
            record: RecordOptions {
                clean_titles: true,
                ..RecordOptions::default()
            },
            ..SiteConfig::default()
        };

        let candidates = SearchResultParser::new(&config).parse(&html);
        assert!(candidates[0].display_label.starts_with("📚 《A，B，  C 》"));
    }

    #[test]
    fn test_detail_url_uses_configured_base() {
        let html = search_page(&[result_node("rating('book',9,'x')", "书", "")]);
        let config = SiteConfig::builder()
            .detail_base("http://127.0.0.1:8080/subject/")
            .build();

        let candidates = SearchResultParser::new(&config).parse(&html);
        assert_eq!(candidates[0].detail_url, "http://127.0.0.1:8080/subject/9");
    }

    #[test]
    fn test_empty_page() {
        assert!(parse_search_results("").is_empty());
        assert!(parse_search_results("<html><body><p>没有找到</p></body></html>").is_empty());
    }

    proptest! {
        #[test]
        fn parse_never_panics(html in "\\PC*") {
            let _ = parse_search_results(&html);
        }
    }
}
