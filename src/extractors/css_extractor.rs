//! CSS selector helpers
//!
//! Uses the scraper crate to select elements by CSS selectors. Every helper
//! returns `None` or an empty list instead of failing, including on
//! selectors that do not compile.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Compile a selector, logging and discarding invalid ones
pub fn selector(selector_str: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!("Invalid selector '{}': {:?}", selector_str, e);
            None
        }
    }
}

/// All elements in the document matching a CSS selector
pub fn select_all<'a>(document: &'a Html, selector_str: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = selector(selector_str) else {
        return vec![];
    };
    document.select(&selector).collect()
}

/// First element in the document matching a CSS selector
pub fn select_first<'a>(document: &'a Html, selector_str: &str) -> Option<ElementRef<'a>> {
    let selector = selector(selector_str)?;
    document.select(&selector).next()
}

/// First descendant of `scope` matching a CSS selector
pub fn select_first_in<'a>(scope: ElementRef<'a>, selector_str: &str) -> Option<ElementRef<'a>> {
    let selector = selector(selector_str)?;
    scope.select(&selector).next()
}

/// All descendants of `scope` matching a CSS selector
pub fn select_all_in<'a>(scope: ElementRef<'a>, selector_str: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = selector(selector_str) else {
        return vec![];
    };
    scope.select(&selector).collect()
}

/// Concatenated text content of an element, untrimmed
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Trimmed text of the first descendant of `scope` matching a selector
pub fn first_text_in(scope: ElementRef<'_>, selector_str: &str) -> Option<String> {
    select_first_in(scope, selector_str).map(|el| element_text(el).trim().to_string())
}

/// First element sibling following `element`
pub fn next_element_sibling<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_select() {
        let html = r#"
        <div class="result-list">
            <div class="result"><h3><a href="/link2/?a=1">活着</a></h3><span class="rating_nums">9.4</span></div>
            <div class="result"><h3><a href="/link2/?a=2">许三观卖血记</a></h3></div>
        </div>
        "#;
        let document = Html::parse_document(html);

        let results = select_all(&document, ".result-list .result");
        assert_eq!(results.len(), 2);
        assert_eq!(element_text(select_first_in(results[1], "h3 a").unwrap()), "许三观卖血记");

        assert_eq!(first_text_in(results[0], ".rating_nums").unwrap(), "9.4");
        assert!(first_text_in(results[1], ".rating_nums").is_none());
        assert_eq!(select_all_in(results[0], "a").len(), 1);
        assert!(select_first(&document, ".subject-cast").is_none());
    }

    #[test]
    fn test_invalid_selector_is_empty() {
        let document = Html::parse_document("<p>text</p>");
        assert!(select_all(&document, "p[").is_empty());
        assert!(select_first(&document, ":::").is_none());
    }

    #[test]
    fn test_next_element_sibling_skips_text() {
        let html = r#"<div><h2 id="h">Title</h2>
            some text
            <div class="body">Body</div></div>"#;
        let document = Html::parse_document(html);

        let heading = select_first(&document, "#h").unwrap();
        let sibling = next_element_sibling(heading).unwrap();
        assert_eq!(sibling.value().attr("class"), Some("body"));
    }
}
