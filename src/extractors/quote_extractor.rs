//! Quotes from the "原文摘录" section
//!
//! Each quote is a `<figure>` whose first child holds the quote text and
//! whose `<figcaption>` names the source (page or chapter).

use scraper::node::Node;
use scraper::ElementRef;

use super::css_extractor::{element_text, select_first_in};

fn first_child_text(figure: ElementRef<'_>) -> String {
    let Some(child) = figure.first_child() else {
        return String::new();
    };
    match child.value() {
        Node::Text(text) => text.replace('(', ""),
        Node::Element(_) => ElementRef::wrap(child)
            .map(|el| element_text(el).replace('(', ""))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// One `quote\nsource` entry per figure; figures with neither are dropped
pub fn extract_quotes(figures: &[ElementRef<'_>]) -> Vec<String> {
    figures
        .iter()
        .filter_map(|figure| {
            let quote = first_child_text(*figure).trim().to_string();
            let source: String = select_first_in(*figure, "figcaption")
                .map(element_text)
                .unwrap_or_default()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();

            if quote.is_empty() && source.is_empty() {
                return None;
            }
            Some(format!("{}\n{}", quote, source).trim().to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::css_extractor::select_all;
    use scraper::Html;

    #[test]
    fn test_extract_quotes() {
        let html = r#"
            <blockquote>
            <figure>人是为活着本身而活着的。 (<a href="/review/1">查看原文</a>)<figcaption>——引自 第 7 页</figcaption></figure>
            <figure></figure>
            <figure>没有来源的句子</figure>
            </blockquote>
        "#;
        let document = Html::parse_document(html);
        let figures = select_all(&document, "figure");

        let quotes = extract_quotes(&figures);
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0], "人是为活着本身而活着的。\n——引自第7页");
        assert_eq!(quotes[1], "没有来源的句子");
    }

    #[test]
    fn test_no_figures() {
        assert!(extract_quotes(&[]).is_empty());
    }
}
