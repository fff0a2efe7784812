//! Detail page parsing
//!
//! Parses the page once, derives the shared sub-selections into an
//! [`ExtractionContext`], then runs every field extractor against it.

use scraper::{ElementRef, Html};
use tracing::{debug, warn};
use url::Url;

use crate::config::{IntroStyle, RecordOptions};
use crate::extractors::css_extractor::{element_text, select_all, select_first};
use crate::extractors::{
    collect_meta_tags, extract_quotes, flat_intro_section, flat_summary, intro_section,
    labeled_list, labeled_text, meta_content, meta_contents, rating_value, table_of_contents,
    InfoLabel, ScriptTagHeuristic, TagExtractor, AUTHOR_SECTION, SUMMARY_SECTION,
};
use crate::fetch::PageFetcher;
use crate::field::Field;
use crate::format::{format_authors, sanitize_title};
use crate::record::{BookRecord, RecordOutcome};

/// Message of the degraded record returned when a page cannot be fetched
pub const FAILED_MESSAGE: &str = "Failed to parse the content due to an error.";

/// Parsed detail page plus the selections every extractor shares
pub struct ExtractionContext<'a> {
    pub document: &'a Html,
    /// Text content of the `#info` block
    pub info: Option<String>,
    pub metas: Vec<ElementRef<'a>>,
    pub headings: Vec<ElementRef<'a>>,
    pub figures: Vec<ElementRef<'a>>,
    /// Numeric id from the page URL, empty if there is none
    pub book_id: String,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(document: &'a Html, source_url: &str) -> Self {
        Self {
            document,
            info: select_first(document, "#info").map(element_text),
            metas: collect_meta_tags(document),
            headings: select_all(document, "h2"),
            figures: select_all(document, "figure"),
            book_id: book_id_from_url(source_url),
        }
    }

    fn info_field(&self, label: InfoLabel) -> Field<String> {
        labeled_text(self.info.as_deref(), label.pattern())
    }
}

/// Numeric book id of a detail page URL.
///
/// The last all-digit path segment wins, so hosts and ports never count.
/// Input that is not an absolute URL falls back to its first digit run.
pub fn book_id_from_url(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        let id = parsed
            .path_segments()
            .and_then(|mut segments| {
                segments.rfind(|segment| {
                    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
                })
            })
            .map(str::to_string);
        if let Some(id) = id {
            return id;
        }
    }
    url.split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Parser for book detail pages
pub struct DetailPageParser {
    options: RecordOptions,
    tags: Box<dyn TagExtractor>,
}

impl Default for DetailPageParser {
    fn default() -> Self {
        Self::new(RecordOptions::default())
    }
}

impl DetailPageParser {
    pub fn new(options: RecordOptions) -> Self {
        Self {
            options,
            tags: Box::new(ScriptTagHeuristic::default()),
        }
    }

    /// Replace the tag lookup
    pub fn with_tag_extractor(mut self, tags: impl TagExtractor + 'static) -> Self {
        self.tags = Box::new(tags);
        self
    }

    /// Extract a complete record. Any input, including an empty string,
    /// yields every field.
    pub fn parse(&self, html: &str, source_url: &str) -> BookRecord {
        let document = Html::parse_document(html);
        let ctx = ExtractionContext::new(&document, source_url);
        debug!(
            "Parsing detail page {} (book id '{}', info block: {})",
            source_url,
            ctx.book_id,
            ctx.info.is_some()
        );

        let title = meta_content(&ctx.metas, "og:title").unwrap_or(self.options.untitled.clone());
        let title = if self.options.clean_titles {
            sanitize_title(&title)
        } else {
            title
        };

        let (summary, author_intro) = match self.options.intro_style {
            IntroStyle::Sections => (
                intro_section(&ctx.headings, SUMMARY_SECTION, self.options.escape_markdown),
                intro_section(&ctx.headings, AUTHOR_SECTION, self.options.escape_markdown),
            ),
            IntroStyle::Flat => (
                flat_summary(ctx.document),
                flat_intro_section(&ctx.headings, AUTHOR_SECTION),
            ),
        };

        BookRecord {
            title,
            subtitle: ctx.info_field(InfoLabel::Subtitle),
            authors: format_authors(&meta_contents(&ctx.metas, "book:author")),
            isbn: meta_content(&ctx.metas, "book:isbn"),
            cover_url: meta_content(&ctx.metas, "og:image"),
            publisher: ctx.info_field(InfoLabel::Publisher),
            original_title: ctx.info_field(InfoLabel::OriginalTitle),
            translators: labeled_list(ctx.info.as_deref(), InfoLabel::Translators.pattern(), '/'),
            publication_year: ctx.info_field(InfoLabel::PublicationYear),
            page_count: ctx.info_field(InfoLabel::PageCount),
            rating: rating_value(ctx.document),
            summary,
            author_intro,
            quotes: extract_quotes(&ctx.figures),
            contents: table_of_contents(ctx.document, &ctx.book_id),
            tags: self.tags.extract_tags(ctx.document),
            source_url: source_url.to_string(),
        }
        .normalize()
    }

    /// Fetch `url` and parse it. A failed fetch yields
    /// [`RecordOutcome::Failed`] instead of an error.
    pub async fn fetch(&self, fetcher: &dyn PageFetcher, url: &str) -> RecordOutcome {
        match fetcher.fetch(url).await {
            Ok(html) => RecordOutcome::Complete(self.parse(&html, url)),
            Err(e) => {
                warn!("Failed to fetch or parse {}: {}", url, e);
                RecordOutcome::Failed {
                    message: FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}

/// Parse a detail page with the default options
pub fn parse_book_record(html: &str, source_url: &str) -> BookRecord {
    DetailPageParser::default().parse(html, source_url)
}

/// Fetch and parse a detail page with the default options
pub async fn fetch_book_record(fetcher: &dyn PageFetcher, url: &str) -> RecordOutcome {
    DetailPageParser::default().fetch(fetcher, url).await
}
