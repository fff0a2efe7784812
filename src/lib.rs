//! Douban book search and metadata extraction
//!
//! Searches douban.com for a book, offers the hits as labeled candidates and
//! turns the chosen detail page into a normalized record:
//! - Search results (`.result-list .result`)
//! - OpenGraph / `book:*` meta tags
//! - The `#info` label block
//! - Intro sections, quotes, table of contents and user tags

pub mod config;
pub mod detail;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod field;
pub mod format;
pub mod record;
pub mod search;
pub mod workflow;

pub use config::{IntroStyle, RecordOptions, SiteConfig};
pub use detail::{fetch_book_record, parse_book_record, DetailPageParser, FAILED_MESSAGE};
pub use error::{Error, Result};
pub use fetch::{HttpFetcher, PageFetcher};
pub use field::{Field, UNKNOWN};
pub use record::{BookRecord, RecordOutcome, Variables};
pub use search::{parse_search_results, SearchCandidate, SearchResultParser};
pub use workflow::{Host, Notice, Workflow, WorkflowOutcome, QUERY_PROMPT};
