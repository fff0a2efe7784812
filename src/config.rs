//! Site and record configuration
//!
//! `SiteConfig::default()` reproduces the reference behavior against
//! douban.com. Every field can be overridden from a JSON file or the builder.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/98.100.4758.11 Safari/537.36";

/// How the summary and author intro sections are located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntroStyle {
    /// Anchor on the `h2` heading and read its `div.intro` paragraphs,
    /// skipping the collapsed teaser block
    #[default]
    Sections,
    /// Summary from the first non-author intro block, author intro from
    /// every paragraph after the heading, no filtering
    Flat,
}

/// Formatting switches for candidate labels and book records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordOptions {
    /// Append the number of ratings to candidate labels
    pub show_rating_count: bool,
    /// Sanitize titles in labels and in the record itself
    pub clean_titles: bool,
    /// Escape markdown-significant characters in intro text
    pub escape_markdown: bool,
    /// Add a `fileName` variable derived from the title
    pub derive_file_name: bool,
    /// Strategy for the summary and author intro fields
    pub intro_style: IntroStyle,
    /// Title used when the page has no `og:title`
    pub untitled: String,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            show_rating_count: true,
            clean_titles: false,
            escape_markdown: true,
            derive_file_name: true,
            intro_style: IntroStyle::Sections,
            untitled: "Unknown Title".to_string(),
        }
    }
}

/// Endpoints, request headers and record options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Search endpoint, without query string
    pub search_url: String,
    /// Value of the `cat` parameter selecting the book category
    pub search_category: String,
    /// Prefix of detail pages; the numeric id is appended
    pub detail_base: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Content type header sent with every request
    pub content_type: String,
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Record formatting
    pub record: RecordOptions,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.douban.com/search".to_string(),
            search_category: "1001".to_string(),
            detail_base: "https://book.douban.com/subject".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            content_type: "text/html; charset=utf-8".to_string(),
            timeout_ms: 5000,
            record: RecordOptions::default(),
        }
    }
}

impl SiteConfig {
    /// Create a new builder
    pub fn builder() -> SiteConfigBuilder {
        SiteConfigBuilder::new()
    }

    /// Load a JSON config file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::Config("timeout_ms must be greater than 0".to_string()));
        }
        Url::parse(&self.search_url)?;
        Url::parse(&self.detail_base)?;
        if self.search_category.trim().is_empty() {
            return Err(Error::Config("search_category is empty".to_string()));
        }
        Ok(())
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// URL of the search-results page for `query`
    pub fn search_url_for(&self, query: &str) -> Result<Url> {
        let url = Url::parse_with_params(
            &self.search_url,
            &[("cat", self.search_category.as_str()), ("q", query)],
        )?;
        Ok(url)
    }

    /// URL of the detail page for a numeric book id
    pub fn detail_url_for(&self, id: &str) -> String {
        format!("{}/{}", self.detail_base.trim_end_matches('/'), id)
    }
}

/// Builder for SiteConfig
#[derive(Debug, Default)]
pub struct SiteConfigBuilder {
    config: SiteConfig,
}

impl SiteConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: SiteConfig::default(),
        }
    }

    /// Set the search endpoint
    pub fn search_url(mut self, search_url: impl Into<String>) -> Self {
        self.config.search_url = search_url.into();
        self
    }

    /// Set the detail page prefix
    pub fn detail_base(mut self, detail_base: impl Into<String>) -> Self {
        self.config.detail_base = detail_base.into();
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout in milliseconds
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Replace the record options
    pub fn record(mut self, record: RecordOptions) -> Self {
        self.config.record = record;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SiteConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_search_url_encodes_query() {
        let config = SiteConfig::default();
        let url = config.search_url_for("活着 余华").unwrap();

        assert_eq!(url.host_str(), Some("www.douban.com"));
        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("cat".to_string(), "1001".to_string()),
                ("q".to_string(), "活着 余华".to_string()),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_detail_url_single_slash() {
        let config = SiteConfig::builder()
            .detail_base("https://book.douban.com/subject/")
            .build();
        assert_eq!(
            config.detail_url_for("123456"),
            "https://book.douban.com/subject/123456"
        );
    }

    #[test]
    fn test_from_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "timeout_ms": 2500, "record": {{ "intro_style": "flat", "escape_markdown": false }} }}"#
        )
        .unwrap();

        let config = SiteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.record.intro_style, IntroStyle::Flat);
        assert!(!config.record.escape_markdown);
        assert!(config.record.show_rating_count);
        assert_eq!(config.search_category, "1001");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = SiteConfig::builder().timeout_ms(0).build();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file_rejects_bad_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "search_url": "not a url" }}"#).unwrap();

        assert!(matches!(
            SiteConfig::from_file(file.path()),
            Err(Error::UrlParse(_))
        ));
    }
}
