//! End-to-end lookup flow
//!
//! Query, search, pick a candidate, fetch the detail page, hand the record
//! to the host. Each step that comes up empty ends the flow with a
//! [`Notice`]; nothing is retried.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::SiteConfig;
use crate::detail::DetailPageParser;
use crate::error::Result;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::record::{RecordOutcome, Variables};
use crate::search::{SearchCandidate, SearchResultParser};

/// Prompt shown when asking for the query
pub const QUERY_PROMPT: &str = "🔍请输入要搜索的图书名称或ISBN：";

/// User-facing message for each way the flow can end early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NothingEntered,
    NothingFound,
    NothingSelected,
    ProcessingError,
}

impl Notice {
    /// How long a host should keep the notice on screen
    pub const DISPLAY_DURATION: Duration = Duration::from_secs(5);

    pub fn message(&self) -> &'static str {
        match self {
            Self::NothingEntered => "没有输入任何内容",
            Self::NothingFound => "找不到你搜索的内容",
            Self::NothingSelected => "没有选择任何内容",
            Self::ProcessingError => "处理请求时发生错误",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The application the flow runs inside
#[async_trait]
pub trait Host: Send {
    /// Ask for free text; `None` if the prompt was dismissed
    async fn input_prompt(&mut self, prompt: &str) -> Option<String>;

    /// Let the user pick one candidate by its
    /// [`display_label`](SearchCandidate::display_label)
    async fn choose<'c>(&mut self, candidates: &'c [SearchCandidate]) -> Option<&'c SearchCandidate>;

    /// Show a transient message
    fn notify(&mut self, notice: Notice);
}

/// Terminal result of one run
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// Record variables for the host
    Done(Variables),
    /// Flow ended early; the notice was already shown
    Failed(Notice),
}

#[derive(Debug)]
enum WorkflowState {
    AwaitingQuery,
    Searching(String),
    AwaitingSelection(Vec<SearchCandidate>),
    FetchingDetail(SearchCandidate),
    Done(Variables),
    Failed(Notice),
}

/// Single-shot lookup flow over a page fetcher
pub struct Workflow<F> {
    config: SiteConfig,
    fetcher: F,
    search: SearchResultParser,
    detail: DetailPageParser,
}

impl Workflow<HttpFetcher> {
    /// Flow over HTTP with the given configuration
    pub fn from_config(config: SiteConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(config, fetcher))
    }
}

impl<F: PageFetcher> Workflow<F> {
    pub fn new(config: SiteConfig, fetcher: F) -> Self {
        Self {
            search: SearchResultParser::new(&config),
            detail: DetailPageParser::new(config.record.clone()),
            config,
            fetcher,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Replace the detail page parser, e.g. to swap the tag lookup
    pub fn with_detail_parser(mut self, detail: DetailPageParser) -> Self {
        self.detail = detail;
        self
    }

    /// Fetch and parse the search page for `query`
    pub async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>> {
        let url = self.config.search_url_for(query)?;
        let html = self.fetcher.fetch(url.as_str()).await?;
        Ok(self.search.parse(&html))
    }

    /// Fetch and parse one detail page
    pub async fn book(&self, url: &str) -> RecordOutcome {
        self.detail.fetch(&self.fetcher, url).await
    }

    /// Run the flow to completion. Failures are shown through
    /// [`Host::notify`] and returned, never raised.
    pub async fn run<H: Host + ?Sized>(&self, host: &mut H) -> WorkflowOutcome {
        let mut state = WorkflowState::AwaitingQuery;
        loop {
            state = match state {
                WorkflowState::Done(variables) => {
                    info!("Lookup finished with {} variables", variables.len());
                    return WorkflowOutcome::Done(variables);
                }
                WorkflowState::Failed(notice) => {
                    host.notify(notice);
                    return WorkflowOutcome::Failed(notice);
                }
                state => self.step(state, host).await,
            };
        }
    }

    async fn step<H: Host + ?Sized>(&self, state: WorkflowState, host: &mut H) -> WorkflowState {
        match state {
            WorkflowState::AwaitingQuery => match host.input_prompt(QUERY_PROMPT).await {
                Some(query) if !query.trim().is_empty() => {
                    WorkflowState::Searching(query.trim().to_string())
                }
                _ => WorkflowState::Failed(Notice::NothingEntered),
            },
            WorkflowState::Searching(query) => match self.search(&query).await {
                Ok(candidates) if !candidates.is_empty() => {
                    info!("{} candidates for '{}'", candidates.len(), query);
                    WorkflowState::AwaitingSelection(candidates)
                }
                Ok(_) => {
                    info!("No results for '{}'", query);
                    WorkflowState::Failed(Notice::NothingFound)
                }
                Err(e) if e.is_timeout() => {
                    warn!("Search for '{}' timed out after {}ms", query, self.config.timeout_ms);
                    WorkflowState::Failed(Notice::NothingFound)
                }
                Err(e) => {
                    warn!("Search for '{}' failed: {}", query, e);
                    WorkflowState::Failed(Notice::NothingFound)
                }
            },
            WorkflowState::AwaitingSelection(candidates) => match host.choose(&candidates).await {
                Some(candidate) => WorkflowState::FetchingDetail(candidate.clone()),
                None => WorkflowState::Failed(Notice::NothingSelected),
            },
            WorkflowState::FetchingDetail(candidate) => {
                let record = match self.book(&candidate.detail_url).await.into_record() {
                    Ok(record) => record,
                    Err(message) => {
                        error!("Detail page {} unusable: {}", candidate.detail_url, message);
                        return WorkflowState::Failed(Notice::ProcessingError);
                    }
                };
                match record.to_variables(self.config.record.derive_file_name) {
                    Ok(variables) => WorkflowState::Done(variables),
                    Err(e) => {
                        error!("Could not build variables for {}: {}", candidate.detail_url, e);
                        WorkflowState::Failed(Notice::ProcessingError)
                    }
                }
            }
            terminal => terminal,
        }
    }
}
