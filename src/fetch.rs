//! Page fetching
//!
//! The workflow only talks to [`PageFetcher`], so tests can serve fixtures
//! without a network. [`HttpFetcher`] is the reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::SiteConfig;
use crate::error::{Error, Result};

/// Source of raw HTML for a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the response body
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher with fixed headers and a bounded timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client carrying the configured headers and timeout
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("invalid user agent: {}", e)))?,
        );
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&config.content_type)
                .map_err(|e| Error::Config(format!("invalid content type: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes ({})", body.len(), status);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use tokio::net::TcpListener;

    /// Accepts connections and never answers
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_sends_configured_headers() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/subject/123456")
            .match_header("user-agent", "test-agent/1.0")
            .match_header("content-type", "text/html; charset=utf-8")
            .with_status(200)
            .with_body("<html><body>ok</body></html>")
            .expect(1)
            .create_async()
            .await;

        let config = SiteConfig::builder().user_agent("test-agent/1.0").build();
        let fetcher = HttpFetcher::new(&config).unwrap();

        let body = fetcher
            .fetch(&format!("{}/subject/123456", server.url()))
            .await
            .unwrap();
        assert!(body.contains("ok"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_reports_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("forbidden")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&SiteConfig::default()).unwrap();
        let result = fetcher.fetch(&format!("{}/search?q=x", server.url())).await;

        assert!(matches!(result, Err(Error::Status { status: 403, .. })));
        mock.assert_async().await;
    }

    #[test]
    fn test_rejects_invalid_user_agent() {
        let config = SiteConfig::builder().user_agent("bad\nagent").build();
        assert!(matches!(HttpFetcher::new(&config), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let base = silent_server().await;
        let config = SiteConfig::builder().timeout_ms(200).build();
        let fetcher = HttpFetcher::new(&config).unwrap();

        let err = fetcher
            .fetch(&format!("{}/subject/1", base))
            .await
            .unwrap_err();
        assert!(err.is_timeout(), "expected a timeout, got {}", err);
    }
}
