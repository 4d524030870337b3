use crate::parser::{ParseError, parse_devotional};
use crate::types::{DateKey, FetchedPage, SourcedDevotional};
use crate::utils::source_candidates;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.duranno.com";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";
const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("All source pages failed, last error: {message}")]
    FetchExhausted {
        status: Option<StatusCode>,
        message: String,
    },
    #[error("No successful response within {0:?}")]
    DeadlineExceeded(Duration),
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    /// Upper bound for a single GET, including reading the body.
    pub request_timeout: Duration,
    /// Upper bound for the whole candidate loop.
    pub deadline: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            deadline: Duration::from_secs(25),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    config: ScraperConfig,
    referer: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        // Every attempt should see the live page, never an intermediary's copy.
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()?;

        let referer = format!("{}/qt/", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            config,
            referer,
        })
    }

    /// Fetches the devotional for `date` and extracts it; `None` asks for the live page only.
    pub async fn fetch_devotional(
        &self,
        date: Option<&DateKey>,
    ) -> Result<SourcedDevotional, ScraperError> {
        let page = self.fetch_page(date).await?;
        let devotional = parse_devotional(&page.markup)?;
        log::info!(
            "Extracted '{}' ({} chars) from {}",
            devotional.title,
            devotional.verse.chars().count(),
            page.source_url
        );
        Ok(SourcedDevotional {
            devotional,
            source_url: page.source_url,
        })
    }

    /// Tries each source candidate in order and returns the first page served successfully.
    pub async fn fetch_page(&self, date: Option<&DateKey>) -> Result<FetchedPage, ScraperError> {
        tokio::time::timeout(self.config.deadline, self.try_candidates(date))
            .await
            .map_err(|_| {
                log::error!("Fetching devotional timed out after {:?}", self.config.deadline);
                ScraperError::DeadlineExceeded(self.config.deadline)
            })?
    }

    async fn try_candidates(&self, date: Option<&DateKey>) -> Result<FetchedPage, ScraperError> {
        let mut status = None;
        let mut message = String::from("no source pages to try");

        for url in source_candidates(&self.config.base_url, date) {
            log::info!("Fetching devotional page: {}", url);
            match self.get_html(&url).await {
                Ok(markup) => {
                    return Ok(FetchedPage {
                        markup,
                        source_url: url,
                    });
                }
                Err(e) => {
                    log::warn!("Source {} failed: {}", url, e);
                    status = e.status();
                    message = match e.status() {
                        Some(code) => format!("HTTP {}", code),
                        None => e.to_string(),
                    };
                }
            }
        }

        Err(ScraperError::FetchExhausted { status, message })
    }

    async fn get_html(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client
            .get(url)
            .header(header::REFERER, &self.referer)
            .send()
            .await
            .inspect_err(|e| log::debug!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::debug!("Decode error: {e:?}"))
    }
}
