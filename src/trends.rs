use regex::Regex;
use reqwest::header::USER_AGENT;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TrendFetchError {
    #[error("trending request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("received an empty list of trending topics")]
    Empty,
}

/// Source of candidate topics. The contract requires an explicit error when
/// there is nothing to return, so callers never see a successful empty list.
pub trait TrendSource {
    async fn fetch(&self, region: &str, limit: usize) -> Result<Vec<String>, TrendFetchError>;
}

/// Google Trends daily-trends RSS feed, queried by geo code ("US", "GB", ...).
pub struct GoogleTrends {
    client: reqwest::Client,
}

impl GoogleTrends {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl TrendSource for GoogleTrends {
    async fn fetch(&self, region: &str, limit: usize) -> Result<Vec<String>, TrendFetchError> {
        let url = format!("https://trends.google.com/trending/rss?geo={}", region);
        debug!("Fetching trending topics from {}", url);
        let body = self
            .client
            .get(&url)
            .header(USER_AGENT, "trendtoons/0.1")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let topics = parse_rss_titles(&body, limit);
        if topics.is_empty() {
            return Err(TrendFetchError::Empty);
        }
        Ok(topics)
    }
}

/// Pull item titles out of the RSS feed. The first title is the channel name
/// and is dropped.
fn parse_rss_titles(feed: &str, limit: usize) -> Vec<String> {
    let re = Regex::new(r"<title>(?:<!\[CDATA\[)?([^<\]]+)(?:\]\]>)?</title>").unwrap();
    let mut titles: Vec<String> = Vec::new();
    for cap in re.captures_iter(feed) {
        let title = cap[1].trim();
        if !title.is_empty() {
            titles.push(title.to_string());
        }
    }
    if !titles.is_empty() {
        titles.remove(0);
    }
    titles.truncate(limit);
    titles
}
