//! Wikipedia REST summary provider

use std::time::Duration;

use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::providers::{classify, AttemptFailure, EncyclopediaApi};

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: Option<String>,
}

#[derive(Clone)]
pub struct WikipediaClient {
    http_client: HttpClient,
    api_url: String,
}

impl WikipediaClient {
    /// Wikimedia asks API clients to identify themselves, hence `user_agent`
    pub fn new(api_url: String, user_agent: &str, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl EncyclopediaApi for WikipediaClient {
    async fn summary(&self, page_title: &str) -> Result<Option<String>, AttemptFailure> {
        let url = format!(
            "{}/page/summary/{}",
            self.api_url,
            urlencoding::encode(page_title)
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptFailure::from_status(status.as_u16()));
        }

        let page: PageSummary = response.json().await.map_err(classify)?;
        Ok(page.extract.filter(|text| !text.trim().is_empty()))
    }
}
