use crate::config::Settings;
use crate::domain::series::SeriesRequest;
use crate::upstream::QuoteProvider;
use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const QUOTE_PATH: &str = "/quote";
const TIME_SERIES_PATH: &str = "/time_series";
const BODY_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct TwelveDataClient {
    http: reqwest::Client,
    base_url: String,
}

impl TwelveDataClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .quote_provider_base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string();
        let timeout_secs = settings
            .quote_provider_timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build quote provider http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let res = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            // The request URL carries the api key.
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("quote provider request to {path} failed"))?;

        // The provider reports most failures in-band, so the body is parsed whatever the status.
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("failed to read quote provider response")?;

        if !status.is_success() {
            tracing::debug!(%status, path, "quote provider returned non-success status");
        }
        parse_body(status, &text)
    }
}

#[async_trait::async_trait]
impl QuoteProvider for TwelveDataClient {
    fn provider_name(&self) -> &'static str {
        "twelvedata"
    }

    async fn fetch_batch(&self, symbols: &str, api_key: &str) -> Result<Value> {
        self.get_json(QUOTE_PATH, &[("symbol", symbols), ("apikey", api_key)])
            .await
    }

    async fn fetch_single(&self, symbol: &str, api_key: &str) -> Result<Value> {
        self.get_json(QUOTE_PATH, &[("symbol", symbol), ("apikey", api_key)])
            .await
    }

    async fn fetch_time_series(&self, req: &SeriesRequest, api_key: &str) -> Result<Value> {
        self.get_json(
            TIME_SERIES_PATH,
            &[
                ("symbol", req.symbol.as_str()),
                ("interval", req.interval.as_str()),
                ("outputsize", req.outputsize.as_str()),
                ("order", "asc"),
                ("apikey", api_key),
            ],
        )
        .await
    }
}

fn parse_body(status: reqwest::StatusCode, text: &str) -> Result<Value> {
    serde_json::from_str::<Value>(text).with_context(|| {
        let snippet: String = text.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("quote provider HTTP {status} response is not valid JSON: {snippet}")
    })
}
