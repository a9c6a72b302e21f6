use crate::quote::error::QuoteRequestError;
use crate::quote::request::BatchQuoteRequest;
use crate::quote::response::{parse_simple_price, QuoteTable};
use async_trait::async_trait;
use reqwest::header;
use tracing::debug;
use tracing::instrument;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Where quotes come from. The board only talks to this seam.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quotes(&self, req: &BatchQuoteRequest) -> Result<QuoteTable, QuoteRequestError>;
}

#[derive(Clone, Debug)]
pub struct CoinGeckoClient {
    http_client: reqwest::Client,
    api_base_url: String,
    api_key: String,
}

impl CoinGeckoClient {
    pub fn new(api_base_url: &str, api_key: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_base_url: api_base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl QuoteSource for CoinGeckoClient {
    /// Single attempt, no timeout. The refresh cadence is the only retry.
    #[instrument(skip_all, fields(ids = req.ids.len()))]
    async fn fetch_quotes(&self, req: &BatchQuoteRequest) -> Result<QuoteTable, QuoteRequestError> {
        let url = req.url(&self.api_base_url);
        debug!("Sending request to CoinGecko API: {}", url);

        let mut http_req_build = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json");

        if !self.api_key.is_empty() {
            http_req_build = http_req_build.header("x-cg-demo-api-key", &self.api_key);
        }

        let response = http_req_build.send().await.map_err(|e| {
            warn!("Error calling CoinGecko API: {}", e);
            QuoteRequestError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("CoinGecko API answered with status {}", status);
            return Err(QuoteRequestError::HttpStatus(status));
        }

        let body = response.text().await?;
        let table = parse_simple_price(&body, &req.vs_currency)?;
        debug!("CoinGecko API returned quotes for {} id(s)", table.len());

        Ok(table)
    }
}
