use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, instrument};

use crate::core::currency::{RateProvider, RateTable};

/// Reads base-relative rate tables from an exchangerate-api style endpoint.
pub struct ExchangeRateProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(alias = "base_code")]
    base: String,
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable> {
        let url = format!("{}/v4/latest/{}", self.base_url, base.to_uppercase());
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base: {} URL: {}", e, base, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse rates response");
                return Err(anyhow!("Failed to parse rates response: {e}"));
            }
        };

        if !data.base.eq_ignore_ascii_case(base) {
            return Err(anyhow!(
                "Rates returned for {} but {} was requested",
                data.base,
                base
            ));
        }
        if data.rates.is_empty() {
            return Err(anyhow!("No rates returned for base: {}", base));
        }

        debug!(currencies = data.rates.len(), "Received exchange rates");
        Ok(RateTable::new(&data.base, data.rates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(base: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v4/latest/{base}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_fetch_rates() {
        let body = r#"{"base":"USD","date":"2025-06-01","rates":{"USD":1,"EUR":0.9,"INR":83.2}}"#;
        let mock_server = create_mock_server("USD", 200, body).await;
        let provider = ExchangeRateProvider::new(&mock_server.uri()).unwrap();

        let table = provider.fetch_rates("usd").await.unwrap();

        assert_eq!(table.base, "USD");
        assert_eq!(table.rate("EUR"), Some(0.9));
        assert_eq!(table.rate("INR"), Some(83.2));
    }

    #[tokio::test]
    async fn test_fetch_rates_accepts_base_code() {
        let body = r#"{"result":"success","base_code":"USD","rates":{"EUR":0.91}}"#;
        let mock_server = create_mock_server("USD", 200, body).await;
        let provider = ExchangeRateProvider::new(&mock_server.uri()).unwrap();

        let table = provider.fetch_rates("USD").await.unwrap();

        assert_eq!(table.rate("EUR"), Some(0.91));
    }

    #[tokio::test]
    async fn test_http_error() {
        let mock_server = create_mock_server("USD", 503, "unavailable").await;
        let provider = ExchangeRateProvider::new(&mock_server.uri()).unwrap();

        let err = provider.fetch_rates("USD").await.unwrap_err();

        assert!(err.to_string().contains("HTTP error"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = create_mock_server("USD", 200, "<html></html>").await;
        let provider = ExchangeRateProvider::new(&mock_server.uri()).unwrap();

        assert!(provider.fetch_rates("USD").await.is_err());
    }

    #[tokio::test]
    async fn test_base_mismatch_is_rejected() {
        let body = r#"{"base":"EUR","rates":{"USD":1.1}}"#;
        let mock_server = create_mock_server("USD", 200, body).await;
        let provider = ExchangeRateProvider::new(&mock_server.uri()).unwrap();

        assert!(provider.fetch_rates("USD").await.is_err());
    }
}
