use crate::config::ApiConfig;
use crate::core::domain::query::TransactionQuery;
use crate::core::domain::transaction::Transaction;
use crate::core::ports::history::HistoryPort;
use crate::metrics::connection_health_tracker::ConnectionHealthTracker;
use crate::utils::error::{HistoryError, HistoryResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

const API_VERSION: &str = "v0";

/// Adapter for the Helius enhanced-transactions REST API.
///
/// Holds a pooled HTTP client and the versioned base URL with the API key
/// already attached as a query parameter, plus a health tracker fed by the
/// outcome of every request. The adapter performs no retries: a failed call
/// is reported to the caller verbatim, and wrapping this port in a retrying
/// decorator is the caller's decision.
pub struct HeliusClientAdapter {
    http: reqwest::Client,
    base_url: Url,
    health_tracker: ConnectionHealthTracker,
}

impl HeliusClientAdapter {
    /// Builds the adapter from configuration.
    ///
    /// Fails with a `ConfigError` when the base URL does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> HistoryResult<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| HistoryError::ConfigError(format!("Invalid base url: {e}")))?;
        base_url
            .path_segments_mut()
            .map_err(|_| HistoryError::ConfigError("Base url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(API_VERSION);
        base_url
            .query_pairs_mut()
            .append_pair("api-key", &config.api_key);

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                HistoryError::ConfigError(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url,
            health_tracker: ConnectionHealthTracker::new(config.unhealthy_after_n_errors),
        })
    }

    pub fn health_tracker(&self) -> &ConnectionHealthTracker {
        &self.health_tracker
    }

    /// Joins path segments onto the versioned base URL and appends the
    /// query's parameters after the API key pair.
    pub(super) fn endpoint_url(
        &self,
        segments: &[&str],
        query: Option<&TransactionQuery>,
    ) -> HistoryResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HistoryError::ConfigError("Base url cannot be a base".to_string()))?
            .extend(segments);

        if let Some(query) = query {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.to_query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> HistoryResult<T> {
        let status = response.status();
        if !status.is_success() {
            self.health_tracker.note_failure();
            return Err(HistoryError::FetchError(format!(
                "bad status code: {}",
                status.as_u16()
            )));
        }

        match response.json::<T>().await {
            Ok(value) => {
                self.health_tracker.note_success();
                Ok(value)
            }
            Err(e) => {
                self.health_tracker.note_failure();
                Err(HistoryError::DecodeError(format!(
                    "Failed to decode response: {e}"
                )))
            }
        }
    }
}

#[async_trait]
impl HistoryPort for HeliusClientAdapter {
    /// Fetches one page of an address's history:
    /// `GET /v0/addresses/{address}/transactions` with the query's pairs.
    async fn transaction_page(
        &self,
        address: &str,
        query: &TransactionQuery,
    ) -> HistoryResult<Vec<Transaction>> {
        let url = self.endpoint_url(&["addresses", address, "transactions"], Some(query))?;
        debug!("Fetching transaction page for {address}");

        let response = self.http.get(url).send().await.map_err(|e| {
            self.health_tracker.note_failure();
            HistoryError::FetchError(format!("Request failed: {e}"))
        })?;

        self.decode(response).await
    }

    /// Resolves raw signatures into parsed transactions:
    /// `POST /v0/transactions` with `{"transactions": [...]}`.
    async fn parsed_transactions(&self, signatures: &[String]) -> HistoryResult<Vec<Transaction>> {
        let url = self.endpoint_url(&["transactions"], None)?;
        let body = json!({ "transactions": signatures });

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                self.health_tracker.note_failure();
                HistoryError::FetchError(format!("Request failed: {e}"))
            })?;

        self.decode(response).await
    }
}
