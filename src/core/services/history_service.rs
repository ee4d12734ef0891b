use crate::core::domain::query::TransactionQuery;
use crate::core::domain::transaction::Transaction;
use crate::core::ports::history::HistoryPort;
use crate::core::services::deposit_stream::start_deposit_stream;
use crate::core::services::history_stream::{start_history_stream, TransactionStream};
use crate::utils::error::HistoryResult;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Consumer-facing surface over a [`HistoryPort`].
///
/// Bundles the single-page and signature-lookup calls with the two
/// streaming entry points, so callers hold one object instead of wiring the
/// port into each free function themselves.
pub struct HistoryService {
    history: Arc<dyn HistoryPort>,
}

impl HistoryService {
    pub fn new(history: Arc<dyn HistoryPort>) -> Self {
        Self { history }
    }

    /// Fetches a single page of history for `address`.
    pub async fn transaction_page(
        &self,
        address: &str,
        query: &TransactionQuery,
    ) -> HistoryResult<Vec<Transaction>> {
        self.history.transaction_page(address, query).await
    }

    /// Resolves raw signatures into parsed transactions.
    pub async fn parsed_transactions(
        &self,
        signatures: &[String],
    ) -> HistoryResult<Vec<Transaction>> {
        self.history.parsed_transactions(signatures).await
    }

    /// Streams the full history of `address`. A missing `query` starts from
    /// the most recent record with no filters.
    pub fn stream_transaction_history(
        &self,
        query: Option<TransactionQuery>,
        address: &str,
        cancel_token: CancellationToken,
    ) -> TransactionStream {
        start_history_stream(Arc::clone(&self.history), query, address, cancel_token)
    }

    /// Streams deposits made to `address`, optionally starting from a
    /// signature cursor.
    pub fn stream_deposits(
        &self,
        address: &str,
        before: Option<String>,
        cancel_token: CancellationToken,
    ) -> TransactionStream {
        start_deposit_stream(Arc::clone(&self.history), address, before, cancel_token)
    }
}
