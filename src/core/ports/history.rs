use crate::core::domain::query::TransactionQuery;
use crate::core::domain::transaction::Transaction;
use crate::utils::error::HistoryResult;
use async_trait::async_trait;

/// Page-at-a-time access to an address's parsed transaction history.
///
/// This is the seam between the streaming core and whatever actually talks
/// to the network. The streaming paginator only ever needs one capability:
/// fetch the single page addressed by the current query. Everything above it
/// (cursor advancement, backpressure, filtering) is built on that call.
///
/// An empty `Ok` page is the authoritative end-of-data signal and an `Err`
/// is the authoritative failure signal; an implementation never returns
/// both records and an error for the same call. Retry policy does not live
/// behind this trait; a caller that wants retries wraps the port in a
/// decorator.
///
/// The trait is marked with `#[cfg_attr(feature = "test-helpers", mockall::automock)]`
/// so that when the `test-helpers` feature is enabled, a mock implementation
/// is automatically generated.
#[async_trait]
#[cfg_attr(feature = "test-helpers", mockall::automock)]
pub trait HistoryPort: Send + Sync {
    /// Fetches one page of history for `address`, filtered and positioned
    /// by `query`. Records arrive in server order, newest first; the
    /// signature of the last record addresses the next page.
    async fn transaction_page(
        &self,
        address: &str,
        query: &TransactionQuery,
    ) -> HistoryResult<Vec<Transaction>>;

    /// Resolves raw signatures into parsed transactions.
    async fn parsed_transactions(&self, signatures: &[String]) -> HistoryResult<Vec<Transaction>>;
}
