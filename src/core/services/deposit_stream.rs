use crate::core::domain::query::{TransactionQuery, TransactionSource, TransactionType};
use crate::core::ports::history::HistoryPort;
use crate::core::services::history_stream::{start_history_stream, TransactionStream};
use futures_util::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Re-emits only the deposits from `upstream` on a fresh stream handle.
///
/// A deposit is a record where `address` is not the fee payer and exactly
/// one native transfer is present ([`Transaction::is_deposit_for`]). The
/// filter runs as its own producer task, pulling one record at a time and
/// forwarding matches in their original relative order. It performs no
/// network I/O and never reorders, batches, duplicates or drops anything
/// the predicate admits.
///
/// When the upstream channel closes, its terminal error (if any) is copied
/// onto the returned handle unchanged, and only then is the new channel
/// closed.
///
/// [`Transaction::is_deposit_for`]: crate::core::domain::transaction::Transaction::is_deposit_for
pub fn filter_deposits(mut upstream: TransactionStream, address: &str) -> TransactionStream {
    let (sender, error_slot, stream) = TransactionStream::channel();
    let address = address.to_owned();

    tokio::spawn(async move {
        while let Some(transaction) = upstream.next().await {
            if !transaction.is_deposit_for(&address) {
                continue;
            }
            if sender.send(transaction).await.is_err() {
                // Consumer dropped the filtered handle; dropping `upstream`
                // in turn stops the paginator on its next send.
                return;
            }
        }

        if let Some(e) = upstream.error() {
            let _ = error_slot.set(e.clone());
        }
    });

    stream
}

/// Streams deposits made to `address`, optionally starting from a cursor.
///
/// Composes the paginator with the deposit filter over the fixed query the
/// history endpoint uses for plain transfers: `type=transfer`,
/// `source=system_program`.
pub fn start_deposit_stream(
    history: Arc<dyn HistoryPort>,
    address: &str,
    before: Option<String>,
    cancel_token: CancellationToken,
) -> TransactionStream {
    let query = TransactionQuery {
        tx_type: Some(TransactionType::Transfer),
        source: Some(TransactionSource::SystemProgram),
        before,
        ..TransactionQuery::default()
    };

    let upstream = start_history_stream(history, Some(query), address, cancel_token);
    filter_deposits(upstream, address)
}
