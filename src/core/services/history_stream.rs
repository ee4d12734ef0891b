use crate::core::domain::query::TransactionQuery;
use crate::core::domain::transaction::Transaction;
use crate::core::ports::history::HistoryPort;
use crate::utils::error::{HistoryError, HistoryResult};
use futures_util::Stream;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A pull-based handle over a lazily produced sequence of transactions.
///
/// The handle owns the receive half of a capacity-1 channel fed by a single
/// producer task. The producer blocks on every send until the consumer is
/// ready, so at most one page is ever fetched ahead of consumption: the
/// channel is the backpressure mechanism, not a buffer.
///
/// Iteration follows an advance/current pair:
///
/// ```no_run
/// # async fn example(mut stream: helius_history_stream::core::services::history_stream::TransactionStream) {
/// while stream.advance().await {
///     if let Some(transaction) = stream.current() {
///         println!("{}", transaction.signature);
///     }
/// }
/// if let Some(e) = stream.error() {
///     eprintln!("stream failed: {e}");
/// }
/// # }
/// ```
///
/// A terminal error, if any, is written by the producer before it closes the
/// channel and must only be inspected after `advance` has returned `false`;
/// the channel close is what orders the write before the read.
pub struct TransactionStream {
    receiver: mpsc::Receiver<Transaction>,
    error: Arc<OnceLock<HistoryError>>,
    current: Option<Transaction>,
}

impl TransactionStream {
    /// Creates a handle together with the producer-side send half and error
    /// slot. The producer must write the slot (at most once) before letting
    /// the sender drop.
    pub(crate) fn channel() -> (
        mpsc::Sender<Transaction>,
        Arc<OnceLock<HistoryError>>,
        Self,
    ) {
        let (sender, receiver) = mpsc::channel(1);
        let error = Arc::new(OnceLock::new());
        let stream = Self {
            receiver,
            error: Arc::clone(&error),
            current: None,
        };
        (sender, error, stream)
    }

    /// Waits for the next record.
    ///
    /// Returns `true` once a record is available and `current` has been
    /// updated, or `false` once the producer has closed the channel. The
    /// closed state is terminal: every later call returns `false` again.
    pub async fn advance(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(transaction) => {
                self.current = Some(transaction);
                true
            }
            None => false,
        }
    }

    /// The most recent record delivered by `advance`, or `None` before the
    /// first successful call.
    pub fn current(&self) -> Option<&Transaction> {
        self.current.as_ref()
    }

    /// The terminal error, if the stream ended because of one. Meaningful
    /// only after `advance` has returned `false`.
    pub fn error(&self) -> Option<&HistoryError> {
        self.error.get()
    }
}

/// Yields owned records for `Stream`-combinator composition. Polling through
/// this impl bypasses the `current` slot; `error` still applies once the
/// stream is exhausted.
impl Stream for TransactionStream {
    type Item = Transaction;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

/// Streams the full transaction history of `address`, page by page.
///
/// Returns immediately with a [`TransactionStream`]; a producer task then
/// repeatedly fetches one page through `history`, pushes its records in page
/// order, and advances the query's `before` cursor to the signature of the
/// page's last record. The task ends, closing the channel exactly once,
/// when a page comes back empty (normal end of history), when a fetch fails
/// (the error lands in the handle's error slot, no retry), when the consumer
/// drops the handle, or when `cancel_token` fires.
///
/// Cancellation is observed at the top of every iteration, during the page
/// fetch, and during every send, so an abandoned stream never leaks its
/// producer: the task finishes within one in-flight page fetch.
pub fn start_history_stream(
    history: Arc<dyn HistoryPort>,
    query: Option<TransactionQuery>,
    address: &str,
    cancel_token: CancellationToken,
) -> TransactionStream {
    let (sender, error_slot, stream) = TransactionStream::channel();
    let address = address.to_owned();
    let mut query = query.unwrap_or_default();

    tokio::spawn(async move {
        'paginate: loop {
            if cancel_token.is_cancelled() {
                let _ = error_slot.set(HistoryError::Cancelled);
                break;
            }

            let page: HistoryResult<Vec<Transaction>> = tokio::select! {
                _ = cancel_token.cancelled() => Err(HistoryError::Cancelled),
                page = history.transaction_page(&address, &query) => page,
            };

            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    let _ = error_slot.set(e);
                    break;
                }
            };

            // The last signature is the next cursor, even for a one-record
            // page; an empty page is the end of history.
            let cursor = match page.last() {
                Some(last) => last.signature.clone(),
                None => break,
            };

            for transaction in page {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        let _ = error_slot.set(HistoryError::Cancelled);
                        break 'paginate;
                    }
                    sent = sender.send(transaction) => {
                        // A failed send means the consumer dropped the
                        // handle; stop quietly.
                        if sent.is_err() {
                            break 'paginate;
                        }
                    }
                }
            }

            query.advance_cursor(cursor);
        }

        // Dropping the sender closes the channel; the error slot, when set,
        // was written above and is therefore visible once the consumer
        // observes the close.
        drop(sender);
    });

    stream
}
