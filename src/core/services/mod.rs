pub mod deposit_stream;
pub mod history_service;
pub mod history_stream;

#[cfg(test)]
mod tests {
    use crate::core::domain::query::{TransactionQuery, TransactionSource, TransactionType};
    use crate::core::domain::transaction::{NativeTransfer, Transaction};
    use crate::core::ports::history::HistoryPort;
    use crate::core::services::deposit_stream::start_deposit_stream;
    use crate::core::services::history_service::HistoryService;
    use crate::core::services::history_stream::start_history_stream;
    use crate::utils::error::{HistoryError, HistoryResult};
    use async_trait::async_trait;
    use futures_util::StreamExt;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio_util::sync::CancellationToken;

    fn dummy_transaction(signature: &str, fee_payer: &str, transfer_count: usize) -> Transaction {
        Transaction {
            signature: signature.to_string(),
            fee_payer: fee_payer.to_string(),
            native_transfers: (0..transfer_count).map(|_| NativeTransfer::default()).collect(),
            ..Transaction::default()
        }
    }

    /// Serves a scripted sequence of pages and records every query it was
    /// called with. Once the script runs out it keeps returning empty pages.
    struct PagedHistory {
        pages: Mutex<VecDeque<HistoryResult<Vec<Transaction>>>>,
        queries: Mutex<Vec<TransactionQuery>>,
        fetch_calls: AtomicUsize,
    }

    impl PagedHistory {
        fn new(pages: Vec<HistoryResult<Vec<Transaction>>>) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages.into()),
                queries: Mutex::new(Vec::new()),
                fetch_calls: AtomicUsize::new(0),
            })
        }

        fn queries(&self) -> Vec<TransactionQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HistoryPort for PagedHistory {
        async fn transaction_page(
            &self,
            _address: &str,
            query: &TransactionQuery,
        ) -> HistoryResult<Vec<Transaction>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn parsed_transactions(
            &self,
            _signatures: &[String],
        ) -> HistoryResult<Vec<Transaction>> {
            Ok(Vec::new())
        }
    }

    /// Never runs out of pages; every page holds one fresh record.
    struct EndlessHistory {
        fetch_calls: AtomicUsize,
    }

    #[async_trait]
    impl HistoryPort for EndlessHistory {
        async fn transaction_page(
            &self,
            _address: &str,
            _query: &TransactionQuery,
        ) -> HistoryResult<Vec<Transaction>> {
            let n = self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![dummy_transaction(&format!("sig-{n}"), "payer", 1)])
        }

        async fn parsed_transactions(
            &self,
            _signatures: &[String],
        ) -> HistoryResult<Vec<Transaction>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_stream_preserves_page_order_and_terminates() {
        let history = PagedHistory::new(vec![
            Ok(vec![
                dummy_transaction("a", "X", 1),
                dummy_transaction("b", "Y", 1),
            ]),
            Ok(vec![dummy_transaction("c", "Z", 2)]),
            Ok(Vec::new()),
        ]);

        let mut stream = start_history_stream(
            history.clone(),
            None,
            "addr",
            CancellationToken::new(),
        );

        assert!(stream.current().is_none());

        let mut seen = Vec::new();
        while stream.advance().await {
            seen.push(stream.current().unwrap().signature.clone());
        }

        assert_eq!(seen, vec!["a", "b", "c"]);
        assert!(stream.error().is_none());

        // Channel-closed is a stable terminal state.
        assert!(!stream.advance().await);
        assert!(!stream.advance().await);
    }

    #[tokio::test]
    async fn test_cursor_advances_to_last_signature_of_each_page() {
        let history = PagedHistory::new(vec![
            Ok(vec![
                dummy_transaction("a", "X", 1),
                dummy_transaction("b", "Y", 1),
            ]),
            // A single-record page still advances the cursor.
            Ok(vec![dummy_transaction("c", "Z", 1)]),
            Ok(Vec::new()),
        ]);

        let mut stream = start_history_stream(
            history.clone(),
            None,
            "addr",
            CancellationToken::new(),
        );
        while stream.advance().await {}

        let queries = history.queries();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0], TransactionQuery::default());
        assert_eq!(queries[1].before.as_deref(), Some("b"));
        assert_eq!(queries[2].before.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_empty_first_page_ends_stream_without_error() {
        let history = PagedHistory::new(vec![Ok(Vec::new())]);
        let mut stream =
            start_history_stream(history, None, "addr", CancellationToken::new());

        assert!(!stream.advance().await);
        assert!(stream.error().is_none());
        assert!(stream.current().is_none());
    }

    #[tokio::test]
    async fn test_fetch_error_surfaces_after_prior_records() {
        let history = PagedHistory::new(vec![
            Ok(vec![
                dummy_transaction("a", "X", 1),
                dummy_transaction("b", "Y", 1),
            ]),
            Err(HistoryError::FetchError("bad status code: 500".to_string())),
        ]);

        let mut stream =
            start_history_stream(history, None, "addr", CancellationToken::new());

        let mut seen = Vec::new();
        while stream.advance().await {
            seen.push(stream.current().unwrap().signature.clone());
        }

        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(
            stream.error(),
            Some(&HistoryError::FetchError("bad status code: 500".to_string()))
        );
    }

    #[tokio::test]
    async fn test_producer_fetches_at_most_one_page_ahead() {
        let history = PagedHistory::new(vec![
            Ok(vec![
                dummy_transaction("a", "X", 1),
                dummy_transaction("b", "Y", 1),
                dummy_transaction("c", "Z", 1),
            ]),
            Ok(Vec::new()),
        ]);

        let mut stream = start_history_stream(
            history.clone(),
            None,
            "addr",
            CancellationToken::new(),
        );

        // After one pull the producer is still blocked inside page one: it
        // cannot have started page two until every record was handed over.
        assert!(stream.advance().await);
        assert_eq!(history.fetch_calls.load(Ordering::SeqCst), 1);

        while stream.advance().await {}
        assert_eq!(history.fetch_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_ends_with_cancelled_error() {
        let cancel_token = CancellationToken::new();
        cancel_token.cancel();

        let history = Arc::new(EndlessHistory {
            fetch_calls: AtomicUsize::new(0),
        });
        let mut stream = start_history_stream(history, None, "addr", cancel_token);

        assert!(!stream.advance().await);
        assert_eq!(stream.error(), Some(&HistoryError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancellation_stops_an_unbounded_stream() {
        let cancel_token = CancellationToken::new();
        let history = Arc::new(EndlessHistory {
            fetch_calls: AtomicUsize::new(0),
        });
        let mut stream =
            start_history_stream(history, None, "addr", cancel_token.clone());

        for _ in 0..3 {
            assert!(stream.advance().await);
        }
        cancel_token.cancel();

        // Draining must terminate promptly and report the cancellation kind.
        while stream.advance().await {}
        assert_eq!(stream.error(), Some(&HistoryError::Cancelled));
        assert!(stream.error().unwrap().is_cancelled());
    }

    #[tokio::test]
    async fn test_stream_impl_yields_owned_records() {
        let history = PagedHistory::new(vec![
            Ok(vec![
                dummy_transaction("a", "X", 1),
                dummy_transaction("b", "Y", 1),
            ]),
            Ok(Vec::new()),
        ]);

        let stream = start_history_stream(history, None, "addr", CancellationToken::new());
        let signatures: Vec<String> = stream.map(|tx| tx.signature).collect().await;
        assert_eq!(signatures, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_deposit_stream_filters_and_preserves_order() {
        // The worked example: "a" qualifies, "b" is self-paid, "c" has two
        // native transfers.
        let history = PagedHistory::new(vec![
            Ok(vec![
                dummy_transaction("a", "X", 1),
                dummy_transaction("b", "addr", 1),
            ]),
            Ok(vec![dummy_transaction("c", "Y", 2)]),
            Ok(Vec::new()),
        ]);

        let mut deposits = start_deposit_stream(
            history.clone(),
            "addr",
            None,
            CancellationToken::new(),
        );

        let mut seen = Vec::new();
        while deposits.advance().await {
            seen.push(deposits.current().unwrap().signature.clone());
        }

        assert_eq!(seen, vec!["a"]);
        assert!(deposits.error().is_none());
    }

    #[tokio::test]
    async fn test_deposit_stream_queries_transfers_from_system_program() {
        let history = PagedHistory::new(vec![Ok(Vec::new())]);
        let mut deposits = start_deposit_stream(
            history.clone(),
            "addr",
            Some("start-cursor".to_string()),
            CancellationToken::new(),
        );
        while deposits.advance().await {}

        let queries = history.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].tx_type, Some(TransactionType::Transfer));
        assert_eq!(queries[0].source, Some(TransactionSource::SystemProgram));
        assert_eq!(queries[0].before.as_deref(), Some("start-cursor"));
    }

    #[tokio::test]
    async fn test_deposit_stream_propagates_upstream_error_unchanged() {
        let history = PagedHistory::new(vec![
            Ok(vec![dummy_transaction("a", "X", 1)]),
            Err(HistoryError::FetchError("boom".to_string())),
        ]);

        let mut deposits =
            start_deposit_stream(history, "addr", None, CancellationToken::new());

        let mut seen = Vec::new();
        while deposits.advance().await {
            seen.push(deposits.current().unwrap().signature.clone());
        }

        assert_eq!(seen, vec!["a"]);
        assert_eq!(
            deposits.error(),
            Some(&HistoryError::FetchError("boom".to_string()))
        );
    }

    #[tokio::test]
    async fn test_service_facade_streams_with_default_query() {
        let history = PagedHistory::new(vec![
            Ok(vec![dummy_transaction("a", "X", 1)]),
            Ok(Vec::new()),
        ]);
        let service = HistoryService::new(history.clone());

        let mut stream = service.stream_transaction_history(
            None,
            "addr",
            CancellationToken::new(),
        );
        let mut count = 0;
        while stream.advance().await {
            count += 1;
        }

        assert_eq!(count, 1);
        assert_eq!(history.queries()[0], TransactionQuery::default());
    }
}
