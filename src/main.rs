use helius_history_stream::bootstrap::run_bootstrap;
use helius_history_stream::utils::error::HistoryResult;

#[tokio::main]
async fn main() -> HistoryResult<()> {
    run_bootstrap().await
}
