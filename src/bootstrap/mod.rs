use crate::adapters::helius::helius_client::HeliusClientAdapter;
use crate::config::Config;
use crate::core::domain::query::TransactionQuery;
use crate::core::services::history_service::HistoryService;
use crate::metrics::HealthCheck;
use crate::utils::error::{HistoryError, HistoryResult};
use crate::utils::logger;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct BootstrapArgs {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address whose transaction history to stream.
    #[arg(short, long)]
    pub address: String,

    /// Stream only deposits made to the address.
    #[arg(long)]
    pub deposits: bool,

    /// Start streaming from this signature cursor.
    #[arg(long)]
    pub before: Option<String>,

    /// Page size requested from the API.
    #[arg(long)]
    pub limit: Option<u32>,
}

pub async fn run_bootstrap() -> HistoryResult<()> {
    logger::init();

    let cancel_token = CancellationToken::new();
    let args = BootstrapArgs::parse();

    let config = match Config::new(args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config error: {}", e);
            std::process::exit(1);
        }
    };
    config.validate()?;

    let helius_adapter = Arc::new(HeliusClientAdapter::new(&config.api)?);
    let service = HistoryService::new(helius_adapter.clone());

    let signal_watcher = {
        let cancel_token = cancel_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested. Cancelling active streams.");
                cancel_token.cancel();
            }
        })
    };

    let mut stream = if args.deposits {
        service.stream_deposits(&args.address, args.before, cancel_token.clone())
    } else {
        let query = TransactionQuery {
            before: args.before,
            limit: args.limit.or(config.api.page_limit),
            ..TransactionQuery::default()
        };
        service.stream_transaction_history(Some(query), &args.address, cancel_token.clone())
    };

    let mut count: usize = 0;
    while stream.advance().await {
        if let Some(transaction) = stream.current() {
            count += 1;
            info!(
                "{} | fee payer {} | {} native transfer(s)",
                transaction.signature,
                transaction.fee_payer,
                transaction.native_transfers.len()
            );
        }
    }

    match stream.error() {
        Some(HistoryError::Cancelled) => {
            info!("Stream cancelled after {} transaction(s)", count)
        }
        Some(e) => error!("Stream failed after {} transaction(s): {}", count, e),
        None => info!("Stream complete: {} transaction(s)", count),
    }

    if !helius_adapter.health_tracker().healthy() {
        warn!("Helius connection is unhealthy");
    }

    signal_watcher.abort();
    Ok(())
}
