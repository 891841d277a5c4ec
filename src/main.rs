mod api;
mod config;
mod error;
mod normalize;
mod provider;
mod state;
mod strategy;
mod types;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::provider::TradierClient;
use crate::state::Watchlist;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let provider: Arc<dyn provider::MarketData> = Arc::new(TradierClient::new(&cfg)?);
    info!("Market data provider ready at {}", cfg.tradier_api_url);

    let watchlist = Watchlist::new();

    let api_state = ApiState {
        provider,
        watchlist,
        analyze_max_expirations: cfg.analyze_max_expirations,
    };
    let app = router(api_state);

    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
