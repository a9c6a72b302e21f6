use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;

use cryptovault_ticker::config::read_config;
use cryptovault_ticker::quote::client::CoinGeckoClient;
use cryptovault_ticker::render::render_board;
use cryptovault_ticker::ticker::board::PriceBoard;
use cryptovault_ticker::ticker::scheduler;

const DEFAULT_CONFIG_PATH: &str = "app_config.json";

#[tokio::main]
async fn main() {
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = match read_config(&config_path).await {
        Ok(config) => config,
        Err(error) => {
            // no subscriber yet, so this goes straight to stderr
            eprintln!("Error reading config file {}: {}", config_path, error);
            return;
        }
    };

    let max_level = match config.tracing_level() {
        Ok(level) => level,
        Err(error) => {
            eprintln!("{}", error);
            return;
        }
    };

    tracing_subscriber::fmt().with_max_level(max_level).init();

    info!(
        "CryptoVault ticker starting, config from {}, refresh every {}s",
        config_path, config.refresh_interval
    );

    let client = CoinGeckoClient::new(&config.api_base_url, &config.coingecko_api_key);
    let board = Arc::new(PriceBoard::new(Arc::new(client)));
    let mut updates = board.subscribe();
    let handle = scheduler::start(board, config.refresh_interval());

    trace!("Waiting for snapshots or Ctrl+C...");
    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                if let Err(e) = result {
                    error!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Ctrl+C pressed. Stopping...");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    error!("Price board went away, stopping");
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                debug!("Rendering snapshot of cycle {}", snapshot.cycle);
                println!("{}", render_board(&snapshot));
            }
        }
    }

    handle.stop().await;
    info!("All tasks finished.");
}
