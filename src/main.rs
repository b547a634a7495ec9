//! EventHub server entry point.
//!
//! Loads configuration, initializes logging and hands over to
//! [`eventhub_api::run_server`].

use tracing_subscriber::{EnvFilter, fmt};

use eventhub_core::config::AppConfig;
use eventhub_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    tracing::info!("Starting EventHub v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = eventhub_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay and `EVENTHUB__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("EVENTHUB_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("EVENTHUB_ENV").ok();

    AppConfig::load(&config_path, env.as_deref())
}

/// Initialize tracing. `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
