use log::{error, info, warn};
use std::net::SocketAddr;
use warp::Filter;

use auth_gate::config::GateConfig;
use auth_gate::handlers::{routes, GateContext};

#[tokio::main]
async fn main() {
    // Load .env before the logger so RUST_LOG from the file applies
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("No .env file loaded: {}", e),
    }

    // Load config from the environment
    let config = match GateConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, mode={}",
        config.host,
        config.port,
        config.mode.as_str()
    );
    if config.development_mode {
        warn!("Development mode is enabled");
    }

    // Build the directory, session store and strategy once and inject them
    let context = match GateContext::from_config(&config) {
        Ok(context) => context,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Authentication strategy: {}", context.strategy.name());

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting auth gate on {}", addr);

    warp::serve(routes(context).with(warp::log("auth_gate")))
        .run(addr)
        .await;
}
