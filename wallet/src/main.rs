use actix_web::{
    middleware::{from_fn, Logger},
    web, App, HttpServer,
};
use clap::Parser;
use common::ledger::WalletLedger;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use handlers::AppState;
use security::{configure_cors, RateLimiter};

mod config;
mod error;
mod handlers;
mod metrics;
mod security;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    info!("Starting the wallet service");

    let ledger = WalletLedger::seeded();
    let app_state = web::Data::new(AppState { ledger });
    // shared across workers so the limit holds per process
    let rate_limiter = RateLimiter::new(config.rate_limit);

    let address = config.server_address();
    info!("Starting HTTP server on {}", address);
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(rate_limiter.clone())
            .wrap(from_fn(metrics::track_requests))
            .wrap(Logger::default())
            .wrap(configure_cors(&config.allowed_origins))
            .configure(handlers::configure)
    })
    .bind(&address)?
    .run()
    .await?;

    Ok(())
}
