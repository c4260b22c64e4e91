mod api;
mod bootstrap;
mod cars;
mod config;
mod error;
mod leases;
mod ledger;
mod middleware;
mod plates;
mod rentals;
mod renters;
mod server;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,fleet_rental_backend=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("🚀 Starting Fleet Rental Backend");

    dotenv::dotenv().ok();
    let config = config::Config::from_env()?;

    let state = bootstrap::initialize_app_state(&config.database_url).await?;

    let app = server::create_app(state, &config).await;
    server::run_server(app, &config.bind_address).await?;

    Ok(())
}
