use std::{sync::Arc, time::Duration};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::{
    cars::CarRepository, error::AppResult, leases::LeaseRepository, plates::PlateRepository,
    rentals::RentalRepository, renters::RenterRepository,
};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub cars: Arc<CarRepository>,
    pub plates: Arc<PlateRepository>,
    pub renters: Arc<RenterRepository>,
    pub leases: Arc<LeaseRepository>,
    pub rentals: Arc<RentalRepository>,
}

pub async fn initialize_app_state(database_url: &str) -> AppResult<AppState> {
    info!("Initializing application components ...");

    let pool = initialize_database(database_url).await?;

    let state = AppState {
        cars: Arc::new(CarRepository::new(pool.clone())),
        plates: Arc::new(PlateRepository::new(pool.clone())),
        renters: Arc::new(RenterRepository::new(pool.clone())),
        leases: Arc::new(LeaseRepository::new(pool.clone())),
        rentals: Arc::new(RentalRepository::new(pool)),
    };

    info!("✅ Repositories initialized");
    Ok(state)
}

async fn initialize_database(database_url: &str) -> AppResult<PgPool> {
    info!("📊 Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await?;

    info!("🔄 Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("✓ Database initialized");
    Ok(pool)
}
