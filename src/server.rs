use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    api::health_check,
    bootstrap::AppState,
    cars::handlers::{create_car, delete_car, get_car, list_cars, update_car},
    config::Config,
    leases::handlers::{
        create_lease, delete_lease, freeze_lease, get_lease, lease_ledger, list_lease_payments,
        list_leases, pay_lease, update_lease,
    },
    middleware::create_cors_layer,
    plates::handlers::{create_plate, delete_plate, get_plate, list_plates, update_plate},
    rentals::handlers::{
        create_rental, delete_rental, freeze_rental, get_rental, list_rental_payments,
        list_rentals, pay_rental, rental_ledger, update_rental,
    },
    renters::handlers::{create_renter, delete_renter, get_renter, list_renters, update_renter},
};

pub async fn create_app(state: AppState, config: &Config) -> Router {
    info!("⚙️ Setting up HTTP routes...");

    let api = Router::new()
        // Car fleet
        .route("/cars", get(list_cars).post(create_car))
        .route("/cars/:id", get(get_car).put(update_car).delete(delete_car))
        // License plates
        .route("/plates", get(list_plates).post(create_plate))
        .route(
            "/plates/:id",
            get(get_plate).put(update_plate).delete(delete_plate),
        )
        // Renters
        .route("/renters", get(list_renters).post(create_renter))
        .route(
            "/renters/:id",
            get(get_renter).put(update_renter).delete(delete_renter),
        )
        // Plate leases
        .route("/leases", get(list_leases).post(create_lease))
        .route(
            "/leases/:id",
            get(get_lease).put(update_lease).delete(delete_lease),
        )
        .route("/leases/:id/pay", post(pay_lease))
        .route("/leases/:id/payments", get(list_lease_payments))
        .route("/leases/:id/ledger", get(lease_ledger))
        .route("/leases/:id/freeze", post(freeze_lease))
        // Car rentals
        .route("/rentals", get(list_rentals).post(create_rental))
        .route(
            "/rentals/:id",
            get(get_rental).put(update_rental).delete(delete_rental),
        )
        .route("/rentals/:id/pay", post(pay_rental))
        .route("/rentals/:id/payments", get(list_rental_payments))
        .route("/rentals/:id/ledger", get(rental_ledger))
        .route("/rentals/:id/freeze", post(freeze_rental));

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(&config.allowed_origin))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .with_state(state);

    info!("✓ HTTP routes configured");
    app
}

pub async fn run_server(app: Router, bind_address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("🌐 Server listening on: {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
