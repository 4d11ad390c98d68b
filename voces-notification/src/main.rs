use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use voces_shared::clients::db::{create_pool, DbPool};
use voces_shared::clients::rabbitmq::RabbitMQClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

async fn metrics(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> String {
    state.metrics_handle.render()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    voces_shared::middleware::init_tracing("voces-notification");

    let config = AppConfig::load()?;
    let port = config.port;

    // The auth extractor reads the secret from the environment
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let metrics_handle = voces_shared::middleware::init_metrics();

    let state = Arc::new(AppState { db, config, rabbitmq, metrics_handle });

    // Spawn suggestion event subscriber
    let suggestion_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = events::subscriber::listen_suggestion_events(suggestion_state).await {
            tracing::error!(error = %e, "suggestion event subscriber failed");
        }
    });

    // Spawn catalog (library/school event) subscriber
    let catalog_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = events::subscriber::listen_catalog_events(catalog_state).await {
            tracing::error!(error = %e, "catalog event subscriber failed");
        }
    });

    // Spawn directory read-model subscriber
    let directory_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = events::subscriber::listen_directory_events(directory_state).await {
            tracing::error!(error = %e, "directory event subscriber failed");
        }
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(metrics))
        .route("/notifications", get(routes::notifications::list_notifications))
        .route("/notifications", delete(routes::notifications::delete_all))
        .route("/notifications/unread-count", get(routes::notifications::unread_count))
        .route("/notifications/mark-all-read", post(routes::notifications::mark_all_read))
        .route("/notifications/:id/read", post(routes::notifications::mark_read))
        .layer(axum::middleware::from_fn(voces_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "voces-notification starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
