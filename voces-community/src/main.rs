use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod models;
mod moderation;
mod routes;
mod schema;

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
    voces_shared::middleware::init_tracing("voces-community");

    let config = AppConfig::load()?;
    let port = config.port;

    // The auth extractor reads the secret from the environment
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let db = create_pool(&config.database_url)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let metrics_handle = voces_shared::middleware::init_metrics();

    let state = Arc::new(AppState { db, config, rabbitmq, metrics_handle });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(metrics))
        .route("/suggestions", post(routes::suggestions::create_suggestion))
        .route("/suggestions", get(routes::suggestions::list_suggestions))
        .route("/suggestions/stats", get(routes::stats::scope_stats))
        .route("/suggestions/:id", get(routes::suggestions::get_suggestion))
        .route("/suggestions/:id", put(routes::suggestions::edit_suggestion))
        .route("/suggestions/:id", delete(routes::suggestions::delete_suggestion))
        .route("/suggestions/:id/status", put(routes::suggestions::set_status))
        .route("/suggestions/:id/vote", post(routes::votes::cast_vote))
        .route("/suggestions/:id/vote", get(routes::votes::get_vote))
        .route("/suggestions/:id/comments", post(routes::comments::add_comment))
        .route("/suggestions/:id/comments", get(routes::comments::list_comments))
        .route("/suggestions/:id/read", post(routes::comments::mark_thread_read))
        .route("/internal/users", put(routes::internal::upsert_user))
        .route("/internal/users/:id", get(routes::internal::get_user))
        .layer(axum::middleware::from_fn(voces_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "voces-community starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
