use axum::Json;
use voces_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("voces-ranking", env!("CARGO_PKG_VERSION")))
}
