use axum::Json;
use voces_shared::types::api::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("voces-community", env!("CARGO_PKG_VERSION")))
}
