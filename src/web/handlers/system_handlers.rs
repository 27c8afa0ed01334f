// src/web/handlers/system_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::web::types::{api_error, ApiError, AppState, TextResponse};

pub async fn health_handler(state: &State<AppState>) -> Result<Json<TextResponse>, ApiError> {
    if let Err(e) = state.db.health_check().await {
        error!("Health check failed: {:#}", e);
        return Err(api_error(
            Status::ServiceUnavailable,
            "Database unavailable".to_string(),
            "DATABASE_ERROR",
            &["Check the database path and permissions"],
        ));
    }

    let cached = match state.search.cache() {
        Some(cache) => cache.len().await,
        None => 0,
    };
    info!("Health check ({} cached searches)", cached);

    Ok(Json(TextResponse::success(
        "Lead finder API is running".to_string(),
    )))
}
