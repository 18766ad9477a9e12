//! `GET /health` - answers `OK` while the database responds to `SELECT 1`.

use axum::extract::State;
use tracing::warn;

use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    if state.db().health_check().await {
        Ok("OK")
    } else {
        warn!("Health check failed");
        Err(ApiError::new(ErrorCode::Unavailable, "Database unavailable"))
    }
}
