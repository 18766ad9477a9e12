//! `GET /export` - the whole library as a CSV download.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use readlog_core::export::{self, EXPORT_CONTENT_TYPE, EXPORT_FILENAME};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut session = state.session().await?;
    let books = session.books().list_all().await?;

    let body = export::write_csv(&books)?;
    info!(books = books.len(), bytes = body.len(), "Library exported");

    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILENAME);

    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, disposition.as_str()),
        ],
        body,
    )
        .into_response())
}
