//! # Book Handlers
//!
//! Listing, detail and the add/edit/delete forms.
//!
//! ## Form Submission
//! ```text
//! POST /add or /edit/{isbn}
//!        │
//!        ▼
//!  repository add/update
//!        │
//!        ├── Ok(book)            ──► 303 to / or /book/{book.isbn}
//!        ├── user error          ──► 422, same form, message on top
//!        ├── NotFound (edit)     ──► 404 page
//!        └── storage fault       ──► 500 page
//! ```

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use readlog_core::{BookFilter, BookForm};
use readlog_db::DbError;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{self, isbn_path, FormAction};

/// `GET /` - library listing, optionally filtered by the query string.
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<BookFilter>,
) -> Result<Html<String>, ApiError> {
    let mut session = state.session().await?;
    let mut books = session.books();

    let matches = books.list(&filter).await?;
    let genres = books.genres().await?;

    Ok(views::index(&matches, &genres, &filter))
}

/// `GET /book/{isbn}`
pub async fn detail(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Html<String>, ApiError> {
    let mut session = state.session().await?;
    let book = session
        .books()
        .get(&isbn)
        .await?
        .ok_or_else(|| ApiError::not_found("Book", &isbn))?;

    Ok(views::detail(&book))
}

/// `GET /add` - empty form.
pub async fn new_form() -> Html<String> {
    views::book_form(FormAction::Add, &BookForm::default(), None)
}

/// `POST /add`
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> Result<Response, ApiError> {
    let mut session = state.session().await?;

    match session.books().add(&form).await {
        Ok(book) => {
            info!(isbn = %book.isbn, "Book created from form");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) if err.is_user_error() => Ok(form_rejected(FormAction::Add, &form, err)),
        Err(err) => Err(err.into()),
    }
}

/// `GET /edit/{isbn}` - form pre-filled from the stored record.
pub async fn edit_form(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Html<String>, ApiError> {
    let mut session = state.session().await?;
    let book = session
        .books()
        .get(&isbn)
        .await?
        .ok_or_else(|| ApiError::not_found("Book", &isbn))?;

    Ok(views::book_form(
        FormAction::Edit(&book.isbn),
        &BookForm::from(&book),
        None,
    ))
}

/// `POST /edit/{isbn}` - the submitted ISBN may differ from the path one.
pub async fn update(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    Form(form): Form<BookForm>,
) -> Result<Response, ApiError> {
    let mut session = state.session().await?;

    match session.books().update(&isbn, &form).await {
        Ok(book) => {
            info!(isbn = %book.isbn, "Book updated from form");
            let target = format!("/book/{}", isbn_path(&book.isbn));
            Ok(Redirect::to(&target).into_response())
        }
        Err(err) if err.is_user_error() => Ok(form_rejected(FormAction::Edit(&isbn), &form, err)),
        Err(err) => Err(err.into()),
    }
}

/// `POST /delete/{isbn}` - missing ISBNs are a silent no-op.
pub async fn delete(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Redirect, ApiError> {
    let mut session = state.session().await?;
    let removed = session.books().delete(&isbn).await?;

    if removed > 0 {
        info!(isbn = %isbn, "Book deleted");
    }

    Ok(Redirect::to("/"))
}

/// Re-renders the submitted form with the rejection message.
fn form_rejected(action: FormAction<'_>, form: &BookForm, err: DbError) -> Response {
    let message = ApiError::from(err).message;
    debug!(error = %message, "Form rejected");

    (
        StatusCode::UNPROCESSABLE_ENTITY,
        views::book_form(action, form, Some(&message)),
    )
        .into_response()
}
