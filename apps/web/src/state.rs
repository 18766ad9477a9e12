//! Shared application state handed to every handler.

use readlog_db::{Database, DbResult, Session};

/// Cloned into each request by axum; clones share the same pool.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }

    /// Opens a connection scoped to the current request.
    ///
    /// The connection goes back to the pool when the returned session is
    /// dropped, on every exit path of the handler.
    pub async fn session(&self) -> DbResult<Session> {
        self.db.session().await
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
