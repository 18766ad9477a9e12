//! # Route Handlers
//!
//! ## Handler Organization
//! ```text
//! handlers/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── books.rs    ◄─── Listing, detail, add, edit, delete
//! ├── export.rs   ◄─── CSV download
//! └── health.rs   ◄─── Liveness probe
//! ```
//!
//! ## How a Request Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /edit/9780441172719                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn update(                                                       │
//! │      State(state): State<AppState>,  ◄── shared pool                    │
//! │      Path(isbn): Path<String>,       ◄── percent-decoded segment        │
//! │      Form(form): Form<BookForm>,     ◄── urlencoded body                │
//! │  ) -> Result<Response, ApiError>                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  state.session()  ── one pooled connection, released on drop            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  303 See Other ──► /book/{new isbn}                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod books;
pub mod export;
pub mod health;
