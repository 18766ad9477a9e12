//! # readlog-db: Database Layer for ReadLog
//!
//! SQLite storage for the book library, accessed through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ReadLog Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (GET /?genre=Fiction)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   readlog-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ BookRepository│    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (book.rs)    │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ list / get    │    │ 001_create_  │  │   │
//! │  │   │ Session (one  │◄───│ add / update  │    │  books.sql   │  │   │
//! │  │   │ conn/request) │    │ delete        │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ BookQuery (query.rs)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            SQLite Database  <data_dir>/library.db               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool and per-request sessions
//! - [`migrations`] - Embedded schema
//! - [`query`] - Filter query builder
//! - [`error`] - Database error types
//! - [`repository`] - Book repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use readlog_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("instance/library.db")).await?;
//!
//! let mut session = db.session().await?;
//! let books = session.books().list(&filter).await?;
//! // connection goes back to the pool when `session` drops
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, Session};
pub use query::BookQuery;
pub use repository::book::BookRepository;
