//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  let mut session = db.session().await?;                        │
//! │       │  session.books().update("A", &form)                            │
//! │       ▼                                                                 │
//! │  BookRepository<'session>                                              │
//! │  ├── list(&filter) / list_all() / genres()                             │
//! │  ├── get(isbn) / count()                                               │
//! │  ├── add(&form)                                                        │
//! │  ├── update(current_isbn, &form)                                       │
//! │  └── delete(isbn)                                                      │
//! │       │                                                                 │
//! │       │  SQL on the session's connection                               │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repository borrows the session's connection instead of owning a pool,
//! so every operation of a request runs on the same handle.
//!
//! ## Available Repositories
//!
//! - [`book::BookRepository`] - Book CRUD, filtering and export listing

pub mod book;
