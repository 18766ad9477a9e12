//! # readlog-core: Pure Domain Logic for ReadLog
//!
//! The book record, the raw form submission it is built from, the filter
//! inputs for the library listing, and the CSV exporter. Nothing in this
//! crate touches the database, the network or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ReadLog Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/web (axum routes)                       │   │
//! │  │       /  /add  /book/{isbn}  /edit/{isbn}  /delete  /export     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ readlog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐                 │   │
//! │  │   │   types   │  │ validation │  │  export   │                 │   │
//! │  │   │   Book    │  │  required  │  │   CSV     │                 │   │
//! │  │   │ BookForm  │  │  numerics  │  │  writer   │                 │   │
//! │  │   │BookFilter │  │  rating    │  │           │                 │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  readlog-db (SQLite layer)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use readlog_core::BookForm;
//!
//! let form = BookForm {
//!     isbn: "9780441172719".to_string(),
//!     title: "Dune".to_string(),
//!     author: "Frank Herbert".to_string(),
//!     rating: "5".to_string(),
//!     ..Default::default()
//! };
//!
//! let book = form.validate().unwrap();
//! assert_eq!(book.rating, Some(5));
//! assert_eq!(book.year, None);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod export;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest rating a book can receive.
pub const MIN_RATING: i64 = 1;

/// Highest rating a book can receive.
pub const MAX_RATING: i64 = 5;
