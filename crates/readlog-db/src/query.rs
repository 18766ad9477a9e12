//! # Filter Query Builder
//!
//! Builds the library listing query from the optional filters.
//!
//! ```text
//! BookFilter { author: " herbert ", genre: "", year: "1965" }
//!       │
//!       ▼  blank filters dropped, values trimmed and wrapped in %..%
//! predicates: [(author, "%herbert%"), (year, "%1965%")]
//!       │
//!       ▼
//! SELECT .. FROM books WHERE 1=1
//!   AND author LIKE ?      ← "%herbert%" bound, never spliced into the SQL
//!   AND year LIKE ?        ← "%1965%"
//! ORDER BY date_read IS NULL, date_read DESC
//! ```
//!
//! SQLite's `LIKE` is case-insensitive for ASCII. Books without a
//! `date_read` always come after dated ones.

use readlog_core::{BookFilter, FilterField};
use sqlx::{QueryBuilder, Sqlite};

/// Column list shared by every query returning a [`readlog_core::Book`].
pub const BOOK_COLUMNS: &str =
    "isbn, title, author, publisher, year, genre, language, pages, date_read, rating, review";

/// Newest reads first, undated books last.
pub const ORDER_BY_DATE_READ: &str = " ORDER BY date_read IS NULL, date_read DESC";

/// Distinct non-null genres, for the filter drop-down.
pub const GENRES_SQL: &str =
    "SELECT DISTINCT genre FROM books WHERE genre IS NOT NULL ORDER BY genre ASC";

/// Conjunction of `LIKE` predicates over the books table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    predicates: Vec<(FilterField, String)>,
}

impl BookQuery {
    /// One predicate per non-blank filter.
    pub fn from_filter(filter: &BookFilter) -> Self {
        let predicates = filter
            .terms()
            .into_iter()
            .map(|(field, value)| (field, format!("%{}%", value)))
            .collect();

        BookQuery { predicates }
    }

    /// Query with no predicates (the whole library).
    pub fn all() -> Self {
        BookQuery::default()
    }

    /// The (column, bound pattern) pairs, in field order.
    pub fn predicates(&self) -> &[(FilterField, String)] {
        &self.predicates
    }

    /// Builds the SELECT with every pattern pushed as a bind parameter.
    pub fn builder(&self) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM books WHERE 1=1", BOOK_COLUMNS));

        for (field, pattern) in &self.predicates {
            builder
                .push(" AND ")
                .push(field.column())
                .push(" LIKE ")
                .push_bind(pattern.clone());
        }

        builder.push(ORDER_BY_DATE_READ);
        builder
    }
}
