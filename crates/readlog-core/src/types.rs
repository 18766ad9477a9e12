//! # Domain Types
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  validate()  ┌─────────────────┐                  │
//! │  │    BookForm     │ ───────────► │      Book       │                  │
//! │  │  ─────────────  │              │  ─────────────  │                  │
//! │  │  every field is │              │  isbn (key)     │                  │
//! │  │  raw form text  │              │  title, author  │                  │
//! │  │                 │ ◄─────────── │  Option<..> for │                  │
//! │  └─────────────────┘  From<&Book> │  the rest       │                  │
//! │                                   └─────────────────┘                  │
//! │  ┌─────────────────┐                                                    │
//! │  │   BookFilter    │  title / author / genre / year / rating           │
//! │  │  ─────────────  │  each optional, blank values are ignored          │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationResult};

// =============================================================================
// Book
// =============================================================================

/// A book the user has read, keyed by ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    /// Primary key.
    pub isbn: String,

    pub title: String,

    pub author: String,

    pub publisher: Option<String>,

    /// Publication year.
    pub year: Option<i64>,

    pub genre: Option<String>,

    pub language: Option<String>,

    pub pages: Option<i64>,

    /// `YYYY-MM-DD`.
    pub date_read: Option<String>,

    /// 1..=5 when present.
    pub rating: Option<i64>,

    /// Free text, may span several lines.
    pub review: Option<String>,
}

// =============================================================================
// Book Form
// =============================================================================

/// Raw add/edit submission, exactly as posted by the HTML form.
///
/// Missing fields deserialize to an empty string so a sparse POST body is
/// still accepted and reported through validation instead of a 400.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: String,
    pub genre: String,
    pub language: String,
    pub pages: String,
    pub date_read: String,
    pub rating: String,
    pub review: String,
}

impl BookForm {
    /// Validates the submission and builds the record to store.
    ///
    /// See [`validation::validate_book_form`] for the rules.
    pub fn validate(&self) -> ValidationResult<Book> {
        validation::validate_book_form(self)
    }
}

/// Pre-fills the edit form from a stored record.
impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        fn text(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }

        fn number(value: Option<i64>) -> String {
            value.map(|n| n.to_string()).unwrap_or_default()
        }

        BookForm {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            publisher: text(&book.publisher),
            year: number(book.year),
            genre: text(&book.genre),
            language: text(&book.language),
            pages: number(book.pages),
            date_read: text(&book.date_read),
            rating: number(book.rating),
            review: text(&book.review),
        }
    }
}

// =============================================================================
// Filters
// =============================================================================

/// A column the library listing can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Title,
    Author,
    Genre,
    Year,
    Rating,
}

impl FilterField {
    /// Column name in the `books` table.
    pub const fn column(&self) -> &'static str {
        match self {
            FilterField::Title => "title",
            FilterField::Author => "author",
            FilterField::Genre => "genre",
            FilterField::Year => "year",
            FilterField::Rating => "rating",
        }
    }
}

/// Optional filters from the listing page query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub rating: Option<String>,
}

impl BookFilter {
    /// Returns the active filters, trimmed, in a fixed field order.
    ///
    /// Blank and whitespace-only values are dropped.
    pub fn terms(&self) -> Vec<(FilterField, &str)> {
        [
            (FilterField::Title, &self.title),
            (FilterField::Author, &self.author),
            (FilterField::Genre, &self.genre),
            (FilterField::Year, &self.year),
            (FilterField::Rating, &self.rating),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then_some((field, value))
        })
        .collect()
    }

    /// Trimmed value of one filter, empty when unset.
    pub fn value(&self, field: FilterField) -> &str {
        let value = match field {
            FilterField::Title => &self.title,
            FilterField::Author => &self.author,
            FilterField::Genre => &self.genre,
            FilterField::Year => &self.year,
            FilterField::Rating => &self.rating,
        };
        value.as_deref().map(str::trim).unwrap_or("")
    }

    /// True when no filter would emit a predicate.
    pub fn is_empty(&self) -> bool {
        self.terms().is_empty()
    }
}
