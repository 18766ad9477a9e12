//! # Validation Module
//!
//! Turns a raw [`BookForm`] into a [`Book`].
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: THIS MODULE (pure)                                           │
//! │  ├── isbn / title / author present (first missing wins)                │
//! │  ├── year / pages / rating parse as integers                           │
//! │  ├── rating within 1..=5                                               │
//! │  ├── no line breaks outside review                                     │
//! │  └── date_read is YYYY-MM-DD, stored zero-padded                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: BookRepository (readlog-db)                                  │
//! │  └── isbn and title not already taken                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── PRIMARY KEY (isbn)                                                │
//! │  └── CHECK (rating BETWEEN 1 AND 5)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed numeric text is rejected here as
//! [`ValidationError::InvalidFormat`] rather than reaching the database.

use chrono::{Datelike, NaiveDate};

use crate::error::ValidationError;
use crate::types::{Book, BookForm};
use crate::{MAX_RATING, MIN_RATING};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Date format accepted for `date_read` (what `<input type="date">` posts).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Form Validation
// =============================================================================

/// Validates a whole submission.
///
/// Required fields are checked in the order isbn, title, author and the
/// first blank one is reported. Optional fields map blank text to `None`.
/// Every field except `review` must fit on one line.
pub fn validate_book_form(form: &BookForm) -> ValidationResult<Book> {
    let isbn = validate_required("isbn", &form.isbn)?;
    let title = validate_required("title", &form.title)?;
    let author = validate_required("author", &form.author)?;

    let isbn = single_line("isbn", isbn)?;
    let title = single_line("title", title)?;
    let author = single_line("author", author)?;

    let rating = parse_optional_int("rating", &form.rating)?;
    validate_rating(rating)?;

    Ok(Book {
        isbn,
        title,
        author,
        publisher: optional_line("publisher", &form.publisher)?,
        year: parse_optional_int("year", &form.year)?,
        genre: optional_line("genre", &form.genre)?,
        language: optional_line("language", &form.language)?,
        pages: parse_optional_int("pages", &form.pages)?,
        date_read: validate_date_read(&form.date_read)?,
        rating,
        review: optional_text(&form.review),
    })
}

// =============================================================================
// Field Validators
// =============================================================================

/// Returns the trimmed value, or `Required` when it is blank.
///
/// ## Example
/// ```rust
/// use readlog_core::validation::validate_required;
///
/// assert_eq!(validate_required("title", "  Dune ").unwrap(), "Dune");
/// assert!(validate_required("title", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(value.to_string())
}

/// Trimmed text, `None` when blank.
pub fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Rejects text containing a line break.
pub fn single_line(field: &str, value: String) -> ValidationResult<String> {
    if value.contains(['\r', '\n']) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain line breaks".to_string(),
        });
    }

    Ok(value)
}

/// Trimmed single-line text, `None` when blank.
pub fn optional_line(field: &str, value: &str) -> ValidationResult<Option<String>> {
    optional_text(value)
        .map(|value| single_line(field, value))
        .transpose()
}

/// Parses an optional integer field.
///
/// Blank text is `None`; anything else must parse as an `i64`.
pub fn parse_optional_int(field: &str, value: &str) -> ValidationResult<Option<i64>> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a whole number", value),
        })
}

/// Rating must lie in 1..=5 when present.
pub fn validate_rating(rating: Option<i64>) -> ValidationResult<()> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING,
            max: MAX_RATING,
        }),
        _ => Ok(()),
    }
}

/// `date_read` must be a calendar date in `YYYY-MM-DD` form when present.
///
/// The stored text is re-formatted from the parsed date, zero-padded, so
/// that SQLite's text ordering of the column is chronological.
pub fn validate_date_read(value: &str) -> ValidationResult<Option<String>> {
    let Some(value) = optional_text(value) else {
        return Ok(None);
    };

    let invalid = || ValidationError::InvalidFormat {
        field: "date_read".to_string(),
        reason: "expected a date like 2024-03-01".to_string(),
    };

    let date = NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|_| invalid())?;

    // Outside this range %Y is not four digits and would not sort as text.
    if !(1..=9999).contains(&date.year()) {
        return Err(invalid());
    }

    Ok(Some(date.format(DATE_FORMAT).to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> BookForm {
        BookForm {
            isbn: "9780441172719".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_form_leaves_optionals_empty() {
        let book = form().validate().unwrap();

        assert_eq!(book.isbn, "9780441172719");
        assert_eq!(book.publisher, None);
        assert_eq!(book.year, None);
        assert_eq!(book.pages, None);
        assert_eq!(book.rating, None);
        assert_eq!(book.date_read, None);
    }

    #[test]
    fn test_first_missing_required_field_is_reported() {
        let empty = BookForm::default();
        assert_eq!(empty.validate(), Err(ValidationError::required("isbn")));

        let no_title = BookForm {
            title: "  ".to_string(),
            author: String::new(),
            ..form()
        };
        assert_eq!(no_title.validate(), Err(ValidationError::required("title")));

        let no_author = BookForm {
            author: "\t".to_string(),
            ..form()
        };
        assert_eq!(no_author.validate(), Err(ValidationError::required("author")));
    }

    #[test]
    fn test_numeric_fields_parse_or_reject() {
        let book = BookForm {
            year: " 1965 ".to_string(),
            pages: "412".to_string(),
            rating: "4".to_string(),
            ..form()
        }
        .validate()
        .unwrap();
        assert_eq!(book.year, Some(1965));
        assert_eq!(book.pages, Some(412));
        assert_eq!(book.rating, Some(4));

        let err = BookForm {
            year: "nineteen".to_string(),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "year"));

        let err = BookForm {
            pages: "12.5".to_string(),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "pages");
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(None).is_ok());
        assert!(validate_rating(Some(1)).is_ok());
        assert!(validate_rating(Some(5)).is_ok());
        assert!(validate_rating(Some(0)).is_err());
        assert!(validate_rating(Some(6)).is_err());

        let err = BookForm {
            rating: "9".to_string(),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { min: 1, max: 5, .. }));
    }

    #[test]
    fn test_date_read() {
        assert_eq!(validate_date_read("").unwrap(), None);
        assert_eq!(
            validate_date_read("2024-03-01").unwrap(),
            Some("2024-03-01".to_string())
        );
        assert!(validate_date_read("03/01/2024").is_err());
        assert!(validate_date_read("2024-02-30").is_err());
    }

    #[test]
    fn test_date_read_is_zero_padded() {
        assert_eq!(
            validate_date_read("2024-3-1").unwrap(),
            Some("2024-03-01".to_string())
        );
        assert_eq!(
            validate_date_read(" 2024-10-1 ").unwrap(),
            Some("2024-10-01".to_string())
        );
    }

    #[test]
    fn test_line_breaks_rejected_outside_review() {
        for name in ["isbn", "title", "author", "publisher", "genre", "language"] {
            let mut submitted = form();
            let value = "Line one\nLine two".to_string();
            match name {
                "isbn" => submitted.isbn = value,
                "title" => submitted.title = value,
                "author" => submitted.author = value,
                "publisher" => submitted.publisher = value,
                "genre" => submitted.genre = value,
                _ => submitted.language = value,
            }

            let err = submitted.validate().unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == name),
                "{} accepted a line break",
                name
            );
        }

        let book = BookForm {
            title: "Carriage\rReturn".to_string(),
            ..form()
        }
        .validate();
        assert!(book.is_err());

        // A blank required field still wins over a malformed earlier one
        let err = BookForm {
            isbn: "12\n34".to_string(),
            title: " ".to_string(),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::required("title"));

        let book = BookForm {
            review: "Line one\nLine two".to_string(),
            ..form()
        }
        .validate()
        .unwrap();
        assert_eq!(book.review.as_deref(), Some("Line one\nLine two"));
    }

    #[test]
    fn test_text_fields_are_trimmed() {
        let book = BookForm {
            isbn: " 123 ".to_string(),
            genre: "  Science Fiction ".to_string(),
            review: "   ".to_string(),
            ..form()
        }
        .validate()
        .unwrap();

        assert_eq!(book.isbn, "123");
        assert_eq!(book.genre.as_deref(), Some("Science Fiction"));
        assert_eq!(book.review, None);
    }
}
