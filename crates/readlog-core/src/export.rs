//! # CSV Export
//!
//! Serializes the library to CSV for download.
//!
//! ```text
//! ISBN,Title,Author,Publisher,Year,Genre,Language,Pages,Date Read,Rating,Review
//! 9780441172719,Dune,Frank Herbert,Ace,1965,Science Fiction,English,412,2024-03-01,5,Spice.
//! ```
//!
//! One physical line per record: line breaks inside a review are collapsed to
//! a space before writing. Fields are quoted only when they contain the
//! delimiter, a quote or a line break.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{CoreError, CoreResult};
use crate::types::Book;

/// Download name offered in `Content-Disposition`.
pub const EXPORT_FILENAME: &str = "readlog_library.csv";

/// MIME type of the export.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Header row, in column order.
pub const CSV_HEADER: [&str; 11] = [
    "ISBN",
    "Title",
    "Author",
    "Publisher",
    "Year",
    "Genre",
    "Language",
    "Pages",
    "Date Read",
    "Rating",
    "Review",
];

/// Writes the header and one row per book, preserving the given order.
pub fn write_csv(books: &[Book]) -> CoreResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for book in books {
        writer.write_record(csv_row(book))?;
    }

    writer
        .into_inner()
        .map_err(|e| CoreError::Export(e.to_string()))
}

/// Cells for one book; absent values become empty strings.
fn csv_row(book: &Book) -> [String; 11] {
    fn text(value: &Option<String>) -> String {
        value.clone().unwrap_or_default()
    }

    fn number(value: Option<i64>) -> String {
        value.map(|n| n.to_string()).unwrap_or_default()
    }

    [
        book.isbn.clone(),
        book.title.clone(),
        book.author.clone(),
        text(&book.publisher),
        number(book.year),
        text(&book.genre),
        text(&book.language),
        number(book.pages),
        text(&book.date_read),
        number(book.rating),
        book.review.as_deref().map(flatten_review).unwrap_or_default(),
    ]
}

/// Replaces each `\r` and `\n` with a space, then trims.
pub fn flatten_review(review: &str) -> String {
    review.replace(['\r', '\n'], " ").trim().to_string()
}
