//! # Seed Data Generator
//!
//! Populates a library database with a handful of sample books for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./instance/library.db (default)
//! cargo run -p readlog-db --bin seed
//!
//! # Specify database path
//! cargo run -p readlog-db --bin seed -- --db ./data/library.db
//! ```
//!
//! Books whose ISBN or title is already present are skipped, so running the
//! seeder twice is harmless.

use std::env;
use std::path::PathBuf;

use readlog_core::BookForm;
use readlog_db::{Database, DbConfig, DbError};

/// (isbn, title, author, publisher, year, genre, pages, date_read, rating)
const SAMPLE_BOOKS: &[(&str, &str, &str, &str, &str, &str, &str, &str, &str)] = &[
    (
        "9780441172719",
        "Dune",
        "Frank Herbert",
        "Ace",
        "1965",
        "Science Fiction",
        "412",
        "2024-03-01",
        "5",
    ),
    (
        "9780060512750",
        "The Dispossessed",
        "Ursula K. Le Guin",
        "Harper Voyager",
        "1974",
        "Science Fiction",
        "387",
        "2024-01-14",
        "5",
    ),
    (
        "9780141439518",
        "Pride and Prejudice",
        "Jane Austen",
        "Penguin Classics",
        "1813",
        "Fiction",
        "480",
        "2023-11-02",
        "4",
    ),
    (
        "9780374533557",
        "Thinking, Fast and Slow",
        "Daniel Kahneman",
        "Farrar, Straus and Giroux",
        "2011",
        "Non-fiction",
        "499",
        "",
        "3",
    ),
    (
        "9780143039433",
        "The Grapes of Wrath",
        "John Steinbeck",
        "Penguin",
        "1939",
        "Historical Fiction",
        "464",
        "",
        "",
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = parse_db_path();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    println!("Seeding {}", db_path.display());

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let mut session = db.session().await?;
    let mut books = session.books();

    let mut added = 0;
    for &(isbn, title, author, publisher, year, genre, pages, date_read, rating) in SAMPLE_BOOKS {
        let form = BookForm {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.to_string(),
            year: year.to_string(),
            genre: genre.to_string(),
            language: "English".to_string(),
            pages: pages.to_string(),
            date_read: date_read.to_string(),
            rating: rating.to_string(),
            review: String::new(),
        };

        match books.add(&form).await {
            Ok(book) => {
                added += 1;
                println!("  + {} ({})", book.title, book.isbn);
            }
            Err(DbError::Validation(e)) => println!("  - skipped {}: {}", title, e),
            Err(e) => return Err(e.into()),
        }
    }

    println!();
    println!("✓ Added {} books, library now holds {}", added, books.count().await?);

    Ok(())
}

/// Reads `--db <path>` from the command line.
fn parse_db_path() -> PathBuf {
    let args: Vec<String> = env::args().collect();

    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("instance/library.db"))
}
