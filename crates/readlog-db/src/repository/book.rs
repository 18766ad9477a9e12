//! # Book Repository
//!
//! Database operations for books.
//!
//! ## Write Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add(form)                                                              │
//! │    validate ── BEGIN IMMEDIATE ── isbn taken? ── title taken? ──        │
//! │    INSERT ── COMMIT                                                     │
//! │    (both checks run; isbn conflict reported first)                      │
//! │                                                                         │
//! │  update("A", form { isbn: "A", .. })        same key                    │
//! │    BEGIN IMMEDIATE ── "A" exists? ── validate ──                        │
//! │    title taken by another? ── UPDATE .. WHERE isbn = 'A' ── COMMIT      │
//! │                                                                         │
//! │  update("A", form { isbn: "B", .. })        key change                  │
//! │    BEGIN IMMEDIATE ── "A" exists? ── validate ── "B" taken? ──          │
//! │    title taken? ── DELETE 'A' ── INSERT 'B' ── COMMIT                   │
//! │    (one transaction: a failed insert never loses 'A')                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any early return drops the open transaction, which rolls it back.

use readlog_core::{Book, BookFilter, BookForm, ValidationError};
use sqlx::{Connection, SqliteConnection};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::query::{BookQuery, BOOK_COLUMNS, GENRES_SQL};

/// Takes the write lock at `BEGIN`; a concurrent writer waits there and
/// then sees the committed row in its duplicate checks.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// Repository for book database operations, bound to one session.
///
/// ## Usage
/// ```rust,ignore
/// let mut session = db.session().await?;
/// let mut books = session.books();
///
/// let added = books.add(&form).await?;
/// let found = books.get(&added.isbn).await?;
/// ```
#[derive(Debug)]
pub struct BookRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> BookRepository<'c> {
    /// Creates a repository over an acquired connection.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        BookRepository { conn }
    }

    /// Lists books matching the filter, newest `date_read` first, undated last.
    pub async fn list(&mut self, filter: &BookFilter) -> DbResult<Vec<Book>> {
        self.fetch(BookQuery::from_filter(filter)).await
    }

    /// Every book, in listing order (used by the CSV export).
    pub async fn list_all(&mut self) -> DbResult<Vec<Book>> {
        self.fetch(BookQuery::all()).await
    }

    async fn fetch(&mut self, query: BookQuery) -> DbResult<Vec<Book>> {
        debug!(predicates = query.predicates().len(), "Listing books");

        let mut builder = query.builder();
        let books = builder
            .build_query_as::<Book>()
            .fetch_all(&mut *self.conn)
            .await?;

        debug!(count = books.len(), "Listing returned books");
        Ok(books)
    }

    /// Distinct genres in ascending order, for the filter form.
    pub async fn genres(&mut self) -> DbResult<Vec<String>> {
        let genres = sqlx::query_scalar::<_, String>(GENRES_SQL)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(genres)
    }

    /// Gets a book by ISBN.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - No book with that ISBN
    pub async fn get(&mut self, isbn: &str) -> DbResult<Option<Book>> {
        fetch_book(&mut *self.conn, isbn).await
    }

    /// Counts stored books.
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }

    /// Validates and inserts a new book.
    ///
    /// ## Returns
    /// * `Ok(Book)` - The stored record
    /// * `Err(DbError::Validation(Required | InvalidFormat | OutOfRange))` - bad input
    /// * `Err(DbError::Validation(Duplicate))` - ISBN or title already used
    pub async fn add(&mut self, form: &BookForm) -> DbResult<Book> {
        let book = form.validate()?;

        debug!(isbn = %book.isbn, title = %book.title, "Adding book");

        let mut tx = self.conn.begin_with(BEGIN_WRITE).await?;

        let isbn_conflict = isbn_exists(&mut tx, &book.isbn).await?;
        let title_conflict = title_taken(&mut tx, &book.title, None).await?;

        if isbn_conflict {
            return Err(ValidationError::duplicate("isbn", &book.isbn).into());
        }
        if title_conflict {
            return Err(ValidationError::duplicate("title", &book.title).into());
        }

        insert_book(&mut tx, &book).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(isbn = %book.isbn, "Book added");
        Ok(book)
    }

    /// Replaces every field of the book currently stored under `current_isbn`.
    ///
    /// When the submitted ISBN differs, the old row is deleted and the new one
    /// inserted in the same transaction.
    ///
    /// ## Returns
    /// * `Ok(Book)` - The stored record (its ISBN is the redirect target)
    /// * `Err(DbError::NotFound)` - Nothing stored under `current_isbn`
    /// * `Err(DbError::Validation(..))` - bad input or ISBN/title collision
    pub async fn update(&mut self, current_isbn: &str, form: &BookForm) -> DbResult<Book> {
        debug!(isbn = %current_isbn, "Updating book");

        let mut tx = self.conn.begin_with(BEGIN_WRITE).await?;

        if !isbn_exists(&mut tx, current_isbn).await? {
            return Err(DbError::not_found("Book", current_isbn));
        }

        let book = form.validate()?;
        let key_change = book.isbn != current_isbn;

        if key_change && isbn_exists(&mut tx, &book.isbn).await? {
            return Err(ValidationError::duplicate("isbn", &book.isbn).into());
        }
        if title_taken(&mut tx, &book.title, Some(current_isbn)).await? {
            return Err(ValidationError::duplicate("title", &book.title).into());
        }

        if key_change {
            info!(from = %current_isbn, to = %book.isbn, "Changing book ISBN");
            delete_book(&mut tx, current_isbn).await?;
            insert_book(&mut tx, &book).await?;
        } else {
            update_book(&mut tx, &book).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(book)
    }

    /// Deletes a book. Deleting an unknown ISBN is a no-op.
    ///
    /// ## Returns
    /// Number of rows removed (0 or 1).
    pub async fn delete(&mut self, isbn: &str) -> DbResult<u64> {
        debug!(isbn = %isbn, "Deleting book");

        let removed = delete_book(&mut *self.conn, isbn).await?;

        if removed == 0 {
            debug!(isbn = %isbn, "No book to delete");
        }

        Ok(removed)
    }
}

// =============================================================================
// Statements
// =============================================================================

async fn fetch_book(conn: &mut SqliteConnection, isbn: &str) -> DbResult<Option<Book>> {
    let sql = format!("SELECT {} FROM books WHERE isbn = ?1", BOOK_COLUMNS);

    let book = sqlx::query_as::<_, Book>(&sql)
        .bind(isbn)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(book)
}

async fn isbn_exists(conn: &mut SqliteConnection, isbn: &str) -> DbResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE isbn = ?1")
        .bind(isbn)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

/// Whether a book other than `except_isbn` already has this title.
async fn title_taken(
    conn: &mut SqliteConnection,
    title: &str,
    except_isbn: Option<&str>,
) -> DbResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM books WHERE title = ?1 AND (?2 IS NULL OR isbn <> ?2)",
    )
    .bind(title)
    .bind(except_isbn)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count > 0)
}

async fn insert_book(conn: &mut SqliteConnection, book: &Book) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO books (
            isbn, title, author, publisher, year, genre,
            language, pages, date_read, rating, review
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.publisher)
    .bind(book.year)
    .bind(&book.genre)
    .bind(&book.language)
    .bind(book.pages)
    .bind(&book.date_read)
    .bind(book.rating)
    .bind(&book.review)
    .execute(&mut *conn)
    .await;

    match result {
        Ok(_) => Ok(()),
        // Lost an insert race: another request stored this ISBN after our check.
        Err(e) => match DbError::from(e) {
            DbError::UniqueViolation { .. } => {
                Err(ValidationError::duplicate("isbn", &book.isbn).into())
            }
            other => Err(other),
        },
    }
}

async fn update_book(conn: &mut SqliteConnection, book: &Book) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE books SET
            title = ?2,
            author = ?3,
            publisher = ?4,
            year = ?5,
            genre = ?6,
            language = ?7,
            pages = ?8,
            date_read = ?9,
            rating = ?10,
            review = ?11
        WHERE isbn = ?1
        "#,
    )
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.publisher)
    .bind(book.year)
    .bind(&book.genre)
    .bind(&book.language)
    .bind(book.pages)
    .bind(&book.date_read)
    .bind(book.rating)
    .bind(&book.review)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Book", &book.isbn));
    }

    Ok(())
}

async fn delete_book(conn: &mut SqliteConnection, isbn: &str) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM books WHERE isbn = ?1")
        .bind(isbn)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn form(isbn: &str, title: &str) -> BookForm {
        BookForm {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            ..Default::default()
        }
    }

    fn dated(isbn: &str, title: &str, genre: &str, date_read: &str) -> BookForm {
        BookForm {
            genre: genre.to_string(),
            date_read: date_read.to_string(),
            ..form(isbn, title)
        }
    }

    fn full_form() -> BookForm {
        BookForm {
            isbn: "9780441172719".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            publisher: "Ace".to_string(),
            year: "1965".to_string(),
            genre: "Science Fiction".to_string(),
            language: "English".to_string(),
            pages: "412".to_string(),
            date_read: "2024-03-01".to_string(),
            rating: "4".to_string(),
            review: "Sand.\nSo much sand.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_then_get_returns_same_record() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        let added = books.add(&full_form()).await.unwrap();
        let found = books.get("9780441172719").await.unwrap().unwrap();

        assert_eq!(found, added);
        assert_eq!(BookForm::from(&found), full_form());
    }

    #[tokio::test]
    async fn test_add_with_blank_title_writes_nothing() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&form("1", "Dune")).await.unwrap();

        let err = books.add(&form("2", "   ")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { ref field }) if field == "title"
        ));
        assert_eq!(books.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_duplicate_isbn_is_rejected() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&form("1", "Dune")).await.unwrap();

        let err = books.add(&form("1", "Dune Messiah")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Duplicate { ref field, .. }) if field == "isbn"
        ));
        assert_eq!(books.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_duplicate_title_is_rejected() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&form("1", "Dune")).await.unwrap();

        let err = books.add(&form("2", "Dune")).await.unwrap_err();
        assert_eq!(err.to_string(), "A book with title 'Dune' already exists");
        assert_eq!(books.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_isbn_conflict_is_reported_before_title_conflict() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&form("1", "Dune")).await.unwrap();

        let err = books.add(&form("1", "Dune")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Duplicate { ref field, .. }) if field == "isbn"
        ));
    }

    #[tokio::test]
    async fn test_add_with_malformed_number_writes_nothing() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        let bad = BookForm {
            year: "MCMLXV".to_string(),
            ..form("1", "Dune")
        };

        let err = books.add(&bad).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(books.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_rating_only() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        let before = books.add(&full_form()).await.unwrap();

        let edit = BookForm {
            rating: "5".to_string(),
            ..full_form()
        };
        books.update("9780441172719", &edit).await.unwrap();

        let after = books.get("9780441172719").await.unwrap().unwrap();
        assert_eq!(after.rating, Some(5));
        assert_eq!(
            Book {
                rating: before.rating,
                ..after
            },
            before
        );
    }

    #[tokio::test]
    async fn test_update_changes_isbn() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&form("A", "Dune")).await.unwrap();

        let edit = BookForm {
            pages: "412".to_string(),
            ..form("B", "Dune")
        };
        let updated = books.update("A", &edit).await.unwrap();

        assert_eq!(updated.isbn, "B");
        assert!(books.get("A").await.unwrap().is_none());

        let found = books.get("B").await.unwrap().unwrap();
        assert_eq!(found, updated);
        assert_eq!(found.pages, Some(412));
        assert_eq!(books.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_to_taken_isbn_keeps_both_records() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&form("A", "Dune")).await.unwrap();
        books.add(&form("B", "Emma")).await.unwrap();

        let err = books.update("A", &form("B", "Dune")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Duplicate { ref field, .. }) if field == "isbn"
        ));

        assert_eq!(books.get("A").await.unwrap().unwrap().title, "Dune");
        assert_eq!(books.get("B").await.unwrap().unwrap().title, "Emma");
    }

    #[tokio::test]
    async fn test_update_to_another_books_title_is_rejected() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&form("A", "Dune")).await.unwrap();
        books.add(&form("B", "Emma")).await.unwrap();

        let err = books.update("B", &form("B", "Dune")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Duplicate { ref field, .. }) if field == "title"
        ));

        // Keeping its own title is fine.
        books.update("A", &form("A", "Dune")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_book() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        let err = books.update("nope", &form("nope", "Dune")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(books.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_revalidates_required_fields() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&form("A", "Dune")).await.unwrap();

        let err = books.update("A", &form("", "Dune")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { ref field }) if field == "isbn"
        ));
        assert!(books.get("A").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_book_is_noop() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&form("A", "Dune")).await.unwrap();

        assert_eq!(books.delete("missing").await.unwrap(), 0);
        assert_eq!(books.count().await.unwrap(), 1);

        assert_eq!(books.delete("A").await.unwrap(), 1);
        assert_eq!(books.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_orders_by_date_read_with_undated_last() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&dated("1", "January", "", "2024-01-01")).await.unwrap();
        books.add(&dated("2", "Undated", "", "")).await.unwrap();
        books.add(&dated("3", "March", "", "2024-03-01")).await.unwrap();

        let listed = books.list(&BookFilter::default()).await.unwrap();
        let dates: Vec<Option<&str>> = listed.iter().map(|b| b.date_read.as_deref()).collect();

        assert_eq!(dates, vec![Some("2024-03-01"), Some("2024-01-01"), None]);
        assert_eq!(books.list_all().await.unwrap(), listed);
    }

    #[tokio::test]
    async fn test_filter_by_genre_substring() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&dated("1", "Old", "Fiction", "2023-05-01")).await.unwrap();
        books.add(&dated("2", "Undated", "Science Fiction", "")).await.unwrap();
        books.add(&dated("3", "New", "Historical Fiction", "2024-02-01")).await.unwrap();
        books.add(&dated("4", "Essay", "Non-fiction essays", "2024-06-01")).await.unwrap();
        books.add(&dated("5", "Poems", "Poetry", "2024-07-01")).await.unwrap();

        let filter = BookFilter {
            genre: Some("Fiction".to_string()),
            ..Default::default()
        };
        let listed = books.list(&filter).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|b| b.title.as_str()).collect();

        // LIKE is case-insensitive, so "Non-fiction" matches too.
        assert_eq!(titles, vec!["Essay", "New", "Old", "Undated"]);
        assert!(listed
            .iter()
            .all(|b| b.genre.as_deref().unwrap().to_lowercase().contains("fiction")));
    }

    #[tokio::test]
    async fn test_filters_are_conjunctive() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books
            .add(&BookForm {
                year: "1965".to_string(),
                rating: "5".to_string(),
                ..form("1", "Dune")
            })
            .await
            .unwrap();
        books
            .add(&BookForm {
                year: "1969".to_string(),
                rating: "5".to_string(),
                ..form("2", "Dune Messiah")
            })
            .await
            .unwrap();

        let filter = BookFilter {
            title: Some("dune".to_string()),
            author: Some("herbert".to_string()),
            year: Some("1965".to_string()),
            rating: Some("5".to_string()),
            genre: Some(" ".to_string()),
        };
        let listed = books.list(&filter).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].isbn, "1");
    }

    #[tokio::test]
    async fn test_genres_are_distinct_and_sorted() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&dated("1", "A", "Poetry", "")).await.unwrap();
        books.add(&dated("2", "B", "Fiction", "")).await.unwrap();
        books.add(&dated("3", "C", "Poetry", "")).await.unwrap();
        books.add(&dated("4", "D", "", "")).await.unwrap();

        assert_eq!(books.genres().await.unwrap(), vec!["Fiction", "Poetry"]);
    }

    #[tokio::test]
    async fn test_unpadded_date_sorts_chronologically() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        books.add(&dated("1", "March", "", "2024-3-1")).await.unwrap();
        books.add(&dated("2", "October", "", "2024-10-01")).await.unwrap();

        let listed = books.list(&BookFilter::default()).await.unwrap();
        let order: Vec<(&str, Option<&str>)> = listed
            .iter()
            .map(|b| (b.title.as_str(), b.date_read.as_deref()))
            .collect();

        assert_eq!(
            order,
            vec![
                ("October", Some("2024-10-01")),
                ("March", Some("2024-03-01")),
            ]
        );
    }

    #[tokio::test]
    async fn test_primary_key_rejects_lost_insert_race() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        // Skips the existence check, as a second writer racing past it would.
        let book = form("1", "Dune").validate().unwrap();
        insert_book(&mut *books.conn, &book).await.unwrap();

        let err = insert_book(&mut *books.conn, &book).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Duplicate { ref field, ref value })
                if field == "isbn" && value == "1"
        ));
        assert_eq!(books.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rating_check_constraint() {
        let db = setup().await;
        let mut session = db.session().await.unwrap();
        let mut books = session.books();

        let mut book = form("1", "Dune").validate().unwrap();
        book.rating = Some(9);

        let err = insert_book(&mut *books.conn, &book).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation { .. }));
        assert!(err.is_user_error());
        assert_eq!(books.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_adds_of_same_isbn() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("readlog-{}-{}", std::process::id(), nanos));
        std::fs::create_dir_all(&dir).unwrap();

        let db = Database::new(DbConfig::new(dir.join("library.db")))
            .await
            .unwrap();

        let results = {
            let mut first = db.session().await.unwrap();
            let mut second = db.session().await.unwrap();
            let mut first_books = first.books();
            let mut second_books = second.books();
            let submitted = form("1", "Dune");

            let (a, b) = tokio::join!(first_books.add(&submitted), second_books.add(&submitted));
            [a, b]
        };

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(DbError::Validation(ValidationError::Duplicate { field, .. })) if field == "isbn"
        )));

        db.close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }
}
