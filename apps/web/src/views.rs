//! # HTML Views
//!
//! Server-rendered pages. Every value that came from the user or the
//! database passes through [`escape`] before it reaches the markup, and
//! every ISBN placed in a URL passes through [`isbn_path`].
//!
//! ```text
//! /                 index()       filter form + table
//! /book/{isbn}      detail()      one record + edit/delete
//! /add, /edit/...   book_form()   add or edit, with optional error banner
//! (errors)          error_page()  status + message
//! ```

use std::borrow::Cow;
use std::fmt::Write;

use axum::http::StatusCode;
use axum::response::Html;
use readlog_core::{Book, BookFilter, BookForm, FilterField, MAX_RATING, MIN_RATING};

/// Which form is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction<'a> {
    Add,
    /// Editing the record currently stored under this ISBN.
    Edit(&'a str),
}

impl FormAction<'_> {
    fn target(&self) -> String {
        match self {
            FormAction::Add => "/add".to_string(),
            FormAction::Edit(isbn) => format!("/edit/{}", isbn_path(isbn)),
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            FormAction::Add => "Add a book",
            FormAction::Edit(_) => "Edit book",
        }
    }
}

// =============================================================================
// Pages
// =============================================================================

/// Library listing with the filter form.
pub fn index(books: &[Book], genres: &[String], filter: &BookFilter) -> Html<String> {
    let mut body = String::new();

    body.push_str("<h1>My library</h1>\n");
    body.push_str(r#"<p><a href="/add">Add a book</a> | <a href="/export">Export CSV</a></p>"#);
    body.push('\n');

    body.push_str(r#"<form method="get" action="/" class="filters">"#);
    body.push('\n');
    for (field, label) in [
        (FilterField::Title, "Title"),
        (FilterField::Author, "Author"),
        (FilterField::Year, "Year"),
        (FilterField::Rating, "Rating"),
    ] {
        let name = field.column();
        let _ = writeln!(
            body,
            r#"<label>{label} <input type="text" name="{name}" value="{}"></label>"#,
            escape(filter.value(field))
        );
    }

    let selected_genre = filter.value(FilterField::Genre);
    body.push_str(r#"<label>Genre <select name="genre"><option value="">Any</option>"#);
    for genre in genres {
        let selected = if genre == selected_genre { " selected" } else { "" };
        let _ = write!(
            body,
            r#"<option value="{0}"{selected}>{0}</option>"#,
            escape(genre)
        );
    }
    body.push_str("</select></label>\n");
    body.push_str(r#"<button type="submit">Filter</button> <a href="/">Clear</a>"#);
    body.push_str("\n</form>\n");

    if books.is_empty() {
        body.push_str("<p>No books found.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>Title</th><th>Author</th><th>Genre</th><th>Year</th>\
             <th>Rating</th><th>Date read</th></tr>\n",
        );
        for book in books {
            let _ = writeln!(
                body,
                r#"<tr><td><a href="/book/{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                isbn_path(&book.isbn),
                escape(&book.title),
                escape(&book.author),
                opt_text(&book.genre),
                opt_number(book.year),
                opt_number(book.rating),
                opt_text(&book.date_read),
            );
        }
        body.push_str("</table>\n");
    }

    layout("Library", &body)
}

/// Every field of one book.
pub fn detail(book: &Book) -> Html<String> {
    let mut body = String::new();
    let isbn = isbn_path(&book.isbn);

    let _ = writeln!(body, "<h1>{}</h1>", escape(&book.title));
    body.push_str("<dl>\n");
    for (label, value) in [
        ("ISBN", escape(&book.isbn).into_owned()),
        ("Author", escape(&book.author).into_owned()),
        ("Publisher", opt_text(&book.publisher)),
        ("Year", opt_number(book.year)),
        ("Genre", opt_text(&book.genre)),
        ("Language", opt_text(&book.language)),
        ("Pages", opt_number(book.pages)),
        ("Date read", opt_text(&book.date_read)),
        ("Rating", opt_number(book.rating)),
    ] {
        let _ = writeln!(body, "<dt>{label}</dt><dd>{value}</dd>");
    }
    body.push_str("</dl>\n");

    if let Some(review) = book.review.as_deref() {
        let _ = writeln!(
            body,
            r#"<h2>Review</h2>
<p class="review">{}</p>"#,
            escape(review).replace('\n', "<br>\n")
        );
    }

    let _ = writeln!(
        body,
        r#"<p><a href="/edit/{isbn}">Edit</a> | <a href="/">Back to library</a></p>
<form method="post" action="/delete/{isbn}"><button type="submit">Delete</button></form>"#
    );

    layout(&book.title, &body)
}

/// Add or edit form, pre-filled with `form` and headed by `error` if any.
pub fn book_form(action: FormAction<'_>, form: &BookForm, error: Option<&str>) -> Html<String> {
    let mut body = String::new();

    let _ = writeln!(body, "<h1>{}</h1>", action.heading());
    if let Some(message) = error {
        let _ = writeln!(body, r#"<p class="error">{}</p>"#, escape(message));
    }

    let _ = writeln!(body, r#"<form method="post" action="{}">"#, action.target());
    for (name, label, value, kind) in [
        ("isbn", "ISBN *", &form.isbn, "text"),
        ("title", "Title *", &form.title, "text"),
        ("author", "Author *", &form.author, "text"),
        ("publisher", "Publisher", &form.publisher, "text"),
        ("year", "Year", &form.year, "text"),
        ("genre", "Genre", &form.genre, "text"),
        ("language", "Language", &form.language, "text"),
        ("pages", "Pages", &form.pages, "text"),
        ("date_read", "Date read (YYYY-MM-DD)", &form.date_read, "date"),
    ] {
        let _ = writeln!(
            body,
            r#"<label>{label} <input type="{kind}" name="{name}" value="{}"></label><br>"#,
            escape(value)
        );
    }

    body.push_str(r#"<label>Rating <select name="rating"><option value="">-</option>"#);
    for rating in MIN_RATING..=MAX_RATING {
        let rating = rating.to_string();
        let selected = if form.rating.trim() == rating { " selected" } else { "" };
        let _ = write!(body, r#"<option value="{rating}"{selected}>{rating}</option>"#);
    }
    body.push_str("</select></label><br>\n");

    let _ = writeln!(
        body,
        r#"<label>Review<br><textarea name="review" rows="8" cols="60">{}</textarea></label><br>"#,
        escape(&form.review)
    );
    body.push_str(r#"<button type="submit">Save</button> <a href="/">Cancel</a>"#);
    body.push_str("\n</form>\n");

    layout(action.heading(), &body)
}

/// Page shown for 404/500 and friends.
pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<h1>{} {}</h1>
<p>{}</p>
<p><a href="/">Back to library</a></p>
"#,
        status.as_u16(),
        title,
        escape(message)
    );
    layout(title, &body)
}

// =============================================================================
// Helpers
// =============================================================================

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{} - ReadLog</title></head>
<body>
{}</body>
</html>
"#,
        escape(title),
        body
    ))
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Percent-encodes an ISBN for use as a path segment.
pub fn isbn_path(isbn: &str) -> Cow<'_, str> {
    urlencoding::encode(isbn)
}

fn opt_text(value: &Option<String>) -> String {
    value.as_deref().map(|v| escape(v).into_owned()).unwrap_or_default()
}

fn opt_number(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}
