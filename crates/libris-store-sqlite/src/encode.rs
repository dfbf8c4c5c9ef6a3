//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text. Ratings are stored as integers and
//! narrowed back to `u8` on read. Rows that need decoding are first read into
//! `Raw*` structs inside the connection closure and converted outside it.

use chrono::NaiveDate;
use libris_core::{
  change::BookTarget,
  entity::{Author, Book, Category, Country, EntityKind, Id, NamedKind, Review, Reviewer},
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── Table names ─────────────────────────────────────────────────────────────

/// `(table, primary key column)` for each entity kind.
pub fn table_of(kind: EntityKind) -> (&'static str, &'static str) {
  match kind {
    EntityKind::Country => ("countries", "country_id"),
    EntityKind::Author => ("authors", "author_id"),
    EntityKind::Category => ("categories", "category_id"),
    EntityKind::Book => ("books", "book_id"),
    EntityKind::Reviewer => ("reviewers", "reviewer_id"),
    EntityKind::Review => ("reviews", "review_id"),
  }
}

pub fn named_table_of(kind: NamedKind) -> (&'static str, &'static str) {
  table_of(kind.into())
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?)
}

// ─── Rating ──────────────────────────────────────────────────────────────────

pub fn decode_rating(v: i64) -> Result<u8> {
  u8::try_from(v).map_err(|_| Error::Decode {
    column: "rating",
    value:  v.to_string(),
  })
}

// ─── BookTarget ──────────────────────────────────────────────────────────────

/// The concrete book id a link change refers to, given the id assigned by
/// the change set's insert so far.
pub fn resolve_target(target: BookTarget, inserted: Option<Id>) -> Option<Id> {
  match target {
    BookTarget::Existing(id) => Some(id),
    BookTarget::Inserted => inserted,
  }
}

// ─── SELECT lists ────────────────────────────────────────────────────────────

pub const COUNTRY_SELECT: &str = "SELECT c.country_id, c.name FROM countries c";

pub const CATEGORY_SELECT: &str = "SELECT g.category_id, g.name FROM categories g";

pub const AUTHOR_SELECT: &str = "SELECT a.author_id, a.first_name, a.last_name,
                                        c.country_id, c.name
                                 FROM authors a
                                 JOIN countries c ON c.country_id = a.country_id";

pub const BOOK_SELECT: &str = "SELECT b.book_id, b.title, b.isbn, b.date_published FROM books b";

pub const REVIEWER_SELECT: &str =
  "SELECT v.reviewer_id, v.first_name, v.last_name FROM reviewers v";

pub const REVIEW_SELECT: &str = "SELECT r.review_id, r.headline, r.review_text, r.rating,
                                        b.book_id, b.title, b.isbn, b.date_published,
                                        v.reviewer_id, v.first_name, v.last_name
                                 FROM reviews r
                                 JOIN books     b ON b.book_id     = r.book_id
                                 JOIN reviewers v ON v.reviewer_id = r.reviewer_id";

// ─── Row mappers ─────────────────────────────────────────────────────────────

pub fn country_row(row: &Row<'_>) -> rusqlite::Result<Country> {
  Ok(Country { id: row.get(0)?, name: row.get(1)? })
}

pub fn category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
  Ok(Category { id: row.get(0)?, name: row.get(1)? })
}

pub fn author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
  Ok(Author {
    id:         row.get(0)?,
    first_name: row.get(1)?,
    last_name:  row.get(2)?,
    country:    Country { id: row.get(3)?, name: row.get(4)? },
  })
}

pub fn reviewer_row(row: &Row<'_>) -> rusqlite::Result<Reviewer> {
  Ok(Reviewer {
    id:         row.get(0)?,
    first_name: row.get(1)?,
    last_name:  row.get(2)?,
  })
}

pub fn raw_book_row(row: &Row<'_>) -> rusqlite::Result<RawBook> {
  Ok(RawBook {
    book_id:        row.get(0)?,
    title:          row.get(1)?,
    isbn:           row.get(2)?,
    date_published: row.get(3)?,
  })
}

pub fn raw_review_row(row: &Row<'_>) -> rusqlite::Result<RawReview> {
  Ok(RawReview {
    review_id:   row.get(0)?,
    headline:    row.get(1)?,
    review_text: row.get(2)?,
    rating:      row.get(3)?,
    book:        RawBook {
      book_id:        row.get(4)?,
      title:          row.get(5)?,
      isbn:           row.get(6)?,
      date_published: row.get(7)?,
    },
    reviewer:    Reviewer {
      id:         row.get(8)?,
      first_name: row.get(9)?,
      last_name:  row.get(10)?,
    },
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `books` row with its date still in stored form.
pub struct RawBook {
  pub book_id:        Id,
  pub title:          String,
  pub isbn:           String,
  pub date_published: Option<String>,
}

impl RawBook {
  pub fn into_book(self) -> Result<Book> {
    Ok(Book {
      id:             self.book_id,
      title:          self.title,
      isbn:           self.isbn,
      date_published: self.date_published.as_deref().map(decode_date).transpose()?,
    })
  }
}

/// A `reviews` row joined with its book and reviewer.
pub struct RawReview {
  pub review_id:   Id,
  pub headline:    String,
  pub review_text: String,
  pub rating:      i64,
  pub book:        RawBook,
  pub reviewer:    Reviewer,
}

impl RawReview {
  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      id:          self.review_id,
      headline:    self.headline,
      review_text: self.review_text,
      rating:      decode_rating(self.rating)?,
      book:        self.book.into_book()?,
      reviewer:    self.reviewer,
    })
  }
}
