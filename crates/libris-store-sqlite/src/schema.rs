//! SQL schema for the Libris SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS countries (
    country_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    name_key    TEXT NOT NULL UNIQUE   -- trimmed, lower-cased name
);

CREATE TABLE IF NOT EXISTS categories (
    category_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    name_key    TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS authors (
    author_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    country_id  INTEGER NOT NULL REFERENCES countries(country_id)
);

CREATE TABLE IF NOT EXISTS books (
    book_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    isbn            TEXT NOT NULL UNIQUE,
    date_published  TEXT              -- YYYY-MM-DD or NULL
);

CREATE TABLE IF NOT EXISTS book_authors (
    book_id     INTEGER NOT NULL REFERENCES books(book_id),
    author_id   INTEGER NOT NULL REFERENCES authors(author_id),
    PRIMARY KEY (book_id, author_id)
);

CREATE TABLE IF NOT EXISTS book_categories (
    book_id     INTEGER NOT NULL REFERENCES books(book_id),
    category_id INTEGER NOT NULL REFERENCES categories(category_id),
    PRIMARY KEY (book_id, category_id)
);

CREATE TABLE IF NOT EXISTS reviewers (
    reviewer_id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL
);

-- The reviewer reference is checked at commit so a reviewer can be deleted
-- ahead of their reviews within one transaction.
CREATE TABLE IF NOT EXISTS reviews (
    review_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    headline    TEXT NOT NULL,
    review_text TEXT NOT NULL DEFAULT '',
    rating      INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    book_id     INTEGER NOT NULL REFERENCES books(book_id),
    reviewer_id INTEGER NOT NULL REFERENCES reviewers(reviewer_id)
                DEFERRABLE INITIALLY DEFERRED
);

CREATE INDEX IF NOT EXISTS authors_country_idx        ON authors(country_id);
CREATE INDEX IF NOT EXISTS book_authors_author_idx    ON book_authors(author_id);
CREATE INDEX IF NOT EXISTS book_categories_cat_idx    ON book_categories(category_id);
CREATE INDEX IF NOT EXISTS reviews_book_idx           ON reviews(book_id);
CREATE INDEX IF NOT EXISTS reviews_reviewer_idx       ON reviews(reviewer_id);

PRAGMA user_version = 1;
";
