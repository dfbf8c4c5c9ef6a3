//! [`SqliteStore`]: the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use libris_core::{
  change::{Applied, Change, ChangeSet},
  entity::{Author, Book, Category, Country, EntityKind, Id, NamedKind, Review, Reviewer},
  store::CatalogStore,
  validation::name_key,
};
use rusqlite::{OptionalExtension as _, Row, types::Value};

use crate::{
  Result,
  encode::{
    AUTHOR_SELECT, BOOK_SELECT, CATEGORY_SELECT, COUNTRY_SELECT, REVIEW_SELECT, REVIEWER_SELECT,
    author_row, category_row, country_row, decode_rating, encode_date, named_table_of,
    raw_book_row, raw_review_row, resolve_target, reviewer_row, table_of,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Libris catalog store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, e.g. for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `sql` and map every row with `map`.
  async fn query_all<T, F>(&self, sql: String, params: Vec<Value>, map: F) -> Result<Vec<T>>
  where
    T: Send + 'static,
    F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| map(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Run `sql` and map the first row, if any, with `map`.
  async fn query_one<T, F>(&self, sql: String, params: Vec<Value>, map: F) -> Result<Option<T>>
  where
    T: Send + 'static,
    F: Fn(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), |row| map(row))
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn query_books(&self, sql: String, params: Vec<Value>) -> Result<Vec<Book>> {
    self
      .query_all(sql, params, raw_book_row)
      .await?
      .into_iter()
      .map(|raw| raw.into_book())
      .collect()
  }

  async fn query_reviews(&self, sql: String, params: Vec<Value>) -> Result<Vec<Review>> {
    self
      .query_all(sql, params, raw_review_row)
      .await?
      .into_iter()
      .map(|raw| raw.into_review())
      .collect()
  }
}

// ─── Change application ──────────────────────────────────────────────────────

/// Execute one change and return the number of rows it touched.
fn apply_change(
  conn: &rusqlite::Connection,
  change: &Change,
  inserted: Option<Id>,
) -> rusqlite::Result<usize> {
  use rusqlite::params;

  match change {
    Change::InsertCountry { name } => conn.execute(
      "INSERT INTO countries (name, name_key) VALUES (?1, ?2)",
      params![name, name_key(name)],
    ),
    Change::UpdateCountry { id, name } => conn.execute(
      "UPDATE countries SET name = ?2, name_key = ?3 WHERE country_id = ?1",
      params![id, name, name_key(name)],
    ),
    Change::DeleteCountry(id) => {
      conn.execute("DELETE FROM countries WHERE country_id = ?1", params![id])
    }

    Change::InsertCategory { name } => conn.execute(
      "INSERT INTO categories (name, name_key) VALUES (?1, ?2)",
      params![name, name_key(name)],
    ),
    Change::UpdateCategory { id, name } => conn.execute(
      "UPDATE categories SET name = ?2, name_key = ?3 WHERE category_id = ?1",
      params![id, name, name_key(name)],
    ),
    Change::DeleteCategory(id) => {
      conn.execute("DELETE FROM categories WHERE category_id = ?1", params![id])
    }

    Change::InsertAuthor(row) => conn.execute(
      "INSERT INTO authors (first_name, last_name, country_id) VALUES (?1, ?2, ?3)",
      params![row.first_name, row.last_name, row.country_id],
    ),
    Change::UpdateAuthor { id, row } => conn.execute(
      "UPDATE authors SET first_name = ?2, last_name = ?3, country_id = ?4
       WHERE author_id = ?1",
      params![id, row.first_name, row.last_name, row.country_id],
    ),
    Change::DeleteAuthor(id) => {
      conn.execute("DELETE FROM authors WHERE author_id = ?1", params![id])
    }

    Change::InsertBook(row) => conn.execute(
      "INSERT INTO books (title, isbn, date_published) VALUES (?1, ?2, ?3)",
      params![row.title, row.isbn, row.date_published.map(encode_date)],
    ),
    Change::UpdateBook { id, row } => conn.execute(
      "UPDATE books SET title = ?2, isbn = ?3, date_published = ?4 WHERE book_id = ?1",
      params![id, row.title, row.isbn, row.date_published.map(encode_date)],
    ),
    Change::DeleteBook(id) => conn.execute("DELETE FROM books WHERE book_id = ?1", params![id]),

    Change::LinkAuthor { book, author_id } => conn.execute(
      "INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?1, ?2)",
      params![resolve_target(*book, inserted), author_id],
    ),
    Change::LinkCategory { book, category_id } => conn.execute(
      "INSERT OR IGNORE INTO book_categories (book_id, category_id) VALUES (?1, ?2)",
      params![resolve_target(*book, inserted), category_id],
    ),
    Change::UnlinkAuthors { book_id } => {
      conn.execute("DELETE FROM book_authors WHERE book_id = ?1", params![book_id])
    }
    Change::UnlinkCategories { book_id } => {
      conn.execute("DELETE FROM book_categories WHERE book_id = ?1", params![book_id])
    }

    Change::InsertReviewer(row) => conn.execute(
      "INSERT INTO reviewers (first_name, last_name) VALUES (?1, ?2)",
      params![row.first_name, row.last_name],
    ),
    Change::UpdateReviewer { id, row } => conn.execute(
      "UPDATE reviewers SET first_name = ?2, last_name = ?3 WHERE reviewer_id = ?1",
      params![id, row.first_name, row.last_name],
    ),
    Change::DeleteReviewer(id) => {
      conn.execute("DELETE FROM reviewers WHERE reviewer_id = ?1", params![id])
    }

    Change::InsertReview(row) => conn.execute(
      "INSERT INTO reviews (headline, review_text, rating, book_id, reviewer_id)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      params![row.headline, row.review_text, row.rating, row.book_id, row.reviewer_id],
    ),
    Change::UpdateReview { id, row } => conn.execute(
      "UPDATE reviews
       SET headline = ?2, review_text = ?3, rating = ?4, book_id = ?5, reviewer_id = ?6
       WHERE review_id = ?1",
      params![id, row.headline, row.review_text, row.rating, row.book_id, row.reviewer_id],
    ),
    Change::DeleteReview(id) => {
      conn.execute("DELETE FROM reviews WHERE review_id = ?1", params![id])
    }
  }
}

/// A link aimed at "the inserted book" with no insert before it.
fn dangling_link(change: &Change, inserted: Option<Id>) -> bool {
  match change {
    Change::LinkAuthor { book, .. } | Change::LinkCategory { book, .. } => {
      resolve_target(*book, inserted).is_none()
    }
    _ => false,
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

fn id_param(id: Id) -> Vec<Value> { vec![Value::Integer(id)] }

impl CatalogStore for SqliteStore {
  type Error = crate::Error;

  // ── Existence ─────────────────────────────────────────────────────────────

  async fn exists(&self, kind: EntityKind, id: Id) -> Result<bool> {
    let (table, column) = table_of(kind);
    let sql = format!("SELECT 1 FROM {table} WHERE {column} = ?1");
    Ok(self.query_one(sql, id_param(id), |_| Ok(())).await?.is_some())
  }

  async fn ids_with_name_key(&self, kind: NamedKind, key: &str) -> Result<Vec<Id>> {
    let (table, column) = named_table_of(kind);
    let sql = format!("SELECT {column} FROM {table} WHERE name_key = ?1");
    self
      .query_all(sql, vec![Value::Text(key.to_owned())], |row| row.get(0))
      .await
  }

  // ── Countries ─────────────────────────────────────────────────────────────

  async fn list_countries(&self) -> Result<Vec<Country>> {
    let sql = format!("{COUNTRY_SELECT} ORDER BY c.name COLLATE NOCASE, c.country_id");
    self.query_all(sql, vec![], country_row).await
  }

  async fn get_country(&self, id: Id) -> Result<Option<Country>> {
    let sql = format!("{COUNTRY_SELECT} WHERE c.country_id = ?1");
    self.query_one(sql, id_param(id), country_row).await
  }

  async fn authors_in_country(&self, country_id: Id) -> Result<Vec<Author>> {
    let sql = format!(
      "{AUTHOR_SELECT}
       WHERE a.country_id = ?1
       ORDER BY a.last_name COLLATE NOCASE, a.first_name COLLATE NOCASE, a.author_id"
    );
    self.query_all(sql, id_param(country_id), author_row).await
  }

  // ── Authors ───────────────────────────────────────────────────────────────

  async fn list_authors(&self) -> Result<Vec<Author>> {
    let sql = format!(
      "{AUTHOR_SELECT}
       ORDER BY a.last_name COLLATE NOCASE, a.first_name COLLATE NOCASE, a.author_id"
    );
    self.query_all(sql, vec![], author_row).await
  }

  async fn get_author(&self, id: Id) -> Result<Option<Author>> {
    let sql = format!("{AUTHOR_SELECT} WHERE a.author_id = ?1");
    self.query_one(sql, id_param(id), author_row).await
  }

  async fn authors_of_book(&self, book_id: Id) -> Result<Vec<Author>> {
    let sql = format!(
      "{AUTHOR_SELECT}
       JOIN book_authors ba ON ba.author_id = a.author_id
       WHERE ba.book_id = ?1
       ORDER BY a.last_name COLLATE NOCASE, a.first_name COLLATE NOCASE, a.author_id"
    );
    self.query_all(sql, id_param(book_id), author_row).await
  }

  async fn books_by_author(&self, author_id: Id) -> Result<Vec<Book>> {
    let sql = format!(
      "{BOOK_SELECT}
       JOIN book_authors ba ON ba.book_id = b.book_id
       WHERE ba.author_id = ?1
       ORDER BY b.title COLLATE NOCASE, b.book_id"
    );
    self.query_books(sql, id_param(author_id)).await
  }

  // ── Categories ────────────────────────────────────────────────────────────

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let sql = format!("{CATEGORY_SELECT} ORDER BY g.name COLLATE NOCASE, g.category_id");
    self.query_all(sql, vec![], category_row).await
  }

  async fn get_category(&self, id: Id) -> Result<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE g.category_id = ?1");
    self.query_one(sql, id_param(id), category_row).await
  }

  async fn categories_of_book(&self, book_id: Id) -> Result<Vec<Category>> {
    let sql = format!(
      "{CATEGORY_SELECT}
       JOIN book_categories bc ON bc.category_id = g.category_id
       WHERE bc.book_id = ?1
       ORDER BY g.name COLLATE NOCASE, g.category_id"
    );
    self.query_all(sql, id_param(book_id), category_row).await
  }

  async fn books_in_category(&self, category_id: Id) -> Result<Vec<Book>> {
    let sql = format!(
      "{BOOK_SELECT}
       JOIN book_categories bc ON bc.book_id = b.book_id
       WHERE bc.category_id = ?1
       ORDER BY b.title COLLATE NOCASE, b.book_id"
    );
    self.query_books(sql, id_param(category_id)).await
  }

  // ── Books ─────────────────────────────────────────────────────────────────

  async fn list_books(&self) -> Result<Vec<Book>> {
    let sql = format!("{BOOK_SELECT} ORDER BY b.title COLLATE NOCASE, b.book_id");
    self.query_books(sql, vec![]).await
  }

  async fn get_book(&self, id: Id) -> Result<Option<Book>> {
    let sql = format!("{BOOK_SELECT} WHERE b.book_id = ?1");
    self
      .query_one(sql, id_param(id), raw_book_row)
      .await?
      .map(|raw| raw.into_book())
      .transpose()
  }

  async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
    let sql = format!("{BOOK_SELECT} WHERE b.isbn = ?1");
    self
      .query_one(sql, vec![Value::Text(isbn.to_owned())], raw_book_row)
      .await?
      .map(|raw| raw.into_book())
      .transpose()
  }

  async fn ratings_of_book(&self, book_id: Id) -> Result<Vec<u8>> {
    let sql = "SELECT rating FROM reviews WHERE book_id = ?1".to_owned();
    self
      .query_all(sql, id_param(book_id), |row| row.get::<_, i64>(0))
      .await?
      .into_iter()
      .map(decode_rating)
      .collect()
  }

  // ── Reviewers ─────────────────────────────────────────────────────────────

  async fn list_reviewers(&self) -> Result<Vec<Reviewer>> {
    let sql = format!(
      "{REVIEWER_SELECT}
       ORDER BY v.last_name COLLATE NOCASE, v.first_name COLLATE NOCASE, v.reviewer_id"
    );
    self.query_all(sql, vec![], reviewer_row).await
  }

  async fn get_reviewer(&self, id: Id) -> Result<Option<Reviewer>> {
    let sql = format!("{REVIEWER_SELECT} WHERE v.reviewer_id = ?1");
    self.query_one(sql, id_param(id), reviewer_row).await
  }

  async fn reviews_by_reviewer(&self, reviewer_id: Id) -> Result<Vec<Review>> {
    let sql = format!("{REVIEW_SELECT} WHERE r.reviewer_id = ?1 ORDER BY r.rating, r.review_id");
    self.query_reviews(sql, id_param(reviewer_id)).await
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn list_reviews(&self) -> Result<Vec<Review>> {
    let sql = format!("{REVIEW_SELECT} ORDER BY r.rating, r.review_id");
    self.query_reviews(sql, vec![]).await
  }

  async fn get_review(&self, id: Id) -> Result<Option<Review>> {
    let sql = format!("{REVIEW_SELECT} WHERE r.review_id = ?1");
    self
      .query_one(sql, id_param(id), raw_review_row)
      .await?
      .map(|raw| raw.into_review())
      .transpose()
  }

  async fn reviews_of_book(&self, book_id: Id) -> Result<Vec<Review>> {
    let sql = format!("{REVIEW_SELECT} WHERE r.book_id = ?1 ORDER BY r.rating, r.review_id");
    self.query_reviews(sql, id_param(book_id)).await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn apply(&self, changes: ChangeSet) -> Result<Applied> {
    let applied = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without committing rolls every change back.
        let tx = conn.transaction()?;
        let mut inserted: Option<Id> = None;

        for change in changes {
          if dangling_link(&change, inserted) {
            return Ok(Applied::RolledBack(change));
          }
          let affected = apply_change(&tx, &change, inserted)?;
          if change.is_insert() {
            inserted = Some(tx.last_insert_rowid());
          }
          if affected == 0 && change.must_take_effect() {
            return Ok(Applied::RolledBack(change));
          }
        }

        tx.commit()?;
        Ok(Applied::Committed { inserted })
      })
      .await?;
    Ok(applied)
  }
}
