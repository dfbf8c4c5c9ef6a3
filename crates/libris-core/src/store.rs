//! The `CatalogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `libris-store-sqlite`).
//! It exposes plain reads plus a single write entry point,
//! [`CatalogStore::apply`]. Stores make no integrity decisions: existence
//! checks, uniqueness, delete guards and cascades are decided by
//! [`Catalog`](crate::catalog::Catalog) and arrive here as an explicit
//! [`ChangeSet`].

use std::future::Future;

use crate::{
  change::{Applied, ChangeSet},
  entity::{Author, Book, Category, Country, EntityKind, Id, NamedKind, Review, Reviewer},
};

/// Abstraction over a catalog storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Existence ─────────────────────────────────────────────────────────

  /// Whether a row of `kind` with `id` exists.
  fn exists(
    &self,
    kind: EntityKind,
    id: Id,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Ids of every `kind` record whose normalised name equals `key`
  /// (see [`name_key`](crate::validation::name_key)).
  fn ids_with_name_key<'a>(
    &'a self,
    kind: NamedKind,
    key: &'a str,
  ) -> impl Future<Output = Result<Vec<Id>, Self::Error>> + Send + 'a;

  // ── Countries ─────────────────────────────────────────────────────────

  /// All countries ordered by name.
  fn list_countries(&self) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_;

  fn get_country(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + '_;

  /// Authors whose country is `country_id`, ordered by last name.
  fn authors_in_country(
    &self,
    country_id: Id,
  ) -> impl Future<Output = Result<Vec<Author>, Self::Error>> + Send + '_;

  // ── Authors ───────────────────────────────────────────────────────────

  /// All authors ordered by last name.
  fn list_authors(&self) -> impl Future<Output = Result<Vec<Author>, Self::Error>> + Send + '_;

  fn get_author(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Author>, Self::Error>> + Send + '_;

  fn authors_of_book(
    &self,
    book_id: Id,
  ) -> impl Future<Output = Result<Vec<Author>, Self::Error>> + Send + '_;

  fn books_by_author(
    &self,
    author_id: Id,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  // ── Categories ────────────────────────────────────────────────────────

  /// All categories ordered by name.
  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  fn get_category(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + '_;

  fn categories_of_book(
    &self,
    book_id: Id,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  fn books_in_category(
    &self,
    category_id: Id,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  // ── Books ─────────────────────────────────────────────────────────────

  /// All books ordered by title.
  fn list_books(&self) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  fn get_book(&self, id: Id) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + '_;

  /// Exact match on the stored ISBN.
  fn get_book_by_isbn<'a>(
    &'a self,
    isbn: &'a str,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + 'a;

  /// The ratings of every review of `book_id`.
  fn ratings_of_book(
    &self,
    book_id: Id,
  ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send + '_;

  // ── Reviewers ─────────────────────────────────────────────────────────

  /// All reviewers ordered by last name.
  fn list_reviewers(
    &self,
  ) -> impl Future<Output = Result<Vec<Reviewer>, Self::Error>> + Send + '_;

  fn get_reviewer(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Reviewer>, Self::Error>> + Send + '_;

  fn reviews_by_reviewer(
    &self,
    reviewer_id: Id,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// All reviews ordered by rating.
  fn list_reviews(&self) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  fn get_review(
    &self,
    id: Id,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  fn reviews_of_book(
    &self,
    book_id: Id,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Apply every change in `changes` inside one transaction.
  ///
  /// Returns [`Applied::RolledBack`] with the offending change when a change
  /// that [must take effect](crate::change::Change::must_take_effect)
  /// touched no rows; nothing is committed in that case. Backend failures
  /// are returned as `Err` and likewise leave the store untouched.
  fn apply(
    &self,
    changes: ChangeSet,
  ) -> impl Future<Output = Result<Applied, Self::Error>> + Send + '_;
}
