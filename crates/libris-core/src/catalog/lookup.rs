//! Existence checks, fetch-by-key and related fetches.
//!
//! Every fetch that is anchored on an id first checks the anchor exists, so
//! "no such author" and "author with no books" are distinguishable.

use crate::{
  Error, Result,
  entity::{Author, Book, Category, Country, EntityKind, Id, Review, Reviewer},
  store::CatalogStore,
  validation::normalize_isbn,
};

use super::Catalog;

fn found<T>(kind: EntityKind, id: Id, value: Option<T>) -> Result<T> {
  value.ok_or(Error::NotFound { kind, id })
}

impl<S: CatalogStore> Catalog<S> {
  // ── Existence ─────────────────────────────────────────────────────────

  pub async fn exists(&self, kind: EntityKind, id: Id) -> Result<bool> {
    self.store.exists(kind, id).await.map_err(Error::store)
  }

  pub async fn book_exists_by_isbn(&self, isbn: &str) -> Result<bool> {
    let isbn = normalize_isbn(isbn);
    Ok(
      self
        .store
        .get_book_by_isbn(&isbn)
        .await
        .map_err(Error::store)?
        .is_some(),
    )
  }

  /// [`Error::NotFound`] unless `kind`/`id` exists.
  pub(super) async fn require(&self, kind: EntityKind, id: Id) -> Result<()> {
    if self.exists(kind, id).await? {
      Ok(())
    } else {
      Err(Error::NotFound { kind, id })
    }
  }

  // ── Countries ─────────────────────────────────────────────────────────

  pub async fn countries(&self) -> Result<Vec<Country>> {
    self.store.list_countries().await.map_err(Error::store)
  }

  pub async fn country(&self, id: Id) -> Result<Country> {
    let country = self.store.get_country(id).await.map_err(Error::store)?;
    found(EntityKind::Country, id, country)
  }

  pub async fn country_of_author(&self, author_id: Id) -> Result<Country> {
    Ok(self.author(author_id).await?.country)
  }

  pub async fn authors_from_country(&self, country_id: Id) -> Result<Vec<Author>> {
    self.require(EntityKind::Country, country_id).await?;
    self
      .store
      .authors_in_country(country_id)
      .await
      .map_err(Error::store)
  }

  // ── Authors ───────────────────────────────────────────────────────────

  pub async fn authors(&self) -> Result<Vec<Author>> {
    self.store.list_authors().await.map_err(Error::store)
  }

  pub async fn author(&self, id: Id) -> Result<Author> {
    let author = self.store.get_author(id).await.map_err(Error::store)?;
    found(EntityKind::Author, id, author)
  }

  pub async fn authors_of_book(&self, book_id: Id) -> Result<Vec<Author>> {
    self.require(EntityKind::Book, book_id).await?;
    self.store.authors_of_book(book_id).await.map_err(Error::store)
  }

  pub async fn books_by_author(&self, author_id: Id) -> Result<Vec<Book>> {
    self.require(EntityKind::Author, author_id).await?;
    self
      .store
      .books_by_author(author_id)
      .await
      .map_err(Error::store)
  }

  // ── Categories ────────────────────────────────────────────────────────

  pub async fn categories(&self) -> Result<Vec<Category>> {
    self.store.list_categories().await.map_err(Error::store)
  }

  pub async fn category(&self, id: Id) -> Result<Category> {
    let category = self.store.get_category(id).await.map_err(Error::store)?;
    found(EntityKind::Category, id, category)
  }

  pub async fn categories_of_book(&self, book_id: Id) -> Result<Vec<Category>> {
    self.require(EntityKind::Book, book_id).await?;
    self
      .store
      .categories_of_book(book_id)
      .await
      .map_err(Error::store)
  }

  pub async fn books_in_category(&self, category_id: Id) -> Result<Vec<Book>> {
    self.require(EntityKind::Category, category_id).await?;
    self
      .store
      .books_in_category(category_id)
      .await
      .map_err(Error::store)
  }

  // ── Books ─────────────────────────────────────────────────────────────

  pub async fn books(&self) -> Result<Vec<Book>> {
    self.store.list_books().await.map_err(Error::store)
  }

  pub async fn book(&self, id: Id) -> Result<Book> {
    let book = self.store.get_book(id).await.map_err(Error::store)?;
    found(EntityKind::Book, id, book)
  }

  pub async fn book_by_isbn(&self, isbn: &str) -> Result<Book> {
    let isbn = normalize_isbn(isbn);
    let book = self
      .store
      .get_book_by_isbn(&isbn)
      .await
      .map_err(Error::store)?;
    book.ok_or(Error::IsbnNotFound(isbn))
  }

  // ── Reviewers ─────────────────────────────────────────────────────────

  pub async fn reviewers(&self) -> Result<Vec<Reviewer>> {
    self.store.list_reviewers().await.map_err(Error::store)
  }

  pub async fn reviewer(&self, id: Id) -> Result<Reviewer> {
    let reviewer = self.store.get_reviewer(id).await.map_err(Error::store)?;
    found(EntityKind::Reviewer, id, reviewer)
  }

  pub async fn reviewer_of_review(&self, review_id: Id) -> Result<Reviewer> {
    Ok(self.review(review_id).await?.reviewer)
  }

  pub async fn reviews_by_reviewer(&self, reviewer_id: Id) -> Result<Vec<Review>> {
    self.require(EntityKind::Reviewer, reviewer_id).await?;
    self
      .store
      .reviews_by_reviewer(reviewer_id)
      .await
      .map_err(Error::store)
  }

  // ── Reviews ───────────────────────────────────────────────────────────

  pub async fn reviews(&self) -> Result<Vec<Review>> {
    self.store.list_reviews().await.map_err(Error::store)
  }

  pub async fn review(&self, id: Id) -> Result<Review> {
    let review = self.store.get_review(id).await.map_err(Error::store)?;
    found(EntityKind::Review, id, review)
  }

  pub async fn reviews_of_book(&self, book_id: Id) -> Result<Vec<Review>> {
    self.require(EntityKind::Book, book_id).await?;
    self.store.reviews_of_book(book_id).await.map_err(Error::store)
  }

  pub async fn book_of_review(&self, review_id: Id) -> Result<Book> {
    Ok(self.review(review_id).await?.book)
  }
}
