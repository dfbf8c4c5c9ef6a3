//! Guarded create, update and delete for every entity kind.
//!
//! Checks run in a fixed order: local validation first (fields, path/body
//! ids, link lists), then existence of the target, then uniqueness and
//! references, then delete guards. Only when every check passes is a
//! [`ChangeSet`] built and committed.

use tracing::debug;

use crate::{
  Error, Result,
  change::{AuthorRow, BookRow, BookTarget, Change, ChangeSet, ReviewRow, ReviewerRow},
  entity::{
    Author, AuthorDraft, Book, BookDraft, Category, CategoryDraft, Country, CountryDraft,
    EntityKind, EntityRef, Id, NamedKind, Review, ReviewDraft, Reviewer, ReviewerDraft,
  },
  store::CatalogStore,
  validation::{
    validate_author, validate_book, validate_category, validate_country, validate_review,
    validate_reviewer,
  },
};

use super::{Catalog, check_path_id};

/// [`Error::HasDependents`] when `blocked`.
fn guard(kind: EntityKind, id: Id, dependent: EntityKind, blocked: bool) -> Result<()> {
  if blocked {
    Err(Error::HasDependents { kind, id, dependent })
  } else {
    Ok(())
  }
}

fn non_empty_links(author_ids: &[Id], category_ids: &[Id]) -> Result<()> {
  if author_ids.is_empty() {
    return Err(Error::EmptyLinks(EntityKind::Author));
  }
  if category_ids.is_empty() {
    return Err(Error::EmptyLinks(EntityKind::Category));
  }
  Ok(())
}

impl<S: CatalogStore> Catalog<S> {
  // ── Reference resolution ──────────────────────────────────────────────

  /// Reload a caller-supplied country reference from the store.
  async fn resolve_country(&self, reference: Option<EntityRef>) -> Result<Country> {
    let EntityRef { id } = reference.ok_or(Error::MissingReference(EntityKind::Country))?;
    self
      .store
      .get_country(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ReferenceNotFound { kind: EntityKind::Country, id })
  }

  async fn resolve_book(&self, reference: Option<EntityRef>) -> Result<Book> {
    let EntityRef { id } = reference.ok_or(Error::MissingReference(EntityKind::Book))?;
    self
      .store
      .get_book(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ReferenceNotFound { kind: EntityKind::Book, id })
  }

  async fn resolve_reviewer(&self, reference: Option<EntityRef>) -> Result<Reviewer> {
    let EntityRef { id } = reference.ok_or(Error::MissingReference(EntityKind::Reviewer))?;
    self
      .store
      .get_reviewer(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ReferenceNotFound { kind: EntityKind::Reviewer, id })
  }

  // ── Countries ─────────────────────────────────────────────────────────

  pub async fn create_country(&self, draft: CountryDraft) -> Result<Country> {
    let name = validate_country(&draft)?;
    self.ensure_unique_name(NamedKind::Country, None, &name).await?;

    let id = self
      .commit_insert(ChangeSet::single(Change::InsertCountry { name }))
      .await?;
    debug!(id, "created country");
    self.country(id).await
  }

  pub async fn update_country(&self, id: Id, draft: CountryDraft) -> Result<Country> {
    check_path_id(id, draft.id)?;
    let name = validate_country(&draft)?;
    self.require(EntityKind::Country, id).await?;
    self.ensure_unique_name(NamedKind::Country, Some(id), &name).await?;

    self
      .commit(ChangeSet::single(Change::UpdateCountry { id, name }))
      .await?;
    debug!(id, "updated country");
    self.country(id).await
  }

  /// Refused while any author belongs to the country.
  pub async fn delete_country(&self, id: Id) -> Result<()> {
    self.require(EntityKind::Country, id).await?;
    let authors = self
      .store
      .authors_in_country(id)
      .await
      .map_err(Error::store)?;
    guard(EntityKind::Country, id, EntityKind::Author, !authors.is_empty())?;

    self.commit(ChangeSet::single(Change::DeleteCountry(id))).await?;
    debug!(id, "deleted country");
    Ok(())
  }

  // ── Categories ────────────────────────────────────────────────────────

  pub async fn create_category(&self, draft: CategoryDraft) -> Result<Category> {
    let name = validate_category(&draft)?;
    self.ensure_unique_name(NamedKind::Category, None, &name).await?;

    let id = self
      .commit_insert(ChangeSet::single(Change::InsertCategory { name }))
      .await?;
    debug!(id, "created category");
    self.category(id).await
  }

  pub async fn update_category(&self, id: Id, draft: CategoryDraft) -> Result<Category> {
    check_path_id(id, draft.id)?;
    let name = validate_category(&draft)?;
    self.require(EntityKind::Category, id).await?;
    self.ensure_unique_name(NamedKind::Category, Some(id), &name).await?;

    self
      .commit(ChangeSet::single(Change::UpdateCategory { id, name }))
      .await?;
    debug!(id, "updated category");
    self.category(id).await
  }

  /// Refused while any book is linked to the category.
  pub async fn delete_category(&self, id: Id) -> Result<()> {
    self.require(EntityKind::Category, id).await?;
    let books = self
      .store
      .books_in_category(id)
      .await
      .map_err(Error::store)?;
    guard(EntityKind::Category, id, EntityKind::Book, !books.is_empty())?;

    self.commit(ChangeSet::single(Change::DeleteCategory(id))).await?;
    debug!(id, "deleted category");
    Ok(())
  }

  // ── Authors ───────────────────────────────────────────────────────────

  pub async fn create_author(&self, draft: AuthorDraft) -> Result<Author> {
    let (first_name, last_name) = validate_author(&draft)?;
    let country = self.resolve_country(draft.country).await?;

    let row = AuthorRow { first_name, last_name, country_id: country.id };
    let id = self
      .commit_insert(ChangeSet::single(Change::InsertAuthor(row)))
      .await?;
    debug!(id, country_id = country.id, "created author");
    self.author(id).await
  }

  pub async fn update_author(&self, id: Id, draft: AuthorDraft) -> Result<Author> {
    check_path_id(id, draft.id)?;
    let (first_name, last_name) = validate_author(&draft)?;
    if draft.country.is_none() {
      return Err(Error::MissingReference(EntityKind::Country));
    }
    self.require(EntityKind::Author, id).await?;
    let country = self.resolve_country(draft.country).await?;

    let row = AuthorRow { first_name, last_name, country_id: country.id };
    self
      .commit(ChangeSet::single(Change::UpdateAuthor { id, row }))
      .await?;
    debug!(id, country_id = country.id, "updated author");
    self.author(id).await
  }

  /// Refused while any book is linked to the author.
  pub async fn delete_author(&self, id: Id) -> Result<()> {
    self.require(EntityKind::Author, id).await?;
    let books = self.store.books_by_author(id).await.map_err(Error::store)?;
    guard(EntityKind::Author, id, EntityKind::Book, !books.is_empty())?;

    self.commit(ChangeSet::single(Change::DeleteAuthor(id))).await?;
    debug!(id, "deleted author");
    Ok(())
  }

  // ── Books ─────────────────────────────────────────────────────────────

  /// Create a book linked to every author and category given.
  ///
  /// The book row and all of its link rows are written in one change set.
  pub async fn create_book(
    &self,
    draft: BookDraft,
    author_ids: &[Id],
    category_ids: &[Id],
  ) -> Result<Book> {
    let (title, isbn) = validate_book(&draft)?;
    non_empty_links(author_ids, category_ids)?;
    self.ensure_unique_isbn(None, &isbn).await?;
    let links = self.validate_links(author_ids, category_ids).await?;

    let mut changes = ChangeSet::new();
    changes
      .push(Change::InsertBook(BookRow {
        title,
        isbn,
        date_published: draft.date_published,
      }))
      .extend(links.changes(BookTarget::Inserted));

    let id = self.commit_insert(changes).await?;
    debug!(id, links = ?links, "created book");
    self.book(id).await
  }

  /// Update a book and replace its author and category links.
  pub async fn update_book(
    &self,
    id: Id,
    draft: BookDraft,
    author_ids: &[Id],
    category_ids: &[Id],
  ) -> Result<Book> {
    check_path_id(id, draft.id)?;
    let (title, isbn) = validate_book(&draft)?;
    non_empty_links(author_ids, category_ids)?;
    self.require(EntityKind::Book, id).await?;
    self.ensure_unique_isbn(Some(id), &isbn).await?;
    let links = self.validate_links(author_ids, category_ids).await?;

    let mut changes = ChangeSet::new();
    changes
      .push(Change::UpdateBook {
        id,
        row: BookRow { title, isbn, date_published: draft.date_published },
      })
      .push(Change::UnlinkAuthors { book_id: id })
      .push(Change::UnlinkCategories { book_id: id })
      .extend(links.changes(BookTarget::Existing(id)));

    self.commit(changes).await?;
    debug!(id, links = ?links, "updated book");
    self.book(id).await
  }

  /// Delete a book together with its links and its reviews.
  pub async fn delete_book(&self, id: Id) -> Result<()> {
    self.require(EntityKind::Book, id).await?;
    let reviews = self.store.reviews_of_book(id).await.map_err(Error::store)?;

    let mut changes = ChangeSet::new();
    changes
      .push(Change::UnlinkAuthors { book_id: id })
      .push(Change::UnlinkCategories { book_id: id })
      .extend(reviews.iter().map(|r| Change::DeleteReview(r.id)))
      .push(Change::DeleteBook(id));

    self.commit(changes).await?;
    debug!(id, reviews = reviews.len(), "deleted book");
    Ok(())
  }

  // ── Reviewers ─────────────────────────────────────────────────────────

  pub async fn create_reviewer(&self, draft: ReviewerDraft) -> Result<Reviewer> {
    let (first_name, last_name) = validate_reviewer(&draft)?;

    let row = ReviewerRow { first_name, last_name };
    let id = self
      .commit_insert(ChangeSet::single(Change::InsertReviewer(row)))
      .await?;
    debug!(id, "created reviewer");
    self.reviewer(id).await
  }

  pub async fn update_reviewer(&self, id: Id, draft: ReviewerDraft) -> Result<Reviewer> {
    check_path_id(id, draft.id)?;
    let (first_name, last_name) = validate_reviewer(&draft)?;
    self.require(EntityKind::Reviewer, id).await?;

    let row = ReviewerRow { first_name, last_name };
    self
      .commit(ChangeSet::single(Change::UpdateReviewer { id, row }))
      .await?;
    debug!(id, "updated reviewer");
    self.reviewer(id).await
  }

  /// Delete a reviewer and every review they wrote.
  ///
  /// The reviewer row is deleted first; if that takes no effect nothing else
  /// is applied. A review that cannot be deleted fails the whole operation.
  pub async fn delete_reviewer(&self, id: Id) -> Result<()> {
    self.require(EntityKind::Reviewer, id).await?;
    let reviews = self
      .store
      .reviews_by_reviewer(id)
      .await
      .map_err(Error::store)?;

    let mut changes = ChangeSet::single(Change::DeleteReviewer(id));
    changes.extend(reviews.iter().map(|r| Change::DeleteReview(r.id)));

    self.commit(changes).await?;
    debug!(id, reviews = reviews.len(), "deleted reviewer");
    Ok(())
  }

  // ── Reviews ───────────────────────────────────────────────────────────

  pub async fn create_review(&self, draft: ReviewDraft) -> Result<Review> {
    let (headline, review_text) = validate_review(&draft)?;
    let book = self.resolve_book(draft.book).await?;
    let reviewer = self.resolve_reviewer(draft.reviewer).await?;

    let row = ReviewRow {
      headline,
      review_text,
      rating: draft.rating,
      book_id: book.id,
      reviewer_id: reviewer.id,
    };
    let id = self
      .commit_insert(ChangeSet::single(Change::InsertReview(row)))
      .await?;
    debug!(id, book_id = book.id, reviewer_id = reviewer.id, "created review");
    self.review(id).await
  }

  pub async fn update_review(&self, id: Id, draft: ReviewDraft) -> Result<Review> {
    check_path_id(id, draft.id)?;
    let (headline, review_text) = validate_review(&draft)?;
    if draft.book.is_none() {
      return Err(Error::MissingReference(EntityKind::Book));
    }
    if draft.reviewer.is_none() {
      return Err(Error::MissingReference(EntityKind::Reviewer));
    }
    self.require(EntityKind::Review, id).await?;
    let book = self.resolve_book(draft.book).await?;
    let reviewer = self.resolve_reviewer(draft.reviewer).await?;

    let row = ReviewRow {
      headline,
      review_text,
      rating: draft.rating,
      book_id: book.id,
      reviewer_id: reviewer.id,
    };
    self
      .commit(ChangeSet::single(Change::UpdateReview { id, row }))
      .await?;
    debug!(id, "updated review");
    self.review(id).await
  }

  pub async fn delete_review(&self, id: Id) -> Result<()> {
    self.require(EntityKind::Review, id).await?;
    self.commit(ChangeSet::single(Change::DeleteReview(id))).await?;
    debug!(id, "deleted review");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn guard_blocks_only_when_dependents_exist() {
    assert!(guard(EntityKind::Country, 1, EntityKind::Author, false).is_ok());
    assert!(matches!(
      guard(EntityKind::Country, 1, EntityKind::Author, true),
      Err(Error::HasDependents {
        kind: EntityKind::Country,
        id: 1,
        dependent: EntityKind::Author,
      })
    ));
  }

  #[test]
  fn empty_link_lists_fail_before_any_lookup() {
    assert!(matches!(
      non_empty_links(&[], &[1]),
      Err(Error::EmptyLinks(EntityKind::Author))
    ));
    assert!(matches!(
      non_empty_links(&[1], &[]),
      Err(Error::EmptyLinks(EntityKind::Category))
    ));
    assert!(non_empty_links(&[1], &[2]).is_ok());
  }
}
