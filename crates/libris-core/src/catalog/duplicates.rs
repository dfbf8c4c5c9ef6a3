//! Uniqueness checks for country/category names and book ISBNs.

use crate::{
  Error, Result,
  entity::{Id, NamedKind},
  store::CatalogStore,
  validation::{name_key, normalize_isbn},
};

use super::Catalog;

impl<S: CatalogStore> Catalog<S> {
  /// Whether another `kind` record already uses `name` once trimmed and
  /// case-folded. The record `candidate` (the one being updated) is ignored;
  /// pass `None` when creating.
  pub async fn is_duplicate_name(
    &self,
    kind: NamedKind,
    candidate: Option<Id>,
    name: &str,
  ) -> Result<bool> {
    let key = name_key(name);
    let ids = self
      .store
      .ids_with_name_key(kind, &key)
      .await
      .map_err(Error::store)?;
    Ok(ids.into_iter().any(|id| Some(id) != candidate))
  }

  /// Whether a book other than `candidate` already has `isbn`.
  pub async fn is_duplicate_isbn(&self, candidate: Option<Id>, isbn: &str) -> Result<bool> {
    let isbn = normalize_isbn(isbn);
    let existing = self
      .store
      .get_book_by_isbn(&isbn)
      .await
      .map_err(Error::store)?;
    Ok(existing.is_some_and(|book| Some(book.id) != candidate))
  }

  /// [`Error::DuplicateName`] if [`Self::is_duplicate_name`] holds.
  pub(super) async fn ensure_unique_name(
    &self,
    kind: NamedKind,
    candidate: Option<Id>,
    name: &str,
  ) -> Result<()> {
    if self.is_duplicate_name(kind, candidate, name).await? {
      return Err(Error::DuplicateName { kind, name: name.to_owned() });
    }
    Ok(())
  }

  /// [`Error::DuplicateIsbn`] if [`Self::is_duplicate_isbn`] holds.
  pub(super) async fn ensure_unique_isbn(&self, candidate: Option<Id>, isbn: &str) -> Result<()> {
    if self.is_duplicate_isbn(candidate, isbn).await? {
      return Err(Error::DuplicateIsbn(isbn.to_owned()));
    }
    Ok(())
  }
}
