//! Book ↔ author and book ↔ category links.

use std::collections::BTreeSet;

use tracing::debug;

use crate::{
  Error, Result,
  change::{BookTarget, Change, ChangeSet},
  entity::{EntityKind, Id},
  store::CatalogStore,
};

use super::Catalog;

/// A validated set of links for one book: both lists non-empty, free of
/// duplicates, and every id known to exist when the set was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookLinks {
  author_ids:   BTreeSet<Id>,
  category_ids: BTreeSet<Id>,
}

impl BookLinks {
  pub fn author_ids(&self) -> impl Iterator<Item = Id> + '_ { self.author_ids.iter().copied() }

  pub fn category_ids(&self) -> impl Iterator<Item = Id> + '_ {
    self.category_ids.iter().copied()
  }

  /// One link change per pair, targeting `book`.
  pub fn changes(&self, book: BookTarget) -> impl Iterator<Item = Change> + '_ {
    let authors = self
      .author_ids()
      .map(move |author_id| Change::LinkAuthor { book, author_id });
    let categories = self
      .category_ids()
      .map(move |category_id| Change::LinkCategory { book, category_id });
    authors.chain(categories)
  }
}

/// Collapse duplicates, rejecting an empty list. Purely local; no store
/// access.
fn dedup_ids(kind: EntityKind, ids: &[Id]) -> Result<BTreeSet<Id>> {
  if ids.is_empty() {
    return Err(Error::EmptyLinks(kind));
  }
  Ok(ids.iter().copied().collect())
}

impl<S: CatalogStore> Catalog<S> {
  /// Build a [`BookLinks`] from caller-supplied id lists.
  ///
  /// Empty lists are rejected before the store is consulted. Afterwards,
  /// the first id (in ascending order, authors before categories) that does
  /// not resolve yields [`Error::ReferenceNotFound`].
  pub async fn validate_links(&self, author_ids: &[Id], category_ids: &[Id]) -> Result<BookLinks> {
    let author_ids = dedup_ids(EntityKind::Author, author_ids)?;
    let category_ids = dedup_ids(EntityKind::Category, category_ids)?;

    for &id in &author_ids {
      self.require_reference(EntityKind::Author, id).await?;
    }
    for &id in &category_ids {
      self.require_reference(EntityKind::Category, id).await?;
    }

    Ok(BookLinks { author_ids, category_ids })
  }

  /// Link an existing book to more authors and categories.
  ///
  /// Fails without writing anything if the book or any referenced id does
  /// not exist. Pairs that are already linked are left as they are.
  pub async fn link_book(
    &self,
    book_id: Id,
    author_ids: &[Id],
    category_ids: &[Id],
  ) -> Result<BookLinks> {
    let links = self.validate_links(author_ids, category_ids).await?;
    self.require(EntityKind::Book, book_id).await?;

    let mut changes = ChangeSet::new();
    changes.extend(links.changes(BookTarget::Existing(book_id)));
    self.commit(changes).await?;

    debug!(book_id, links = ?links, "linked book");
    Ok(links)
  }

  /// [`Error::ReferenceNotFound`] unless `kind`/`id` exists.
  pub(super) async fn require_reference(&self, kind: EntityKind, id: Id) -> Result<()> {
    if self.exists(kind, id).await? {
      Ok(())
    } else {
      Err(Error::ReferenceNotFound { kind, id })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_lists_are_rejected() {
    assert!(matches!(
      dedup_ids(EntityKind::Author, &[]),
      Err(Error::EmptyLinks(EntityKind::Author))
    ));
  }

  #[test]
  fn duplicate_ids_collapse() {
    let ids = dedup_ids(EntityKind::Category, &[3, 1, 3, 2, 1]).unwrap();
    assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
  }

  #[test]
  fn link_changes_cover_every_pair() {
    let links = BookLinks {
      author_ids:   [1, 2].into_iter().collect(),
      category_ids: [9].into_iter().collect(),
    };
    let changes: Vec<_> = links.changes(BookTarget::Inserted).collect();
    assert_eq!(changes, vec![
      Change::LinkAuthor { book: BookTarget::Inserted, author_id: 1 },
      Change::LinkAuthor { book: BookTarget::Inserted, author_id: 2 },
      Change::LinkCategory { book: BookTarget::Inserted, category_id: 9 },
    ]);
  }
}
