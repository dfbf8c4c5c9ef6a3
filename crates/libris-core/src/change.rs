//! Change sets, the only way the catalog writes to a store.
//!
//! A [`ChangeSet`] is an ordered list of row-level [`Change`]s built by the
//! mutation service after every integrity check has passed. Stores apply a
//! change set as one unit of work: either every change is committed or none
//! is. Cascades and link replacement are spelled out as explicit changes; a
//! store never deletes or rewrites rows on its own initiative.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::Id;

// ─── Row payloads ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRow {
  pub first_name: String,
  pub last_name:  String,
  pub country_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRow {
  pub title:          String,
  pub isbn:           String,
  pub date_published: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerRow {
  pub first_name: String,
  pub last_name:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRow {
  pub headline:    String,
  pub review_text: String,
  pub rating:      u8,
  pub book_id:     Id,
  pub reviewer_id: Id,
}

/// Which book a link change refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookTarget {
  /// The book inserted earlier in the same change set.
  Inserted,
  Existing(Id),
}

// ─── Changes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
  InsertCountry { name: String },
  UpdateCountry { id: Id, name: String },
  DeleteCountry(Id),

  InsertCategory { name: String },
  UpdateCategory { id: Id, name: String },
  DeleteCategory(Id),

  InsertAuthor(AuthorRow),
  UpdateAuthor { id: Id, row: AuthorRow },
  DeleteAuthor(Id),

  InsertBook(BookRow),
  UpdateBook { id: Id, row: BookRow },
  DeleteBook(Id),

  /// Insert a book–author pair; an existing identical pair is left alone.
  LinkAuthor { book: BookTarget, author_id: Id },
  /// Insert a book–category pair; an existing identical pair is left alone.
  LinkCategory { book: BookTarget, category_id: Id },
  /// Remove every book–author pair of a book.
  UnlinkAuthors { book_id: Id },
  /// Remove every book–category pair of a book.
  UnlinkCategories { book_id: Id },

  InsertReviewer(ReviewerRow),
  UpdateReviewer { id: Id, row: ReviewerRow },
  DeleteReviewer(Id),

  InsertReview(ReviewRow),
  UpdateReview { id: Id, row: ReviewRow },
  DeleteReview(Id),
}

impl Change {
  /// Whether the change must touch at least one row for the set to commit.
  ///
  /// Inserts, updates and single-row deletes must; link changes may
  /// legitimately be no-ops.
  pub fn must_take_effect(&self) -> bool {
    !matches!(
      self,
      Self::LinkAuthor { .. }
        | Self::LinkCategory { .. }
        | Self::UnlinkAuthors { .. }
        | Self::UnlinkCategories { .. }
    )
  }

  pub fn is_insert(&self) -> bool {
    matches!(
      self,
      Self::InsertCountry { .. }
        | Self::InsertCategory { .. }
        | Self::InsertAuthor(_)
        | Self::InsertBook(_)
        | Self::InsertReviewer(_)
        | Self::InsertReview(_)
    )
  }
}

impl fmt::Display for Change {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InsertCountry { name } => write!(f, "insert country {name:?}"),
      Self::UpdateCountry { id, .. } => write!(f, "update country {id}"),
      Self::DeleteCountry(id) => write!(f, "delete country {id}"),
      Self::InsertCategory { name } => write!(f, "insert category {name:?}"),
      Self::UpdateCategory { id, .. } => write!(f, "update category {id}"),
      Self::DeleteCategory(id) => write!(f, "delete category {id}"),
      Self::InsertAuthor(row) => {
        write!(f, "insert author {} {}", row.first_name, row.last_name)
      }
      Self::UpdateAuthor { id, .. } => write!(f, "update author {id}"),
      Self::DeleteAuthor(id) => write!(f, "delete author {id}"),
      Self::InsertBook(row) => write!(f, "insert book {:?}", row.title),
      Self::UpdateBook { id, .. } => write!(f, "update book {id}"),
      Self::DeleteBook(id) => write!(f, "delete book {id}"),
      Self::LinkAuthor { book, author_id } => {
        write!(f, "link {book:?} to author {author_id}")
      }
      Self::LinkCategory { book, category_id } => {
        write!(f, "link {book:?} to category {category_id}")
      }
      Self::UnlinkAuthors { book_id } => write!(f, "unlink authors of book {book_id}"),
      Self::UnlinkCategories { book_id } => {
        write!(f, "unlink categories of book {book_id}")
      }
      Self::InsertReviewer(row) => {
        write!(f, "insert reviewer {} {}", row.first_name, row.last_name)
      }
      Self::UpdateReviewer { id, .. } => write!(f, "update reviewer {id}"),
      Self::DeleteReviewer(id) => write!(f, "delete reviewer {id}"),
      Self::InsertReview(row) => write!(f, "insert review {:?}", row.headline),
      Self::UpdateReview { id, .. } => write!(f, "update review {id}"),
      Self::DeleteReview(id) => write!(f, "delete review {id}"),
    }
  }
}

// ─── Change sets ─────────────────────────────────────────────────────────────

/// An ordered list of changes applied atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
  changes: Vec<Change>,
}

impl ChangeSet {
  pub fn new() -> Self { Self::default() }

  pub fn single(change: Change) -> Self { Self { changes: vec![change] } }

  pub fn push(&mut self, change: Change) -> &mut Self {
    self.changes.push(change);
    self
  }

  pub fn extend(&mut self, changes: impl IntoIterator<Item = Change>) -> &mut Self {
    self.changes.extend(changes);
    self
  }

  pub fn changes(&self) -> &[Change] { &self.changes }

  pub fn len(&self) -> usize { self.changes.len() }

  pub fn is_empty(&self) -> bool { self.changes.is_empty() }
}

impl IntoIterator for ChangeSet {
  type Item = Change;
  type IntoIter = std::vec::IntoIter<Change>;

  fn into_iter(self) -> Self::IntoIter { self.changes.into_iter() }
}

/// What a store reports after applying a [`ChangeSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
  /// Every change took effect and the transaction was committed.
  Committed {
    /// Row id assigned by the set's insert, if it had one.
    inserted: Option<Id>,
  },
  /// The given change touched no rows although it had to; nothing was
  /// committed.
  RolledBack(Change),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn link_changes_may_be_no_ops() {
    let link = Change::LinkAuthor { book: BookTarget::Inserted, author_id: 1 };
    assert!(!link.must_take_effect());
    assert!(!Change::UnlinkCategories { book_id: 1 }.must_take_effect());
    assert!(Change::DeleteReview(4).must_take_effect());
  }

  #[test]
  fn change_set_keeps_order() {
    let mut set = ChangeSet::new();
    set
      .push(Change::DeleteReviewer(1))
      .extend([Change::DeleteReview(2), Change::DeleteReview(3)]);
    assert_eq!(set.len(), 3);
    assert_eq!(set.changes()[0], Change::DeleteReviewer(1));
    assert_eq!(set.changes()[2], Change::DeleteReview(3));
  }
}
