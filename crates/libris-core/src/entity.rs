//! Catalog entities and the drafts callers submit to create or update them.
//!
//! Stored entities carry their foreign references fully resolved (an
//! [`Author`] owns its [`Country`], a [`Review`] owns its [`Book`] and
//! [`Reviewer`]). Drafts carry foreign references as bare [`EntityRef`]s; the
//! catalog reloads every reference by id before persisting.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
pub type Id = i64;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The six entity kinds held by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Country,
  Author,
  Category,
  Book,
  Reviewer,
  Review,
}

impl EntityKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Country => "country",
      Self::Author => "author",
      Self::Category => "category",
      Self::Book => "book",
      Self::Reviewer => "reviewer",
      Self::Review => "review",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Kinds whose `name` must be unique after trimming and case-folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKind {
  Country,
  Category,
}

impl From<NamedKind> for EntityKind {
  fn from(kind: NamedKind) -> Self {
    match kind {
      NamedKind::Country => EntityKind::Country,
      NamedKind::Category => EntityKind::Category,
    }
  }
}

// ─── Stored entities ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub id:   Id,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:   Id,
  pub name: String,
}

/// An author together with the country they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  pub id:         Id,
  pub first_name: String,
  pub last_name:  String,
  pub country:    Country,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
  pub id:             Id,
  pub title:          String,
  /// Unique across all books.
  pub isbn:           String,
  pub date_published: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
  pub id:         Id,
  pub first_name: String,
  pub last_name:  String,
}

/// A review together with the book it is about and the reviewer who wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
  pub id:          Id,
  pub headline:    String,
  pub review_text: String,
  /// 1 to 5 inclusive.
  pub rating:      u8,
  pub book:        Book,
  pub reviewer:    Reviewer,
}

// ─── Drafts ──────────────────────────────────────────────────────────────────

/// A reference to another entity by id, as supplied by a caller.
///
/// Only the id is ever trusted; any other data the caller sends alongside it
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
  pub id: Id,
}

impl From<Id> for EntityRef {
  fn from(id: Id) -> Self { Self { id } }
}

/// Caller input for a country. `id` is ignored on create and must match the
/// path id on update.
///
/// Drafts deserialize missing fields to their defaults; validation then
/// rejects what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryDraft {
  pub id:   Option<Id>,
  pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryDraft {
  pub id:   Option<Id>,
  pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorDraft {
  pub id:         Option<Id>,
  pub first_name: String,
  pub last_name:  String,
  pub country:    Option<EntityRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookDraft {
  pub id:             Option<Id>,
  pub title:          String,
  pub isbn:           String,
  pub date_published: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewerDraft {
  pub id:         Option<Id>,
  pub first_name: String,
  pub last_name:  String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewDraft {
  pub id:          Option<Id>,
  pub headline:    String,
  pub review_text: String,
  pub rating:      u8,
  pub book:        Option<EntityRef>,
  pub reviewer:    Option<EntityRef>,
}
