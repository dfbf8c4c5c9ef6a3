//! Error types for `libris-core`.
//!
//! Every failure of the integrity layer is one [`Error`] variant; callers that
//! only care about the broad class (e.g. to pick an HTTP status) use
//! [`Error::outcome`].

use thiserror::Error;

use crate::{
  entity::{EntityKind, Id, NamedKind},
  validation::ValidationError,
};

/// The four outcome classes a catalog operation can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// The requested entity, or a referenced one, does not exist.
  NotFound,
  /// Malformed or missing input.
  ValidationFailed,
  /// The operation would break a uniqueness or referential rule.
  Conflict,
  /// The store failed to apply a write that passed every check.
  PersistenceFailure,
}

#[derive(Debug, Error)]
pub enum Error {
  // ── NotFound ──────────────────────────────────────────────────────────

  #[error("{kind} not found: {id}")]
  NotFound { kind: EntityKind, id: Id },

  #[error("book not found for isbn {0:?}")]
  IsbnNotFound(String),

  #[error("referenced {kind} not found: {id}")]
  ReferenceNotFound { kind: EntityKind, id: Id },

  // ── ValidationFailed ──────────────────────────────────────────────────

  #[error("path id {path} does not match body id {body:?}")]
  IdMismatch { path: Id, body: Option<Id> },

  #[error("a {0} reference is required")]
  MissingReference(EntityKind),

  #[error("a book needs at least one {0}")]
  EmptyLinks(EntityKind),

  #[error("invalid input: {0}")]
  Invalid(#[from] ValidationError),

  // ── Conflict ──────────────────────────────────────────────────────────

  #[error("a {kind:?} named {name:?} already exists")]
  DuplicateName { kind: NamedKind, name: String },

  #[error("a book with isbn {0:?} already exists")]
  DuplicateIsbn(String),

  #[error("{kind} {id} is still referenced by at least one {dependent}")]
  HasDependents {
    kind:      EntityKind,
    id:        Id,
    dependent: EntityKind,
  },

  // ── PersistenceFailure ────────────────────────────────────────────────

  #[error("store did not apply change: {0}")]
  NotApplied(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn outcome(&self) -> Outcome {
    match self {
      Self::NotFound { .. } | Self::IsbnNotFound(_) | Self::ReferenceNotFound { .. } => {
        Outcome::NotFound
      }
      Self::IdMismatch { .. }
      | Self::MissingReference(_)
      | Self::EmptyLinks(_)
      | Self::Invalid(_) => Outcome::ValidationFailed,
      Self::DuplicateName { .. } | Self::DuplicateIsbn(_) | Self::HasDependents { .. } => {
        Outcome::Conflict
      }
      Self::NotApplied(_) | Self::Store(_) => Outcome::PersistenceFailure,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
