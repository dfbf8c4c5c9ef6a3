//! [`Catalog`]: the integrity layer over a [`CatalogStore`].
//!
//! The catalog is the only component that decides whether a mutation is
//! allowed. Each mutation follows the same sequence:
//!
//! 1. **Validate** the draft (field rules, path/body id agreement, non-empty
//!    link lists). Nothing is read yet.
//! 2. **Resolve** every referenced entity by id from the store, and run
//!    duplicate and delete-guard checks.
//! 3. **Persist** by handing one [`ChangeSet`] to [`CatalogStore::apply`].
//! 4. **Report** the stored entity, or the first [`Error`] encountered.
//!
//! The implementation is split by concern:
//! - [`lookup`]: existence checks, fetches and related fetches
//! - [`duplicates`]: name and ISBN uniqueness
//! - [`association`]: book ↔ author / category links
//! - [`mutation`]: guarded create, update and delete
//! - [`rating`]: derived book ratings

mod association;
mod duplicates;
mod lookup;
mod mutation;
mod rating;

pub use association::BookLinks;
pub use rating::mean_rating;

use tracing::warn;

use crate::{
  Error, Result,
  change::{Applied, ChangeSet},
  entity::Id,
  store::CatalogStore,
};

/// The catalog service. Cheap to clone when `S` is.
#[derive(Debug, Clone)]
pub struct Catalog<S> {
  store: S,
}

impl<S: CatalogStore> Catalog<S> {
  pub fn new(store: S) -> Self { Self { store } }

  /// Apply `changes` and translate a rolled-back set into
  /// [`Error::NotApplied`]. Returns the id assigned by the set's insert.
  async fn commit(&self, changes: ChangeSet) -> Result<Option<Id>> {
    match self.store.apply(changes).await.map_err(Error::store)? {
      Applied::Committed { inserted } => Ok(inserted),
      Applied::RolledBack(change) => {
        warn!(%change, "change set rolled back");
        Err(Error::NotApplied(change.to_string()))
      }
    }
  }

  /// Like [`Self::commit`] but for sets that must insert a row.
  async fn commit_insert(&self, changes: ChangeSet) -> Result<Id> {
    self
      .commit(changes)
      .await?
      .ok_or_else(|| Error::NotApplied("insert did not report a row id".into()))
  }
}

/// Updates name their target twice, in the path and in the body; the two
/// must agree before anything is looked up.
fn check_path_id(path: Id, body: Option<Id>) -> Result<()> {
  if body == Some(path) {
    Ok(())
  } else {
    Err(Error::IdMismatch { path, body })
  }
}
