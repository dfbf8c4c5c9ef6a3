//! Derived book ratings.

use rust_decimal::Decimal;

use crate::{
  Error, Result,
  entity::{EntityKind, Id},
  store::CatalogStore,
};

use super::Catalog;

/// Arithmetic mean of `ratings`. An empty slice is rated zero.
pub fn mean_rating(ratings: &[u8]) -> Decimal {
  if ratings.is_empty() {
    return Decimal::ZERO;
  }
  let sum: Decimal = ratings.iter().copied().map(Decimal::from).sum();
  (sum / Decimal::from(ratings.len())).normalize()
}

impl<S: CatalogStore> Catalog<S> {
  /// The mean rating of a book's reviews; zero when it has none.
  pub async fn average_rating(&self, book_id: Id) -> Result<Decimal> {
    self.require(EntityKind::Book, book_id).await?;
    let ratings = self
      .store
      .ratings_of_book(book_id)
      .await
      .map_err(Error::store)?;
    Ok(mean_rating(&ratings))
  }
}
