//! Handlers for `/reviews` endpoints.
//!
//! A review body references its book and reviewer by id only,
//! e.g. `{"headline": "..", "rating": 4, "book": {"id": 1}, "reviewer": {"id": 2}}`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use libris_core::{
  Catalog,
  entity::{Book, Id, Review, ReviewDraft},
  store::CatalogStore,
};

use crate::{error::ApiError, extract::JsonBody};

pub async fn list<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
) -> Result<Json<Vec<Review>>, ApiError> {
  Ok(Json(catalog.reviews().await?))
}

pub async fn get_one<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Review>, ApiError> {
  Ok(Json(catalog.review(id).await?))
}

/// `GET /reviews/:id/book`
pub async fn book<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Book>, ApiError> {
  Ok(Json(catalog.book_of_review(id).await?))
}

/// `GET /reviews/books/:book_id`
pub async fn of_book<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(book_id): Path<Id>,
) -> Result<Json<Vec<Review>>, ApiError> {
  Ok(Json(catalog.reviews_of_book(book_id).await?))
}

pub async fn create<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  JsonBody(draft): JsonBody<ReviewDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let review = catalog.create_review(draft).await?;
  Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
  JsonBody(draft): JsonBody<ReviewDraft>,
) -> Result<StatusCode, ApiError> {
  catalog.update_review(id, draft).await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError> {
  catalog.delete_review(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
