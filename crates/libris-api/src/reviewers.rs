//! Handlers for `/reviewers` endpoints.
//!
//! Deleting a reviewer also deletes every review they wrote, as one unit.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use libris_core::{
  Catalog,
  entity::{Id, Review, Reviewer, ReviewerDraft},
  store::CatalogStore,
};

use crate::{error::ApiError, extract::JsonBody};

pub async fn list<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
) -> Result<Json<Vec<Reviewer>>, ApiError> {
  Ok(Json(catalog.reviewers().await?))
}

pub async fn get_one<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Reviewer>, ApiError> {
  Ok(Json(catalog.reviewer(id).await?))
}

/// `GET /reviewers/:id/reviews`
pub async fn reviews<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Vec<Review>>, ApiError> {
  Ok(Json(catalog.reviews_by_reviewer(id).await?))
}

/// `GET /reviewers/reviews/:review_id`
pub async fn of_review<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(review_id): Path<Id>,
) -> Result<Json<Reviewer>, ApiError> {
  Ok(Json(catalog.reviewer_of_review(review_id).await?))
}

pub async fn create<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  JsonBody(draft): JsonBody<ReviewerDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let reviewer = catalog.create_reviewer(draft).await?;
  Ok((StatusCode::CREATED, Json(reviewer)))
}

pub async fn update<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
  JsonBody(draft): JsonBody<ReviewerDraft>,
) -> Result<StatusCode, ApiError> {
  catalog.update_reviewer(id, draft).await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError> {
  catalog.delete_reviewer(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
