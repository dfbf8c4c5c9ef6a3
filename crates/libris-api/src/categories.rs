//! Handlers for `/categories` endpoints.
//!
//! Same shape as `/countries`; a category can only be deleted once no book
//! is linked to it.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use libris_core::{
  Catalog,
  entity::{Book, Category, CategoryDraft, Id},
  store::CatalogStore,
};

use crate::{error::ApiError, extract::JsonBody};

pub async fn list<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
) -> Result<Json<Vec<Category>>, ApiError> {
  Ok(Json(catalog.categories().await?))
}

pub async fn get_one<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Category>, ApiError> {
  Ok(Json(catalog.category(id).await?))
}

/// `GET /categories/:id/books`
pub async fn books<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Vec<Book>>, ApiError> {
  Ok(Json(catalog.books_in_category(id).await?))
}

/// `GET /categories/books/:book_id`
pub async fn of_book<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(book_id): Path<Id>,
) -> Result<Json<Vec<Category>>, ApiError> {
  Ok(Json(catalog.categories_of_book(book_id).await?))
}

pub async fn create<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  JsonBody(draft): JsonBody<CategoryDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let category = catalog.create_category(draft).await?;
  Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
  JsonBody(draft): JsonBody<CategoryDraft>,
) -> Result<StatusCode, ApiError> {
  catalog.update_category(id, draft).await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError> {
  catalog.delete_category(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
