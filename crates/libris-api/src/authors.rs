//! Handlers for `/authors` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/authors` | |
//! | `GET`    | `/authors/:id` | |
//! | `GET`    | `/authors/:id/books` | Books the author is linked to |
//! | `GET`    | `/authors/books/:book_id` | Authors linked to a book |
//! | `POST`   | `/authors` | Body: [`AuthorDraft`]; `country` is `{"id": ..}` |
//! | `PUT`    | `/authors/:id` | |
//! | `DELETE` | `/authors/:id` | 409 while linked to any book |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use libris_core::{
  Catalog,
  entity::{Author, AuthorDraft, Book, Id},
  store::CatalogStore,
};

use crate::{error::ApiError, extract::JsonBody};

pub async fn list<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
) -> Result<Json<Vec<Author>>, ApiError> {
  Ok(Json(catalog.authors().await?))
}

pub async fn get_one<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Author>, ApiError> {
  Ok(Json(catalog.author(id).await?))
}

pub async fn books<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Vec<Book>>, ApiError> {
  Ok(Json(catalog.books_by_author(id).await?))
}

pub async fn of_book<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(book_id): Path<Id>,
) -> Result<Json<Vec<Author>>, ApiError> {
  Ok(Json(catalog.authors_of_book(book_id).await?))
}

pub async fn create<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  JsonBody(draft): JsonBody<AuthorDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let author = catalog.create_author(draft).await?;
  Ok((StatusCode::CREATED, Json(author)))
}

pub async fn update<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
  JsonBody(draft): JsonBody<AuthorDraft>,
) -> Result<StatusCode, ApiError> {
  catalog.update_author(id, draft).await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError> {
  catalog.delete_author(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
