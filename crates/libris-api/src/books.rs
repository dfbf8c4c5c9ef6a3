//! Handlers for `/books` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/books` | |
//! | `GET`    | `/books/:id` | |
//! | `GET`    | `/books/isbn/:isbn` | Lookup by trimmed ISBN |
//! | `GET`    | `/books/:id/rating` | Mean review rating, `"0"` with no reviews |
//! | `POST`   | `/books` | Body: [`BookBody`]; returns 201 + stored book |
//! | `PUT`    | `/books/:id` | Body: [`BookBody`]; replaces the book's links |
//! | `DELETE` | `/books/:id` | Also removes its links and reviews |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use libris_core::{
  Catalog,
  entity::{Book, BookDraft, Id},
  store::CatalogStore,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extract::JsonBody};

// ─── Bodies ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /books` and `PUT /books/:id`.
///
/// Both id lists must be non-empty; a missing list is treated as empty.
#[derive(Debug, Deserialize)]
pub struct BookBody {
  pub book:         BookDraft,
  #[serde(default)]
  pub author_ids:   Vec<Id>,
  #[serde(default)]
  pub category_ids: Vec<Id>,
}

#[derive(Debug, Serialize)]
pub struct RatingBody {
  pub book_id: Id,
  pub rating:  Decimal,
}

// ─── Reads ───────────────────────────────────────────────────────────────────

pub async fn list<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
) -> Result<Json<Vec<Book>>, ApiError> {
  Ok(Json(catalog.books().await?))
}

pub async fn get_one<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Book>, ApiError> {
  Ok(Json(catalog.book(id).await?))
}

pub async fn by_isbn<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(isbn): Path<String>,
) -> Result<Json<Book>, ApiError> {
  Ok(Json(catalog.book_by_isbn(&isbn).await?))
}

pub async fn rating<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<RatingBody>, ApiError> {
  let rating = catalog.average_rating(id).await?;
  Ok(Json(RatingBody { book_id: id, rating }))
}

// ─── Writes ──────────────────────────────────────────────────────────────────

pub async fn create<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  JsonBody(body): JsonBody<BookBody>,
) -> Result<impl IntoResponse, ApiError> {
  let book = catalog
    .create_book(body.book, &body.author_ids, &body.category_ids)
    .await?;
  Ok((StatusCode::CREATED, Json(book)))
}

pub async fn update<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
  JsonBody(body): JsonBody<BookBody>,
) -> Result<StatusCode, ApiError> {
  catalog
    .update_book(id, body.book, &body.author_ids, &body.category_ids)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError> {
  catalog.delete_book(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
