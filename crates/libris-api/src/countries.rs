//! Handlers for `/countries` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/countries` | Ordered by name |
//! | `GET`    | `/countries/:id` | |
//! | `GET`    | `/countries/:id/authors` | Authors from the country |
//! | `GET`    | `/countries/authors/:author_id` | Country of an author |
//! | `POST`   | `/countries` | Body: [`CountryDraft`]; returns 201 + stored country |
//! | `PUT`    | `/countries/:id` | Body id must match the path |
//! | `DELETE` | `/countries/:id` | 409 while any author references it |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use libris_core::{
  Catalog,
  entity::{Author, Country, CountryDraft, Id},
  store::CatalogStore,
};

use crate::{error::ApiError, extract::JsonBody};

pub async fn list<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
) -> Result<Json<Vec<Country>>, ApiError> {
  Ok(Json(catalog.countries().await?))
}

pub async fn get_one<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Country>, ApiError> {
  Ok(Json(catalog.country(id).await?))
}

pub async fn authors<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<Json<Vec<Author>>, ApiError> {
  Ok(Json(catalog.authors_from_country(id).await?))
}

pub async fn of_author<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(author_id): Path<Id>,
) -> Result<Json<Country>, ApiError> {
  Ok(Json(catalog.country_of_author(author_id).await?))
}

pub async fn create<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  JsonBody(draft): JsonBody<CountryDraft>,
) -> Result<impl IntoResponse, ApiError> {
  let country = catalog.create_country(draft).await?;
  Ok((StatusCode::CREATED, Json(country)))
}

pub async fn update<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
  JsonBody(draft): JsonBody<CountryDraft>,
) -> Result<StatusCode, ApiError> {
  catalog.update_country(id, draft).await?;
  Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  Path(id): Path<Id>,
) -> Result<StatusCode, ApiError> {
  catalog.delete_country(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
