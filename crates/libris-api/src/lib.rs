//! JSON REST API for Libris.
//!
//! Exposes an axum [`Router`] backed by a [`Catalog`] over any
//! [`libris_core::store::CatalogStore`]. Every handler is a thin wrapper around
//! one catalog operation; failures are mapped to HTTP statuses by
//! [`ApiError`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", libris_api::api_router(catalog.clone()))
//! ```

pub mod authors;
pub mod books;
pub mod categories;
pub mod countries;
pub mod error;
pub mod extract;
pub mod reviewers;
pub mod reviews;

use std::sync::Arc;

use axum::{Router, routing::get};
use libris_core::{Catalog, store::CatalogStore};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build a fully-materialised API router for `catalog`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(catalog: Arc<Catalog<S>>) -> Router<()>
where
  S: CatalogStore + 'static,
{
  Router::new()
    // Countries
    .route("/countries", get(countries::list::<S>).post(countries::create::<S>))
    .route(
      "/countries/{id}",
      get(countries::get_one::<S>)
        .put(countries::update::<S>)
        .delete(countries::delete::<S>),
    )
    .route("/countries/{id}/authors", get(countries::authors::<S>))
    .route("/countries/authors/{author_id}", get(countries::of_author::<S>))
    // Authors
    .route("/authors", get(authors::list::<S>).post(authors::create::<S>))
    .route(
      "/authors/{id}",
      get(authors::get_one::<S>)
        .put(authors::update::<S>)
        .delete(authors::delete::<S>),
    )
    .route("/authors/{id}/books", get(authors::books::<S>))
    .route("/authors/books/{book_id}", get(authors::of_book::<S>))
    // Categories
    .route("/categories", get(categories::list::<S>).post(categories::create::<S>))
    .route(
      "/categories/{id}",
      get(categories::get_one::<S>)
        .put(categories::update::<S>)
        .delete(categories::delete::<S>),
    )
    .route("/categories/{id}/books", get(categories::books::<S>))
    .route("/categories/books/{book_id}", get(categories::of_book::<S>))
    // Books
    .route("/books", get(books::list::<S>).post(books::create::<S>))
    .route(
      "/books/{id}",
      get(books::get_one::<S>)
        .put(books::update::<S>)
        .delete(books::delete::<S>),
    )
    .route("/books/isbn/{isbn}", get(books::by_isbn::<S>))
    .route("/books/{id}/rating", get(books::rating::<S>))
    // Reviewers
    .route("/reviewers", get(reviewers::list::<S>).post(reviewers::create::<S>))
    .route(
      "/reviewers/{id}",
      get(reviewers::get_one::<S>)
        .put(reviewers::update::<S>)
        .delete(reviewers::delete::<S>),
    )
    .route("/reviewers/{id}/reviews", get(reviewers::reviews::<S>))
    .route("/reviewers/reviews/{review_id}", get(reviewers::of_review::<S>))
    // Reviews
    .route("/reviews", get(reviews::list::<S>).post(reviews::create::<S>))
    .route(
      "/reviews/{id}",
      get(reviews::get_one::<S>)
        .put(reviews::update::<S>)
        .delete(reviews::delete::<S>),
    )
    .route("/reviews/{id}/book", get(reviews::book::<S>))
    .route("/reviews/books/{book_id}", get(reviews::of_book::<S>))
    .with_state(catalog)
    .layer(TraceLayer::new_for_http())
}
