//! HTTP server wiring for Libris.
//!
//! Loads [`ServerConfig`] and builds the top-level axum [`Router`] with the
//! JSON API nested under `/api`. The binary in `main.rs` opens the store and
//! serves the router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use libris_core::{Catalog, store::CatalogStore};
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `libris.toml` layered with
/// `LIBRIS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

/// Read configuration from `path` (optional) and the environment.
///
/// Keys missing from both fall back to `127.0.0.1:8080` and `libris.db`.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("store_path", "libris.db")?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("LIBRIS"))
    .build()?
    .try_deserialize()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the server's [`Router`] for `catalog`.
pub fn router<S>(catalog: Arc<Catalog<S>>) -> Router
where
  S: CatalogStore + 'static,
{
  Router::new().nest("/api", libris_api::api_router(catalog))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use libris_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  #[test]
  fn missing_config_file_uses_defaults() {
    let cfg = load_config(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("libris.db"));
    assert!(cfg.port > 0);
  }

  #[test]
  fn paths_without_tilde_are_unchanged() {
    let p = Path::new("/var/lib/libris.db");
    assert_eq!(expand_tilde(p), p);
  }

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = router(Arc::new(Catalog::new(store)));

    let resp = app
      .clone()
      .oneshot(Request::get("/api/countries").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
      .oneshot(Request::get("/countries").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
