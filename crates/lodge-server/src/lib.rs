//! Configuration and application assembly for the lodge HTTP server.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use lodge_core::{engine::Engine, gaps::Lookahead, store::BookingStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Environment variables with this prefix override the config file, e.g.
/// `LODGE_PORT=9000` or `LODGE_LOOKAHEAD__DIRECT_DAYS=60`.
pub const ENV_PREFIX: &str = "LODGE";

/// Top-level server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; a leading `~/` is expanded to `$HOME`.
  pub store_path: PathBuf,
  pub lookahead:  Lookahead,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("lodge.db"),
      lookahead:  Lookahead::default(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `LODGE_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
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

// ─── Router ──────────────────────────────────────────────────────────────────

/// The API router with request tracing.
pub fn app<S>(store: Arc<S>, lookahead: Lookahead) -> Router
where
  S: BookingStore + 'static,
{
  let engine = Arc::new(Engine::new(store, lookahead));
  lodge_api::api_router(engine).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use axum::{body::Body, http::Request};
  use lodge_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/lodge.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.lookahead, Lookahead::default());
  }

  #[test]
  fn file_overrides_lookahead() {
    let path = std::env::temp_dir().join(format!("lodge-config-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "port = 9100\nstore_path = \"~/lodge/test.db\"\n\n[lookahead]\ndirect_days = 14").unwrap();
    drop(file);

    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(cfg.port, 9100);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.lookahead.direct_days, 14);
    assert_eq!(cfg.lookahead.after_conflict_days, 90);
    assert!(!cfg.resolved_store_path().starts_with("~"));
  }

  #[tokio::test]
  async fn traced_router_serves_the_api() {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let resp = app(store, Lookahead::default())
      .oneshot(Request::builder().uri("/resources").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
  }
}
