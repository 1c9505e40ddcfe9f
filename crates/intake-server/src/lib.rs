//! HTTP server for lead intake.
//!
//! Mounts the [`intake_api`] routes under `/api`, adds staff login, and gates
//! every route except the public intake form behind a session cookie.

pub mod auth;
pub mod error;
pub mod uploads;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router, middleware,
  routing::{get, post},
};
use intake_api::{ApiSettings, ApiState};
use intake_core::{
  attachment::DEFAULT_MAX_UPLOAD_BYTES, query::DEFAULT_PAGE_SIZE, store::LeadStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use uploads::DiskAttachments;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `INTAKE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_page_size")]
  pub page_size:          usize,
  #[serde(default = "default_upload_dir")]
  pub upload_dir:         PathBuf,
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes:   usize,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// Key for signing session cookies.
  pub session_secret:     String,
  #[serde(default = "default_session_ttl_secs")]
  pub session_ttl_secs:   u64,
  #[serde(default)]
  pub cookie_secure:      bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }
fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }
fn default_upload_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_max_upload_bytes() -> usize { DEFAULT_MAX_UPLOAD_BYTES }
fn default_session_ttl_secs() -> u64 { 3600 }

/// Shortest accepted `session_secret`, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 16;

impl ServerConfig {
  /// Layer `path` (optional) under `INTAKE_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("INTAKE"))
      .build()?
      .try_deserialize()
  }

  /// Reject settings the server cannot run with.
  pub fn validate(&self) -> Result<(), Error> {
    if self.auth_username.trim().is_empty() {
      return Err(Error::Config("auth_username must not be empty".into()));
    }
    if self.session_secret.len() < MIN_SESSION_SECRET_LEN {
      return Err(Error::Config(format!(
        "session_secret must be at least {MIN_SESSION_SECRET_LEN} bytes"
      )));
    }
    if self.session_ttl_secs == 0 {
      return Err(Error::Config("session_ttl_secs must be positive".into()));
    }
    if self.max_upload_bytes == 0 {
      return Err(Error::Config("max_upload_bytes must be positive".into()));
    }
    Ok(())
  }

  pub fn api_settings(&self) -> ApiSettings {
    ApiSettings {
      page_size:        self.page_size.max(1),
      max_upload_bytes: self.max_upload_bytes,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state for the whole server.
pub struct AppState<S> {
  pub api:  ApiState<S, DiskAttachments>,
  pub auth: Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      api:  self.api.clone(),
      auth: self.auth.clone(),
    }
  }
}

impl<S> AppState<S> {
  pub fn new(store: S, attachments: DiskAttachments, cfg: &ServerConfig) -> Self {
    Self {
      api:  ApiState {
        store:       Arc::new(store),
        attachments: Arc::new(attachments),
        settings:    cfg.api_settings(),
      },
      auth: Arc::new(AuthConfig::from_config(cfg)),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the server's axum [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: LeadStore + 'static,
{
  let auth_routes = Router::new()
    .route("/auth", post(auth::login))
    .route("/auth/logout", post(auth::logout))
    .with_state(state.auth.clone());

  let api = intake_api::api_router(state.api)
    .merge(auth_routes)
    .layer(middleware::from_fn_with_state(state.auth, auth::require_session));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }

// ─── Tests ───────────────────────────────────────────────────────────────────
