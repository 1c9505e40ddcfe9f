//! JSON REST API for lead intake.
//!
//! Exposes an axum [`Router`] backed by any [`LeadStore`] and
//! [`AttachmentStore`]. Auth, TLS, and transport concerns are the caller's
//! responsibility: the caller decides which of these routes are public.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", intake_api::api_router(state.clone()))
//! ```

pub mod error;
pub mod leads;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use intake_core::{
  attachment::{AttachmentStore, DEFAULT_MAX_UPLOAD_BYTES},
  query::DEFAULT_PAGE_SIZE,
  store::LeadStore,
};

pub use error::ApiError;

/// Room left in the intake body limit for the text fields and multipart
/// framing around a maximum-size résumé.
pub const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

/// Tunables the handlers need from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ApiSettings {
  pub page_size:        usize,
  pub max_upload_bytes: usize,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      page_size:        DEFAULT_PAGE_SIZE,
      max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
  }
}

/// Shared state threaded through the API handlers.
pub struct ApiState<S, A> {
  pub store:       Arc<S>,
  pub attachments: Arc<A>,
  pub settings:    ApiSettings,
}

// Manual impl: `Arc` clones regardless of whether the backends do.
impl<S, A> Clone for ApiState<S, A> {
  fn clone(&self) -> Self {
    Self {
      store:       self.store.clone(),
      attachments: self.attachments.clone(),
      settings:    self.settings,
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, A>(state: ApiState<S, A>) -> Router<()>
where
  S: LeadStore + 'static,
  A: AttachmentStore + 'static,
{
  let intake_limit = state.settings.max_upload_bytes + FORM_OVERHEAD_BYTES;

  Router::new()
    .route(
      "/leads",
      post(leads::create::<S, A>)
        .layer(DefaultBodyLimit::max(intake_limit))
        .get(leads::list::<S, A>),
    )
    .route(
      "/leads/{id}",
      get(leads::get_one::<S, A>).patch(leads::update_status::<S, A>),
    )
    .with_state(state)
}
