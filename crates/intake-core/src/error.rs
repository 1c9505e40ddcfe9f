//! Error types for `intake-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{lead::LeadStatus, validate::ValidationErrors};

#[derive(Debug, Error)]
pub enum Error {
  #[error("lead not found: {0}")]
  LeadNotFound(Uuid),

  #[error("lead {id} cannot move from {from} to {to}")]
  InvalidTransition {
    id:   Uuid,
    from: LeadStatus,
    to:   LeadStatus,
  },

  #[error(transparent)]
  Validation(#[from] ValidationErrors),

  /// The request was structurally unusable (as opposed to failing a field
  /// constraint).
  #[error("malformed input: {0}")]
  MalformedInput(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
