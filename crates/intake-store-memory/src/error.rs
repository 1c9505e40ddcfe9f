//! Error type for `intake-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A writer panicked while holding the lock; the collection may be
  /// inconsistent.
  #[error("lead store lock poisoned")]
  Poisoned,

  #[error("lead {0} already exists")]
  DuplicateId(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
