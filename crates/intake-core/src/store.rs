//! The `LeadStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `intake-store-memory`).
//! Higher layers (`intake-api`, `intake-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::lead::{LeadPatch, LeadRecord};

/// Abstraction over the authoritative collection of leads.
///
/// Backends do not validate field contents; that is the intake path's job.
/// They do guarantee that `list` returns an independent snapshot and that
/// no reader observes a half-applied write.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait LeadStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append a fully-built record. The caller assigns `id`, `submitted_at`
  /// and the initial `PENDING` status.
  ///
  /// Returns an error if a record with the same `id` already exists.
  fn create(
    &self,
    record: LeadRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Shallow-merge `patch` into the record with `id` and return the result.
  /// Returns `None` if no such record exists; the store is left unchanged.
  fn update(
    &self,
    id: Uuid,
    patch: LeadPatch,
  ) -> impl Future<Output = Result<Option<LeadRecord>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<LeadRecord>, Self::Error>> + Send + '_;

  /// Snapshot of every record in insertion order.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<LeadRecord>, Self::Error>> + Send + '_;
}
