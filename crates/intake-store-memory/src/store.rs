//! [`MemoryStore`] — the in-process implementation of [`LeadStore`].

use std::{
  collections::HashMap,
  sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::Utc;
use uuid::Uuid;

use intake_core::{
  lead::{LeadPatch, LeadRecord},
  store::LeadStore,
};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Inner {
  /// Insertion order is listing order.
  leads: Vec<LeadRecord>,
  /// Position of each lead in `leads`. Records are never removed, so
  /// positions stay valid.
  index: HashMap<Uuid, usize>,
}

/// A lead store held entirely in memory.
///
/// Cloning is cheap — clones share the same collection.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
    self.inner.read().map_err(|_| Error::Poisoned)
  }

  fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
    self.inner.write().map_err(|_| Error::Poisoned)
  }

  /// Number of stored leads.
  pub fn len(&self) -> Result<usize> { Ok(self.read()?.leads.len()) }

  pub fn is_empty(&self) -> Result<bool> { Ok(self.len()? == 0) }
}

// ─── LeadStore impl ──────────────────────────────────────────────────────────

impl LeadStore for MemoryStore {
  type Error = Error;

  async fn create(&self, record: LeadRecord) -> Result<()> {
    let mut inner = self.write()?;
    if inner.index.contains_key(&record.id) {
      return Err(Error::DuplicateId(record.id));
    }
    let position = inner.leads.len();
    inner.index.insert(record.id, position);
    tracing::debug!(lead_id = %record.id, position, "lead stored");
    inner.leads.push(record);
    Ok(())
  }

  async fn update(&self, id: Uuid, patch: LeadPatch) -> Result<Option<LeadRecord>> {
    let mut inner = self.write()?;
    let Some(&position) = inner.index.get(&id) else {
      return Ok(None);
    };
    let lead = &mut inner.leads[position];
    if lead.apply(patch) {
      lead.updated_at = Some(Utc::now());
    }
    Ok(Some(lead.clone()))
  }

  async fn get(&self, id: Uuid) -> Result<Option<LeadRecord>> {
    let inner = self.read()?;
    Ok(inner.index.get(&id).map(|&position| inner.leads[position].clone()))
  }

  async fn list(&self) -> Result<Vec<LeadRecord>> {
    Ok(self.read()?.leads.clone())
  }
}
