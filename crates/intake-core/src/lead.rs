//! Lead records — the unit of persisted data in the intake store.
//!
//! A lead is created once by the intake path and afterwards only changes
//! through a [`LeadPatch`]. `id` and `submitted_at` never change.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Triage state of a lead.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
  /// Not yet contacted.
  #[default]
  Pending,
  /// Staff has followed up.
  ReachedOut,
}

impl LeadStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pending => "PENDING",
      Self::ReachedOut => "REACHED_OUT",
    }
  }

  /// Check a requested status change for lead `id`.
  ///
  /// Status only moves forward. Returns `Ok(true)` if the change must be
  /// written, `Ok(false)` if it is a no-op.
  pub fn check_transition(self, id: Uuid, to: LeadStatus) -> Result<bool> {
    match (self, to) {
      (from, to) if from == to => Ok(false),
      (Self::Pending, Self::ReachedOut) => Ok(true),
      (from, to) => Err(Error::InvalidTransition { id, from, to }),
    }
  }
}

impl fmt::Display for LeadStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── LeadRecord ──────────────────────────────────────────────────────────────

/// A prospective client's intake record, as stored and as served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
  pub id:                     Uuid,
  pub first_name:             String,
  pub last_name:              String,
  pub email:                  String,
  pub country_of_citizenship: String,
  pub linkedin_url:           Option<String>,
  pub google_scholar_url:     Option<String>,
  /// Distinct categories in the order they were selected.
  pub visa_categories:        Vec<String>,
  pub help_description:       String,
  pub status:                 LeadStatus,
  /// Assigned when the record is built; never changes.
  pub submitted_at:           DateTime<Utc>,
  pub updated_at:             Option<DateTime<Utc>>,
  /// Name under which the attachment backend stored the résumé, if any.
  pub resume_filename:        Option<String>,
}

impl LeadRecord {
  /// Build a fresh `PENDING` record with a new id and `submitted_at = now`.
  pub fn new(lead: NewLead, resume_filename: Option<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      first_name: lead.first_name,
      last_name: lead.last_name,
      email: lead.email,
      country_of_citizenship: lead.country_of_citizenship,
      linkedin_url: lead.linkedin_url,
      google_scholar_url: lead.google_scholar_url,
      visa_categories: lead.visa_categories,
      help_description: lead.help_description,
      status: LeadStatus::Pending,
      submitted_at: Utc::now(),
      updated_at: None,
      resume_filename,
    }
  }

  /// Shallow-merge `patch` into this record. Returns `true` if the patch
  /// carried any field; the caller decides what that means for `updated_at`.
  pub fn apply(&mut self, patch: LeadPatch) -> bool {
    if patch.is_empty() {
      return false;
    }
    let LeadPatch {
      first_name,
      last_name,
      email,
      country_of_citizenship,
      linkedin_url,
      google_scholar_url,
      visa_categories,
      help_description,
      status,
      resume_filename,
    } = patch;

    if let Some(v) = first_name {
      self.first_name = v;
    }
    if let Some(v) = last_name {
      self.last_name = v;
    }
    if let Some(v) = email {
      self.email = v;
    }
    if let Some(v) = country_of_citizenship {
      self.country_of_citizenship = v;
    }
    if let Some(v) = linkedin_url {
      self.linkedin_url = Some(v);
    }
    if let Some(v) = google_scholar_url {
      self.google_scholar_url = Some(v);
    }
    if let Some(v) = visa_categories {
      self.visa_categories = v;
    }
    if let Some(v) = help_description {
      self.help_description = v;
    }
    if let Some(v) = status {
      self.status = v;
    }
    if let Some(v) = resume_filename {
      self.resume_filename = Some(v);
    }
    true
  }

  /// Case-insensitive substring match over name, email and country.
  /// `needle` must already be lower-cased.
  pub(crate) fn matches_search(&self, needle: &str) -> bool {
    [
      &self.first_name,
      &self.last_name,
      &self.email,
      &self.country_of_citizenship,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
  }
}

// ─── NewLead ─────────────────────────────────────────────────────────────────

/// Validated intake fields. Only [`crate::validate::LeadSubmission::validate`]
/// produces one outside of tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
  pub first_name:             String,
  pub last_name:              String,
  pub email:                  String,
  pub country_of_citizenship: String,
  pub linkedin_url:           Option<String>,
  pub google_scholar_url:     Option<String>,
  pub visa_categories:        Vec<String>,
  pub help_description:       String,
}

// ─── LeadPatch ───────────────────────────────────────────────────────────────

/// A partial update. `None` leaves the corresponding field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadPatch {
  pub first_name:             Option<String>,
  pub last_name:              Option<String>,
  pub email:                  Option<String>,
  pub country_of_citizenship: Option<String>,
  pub linkedin_url:           Option<String>,
  pub google_scholar_url:     Option<String>,
  pub visa_categories:        Option<Vec<String>>,
  pub help_description:       Option<String>,
  pub status:                 Option<LeadStatus>,
  pub resume_filename:        Option<String>,
}

impl LeadPatch {
  pub fn status(status: LeadStatus) -> Self {
    Self {
      status: Some(status),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  pub(crate) fn sample(first: &str, last: &str, email: &str, country: &str) -> LeadRecord {
    LeadRecord::new(
      NewLead {
        first_name:             first.into(),
        last_name:              last.into(),
        email:                  email.into(),
        country_of_citizenship: country.into(),
        linkedin_url:           None,
        google_scholar_url:     None,
        visa_categories:        vec!["O-1".into()],
        help_description:       "Looking for an assessment.".into(),
      },
      None,
    )
  }

  #[test]
  fn new_record_is_pending_and_unique() {
    let a = sample("Ada", "Lovelace", "ada@example.com", "UK");
    let b = sample("Ada", "Lovelace", "ada@example.com", "UK");
    assert_eq!(a.status, LeadStatus::Pending);
    assert!(a.updated_at.is_none());
    assert_ne!(a.id, b.id);
  }

  #[test]
  fn apply_merges_only_present_fields() {
    let mut lead = sample("Ada", "Lovelace", "ada@example.com", "UK");
    let before = lead.clone();

    assert!(lead.apply(LeadPatch::status(LeadStatus::ReachedOut)));
    assert_eq!(lead.status, LeadStatus::ReachedOut);
    assert_eq!(lead.first_name, before.first_name);
    assert_eq!(lead.email, before.email);
    assert_eq!(lead.visa_categories, before.visa_categories);
    assert_eq!(lead.submitted_at, before.submitted_at);
  }

  #[test]
  fn empty_patch_is_a_no_op() {
    let mut lead = sample("Ada", "Lovelace", "ada@example.com", "UK");
    let before = lead.clone();
    assert!(!lead.apply(LeadPatch::default()));
    assert_eq!(lead, before);
  }

  #[test]
  fn status_only_moves_forward() {
    let id = Uuid::new_v4();
    assert!(LeadStatus::Pending.check_transition(id, LeadStatus::ReachedOut).unwrap());
    assert!(!LeadStatus::Pending.check_transition(id, LeadStatus::Pending).unwrap());
    assert!(!LeadStatus::ReachedOut.check_transition(id, LeadStatus::ReachedOut).unwrap());
    assert!(matches!(
      LeadStatus::ReachedOut.check_transition(id, LeadStatus::Pending),
      Err(Error::InvalidTransition { .. })
    ));
  }

  #[test]
  fn wire_format_is_camel_case() {
    let lead = sample("Ada", "Lovelace", "ada@example.com", "UK");
    let json = serde_json::to_value(&lead).unwrap();
    assert_eq!(json["firstName"], "Ada");
    assert_eq!(json["countryOfCitizenship"], "UK");
    assert_eq!(json["status"], "PENDING");
    assert!(json["submittedAt"].is_string());
    assert!(json["resumeFilename"].is_null());
  }
}
