//! Tests for `MemoryStore`.

use intake_core::{
  lead::{LeadPatch, LeadRecord, LeadStatus, NewLead},
  query::{LeadQuery, StatusFilter, query},
  store::LeadStore,
};
use uuid::Uuid;

use crate::{Error, MemoryStore};

fn lead(first: &str) -> LeadRecord {
  LeadRecord::new(
    NewLead {
      first_name:             first.into(),
      last_name:              "Tester".into(),
      email:                  format!("{}@example.com", first.to_lowercase()),
      country_of_citizenship: "Norway".into(),
      linkedin_url:           None,
      google_scholar_url:     None,
      visa_categories:        vec!["O-1".into()],
      help_description:       "Please review my profile.".into(),
    },
    Some("resume-1.pdf".into()),
  )
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get() {
  let s = MemoryStore::new();
  let record = lead("Alice");
  s.create(record.clone()).await.unwrap();

  let fetched = s.get(record.id).await.unwrap().unwrap();
  assert_eq!(fetched, record);
  assert_eq!(fetched.status, LeadStatus::Pending);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = MemoryStore::new();
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn sequential_creates_have_distinct_ids() {
  let s = MemoryStore::new();
  s.create(lead("Alice")).await.unwrap();
  s.create(lead("Alice")).await.unwrap();

  let all = s.list().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_ne!(all[0].id, all[1].id);
}

#[tokio::test]
async fn duplicate_id_is_rejected() {
  let s = MemoryStore::new();
  let record = lead("Alice");
  s.create(record.clone()).await.unwrap();

  let err = s.create(record.clone()).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateId(id) if id == record.id));
  assert_eq!(s.len().unwrap(), 1);
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_preserves_insertion_order() {
  let s = MemoryStore::new();
  for name in ["Alice", "Bob", "Carol"] {
    s.create(lead(name)).await.unwrap();
  }
  let names: Vec<_> = s
    .list()
    .await
    .unwrap()
    .into_iter()
    .map(|l| l.first_name)
    .collect();
  assert_eq!(names, ["Alice", "Bob", "Carol"]);
}

#[tokio::test]
async fn mutating_a_snapshot_does_not_touch_the_store() {
  let s = MemoryStore::new();
  s.create(lead("Alice")).await.unwrap();
  s.create(lead("Bob")).await.unwrap();

  let mut snapshot = s.list().await.unwrap();
  snapshot.clear();
  snapshot.push(lead("Mallory"));

  let again = s.list().await.unwrap();
  assert_eq!(again.len(), 2);
  assert_eq!(again[0].first_name, "Alice");

  let page = query(s.list().await.unwrap(), &LeadQuery::default());
  assert_eq!(page.total_count, 2);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_status_changes_only_status() {
  let s = MemoryStore::new();
  let record = lead("Alice");
  s.create(record.clone()).await.unwrap();

  let updated = s
    .update(record.id, LeadPatch::status(LeadStatus::ReachedOut))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.status, LeadStatus::ReachedOut);
  assert!(updated.updated_at.is_some());
  assert_eq!(
    LeadRecord {
      status: LeadStatus::Pending,
      updated_at: None,
      ..updated.clone()
    },
    record
  );

  let fetched = s.get(record.id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_merges_multiple_fields() {
  let s = MemoryStore::new();
  let record = lead("Alice");
  s.create(record.clone()).await.unwrap();

  let patch = LeadPatch {
    email: Some("new@example.com".into()),
    visa_categories: Some(vec!["EB-1A".into()]),
    ..LeadPatch::default()
  };
  let updated = s.update(record.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.email, "new@example.com");
  assert_eq!(updated.visa_categories, ["EB-1A"]);
  assert_eq!(updated.first_name, record.first_name);
  assert_eq!(updated.resume_filename, record.resume_filename);
  assert_eq!(updated.submitted_at, record.submitted_at);
}

#[tokio::test]
async fn empty_patch_leaves_updated_at_unset() {
  let s = MemoryStore::new();
  let record = lead("Alice");
  s.create(record.clone()).await.unwrap();

  let same = s.update(record.id, LeadPatch::default()).await.unwrap().unwrap();
  assert_eq!(same, record);
}

#[tokio::test]
async fn update_missing_returns_none_and_changes_nothing() {
  let s = MemoryStore::new();
  s.create(lead("Alice")).await.unwrap();
  let before = s.list().await.unwrap();

  let result = s
    .update(Uuid::new_v4(), LeadPatch::status(LeadStatus::ReachedOut))
    .await
    .unwrap();
  assert!(result.is_none());
  assert_eq!(s.list().await.unwrap(), before);
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_are_all_kept() {
  let s = MemoryStore::new();
  let mut handles = Vec::new();
  for i in 0..50 {
    let s = s.clone();
    handles.push(tokio::spawn(async move {
      s.create(lead(&format!("Lead{i}"))).await.unwrap();
    }));
  }
  for h in handles {
    h.await.unwrap();
  }

  let all = s.list().await.unwrap();
  assert_eq!(all.len(), 50);
  let mut ids: Vec<_> = all.iter().map(|l| l.id).collect();
  ids.sort();
  ids.dedup();
  assert_eq!(ids.len(), 50);
}

#[tokio::test]
async fn status_filters_see_updates() {
  let s = MemoryStore::new();
  let a = lead("Alice");
  s.create(a.clone()).await.unwrap();
  s.create(lead("Bob")).await.unwrap();
  s.update(a.id, LeadPatch::status(LeadStatus::ReachedOut))
    .await
    .unwrap();

  let reached = query(s.list().await.unwrap(), &LeadQuery {
    status: StatusFilter::ReachedOut,
    ..LeadQuery::default()
  });
  assert_eq!(reached.total_count, 1);
  assert_eq!(reached.items[0].id, a.id);
}
