//! Search, status filtering and pagination over a snapshot of leads.
//!
//! [`query`] is pure: it consumes the snapshot handed to it and never touches
//! the store.

use serde::{Deserialize, Serialize};

use crate::lead::{LeadRecord, LeadStatus};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Status restriction for a listing. Serialised as `ALL`, `PENDING` or
/// `REACHED_OUT`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFilter {
  #[default]
  All,
  Pending,
  ReachedOut,
}

impl StatusFilter {
  pub fn admits(self, status: LeadStatus) -> bool {
    match self {
      Self::All => true,
      Self::Pending => status == LeadStatus::Pending,
      Self::ReachedOut => status == LeadStatus::ReachedOut,
    }
  }
}

/// Parameters for [`query`].
#[derive(Debug, Clone)]
pub struct LeadQuery {
  /// Case-insensitive substring over first/last name, email and country.
  /// `None` and `""` both mean "no filter".
  pub search:    Option<String>,
  pub status:    StatusFilter,
  /// 1-indexed. Out-of-range values produce an empty page, not an error.
  pub page:      i64,
  /// Zero is treated as one.
  pub page_size: usize,
}

impl Default for LeadQuery {
  fn default() -> Self {
    Self {
      search:    None,
      status:    StatusFilter::All,
      page:      1,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPage {
  pub items:       Vec<LeadRecord>,
  /// Echo of the requested page, even when out of range.
  pub page:        i64,
  /// `ceil(total_count / page_size)`; zero when nothing matched.
  pub total_pages: usize,
  pub total_count: usize,
}

/// Filter `all` by `q` and cut out the requested page, keeping insertion
/// order.
pub fn query(all: Vec<LeadRecord>, q: &LeadQuery) -> LeadPage {
  let needle = q
    .search
    .as_deref()
    .filter(|s| !s.is_empty())
    .map(str::to_lowercase);

  let filtered: Vec<LeadRecord> = all
    .into_iter()
    .filter(|lead| {
      needle
        .as_deref()
        .is_none_or(|needle| lead.matches_search(needle))
    })
    .filter(|lead| q.status.admits(lead.status))
    .collect();

  let page_size   = q.page_size.max(1);
  let total_count = filtered.len();
  let total_pages = total_count.div_ceil(page_size);

  let items = match usize::try_from(q.page) {
    Ok(page) if page >= 1 && page <= total_pages => filtered
      .into_iter()
      .skip((page - 1) * page_size)
      .take(page_size)
      .collect(),
    _ => Vec::new(),
  };

  LeadPage {
    items,
    page: q.page,
    total_pages,
    total_count,
  }
}
