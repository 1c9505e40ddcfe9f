//! In-memory backend for the lead store.
//!
//! Leads live for as long as the process does. A single read/write lock
//! guards the collection, so readers never see a half-applied write.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
