//! Core types and trait definitions for the lead intake service.
//!
//! Lead records, intake validation, and the listing query live here, along
//! with the storage traits the backends implement. No HTTP, no I/O.

// Backends implement the store traits with native `async fn`.
#![allow(async_fn_in_trait)]

pub mod attachment;
pub mod error;
pub mod lead;
pub mod query;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
