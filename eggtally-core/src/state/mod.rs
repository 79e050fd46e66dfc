//! Local state for batches, aviaries and category tallies.
//!
//! [`StateStore`] owns the whole entity graph. Every mutation goes through
//! it, returns a [`Change`] describing what happened, and writes the affected
//! snapshots back to the injected [`KeyValueStore`](crate::storage::KeyValueStore).

mod error;
mod store;

pub use error::StateError;
pub use store::{default_batches, Change, Selection, StateSnapshot, StateStore, StoreOptions};
