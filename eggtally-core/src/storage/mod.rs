//! Persisted key-value snapshots.
//!
//! State is mirrored to a plain string store as JSON blobs, one per key:
//! - `eggs`: array of category counters
//! - `batches`: array of batches with their aviaries
//! - `eggSettings`: collection mode and selection ids
//!
//! Snapshots are written whole on every change and read once at startup.

mod error;
mod file;
mod memory;
mod snapshot_key;
mod traits;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use snapshot_key::SnapshotKey;
pub use traits::KeyValueStore;
