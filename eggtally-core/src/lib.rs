//! Eggtally Core Library
//!
//! Collection models, the local state store and backend sync for the
//! eggtally poultry-farm tally tool.

pub mod models;
pub mod state;
pub mod storage;
pub mod sync;

pub use models::{
    default_catalog, Aviary, Batch, CategoryKind, CollectionMode, EggTypeCounter, Settings,
    DEFAULT_TRAY_VALUE,
};
pub use state::{Change, Selection, StateError, StateSnapshot, StateStore, StoreOptions};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SnapshotKey, StorageError};
pub use sync::{
    load_remote_aviaries, submit_all_collections, ApiClient, ApiError, CollectionApi,
    SubmissionPlan, SubmitError,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
