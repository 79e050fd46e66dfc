mod aviary;
mod batch;
mod config_cmd;
mod count;
mod remote;
mod submit;

use std::time::Duration;

use eggtally_core::{ApiClient, ApiError, FileStore, StateStore, StorageError, StoreOptions};

use crate::config::Config;

pub use aviary::AviaryCommand;
pub use batch::BatchCommand;
pub use config_cmd::ConfigCommand;
pub use count::CountCommand;
pub use remote::RemoteCommand;
pub use submit::SubmitCommand;

/// Opens the state store backed by the configured data directory.
pub fn open_store(config: &Config) -> Result<StateStore<FileStore>, StorageError> {
    let storage = FileStore::new(config.data_dir.value.clone());
    let options = StoreOptions {
        default_tray_value: config.default_tray_value.value,
    };
    StateStore::load(storage, options)
}

pub fn api_client(config: &Config) -> Result<ApiClient, ApiError> {
    let base_url = config.api.base_url.value.clone();
    match &config.api.timeout_secs {
        Some(timeout) => ApiClient::with_timeout(base_url, Duration::from_secs(timeout.value)),
        None => Ok(ApiClient::new(base_url)),
    }
}
