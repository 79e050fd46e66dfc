use thiserror::Error;

/// Rejected state mutations. State is left untouched when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Tray value for aviary '{0}' must be a positive number")]
    InvalidTrayValue(String),

    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    #[error("Aviary '{aviary_id}' not found in batch '{batch_id}'")]
    AviaryNotFound { batch_id: String, aviary_id: String },

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Cannot delete the last batch")]
    LastBatch,

    #[error("Cannot delete the last aviary of batch '{0}'")]
    LastAviary(String),

    #[error("Aviary '{0}' does not belong to the selected batch")]
    AviaryNotInBatch(String),

    #[error("No batch selected")]
    NoBatchSelected,
}
