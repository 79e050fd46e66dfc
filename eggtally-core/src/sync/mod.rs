//! Backend sync over the collection REST API.
//!
//! ## Flow
//!
//! 1. Counters accumulate locally in the [`StateStore`](crate::state::StateStore)
//! 2. [`submit_all_collections`] turns every non-empty counter into one
//!    backend record (egg collection, mortality or water)
//! 3. Records are posted one at a time; each success clears its counter
//! 4. The first failure stops the run, leaving the remaining counters intact
//!
//! Bodies are JSON with camelCase field names.

mod client;
mod error;
mod protocol;
mod submit;

pub use client::{ApiClient, CollectionApi, DEFAULT_BASE_URL};
pub use error::{ApiError, SubmitError};
pub use protocol::{
    AviaryDto, CollectChickenDto, CollectEggDataDto, EggDetailDto, EggType, WaterDto,
};
pub use submit::{
    load_remote_aviaries, plan_submission, submit_all_collections, CollectionRequest, StepStatus,
    SubmissionPlan, SubmissionStep,
};
