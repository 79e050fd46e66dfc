//! Bulk submission of local tallies as backend records.

use super::client::CollectionApi;
use super::error::{ApiError, SubmitError};
use super::protocol::{CollectChickenDto, CollectEggDataDto, EggDetailDto, EggType, WaterDto};
use crate::models::{CategoryKind, EggTypeCounter};
use crate::state::{Change, StateStore};
use crate::storage::KeyValueStore;

/// One backend record to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionRequest {
    Egg(CollectEggDataDto),
    Chicken(CollectChickenDto),
    Water(WaterDto),
}

impl CollectionRequest {
    /// Endpoint the request is posted to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            CollectionRequest::Egg(_) => "/api/collect-egg",
            CollectionRequest::Chicken(_) => "/api/collect-chicken",
            CollectionRequest::Water(_) => "/api/water",
        }
    }

    async fn send<A: CollectionApi>(&self, api: &A) -> Result<(), ApiError> {
        match self {
            CollectionRequest::Egg(dto) => api.create_egg_collection(dto).await.map(|_| ()),
            CollectionRequest::Chicken(dto) => {
                api.create_chicken_collection(dto).await.map(|_| ())
            }
            CollectionRequest::Water(dto) => api.create_water(dto).await.map(|_| ()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Submitted,
    Failed(String),
}

/// A category's record and how far it got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionStep {
    pub category_id: String,
    pub category_name: String,
    pub request: CollectionRequest,
    pub status: StepStatus,
}

/// Ordered steps of one bulk submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub aviary_id: i64,
    pub steps: Vec<SubmissionStep>,
    /// Categories with an entry but no backend type
    pub skipped: Vec<String>,
}

impl SubmissionPlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn submitted(&self) -> impl Iterator<Item = &SubmissionStep> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Submitted)
    }

    /// Steps that failed or never ran.
    pub fn outstanding(&self) -> impl Iterator<Item = &SubmissionStep> {
        self.steps
            .iter()
            .filter(|s| s.status != StepStatus::Submitted)
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding().next().is_none()
    }
}

/// Builds one step per category that has an entry, in catalog order.
pub fn plan_submission(eggs: &[EggTypeCounter], aviary_id: i64) -> SubmissionPlan {
    let mut plan = SubmissionPlan {
        aviary_id,
        ..Default::default()
    };

    for egg in eggs.iter().filter(|e| e.has_entry()) {
        let request = match egg.kind() {
            CategoryKind::MaleMortality => CollectionRequest::Chicken(CollectChickenDto {
                id: None,
                aviary_id,
                dead_roosters: egg.units,
                dead_chickens: 0,
                observation: String::new(),
                collection_date: None,
            }),
            CategoryKind::FemaleMortality => CollectionRequest::Chicken(CollectChickenDto {
                id: None,
                aviary_id,
                dead_roosters: 0,
                dead_chickens: egg.units,
                observation: String::new(),
                collection_date: None,
            }),
            CategoryKind::Water => CollectionRequest::Water(WaterDto {
                id: None,
                aviary_id,
                volume: egg.units,
                collection_date: None,
            }),
            CategoryKind::Egg => match EggType::for_category(&egg.id) {
                Some(egg_type) => CollectionRequest::Egg(CollectEggDataDto {
                    id: None,
                    aviary_id,
                    egg_detail: vec![EggDetailDto {
                        egg_type,
                        quantity: egg.count,
                    }],
                    collection_date: None,
                }),
                None => {
                    tracing::debug!("No backend type for category {}, skipping", egg.id);
                    plan.skipped.push(egg.id.clone());
                    continue;
                }
            },
        };

        plan.steps.push(SubmissionStep {
            category_id: egg.id.clone(),
            category_name: egg.name.clone(),
            request,
            status: StepStatus::Pending,
        });
    }

    plan
}

/// Submits every non-empty tally for the selected aviary.
///
/// Requests go out one at a time in catalog order. Each success clears that
/// category's counter; the first failure stops the run and is returned with
/// the step report. Nothing already submitted is rolled back, so running
/// again only resends the failed and unattempted categories. When every step
/// succeeds all counters are cleared.
pub async fn submit_all_collections<S, A>(
    store: &mut StateStore<S>,
    api: &A,
) -> Result<SubmissionPlan, SubmitError>
where
    S: KeyValueStore,
    A: CollectionApi,
{
    let aviary = store
        .selected_aviary()
        .ok_or(SubmitError::NoAviarySelected)?;
    let aviary_id: i64 = aviary
        .id
        .parse()
        .map_err(|_| SubmitError::InvalidAviaryId(aviary.id.clone()))?;

    let mut plan = plan_submission(store.eggs(), aviary_id);
    tracing::info!(
        "Submitting {} collections for aviary {}",
        plan.steps.len(),
        aviary_id
    );

    for index in 0..plan.steps.len() {
        let result = plan.steps[index].request.send(api).await;
        let step = &mut plan.steps[index];

        match result {
            Ok(()) => {
                step.status = StepStatus::Submitted;
                tracing::info!("Submitted {} to {}", step.category_name, step.request.endpoint());
                if let Err(e) = store.clear_egg_count(&step.category_id) {
                    tracing::warn!("Submitted category could not be cleared: {}", e);
                }
            }
            Err(e) => {
                step.status = StepStatus::Failed(e.to_string());
                let category = step.category_name.clone();
                tracing::warn!("Submission stopped at {}: {}", category, e);
                return Err(SubmitError::Request {
                    category,
                    source: e,
                    report: plan,
                });
            }
        }
    }

    store.clear_all_egg_counts();
    Ok(plan)
}

/// Fetches backend aviaries and merges them into local batches.
pub async fn load_remote_aviaries<S, A>(
    store: &mut StateStore<S>,
    api: &A,
) -> Result<Change, ApiError>
where
    S: KeyValueStore,
    A: CollectionApi,
{
    let remote = api.list_aviaries().await?;
    Ok(store.import_remote_aviaries(&remote))
}
