use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::aviary::Aviary;

/// A production cycle grouping one or more aviaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub aviaries: Vec<Aviary>,
}

impl Batch {
    /// Creates an inactive batch with a timestamp-derived id and one default aviary.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            name: name.into(),
            active: false,
            aviaries: vec![Aviary::new("1", "Aviário 1")],
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_aviaries(mut self, aviaries: Vec<Aviary>) -> Self {
        self.aviaries = aviaries;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn aviary(&self, aviary_id: &str) -> Option<&Aviary> {
        self.aviaries.iter().find(|a| a.id == aviary_id)
    }

    pub fn has_aviary(&self, aviary_id: &str) -> bool {
        self.aviary(aviary_id).is_some()
    }

    /// Next free numeric aviary id within this batch.
    pub fn next_aviary_id(&self) -> String {
        let max = self
            .aviaries
            .iter()
            .filter_map(|a| a.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.active {
            write!(f, " [active]")?;
        }
        write!(f, " - {} aviaries", self.aviaries.len())
    }
}
