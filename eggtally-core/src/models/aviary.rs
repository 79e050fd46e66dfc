use serde::{Deserialize, Serialize};
use std::fmt;

use super::DEFAULT_TRAY_VALUE;

/// A housing unit inside a batch.
///
/// The id is only unique within the owning batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aviary {
    pub id: String,
    pub name: String,
    /// Eggs represented by one tray
    pub tray_value: u32,
}

impl Aviary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tray_value: DEFAULT_TRAY_VALUE,
        }
    }

    pub fn with_tray_value(mut self, tray_value: u32) -> Self {
        self.tray_value = tray_value;
        self
    }
}

impl fmt::Display for Aviary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} eggs per tray)", self.name, self.tray_value)
    }
}
