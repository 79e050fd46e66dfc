use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the operator prefers to enter counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionMode {
    #[default]
    Trays,
    Units,
}

impl fmt::Display for CollectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionMode::Trays => write!(f, "trays"),
            CollectionMode::Units => write!(f, "units"),
        }
    }
}

impl FromStr for CollectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trays" => Ok(CollectionMode::Trays),
            "units" => Ok(CollectionMode::Units),
            _ => Err(format!(
                "Invalid collection mode '{}'. Valid options: trays, units",
                s
            )),
        }
    }
}

/// Snapshot stored under the `eggSettings` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub collection_mode: CollectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_batch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_aviary_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_mode_from_str() {
        assert_eq!(
            CollectionMode::from_str("TRAYS").unwrap(),
            CollectionMode::Trays
        );
        assert_eq!(
            CollectionMode::from_str("units").unwrap(),
            CollectionMode::Units
        );
        assert!(CollectionMode::from_str("boxes").is_err());
    }

    #[test]
    fn test_settings_parse_partial() {
        let settings: Settings = serde_json::from_str(r#"{"collectionMode":"units"}"#).unwrap();
        assert_eq!(settings.collection_mode, CollectionMode::Units);
        assert!(settings.selected_batch_id.is_none());
        assert!(settings.selected_aviary_id.is_none());
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings {
            collection_mode: CollectionMode::Trays,
            selected_batch_id: Some("1".to_string()),
            selected_aviary_id: Some("2".to_string()),
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(
            json,
            r#"{"collectionMode":"trays","selectedBatchId":"1","selectedAviaryId":"2"}"#
        );
    }
}
