//! Request and response bodies of the collection API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend egg classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EggType {
    Clean,
    Cracked,
    Broken,
    NestDirty,
    Small,
    DoubleYolk,
    ThinShell,
}

impl EggType {
    /// Backend type for a local egg category id, if it has one.
    ///
    /// Ids 7 ("Ovos Quebrados") and 10 ("Eliminados") both land on `Broken`.
    pub fn for_category(id: &str) -> Option<Self> {
        match id {
            "3" => Some(EggType::Cracked),
            "4" => Some(EggType::NestDirty),
            "5" => Some(EggType::Small),
            "6" => Some(EggType::Clean),
            "7" => Some(EggType::Broken),
            "8" => Some(EggType::DoubleYolk),
            "9" => Some(EggType::ThinShell),
            "10" => Some(EggType::Broken),
            _ => None,
        }
    }
}

impl fmt::Display for EggType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EggType::Clean => "CLEAN",
            EggType::Cracked => "CRACKED",
            EggType::Broken => "BROKEN",
            EggType::NestDirty => "NEST_DIRTY",
            EggType::Small => "SMALL",
            EggType::DoubleYolk => "DOUBLE_YOLK",
            EggType::ThinShell => "THIN_SHELL",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AviaryDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub initial_amount_of_roosters: i64,
    #[serde(default)]
    pub initial_amount_of_chickens: i64,
    #[serde(default)]
    pub current_amount_of_rooster: i64,
    #[serde(default)]
    pub current_amount_of_chickens: i64,
    pub batch_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggDetailDto {
    #[serde(rename = "type")]
    pub egg_type: EggType,
    pub quantity: u32,
}

/// One egg collection, possibly with several detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectEggDataDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub aviary_id: i64,
    #[serde(default)]
    pub egg_detail: Vec<EggDetailDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_date: Option<String>,
}

/// Mortality record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectChickenDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub aviary_id: i64,
    pub dead_roosters: u32,
    pub dead_chickens: u32,
    #[serde(default)]
    pub observation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_date: Option<String>,
}

/// Water usage record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub aviary_id: i64,
    pub volume: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_mapping() {
        let cases = [
            ("1", None),
            ("2", None),
            ("3", Some(EggType::Cracked)),
            ("4", Some(EggType::NestDirty)),
            ("5", Some(EggType::Small)),
            ("6", Some(EggType::Clean)),
            ("7", Some(EggType::Broken)),
            ("8", Some(EggType::DoubleYolk)),
            ("9", Some(EggType::ThinShell)),
            ("10", Some(EggType::Broken)),
            ("11", None),
            ("12", None),
        ];

        for (id, expected) in cases {
            assert_eq!(EggType::for_category(id), expected, "category {}", id);
        }
    }

    #[test]
    fn test_egg_type_wire_names() {
        let all = [
            EggType::Clean,
            EggType::Cracked,
            EggType::Broken,
            EggType::NestDirty,
            EggType::Small,
            EggType::DoubleYolk,
            EggType::ThinShell,
        ];
        for egg_type in all {
            let json = serde_json::to_value(egg_type).unwrap();
            assert_eq!(json, json!(egg_type.to_string()));
        }
        assert_eq!(
            serde_json::to_value(EggType::NestDirty).unwrap(),
            json!("NEST_DIRTY")
        );
    }

    #[test]
    fn test_collect_egg_body() {
        let dto = CollectEggDataDto {
            id: None,
            aviary_id: 1,
            egg_detail: vec![EggDetailDto {
                egg_type: EggType::Cracked,
                quantity: 65,
            }],
            collection_date: None,
        };
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({ "aviaryId": 1, "eggDetail": [{ "type": "CRACKED", "quantity": 65 }] })
        );
    }

    #[test]
    fn test_aviary_dto_parse() {
        let dto: AviaryDto = serde_json::from_value(json!({
            "id": 4,
            "name": "Galpão 4",
            "initialAmountOfRoosters": 100,
            "initialAmountOfChickens": 900,
            "currentAmountOfRooster": 98,
            "currentAmountOfChickens": 880,
            "batchId": 2
        }))
        .unwrap();
        assert_eq!(dto.id, 4);
        assert_eq!(dto.current_amount_of_rooster, 98);
        assert_eq!(dto.batch_id, 2);
    }

    #[test]
    fn test_chicken_response_with_server_fields() {
        let dto: CollectChickenDto = serde_json::from_value(json!({
            "id": 12,
            "aviaryId": 1,
            "deadRoosters": 3,
            "deadChickens": 0,
            "observation": "",
            "collectionDate": "2026-10-17"
        }))
        .unwrap();
        assert_eq!(dto.id, Some(12));
        assert_eq!(dto.collection_date.as_deref(), Some("2026-10-17"));
    }
}
