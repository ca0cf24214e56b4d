//! Apartment Model
//!
//! An apartment is created lazily on its first inspection save and
//! identified by `"<floor>-<roomNumber>"`; it is overwritten in place
//! and never deleted through the normal flow. The categorical
//! inspection fields mirror free-text spreadsheet columns, so they
//! stay loosely typed on purpose.

use serde::{Deserialize, Serialize};

/// A reported defect inside an apartment.
///
/// `data` carries an inline base64 photo until the remote script has
/// written it to durable storage and substituted `drive_link`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub drive_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// One bed inside an apartment. Embedded list, not independently
/// addressable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedConfig {
    #[serde(default)]
    pub bed_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mattress_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mattress_color: Option<String>,
    #[serde(default)]
    pub has_skirt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skirt_color: Option<String>,
}

/// Apartment inspection record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    pub id: String,
    #[serde(default)]
    pub floor: u32,
    #[serde(default)]
    pub room_number: u32,
    #[serde(default)]
    pub defects: Vec<Defect>,

    // Floor / bathroom
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathroom_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathroom_condition: Option<String>,

    // Fixtures
    #[serde(default)]
    pub has_safe: bool,
    #[serde(default)]
    pub has_curtain: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curtain_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curtain_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curtain_coverage: Option<String>,
    #[serde(default)]
    pub has_body_mirror: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_mirror_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furniture_condition: Option<String>,
    #[serde(default)]
    pub furniture_notes: Vec<String>,
    #[serde(default)]
    pub beds: Vec<BedConfig>,
    #[serde(default)]
    pub has_door_control: bool,
    #[serde(default)]
    pub has_hangers: bool,
    #[serde(default)]
    pub hanger_quantity: f64,
    #[serde(default)]
    pub has_paper_holder: bool,
    #[serde(default)]
    pub has_shampoo_holder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shampoo_holder_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lamp_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lamp_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv_brand: Option<String>,
}

impl Apartment {
    /// Derive the apartment key from floor + room number. Identity is
    /// never reassigned after creation.
    pub fn key(floor: u32, room_number: u32) -> String {
        format!("{floor}-{room_number}")
    }

    /// A blank record for an apartment that has never been inspected.
    pub fn blank(floor: u32, room_number: u32) -> Self {
        Self {
            id: Self::key(floor, room_number),
            floor,
            room_number,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_floor_dash_room() {
        assert_eq!(Apartment::key(3, 12), "3-12");
        let apt = Apartment::blank(3, 12);
        assert_eq!(apt.id, "3-12");
        assert!(apt.defects.is_empty());
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let json = serde_json::to_string(&Apartment::blank(1, 1)).unwrap();
        assert!(!json.contains("floorType"));
        assert!(!json.contains("tvBrand"));
    }

    #[test]
    fn deserializes_from_sparse_record() {
        let apt: Apartment = serde_json::from_str(
            r#"{"id":"2-7","floor":2,"roomNumber":7,"hasCurtain":true,"curtainCondition":"Worn"}"#,
        )
        .unwrap();
        assert_eq!(apt.room_number, 7);
        assert!(apt.has_curtain);
        assert_eq!(apt.curtain_condition.as_deref(), Some("Worn"));
        assert!(apt.beds.is_empty());
    }
}
