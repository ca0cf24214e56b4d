//! Property (hotel) identity and per-property dataset

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    Apartment, Budget, Employee, ExtraWorker, InventoryItem, InventoryOperation, Sector, Supplier,
};

/// The three hotel properties the dashboard manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyId {
    Village,
    GoldenPark,
    ThermalResort,
}

impl PropertyId {
    /// All properties, in the order the startup sequence fetches them.
    pub const ALL: [PropertyId; 3] = [
        PropertyId::Village,
        PropertyId::GoldenPark,
        PropertyId::ThermalResort,
    ];

    /// Wire token, as used in the `hotel` query/body parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Village => "VILLAGE",
            Self::GoldenPark => "GOLDEN_PARK",
            Self::ThermalResort => "THERMAL_RESORT",
        }
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One property's full dataset.
///
/// Apartments are keyed `"<floor>-<roomNumber>"`; every other
/// collection is a flat list addressed by entity ID. A successful
/// fetch replaces the whole record, never merges collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyData {
    #[serde(default)]
    pub apartments: BTreeMap<String, Apartment>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub extras: Vec<ExtraWorker>,
    #[serde(default)]
    pub sectors: Vec<Sector>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub inventory_history: Vec<InventoryOperation>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub config: PropertyConfig,
}

/// Per-property feature toggles, edited through the settings form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyConfig {
    #[serde(default = "default_true")]
    pub show_suppliers_tab: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            show_suppliers_tab: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_id_wire_tokens() {
        assert_eq!(
            serde_json::to_string(&PropertyId::GoldenPark).unwrap(),
            "\"GOLDEN_PARK\""
        );
        let id: PropertyId = serde_json::from_str("\"VILLAGE\"").unwrap();
        assert_eq!(id, PropertyId::Village);
        assert_eq!(id.as_str(), "VILLAGE");
    }

    #[test]
    fn startup_order_begins_with_village() {
        assert_eq!(PropertyId::ALL[0], PropertyId::Village);
    }

    #[test]
    fn empty_dataset_has_suppliers_tab_enabled() {
        let data = PropertyData::default();
        assert!(data.config.show_suppliers_tab);
        assert!(data.apartments.is_empty());
    }
}
