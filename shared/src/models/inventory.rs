//! Inventory Model
//!
//! Stock items plus the append-only operation log. Applying an
//! operation mutates the referenced item's quantity at write time;
//! the log itself is never edited afterwards.

use serde::{Deserialize, Serialize};

use crate::models::Supplier;

/// Trailing window used for consumption statistics.
const CONSUMPTION_WINDOW_DAYS: i64 = 30;
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// A stock item held at one property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub min_quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(default)]
    pub last_update: i64,
}

impl InventoryItem {
    /// Stock at or below the reorder threshold.
    pub fn is_low(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    #[default]
    Inbound,
    Outbound,
}

/// One append-only stock movement record. `item_name` is a
/// denormalized snapshot so history survives item deletion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryOperation {
    pub id: String,
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub item_name: String,
    #[serde(rename = "type", default)]
    pub kind: OperationKind,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Apply a stock operation: adjust the referenced item's quantity,
/// stamp its `last_update`, and prepend the operation to the history.
///
/// An operation referencing an unknown item is a no-op (the history
/// stays untouched too), matching the forgiving write path the
/// dashboard expects.
pub fn apply_operation(
    items: &mut [InventoryItem],
    history: &mut Vec<InventoryOperation>,
    op: InventoryOperation,
    now: i64,
) {
    let Some(item) = items.iter_mut().find(|i| i.id == op.item_id) else {
        tracing::warn!(item_id = %op.item_id, "inventory operation references unknown item");
        return;
    };
    match op.kind {
        OperationKind::Inbound => item.quantity += op.quantity,
        OperationKind::Outbound => item.quantity -= op.quantity,
    }
    item.last_update = now;
    history.insert(0, op);
}

/// Reorder-point suggestion for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderSuggestion {
    /// Mean daily outbound consumption over the trailing 30 days.
    pub mean_daily_consumption: f64,
    /// Delivery cycle length assumed for the item's supplier.
    pub target_days: i64,
    /// Stock level to restore: ceil(mcd * target_days).
    pub target_stock: f64,
    /// Units to order now: max(0, target_stock - current).
    pub suggested_quantity: f64,
    /// Dynamic reorder threshold: ceil(mcd * 7).
    pub dynamic_minimum: f64,
}

/// Suppliers on the long (weekly-marketing) delivery cycle get a
/// 12-day target; everyone else is on the 8-day cycle.
const LONG_CYCLE_SUPPLIER: &str = "v-marketing";
const LONG_CYCLE_DAYS: i64 = 12;
const SHORT_CYCLE_DAYS: i64 = 8;

/// Compute the reorder suggestion for `item` from the trailing 30 days
/// of outbound history.
pub fn reorder_suggestion(
    item: &InventoryItem,
    history: &[InventoryOperation],
    suppliers: &[Supplier],
    now: i64,
) -> ReorderSuggestion {
    let window_start = now - CONSUMPTION_WINDOW_DAYS * DAY_MS;
    let total_out: f64 = history
        .iter()
        .filter(|op| {
            op.item_id == item.id
                && op.kind == OperationKind::Outbound
                && op.timestamp > window_start
        })
        .map(|op| op.quantity)
        .sum();
    let mcd = total_out / CONSUMPTION_WINDOW_DAYS as f64;

    let long_cycle = item
        .supplier_id
        .as_deref()
        .and_then(|sid| suppliers.iter().find(|s| s.id == sid))
        .map(|s| s.name.to_lowercase().contains(LONG_CYCLE_SUPPLIER))
        .unwrap_or(false);
    let target_days = if long_cycle {
        LONG_CYCLE_DAYS
    } else {
        SHORT_CYCLE_DAYS
    };

    let target_stock = (mcd * target_days as f64).ceil();
    ReorderSuggestion {
        mean_daily_consumption: mcd,
        target_days,
        target_stock,
        suggested_quantity: (target_stock - item.quantity).max(0.0),
        dynamic_minimum: (mcd * 7.0).ceil(),
    }
}
