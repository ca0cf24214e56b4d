//! Budget Model
//!
//! A budget groups service items; each item carries a material list
//! priced by up to three supplier quotes plus a labor cost. Status
//! transitions are unconstrained.

use serde::{Deserialize, Serialize};

/// Budget approval status. Any status is reachable from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BudgetStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// One supplier quote for a material. A value of `0.0` means the
/// supplier has not submitted a quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialQuote {
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub value: f64,
}

/// A material line inside a budget item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
    /// Up to three supplier quotes.
    #[serde(default)]
    pub quotes: Vec<MaterialQuote>,
}

impl MaterialItem {
    /// Lowest submitted quote, ignoring zero/absent quotes. Returns
    /// `0.0` when no supplier has quoted yet.
    pub fn best_price(&self) -> f64 {
        self.quotes
            .iter()
            .map(|q| q.value)
            .filter(|v| *v > 0.0)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Best price times quantity.
    pub fn total(&self) -> f64 {
        self.best_price() * self.quantity
    }
}

/// One service line inside a budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub materials: Vec<MaterialItem>,
    #[serde(default)]
    pub labor_cost: f64,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<String>,
}

impl BudgetItem {
    /// Materials at best price plus labor.
    pub fn subtotal(&self) -> f64 {
        let materials: f64 = self.materials.iter().map(MaterialItem::total).sum();
        materials + self.labor_cost
    }
}

/// A maintenance/purchase budget for one property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
    #[serde(default)]
    pub status: BudgetStatus,
    #[serde(default)]
    pub created_at: i64,
}

impl Budget {
    /// Sum of all item subtotals.
    pub fn total(&self) -> f64 {
        self.items.iter().map(BudgetItem::subtotal).sum()
    }
}
