//! Extra (freelance/on-call) worker model
//!
//! Deliberately not a subtype of [`crate::models::Employee`]; extras
//! carry no schedule or uniform data, just availability and a quality
//! rating.

use serde::{Deserialize, Serialize};

/// A freelance worker available for on-demand shifts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraWorker {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    /// Weekday names this worker can be called on.
    #[serde(default)]
    pub available_days: Vec<String>,
    /// 0–10 quality rating assigned by the manager.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub sector_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let w: ExtraWorker = serde_json::from_str(r#"{"id":"9","name":"Rui"}"#).unwrap();
        assert_eq!(w.rating, 0.0);
        assert!(w.available_days.is_empty());
    }
}
