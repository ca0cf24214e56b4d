//! Sector Model
//!
//! A sector defines the standard uniform checklist its employees are
//! measured against.

use serde::{Deserialize, Serialize};

use crate::models::{Employee, UniformItem};

/// An operational sector (reception, housekeeping, linen room, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub standard_uniform: Vec<UniformItem>,
}

/// A uniform piece an employee is short of.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformShortfall {
    pub name: String,
    pub required: f64,
    pub held: f64,
    pub missing: f64,
}

/// Compare an employee's held uniforms against the sector checklist.
///
/// Piece names match case-insensitively after trimming. Only pieces
/// with a positive shortfall are reported; surplus pieces and pieces
/// the sector does not require are ignored.
pub fn uniform_discrepancy(employee: &Employee, sector: &Sector) -> Vec<UniformShortfall> {
    sector
        .standard_uniform
        .iter()
        .filter_map(|std| {
            let held = employee
                .uniforms
                .iter()
                .find(|u| u.name.trim().eq_ignore_ascii_case(std.name.trim()))
                .map(|u| u.quantity)
                .unwrap_or(0.0);
            let missing = (std.quantity - held).max(0.0);
            (missing > 0.0).then(|| UniformShortfall {
                name: std.name.clone(),
                required: std.quantity,
                held,
                missing,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(pieces: &[(&str, f64)]) -> Sector {
        Sector {
            id: "12".into(),
            name: "Housekeeping".into(),
            standard_uniform: pieces
                .iter()
                .map(|(n, q)| UniformItem {
                    name: (*n).into(),
                    quantity: *q,
                })
                .collect(),
        }
    }

    fn employee(pieces: &[(&str, f64)]) -> Employee {
        Employee {
            id: "5".into(),
            sector_id: "12".into(),
            uniforms: pieces
                .iter()
                .map(|(n, q)| UniformItem {
                    name: (*n).into(),
                    quantity: *q,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn reports_exact_shortfall_and_nothing_else() {
        let sec = sector(&[("Shirt", 2.0)]);
        let emp = employee(&[("Shirt", 1.0)]);
        let diff = uniform_discrepancy(&emp, &sec);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].name, "Shirt");
        assert_eq!(diff[0].missing, 1.0);
        assert_eq!(diff[0].held, 1.0);
    }

    #[test]
    fn fully_equipped_employee_has_no_discrepancy() {
        let sec = sector(&[("Shirt", 2.0), ("Trousers", 2.0)]);
        let emp = employee(&[("shirt ", 2.0), ("Trousers", 3.0)]);
        assert!(uniform_discrepancy(&emp, &sec).is_empty());
    }

    #[test]
    fn missing_piece_counts_full_requirement() {
        let sec = sector(&[("Apron", 3.0)]);
        let emp = employee(&[]);
        let diff = uniform_discrepancy(&emp, &sec);
        assert_eq!(diff[0].missing, 3.0);
        assert_eq!(diff[0].held, 0.0);
    }
}
