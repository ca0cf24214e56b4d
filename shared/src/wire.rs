//! Wire protocol for the Apps Script sheet endpoint
//!
//! The remote backend is an opaque scripted spreadsheet: GET returns a
//! loosely-typed bulk document per property, POST performs an in-place
//! upsert/delete/append keyed by entity id. Payloads coming back may
//! carry numbers where the dashboard wants strings and JSON-encoded
//! strings where it wants arrays, so the raw shapes here stay untyped
//! and all coercion happens in the client's normalization boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::PropertyId;

/// Envelope returned by GET (and by POST when the script is reachable
/// in a readable mode).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RawPropertyData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SheetEnvelope {
    pub const STATUS_SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status == Self::STATUS_SUCCESS
    }
}

/// One property's dataset exactly as the sheet script emits it.
///
/// Every collection is optional and untyped; absence and malformed
/// content both normalize to empty, never to the previous local value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPropertyData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartments: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budgets: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_history: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppliers: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

/// Data-type tag carried by every POST body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationKind {
    Apartment,
    Budget,
    Employee,
    Extra,
    Sector,
    Inventory,
    InventoryOp,
    Supplier,
    Config,
    Delete,
}

impl MutationKind {
    /// Mutations presumed to affect shared/derived remote state get a
    /// delayed re-fetch after the POST so the UI re-reads what the
    /// script actually wrote.
    pub fn triggers_resync(&self) -> bool {
        matches!(
            self,
            Self::Apartment | Self::Budget | Self::Employee | Self::Sector | Self::Delete
        )
    }
}

/// Target selector for `MutationKind::Delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePayload {
    pub id: String,
    pub target_type: MutationKind,
}

/// An inline file (base64) attached to a mutation; the remote script
/// writes it to durable storage and substitutes a reference link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub data: String,
    pub mime_type: String,
    pub file_name: String,
}

/// POST body: `{ hotel, dataType, ...entityFields, newFiles? }`.
///
/// The entity's own fields are flattened to the top level, matching
/// the in-place upsert the remote script performs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRequest {
    pub hotel: PropertyId,
    pub data_type: MutationKind,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_files: Option<Vec<FileAttachment>>,
}

impl MutationRequest {
    /// Build a request from any serializable entity. Fails if the
    /// entity does not serialize to a JSON object.
    pub fn new<T: Serialize>(
        hotel: PropertyId,
        data_type: MutationKind,
        entity: &T,
    ) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(entity)?;
        let payload = match value {
            Value::Object(map) => map,
            other => {
                return Err(serde::ser::Error::custom(format!(
                    "mutation payload must be an object, got {other}"
                )));
            }
        };
        Ok(Self {
            hotel,
            data_type,
            payload,
            new_files: None,
        })
    }

    /// Attach inline files to the request.
    pub fn with_files(mut self, files: Vec<FileAttachment>) -> Self {
        if !files.is_empty() {
            self.new_files = Some(files);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Supplier;

    #[test]
    fn envelope_status_discriminator() {
        let ok: SheetEnvelope = serde_json::from_str(r#"{"status":"success","data":{}}"#).unwrap();
        assert!(ok.is_success());
        let err: SheetEnvelope =
            serde_json::from_str(r#"{"status":"error","message":"boom"}"#).unwrap();
        assert!(!err.is_success());
        assert_eq!(err.message.as_deref(), Some("boom"));
    }

    #[test]
    fn mutation_kind_wire_tokens() {
        assert_eq!(
            serde_json::to_string(&MutationKind::InventoryOp).unwrap(),
            "\"INVENTORY_OP\""
        );
        assert_eq!(
            serde_json::to_string(&MutationKind::Delete).unwrap(),
            "\"DELETE\""
        );
    }

    #[test]
    fn resync_worthy_kinds() {
        assert!(MutationKind::Employee.triggers_resync());
        assert!(MutationKind::Delete.triggers_resync());
        assert!(!MutationKind::Inventory.triggers_resync());
        assert!(!MutationKind::Config.triggers_resync());
    }

    #[test]
    fn request_flattens_entity_fields() {
        let supplier = Supplier {
            id: "7".into(),
            name: "Acme".into(),
            contact: "555".into(),
            category: "Cleaning".into(),
        };
        let req =
            MutationRequest::new(PropertyId::Village, MutationKind::Supplier, &supplier).unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["hotel"], "VILLAGE");
        assert_eq!(body["dataType"], "SUPPLIER");
        assert_eq!(body["id"], "7");
        assert_eq!(body["name"], "Acme");
        assert!(body.get("newFiles").is_none());
    }

    #[test]
    fn delete_payload_carries_target_type() {
        let req = MutationRequest::new(
            PropertyId::GoldenPark,
            MutationKind::Delete,
            &DeletePayload {
                id: "42".into(),
                target_type: MutationKind::Budget,
            },
        )
        .unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["dataType"], "DELETE");
        assert_eq!(body["targetType"], "BUDGET");
        assert_eq!(body["id"], "42");
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(MutationRequest::new(PropertyId::Village, MutationKind::Config, &42).is_err());
    }
}
