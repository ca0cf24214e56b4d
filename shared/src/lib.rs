//! Shared types for the hotel operations dashboard
//!
//! Domain models, wire-protocol types and the pure arithmetic used by
//! the sync engine and any front end built on top of it. No I/O lives
//! here.

pub mod models;
pub mod util;
pub mod wire;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::*;
pub use wire::{
    DeletePayload, FileAttachment, MutationKind, MutationRequest, RawPropertyData, SheetEnvelope,
};
