//! Data models
//!
//! Shared between the sync engine and the dashboard front end.
//! All IDs are `String`: the remote sheet stores them as plain cell
//! values and may hand them back as numbers, so normalization
//! re-stringifies them on every fetch.

pub mod apartment;
pub mod budget;
pub mod employee;
pub mod extra;
pub mod integration;
pub mod inventory;
pub mod property;
pub mod sector;
pub mod supplier;

// Re-exports
pub use apartment::*;
pub use budget::*;
pub use employee::*;
pub use extra::*;
pub use integration::*;
pub use inventory::*;
pub use property::*;
pub use sector::*;
pub use supplier::*;
