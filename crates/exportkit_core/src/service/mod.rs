//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store calls into catalog, item and group APIs.
//! - Translate storage failures into `ExportKitError`.
//!
//! # Invariants
//! - Services hold no state beyond a borrowed `ExportKitContext`.
//! - Service layer remains storage-agnostic (`RecordStore` only).

pub mod catalog;
pub mod group_manager;
pub mod item_service;
