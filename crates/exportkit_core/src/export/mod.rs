//! Export pipeline: strategies, payloads and the coordinator.
//!
//! # Responsibility
//! - Turn exportable entries into one shareable payload.
//!
//! # Invariants
//! - The strategy is the only component that interprets entry contents.

pub mod coordinator;
pub mod payload;
pub mod strategy;
