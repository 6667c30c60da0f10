//! Common types module for the courier shift tracker.
//!
//! This module defines the core data types and structures shared across
//! the tracker components. It provides a centralized location for the
//! order model, the persisted snapshot, and storage key definitions.

/// Order model and draft input types.
pub mod order;
/// The persisted tracker snapshot and derived shift phases.
pub mod snapshot;
/// Storage key types for persistent data.
pub mod storage;
/// Utility functions for display formatting.
pub mod utils;

pub use order::{Order, OrderDraft};
pub use snapshot::{ShiftPhase, TrackerState};
pub use storage::StorageKey;
pub use utils::truncate_id;
