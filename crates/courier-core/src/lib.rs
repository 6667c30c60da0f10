//! Shift, break, and order state machine for the courier tracker.
//!
//! This module owns the tracker lifecycle rules: when shifts and breaks may
//! open and close, when orders may be accepted, and how derived values like
//! shift minutes and day summaries are computed. It performs no I/O; the
//! caller supplies timestamps and persists the resulting state separately.

use courier_types::TrackerState;
use thiserror::Error;
use uuid::Uuid;

/// Order book operations and summary computation.
pub mod orders;
/// Shift and break lifecycle transitions and duration queries.
pub mod shift;

pub use orders::DaySummary;

/// Errors that can occur during tracker operations.
///
/// Failed operations never mutate state; every error is recoverable by
/// corrective user action.
#[derive(Debug, Error)]
pub enum TrackerError {
	/// Error that occurs when user-supplied order fields are invalid.
	#[error("invalid input: {0}")]
	InvalidInput(String),
	/// Error that occurs when a shift, break, or order operation is
	/// attempted out of order.
	#[error("illegal transition: {0}")]
	IllegalTransition(String),
	/// Error that occurs when an operation references an unknown order.
	#[error("order not found: {0}")]
	NotFound(Uuid),
}

/// The tracker state machine.
///
/// Wraps a [`TrackerState`] snapshot and exposes the operations the
/// presenter drives. All operations take explicit `now` timestamps so the
/// clock stays under the caller's control.
#[derive(Debug, Default)]
pub struct Tracker {
	state: TrackerState,
}

impl Tracker {
	/// Creates a tracker over an existing snapshot.
	pub fn new(state: TrackerState) -> Self {
		Self { state }
	}

	/// Read access to the underlying snapshot.
	pub fn state(&self) -> &TrackerState {
		&self.state
	}

	/// Consumes the tracker and returns the snapshot for persistence.
	pub fn into_state(self) -> TrackerState {
		self.state
	}
}
