//! The persisted tracker snapshot.
//!
//! `TrackerState` is the unit of persistence: the full shift, break, and
//! order state serialized as one flat JSON document. Storage backends hold
//! a serialized copy of this structure, never a live reference.

use crate::order::Order;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived lifecycle phase of the current shift.
///
/// The phase is computed from the snapshot timestamps rather than stored,
/// so it can never disagree with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftPhase {
	/// No shift has been started.
	NotStarted,
	/// A shift is open and has not been ended.
	Active,
	/// The shift has been ended.
	Ended,
}

/// The aggregate tracker state persisted as one snapshot.
///
/// Wire format uses camelCase field names and RFC 3339 timestamps; missing
/// fields deserialize to their defaults so older snapshots keep loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerState {
	/// All recorded orders, in insertion order.
	pub orders: Vec<Order>,
	/// Previously used delivery addresses, insertion-ordered and
	/// deduplicated case-sensitively. Never pruned.
	pub saved_addresses: Vec<String>,
	/// Start of the current shift, if any.
	pub shift_start: Option<DateTime<Utc>>,
	/// End of the current shift, if it has been ended.
	pub shift_end: Option<DateTime<Utc>>,
	/// Start of the open break, if one is in progress.
	pub break_start: Option<DateTime<Utc>>,
	/// Accumulated break minutes for the current shift. Updated only when
	/// a break closes; the open break is never folded in early.
	pub total_break_minutes: f64,
}

impl TrackerState {
	/// Returns the derived phase of the current shift.
	pub fn shift_phase(&self) -> ShiftPhase {
		match (self.shift_start, self.shift_end) {
			(None, _) => ShiftPhase::NotStarted,
			(Some(_), None) => ShiftPhase::Active,
			(Some(_), Some(_)) => ShiftPhase::Ended,
		}
	}

	/// True if a break is currently open.
	pub fn on_break(&self) -> bool {
		self.break_start.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	#[test]
	fn phase_follows_timestamps() {
		let mut state = TrackerState::default();
		assert_eq!(state.shift_phase(), ShiftPhase::NotStarted);

		state.shift_start = Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap());
		assert_eq!(state.shift_phase(), ShiftPhase::Active);

		state.shift_end = Some(Utc.with_ymd_and_hms(2025, 6, 1, 17, 0, 0).unwrap());
		assert_eq!(state.shift_phase(), ShiftPhase::Ended);
	}

	#[test]
	fn snapshot_uses_camel_case_wire_names() {
		let state = TrackerState {
			total_break_minutes: 12.5,
			..Default::default()
		};
		let json = serde_json::to_value(&state).unwrap();
		assert!(json.get("savedAddresses").is_some());
		assert!(json.get("shiftStart").is_some());
		assert_eq!(json["totalBreakMinutes"], 12.5);
	}

	#[test]
	fn missing_fields_deserialize_to_defaults() {
		let state: TrackerState = serde_json::from_str("{}").unwrap();
		assert_eq!(state, TrackerState::default());
	}
}
