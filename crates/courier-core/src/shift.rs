//! Shift and break lifecycle transitions.
//!
//! Shifts move NotStarted -> Active -> Ended; a break may only open while
//! the shift is Active and must close before the shift can end. Durations
//! are derived from the stored timestamps on every query; the only stored
//! accumulator is `total_break_minutes`, updated once per break close.

use crate::{Tracker, TrackerError};
use chrono::{DateTime, Utc};
use courier_types::ShiftPhase;

/// Converts a timestamp interval to fractional minutes, clamped at zero.
fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
	let minutes = (end - start).num_milliseconds() as f64 / 60_000.0;
	minutes.max(0.0)
}

impl Tracker {
	/// Starts a new shift.
	///
	/// Fails while a shift is already active. Starting again after a shift
	/// has ended begins a fresh one: the break timer and accumulator reset,
	/// while order history and the address book are retained (summaries are
	/// scoped by calendar date instead).
	pub fn start_shift(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
		if self.state.shift_phase() == ShiftPhase::Active {
			return Err(TrackerError::IllegalTransition(
				"shift already started".into(),
			));
		}
		self.state.shift_start = Some(now);
		self.state.shift_end = None;
		self.state.break_start = None;
		self.state.total_break_minutes = 0.0;
		tracing::info!(start = %now.to_rfc3339(), "shift started");
		Ok(())
	}

	/// Opens a break within the active shift.
	pub fn start_break(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
		if self.state.shift_phase() != ShiftPhase::Active {
			return Err(TrackerError::IllegalTransition(
				"cannot start a break without an active shift".into(),
			));
		}
		if self.state.on_break() {
			return Err(TrackerError::IllegalTransition(
				"already on a break".into(),
			));
		}
		self.state.break_start = Some(now);
		Ok(())
	}

	/// Closes the open break, folding its elapsed minutes into the
	/// accumulator. Returns the minutes added.
	pub fn end_break(&mut self, now: DateTime<Utc>) -> Result<f64, TrackerError> {
		let Some(start) = self.state.break_start else {
			return Err(TrackerError::IllegalTransition(
				"no break in progress".into(),
			));
		};
		let added = minutes_between(start, now);
		self.state.total_break_minutes += added;
		self.state.break_start = None;
		tracing::debug!(minutes = added, "break closed");
		Ok(added)
	}

	/// Ends the active shift. Any open break must be closed first.
	pub fn end_shift(&mut self, now: DateTime<Utc>) -> Result<(), TrackerError> {
		if self.state.shift_phase() != ShiftPhase::Active {
			return Err(TrackerError::IllegalTransition("no shift started".into()));
		}
		if self.state.on_break() {
			return Err(TrackerError::IllegalTransition(
				"end the break before ending the shift".into(),
			));
		}
		self.state.shift_end = Some(now);
		tracing::info!(end = %now.to_rfc3339(), "shift ended");
		Ok(())
	}

	/// True iff new orders may be accepted: shift active, no open break.
	pub fn can_accept_order(&self) -> bool {
		self.state.shift_phase() == ShiftPhase::Active && !self.state.on_break()
	}

	/// Billable shift minutes as of `now`: elapsed shift time minus
	/// accumulated break time, clamped at zero. Zero when no shift has
	/// been started. An ended shift reports a fixed value regardless of
	/// `now`.
	pub fn shift_minutes(&self, now: DateTime<Utc>) -> f64 {
		let Some(start) = self.state.shift_start else {
			return 0.0;
		};
		let effective_end = self.state.shift_end.unwrap_or(now);
		(minutes_between(start, effective_end) - self.state.total_break_minutes).max(0.0)
	}

	/// Total break minutes as of `now`, including the open break if one is
	/// in progress.
	pub fn break_minutes(&self, now: DateTime<Utc>) -> f64 {
		let mut total = self.state.total_break_minutes;
		if let Some(start) = self.state.break_start {
			total += minutes_between(start, now);
		}
		total
	}
}
