//! Order book operations: accepting, updating, and summarizing orders.
//!
//! Orders may only be accepted while the shift is active and no break is
//! open. Every accepted address is remembered in the snapshot's address
//! book for later recall. Summaries are scoped by calendar date, so order
//! history survives across shifts.

use crate::{Tracker, TrackerError};
use chrono::{DateTime, NaiveDate, Utc};
use courier_types::{Order, OrderDraft};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Earnings and delivery counts for a single calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DaySummary {
	/// Sum of prices over delivered orders.
	pub total_earned: Decimal,
	/// Number of delivered orders.
	pub delivered_count: usize,
	/// Number of orders not yet delivered.
	pub pending_count: usize,
}

/// Trims an optional text field, dropping it entirely when blank.
fn clean_optional(value: Option<String>) -> Option<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

impl Tracker {
	/// Validates a draft and records it as a new order.
	///
	/// Validation runs before the transition gate; neither failure mutates
	/// state. On success the trimmed address is registered in the address
	/// book (case-sensitive exact-match dedup) and the created order is
	/// returned.
	pub fn add_order(
		&mut self,
		draft: OrderDraft,
		now: DateTime<Utc>,
	) -> Result<Order, TrackerError> {
		let address = draft.address.trim();
		if address.is_empty() {
			return Err(TrackerError::InvalidInput(
				"address must not be empty".into(),
			));
		}
		if draft.price <= Decimal::ZERO {
			return Err(TrackerError::InvalidInput(format!(
				"price must be positive, got {}",
				draft.price
			)));
		}
		if !self.can_accept_order() {
			return Err(TrackerError::IllegalTransition(
				"orders can only be added during an active shift, outside breaks".into(),
			));
		}

		let address = address.to_string();
		if !self.state.saved_addresses.iter().any(|a| a == &address) {
			self.state.saved_addresses.push(address.clone());
		}

		let order = Order {
			id: Uuid::new_v4(),
			customer: clean_optional(draft.customer),
			address,
			price: draft.price,
			notes: clean_optional(draft.notes),
			delivered: false,
			date: now.date_naive(),
		};
		self.state.orders.push(order.clone());
		tracing::debug!(order_id = %order.id, address = %order.address, "order added");
		Ok(order)
	}

	/// Flips the delivered flag on the matching order and returns the new
	/// value.
	pub fn toggle_delivered(&mut self, id: Uuid) -> Result<bool, TrackerError> {
		let order = self
			.state
			.orders
			.iter_mut()
			.find(|o| o.id == id)
			.ok_or(TrackerError::NotFound(id))?;
		order.delivered = !order.delivered;
		Ok(order.delivered)
	}

	/// Removes the matching order and returns it. Any confirmation prompt
	/// is the presenter's concern.
	pub fn delete_order(&mut self, id: Uuid) -> Result<Order, TrackerError> {
		let index = self
			.state
			.orders
			.iter()
			.position(|o| o.id == id)
			.ok_or(TrackerError::NotFound(id))?;
		Ok(self.state.orders.remove(index))
	}

	/// Earnings and counts for the given calendar day.
	pub fn summary(&self, for_date: NaiveDate) -> DaySummary {
		let mut summary = DaySummary::default();
		for order in self.state.orders.iter().filter(|o| o.date == for_date) {
			if order.delivered {
				summary.delivered_count += 1;
				summary.total_earned += order.price;
			} else {
				summary.pending_count += 1;
			}
		}
		summary
	}

	/// Saved addresses whose stored form starts with `prefix`, compared
	/// case-insensitively, in insertion order. An empty prefix yields
	/// nothing.
	pub fn suggest<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> {
		let needle = prefix.trim().to_lowercase();
		self.state
			.saved_addresses
			.iter()
			.filter(move |addr| !needle.is_empty() && addr.to_lowercase().starts_with(&needle))
			.map(String::as_str)
	}

	/// Orders created on the given calendar day, in insertion order.
	pub fn orders_on(&self, date: NaiveDate) -> impl Iterator<Item = &Order> {
		self.state.orders.iter().filter(move |o| o.date == date)
	}
}
