//! Order types for the courier shift tracker.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single delivery order recorded during a shift.
///
/// Orders are append-only apart from the `delivered` flag; all other
/// fields are fixed at creation time. The `date` field scopes the order
/// to the calendar day it was taken on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier assigned at creation.
	pub id: Uuid,
	/// Optional customer name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub customer: Option<String>,
	/// Delivery address. Always non-empty.
	pub address: String,
	/// Price of the delivery. Always positive.
	pub price: Decimal,
	/// Optional free-form notes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Whether the order has been delivered.
	#[serde(default)]
	pub delivered: bool,
	/// Calendar day the order was created on (YYYY-MM-DD on the wire).
	pub date: NaiveDate,
}

/// User-supplied fields for a new order, before validation.
///
/// The tracker validates the draft and fills in the generated fields
/// (id, delivered flag, creation date) when accepting it.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
	/// Optional customer name.
	pub customer: Option<String>,
	/// Delivery address as entered.
	pub address: String,
	/// Price as entered.
	pub price: Decimal,
	/// Optional free-form notes.
	pub notes: Option<String>,
}
