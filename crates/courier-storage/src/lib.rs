//! Persistence layer for the courier tracker.
//!
//! This module provides abstractions for storing tracker snapshots,
//! supporting different backend implementations: local file storage,
//! in-memory storage, and a remote document store.

use async_trait::async_trait;
use courier_types::{StorageKey, TrackerState};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
	pub mod remote;
}

/// Well-known identity for the single local profile.
pub const LOCAL_IDENTITY: &str = "local";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested snapshot is not found.
	#[error("not found")]
	NotFound,
	/// Error that occurs when the remote store rejects the identity.
	#[error("unauthorized")]
	Unauthorized,
	/// Error that occurs when the backend cannot be reached.
	#[error("storage unavailable: {0}")]
	Unavailable(String),
	/// Error that occurs during serialization/deserialization.
	#[error("serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("backend error: {0}")]
	Backend(String),
	/// Error that occurs when backend configuration is invalid.
	#[error("configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the low-level interface for storage backends.
///
/// This trait must be implemented by any storage backend that wants to
/// hold tracker snapshots. It provides basic key-value operations over
/// raw bytes; serialization lives in [`SnapshotStore`].
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes under the given key, overwriting any prior value.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Deletes the value associated with the given key.
	async fn delete(&self, key: &str) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}

/// Type alias for storage factory functions.
///
/// This is the function signature that all storage implementations must
/// provide to create instances of their storage interface.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage
/// implementations, used by the service to resolve the configured backend.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory, remote};

	vec![
		("file", file::create_storage as StorageFactory),
		("memory", memory::create_storage as StorageFactory),
		("remote", remote::create_storage as StorageFactory),
	]
}

/// High-level snapshot store implementing the tracker persistence contract.
///
/// Wraps a low-level storage backend and provides typed load/save of
/// [`TrackerState`] snapshots keyed by identity. Saves for the same
/// identity are serialized so a slow older write cannot clobber a newer
/// one when round-trip latencies vary; last write wins across processes.
pub struct SnapshotStore {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
	/// Per-identity save locks.
	save_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SnapshotStore {
	/// Creates a new SnapshotStore with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self {
			backend,
			save_locks: Mutex::new(HashMap::new()),
		}
	}

	fn key(identity: &str) -> String {
		format!("{}:{}", StorageKey::Trackers.as_str(), identity)
	}

	/// Loads the snapshot for the given identity.
	///
	/// A missing snapshot yields a default-empty state; every other
	/// failure propagates to the caller.
	pub async fn load(&self, identity: &str) -> Result<TrackerState, StorageError> {
		match self.backend.get_bytes(&Self::key(identity)).await {
			Ok(bytes) => serde_json::from_slice(&bytes)
				.map_err(|e| StorageError::Serialization(e.to_string())),
			Err(StorageError::NotFound) => Ok(TrackerState::default()),
			Err(e) => Err(e),
		}
	}

	/// Saves the snapshot for the given identity, replacing any prior one.
	pub async fn save(&self, identity: &str, state: &TrackerState) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(state).map_err(|e| StorageError::Serialization(e.to_string()))?;

		let lock = {
			let mut locks = self.save_locks.lock().await;
			locks
				.entry(identity.to_string())
				.or_insert_with(|| Arc::new(Mutex::new(())))
				.clone()
		};
		let _guard = lock.lock().await;
		let len = bytes.len();
		self.backend.set_bytes(&Self::key(identity), bytes).await?;
		tracing::debug!(identity, bytes = len, "snapshot saved");
		Ok(())
	}

	/// Removes the snapshot for the given identity.
	pub async fn remove(&self, identity: &str) -> Result<(), StorageError> {
		self.backend.delete(&Self::key(identity)).await
	}

	/// Checks whether a snapshot exists for the given identity.
	pub async fn exists(&self, identity: &str) -> Result<bool, StorageError> {
		self.backend.exists(&Self::key(identity)).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::memory::MemoryStorage;
	use chrono::{TimeZone, Utc};
	use courier_types::Order;
	use rust_decimal::Decimal;
	use uuid::Uuid;

	fn sample_state() -> TrackerState {
		TrackerState {
			orders: vec![Order {
				id: Uuid::new_v4(),
				customer: Some("Ana".into()),
				address: "Rruga A".into(),
				price: Decimal::new(4550, 2),
				notes: None,
				delivered: true,
				date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap().date_naive(),
			}],
			saved_addresses: vec!["Rruga A".into()],
			shift_start: Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()),
			shift_end: None,
			break_start: None,
			total_break_minutes: 7.5,
		}
	}

	#[tokio::test]
	async fn load_of_unknown_identity_yields_empty_state() {
		let store = SnapshotStore::new(Box::new(MemoryStorage::new()));
		let state = store.load("nobody").await.unwrap();
		assert_eq!(state, TrackerState::default());
	}

	#[tokio::test]
	async fn save_then_load_round_trips_field_for_field() {
		let store = SnapshotStore::new(Box::new(MemoryStorage::new()));
		let state = sample_state();

		store.save(LOCAL_IDENTITY, &state).await.unwrap();
		let loaded = store.load(LOCAL_IDENTITY).await.unwrap();
		assert_eq!(loaded, state);
	}

	#[tokio::test]
	async fn identities_do_not_share_snapshots() {
		let store = SnapshotStore::new(Box::new(MemoryStorage::new()));
		store.save("a", &sample_state()).await.unwrap();

		assert!(store.exists("a").await.unwrap());
		assert!(!store.exists("b").await.unwrap());
		assert_eq!(store.load("b").await.unwrap(), TrackerState::default());
	}

	#[tokio::test]
	async fn remove_clears_the_snapshot() {
		let store = SnapshotStore::new(Box::new(MemoryStorage::new()));
		store.save("a", &sample_state()).await.unwrap();
		store.remove("a").await.unwrap();
		assert!(!store.exists("a").await.unwrap());
	}
}
