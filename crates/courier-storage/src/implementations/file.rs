//! File-based storage backend for tracker snapshots.
//!
//! Stores each key as one JSON file under a configurable base directory,
//! providing simple persistence without external dependencies. This is the
//! local single-profile variant of the persistence contract.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// File-based storage implementation.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage instance with the specified base path.
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	/// Converts a storage key to a filesystem-safe file path.
	///
	/// Sanitizes the key by replacing separator characters and appending
	/// a .json extension.
	fn get_file_path(&self, key: &str) -> PathBuf {
		let safe_key = key.replace(['/', ':'], "_");
		self.base_path.join(format!("{}.json", safe_key))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);

		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		// Write atomically by writing to temp file then renaming
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.get_file_path(key);
		Ok(path.exists())
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for snapshot files (default: "./data/trackers")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or("./data/trackers")
		.to_string();

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path))))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{SnapshotStore, LOCAL_IDENTITY};
	use courier_types::TrackerState;

	#[tokio::test]
	async fn missing_file_maps_to_not_found() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		let result = storage.get_bytes("trackers:local").await;
		assert!(matches!(result, Err(StorageError::NotFound)));
	}

	#[tokio::test]
	async fn set_get_delete_cycle() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		storage
			.set_bytes("trackers:local", b"{}".to_vec())
			.await
			.unwrap();
		assert!(storage.exists("trackers:local").await.unwrap());
		assert_eq!(storage.get_bytes("trackers:local").await.unwrap(), b"{}");

		storage.delete("trackers:local").await.unwrap();
		assert!(!storage.exists("trackers:local").await.unwrap());
		// Deleting again stays quiet.
		storage.delete("trackers:local").await.unwrap();
	}

	#[tokio::test]
	async fn keys_are_sanitized_into_single_files() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		storage
			.set_bytes("trackers:some/identity", b"x".to_vec())
			.await
			.unwrap();
		assert!(dir.path().join("trackers_some_identity.json").exists());
	}

	#[tokio::test]
	async fn snapshot_round_trips_through_disk() {
		let dir = tempfile::tempdir().unwrap();
		let store = SnapshotStore::new(Box::new(FileStorage::new(dir.path().to_path_buf())));

		let state = TrackerState {
			saved_addresses: vec!["Rruga A".into(), "Sheshi C".into()],
			total_break_minutes: 3.25,
			..Default::default()
		};
		store.save(LOCAL_IDENTITY, &state).await.unwrap();
		assert_eq!(store.load(LOCAL_IDENTITY).await.unwrap(), state);
	}
}
