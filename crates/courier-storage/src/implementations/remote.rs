//! Remote document-store backend for tracker snapshots.
//!
//! Talks to an HTTP document endpoint keyed by an externally supplied
//! identity token. Authentication itself is out of scope: the bearer token
//! is an opaque input. Writes are last-write-wins with no versioning or
//! conflict detection.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use reqwest::StatusCode;

/// Remote storage implementation over an HTTP document store.
pub struct RemoteStorage {
	client: reqwest::Client,
	/// Endpoint root, without a trailing slash.
	base_url: String,
	/// Opaque bearer token, if the store requires one.
	auth_token: Option<String>,
}

impl RemoteStorage {
	/// Creates a new RemoteStorage against the given endpoint.
	pub fn new(base_url: String, auth_token: Option<String>) -> Self {
		Self {
			client: reqwest::Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
			auth_token,
		}
	}

	fn url(&self, key: &str) -> String {
		format!("{}/documents/{}", self.base_url, key)
	}

	fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
		match &self.auth_token {
			Some(token) => request.bearer_auth(token),
			None => request,
		}
	}

	/// Maps non-success HTTP statuses onto storage errors.
	fn status_error(status: StatusCode) -> StorageError {
		match status {
			StatusCode::NOT_FOUND => StorageError::NotFound,
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::Unauthorized,
			other => StorageError::Unavailable(format!("document store returned {}", other)),
		}
	}
}

#[async_trait]
impl StorageInterface for RemoteStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let response = self
			.authorize(self.client.get(self.url(key)))
			.send()
			.await
			.map_err(|e| StorageError::Unavailable(e.to_string()))?;

		if !response.status().is_success() {
			return Err(Self::status_error(response.status()));
		}

		let bytes = response
			.bytes()
			.await
			.map_err(|e| StorageError::Unavailable(e.to_string()))?;
		Ok(bytes.to_vec())
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let response = self
			.authorize(self.client.put(self.url(key)))
			.header(reqwest::header::CONTENT_TYPE, "application/json")
			.body(value)
			.send()
			.await
			.map_err(|e| StorageError::Unavailable(e.to_string()))?;

		if !response.status().is_success() {
			return Err(Self::status_error(response.status()));
		}
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let response = self
			.authorize(self.client.delete(self.url(key)))
			.send()
			.await
			.map_err(|e| StorageError::Unavailable(e.to_string()))?;

		// Deleting an absent document is not an error.
		if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
			return Err(Self::status_error(response.status()));
		}
		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		match self.get_bytes(key).await {
			Ok(_) => Ok(true),
			Err(StorageError::NotFound) => Ok(false),
			Err(e) => Err(e),
		}
	}
}

/// Factory function to create a remote storage backend from configuration.
///
/// Configuration parameters:
/// - `base_url`: Root URL of the document store (required)
/// - `auth_token`: Opaque bearer token supplied by the identity provider (optional)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let base_url = config
		.get("base_url")
		.and_then(|v| v.as_str())
		.filter(|v| !v.is_empty())
		.ok_or_else(|| {
			StorageError::Configuration("remote storage requires a base_url".into())
		})?
		.to_string();

	let auth_token = config
		.get("auth_token")
		.and_then(|v| v.as_str())
		.filter(|v| !v.is_empty())
		.map(str::to_string);

	Ok(Box::new(RemoteStorage::new(base_url, auth_token)))
}
