//! File-based storage backend implementation.
//!
//! Stores each document as a JSON file under `<base_path>/<namespace>/<id>`,
//! providing simple persistence without external dependencies. Writes go
//! through a temp file followed by a rename so a document is never observed
//! half-written.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use rxflow_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage implementation.
pub struct FileStorage {
	/// Base directory path for storing documents.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage rooted at the given base path.
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	/// Splits a `namespace:id` key and maps it to a filesystem path.
	///
	/// The id is sanitized so a hostile key cannot escape the base
	/// directory.
	fn file_path(&self, key: &str) -> Result<PathBuf, StorageError> {
		let (namespace, id) = key
			.split_once(':')
			.ok_or_else(|| StorageError::Backend(format!("Malformed storage key: {}", key)))?;
		Ok(self
			.base_path
			.join(sanitize(namespace))
			.join(format!("{}.json", sanitize(id))))
	}

	fn namespace_dir(&self, namespace: &str) -> PathBuf {
		self.base_path.join(sanitize(namespace))
	}
}

/// Replaces path-hostile characters so keys stay within the base directory.
fn sanitize(part: &str) -> String {
	part.replace(['/', '\\', ':', '.'], "_")
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.file_path(key)?;
		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.file_path(key)?;
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		// Write atomically by writing to a temp file then renaming
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
		let path = self.file_path(key)?;
		match fs::remove_file(&path).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.file_path(key)?;
		Ok(fs::try_exists(&path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?)
	}

	async fn list_keys(&self, namespace: &str) -> Result<Vec<String>, StorageError> {
		let dir = self.namespace_dir(namespace);
		let mut entries = match fs::read_dir(&dir).await {
			Ok(entries) => entries,
			// A namespace that was never written to is an empty collection
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		let mut ids = Vec::new();
		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let path = entry.path();
			if path.extension() == Some(std::ffi::OsStr::new("json")) {
				if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
					ids.push(stem.to_string());
				}
			}
		}
		Ok(ids)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(vec![Field::new("storage_path", FieldType::String)], vec![]);
		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: base directory for document files
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.ok_or_else(|| StorageError::Configuration("storage_path is required".into()))?;

	Ok(Box::new(FileStorage::new(Path::new(storage_path).to_path_buf())))
}
