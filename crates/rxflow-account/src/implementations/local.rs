//! Config-seeded account directory implementation.
//!
//! Accounts are declared directly in the service configuration, one table
//! per account with its API key. Suitable for single-deployment installs
//! and tests; a directory backed by an external identity provider would be
//! a drop-in replacement behind the same trait.

use crate::{AccountError, AccountInterface};
use async_trait::async_trait;
use rxflow_types::{AccountType, Actor, ConfigSchema, Field, FieldType, Schema, ValidationError};
use std::collections::HashMap;

/// Account directory built from `[[account.implementations.local.accounts]]`
/// entries.
pub struct LocalDirectory {
	/// Actors indexed by API key.
	by_key: HashMap<String, Actor>,
	/// Actors indexed by account id.
	by_id: HashMap<String, Actor>,
}

impl LocalDirectory {
	/// Builds the directory from parsed account entries.
	pub fn new(entries: Vec<(String, Actor)>) -> Self {
		let mut by_key = HashMap::new();
		let mut by_id = HashMap::new();
		for (api_key, actor) in entries {
			by_id.insert(actor.account_id.clone(), actor.clone());
			by_key.insert(api_key, actor);
		}
		Self { by_key, by_id }
	}
}

#[async_trait]
impl AccountInterface for LocalDirectory {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LocalDirectorySchema)
	}

	async fn authenticate(&self, api_key: &str) -> Result<Actor, AccountError> {
		self.by_key
			.get(api_key)
			.cloned()
			.ok_or(AccountError::UnknownKey)
	}

	async fn lookup(&self, account_id: &str) -> Result<Actor, AccountError> {
		self.by_id
			.get(account_id)
			.cloned()
			.ok_or_else(|| AccountError::UnknownAccount(account_id.to_string()))
	}
}

/// Configuration schema for the local account directory.
pub struct LocalDirectorySchema;

impl ConfigSchema for LocalDirectorySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let account_schema = Schema::new(
			vec![
				Field::new("id", FieldType::String),
				Field::new("api_key", FieldType::String),
				Field::new("account_type", FieldType::String).with_validator(|v| {
					let s = v.as_str().unwrap_or_default();
					s.parse::<AccountType>()
						.map(|_| ())
						.map_err(|_| format!("unknown account type '{}'", s))
				}),
			],
			vec![Field::new("display_name", FieldType::String)],
		);
		let schema = Schema::new(
			vec![Field::new(
				"accounts",
				FieldType::Array(Box::new(FieldType::Table(account_schema))),
			)],
			vec![],
		);
		schema.validate(config)
	}
}

/// Factory function to create a local directory from configuration.
///
/// Configuration parameters:
/// - `accounts`: array of `{ id, api_key, account_type, display_name? }`
pub fn create_directory(
	config: &toml::Value,
) -> Result<Box<dyn AccountInterface>, AccountError> {
	let accounts = config
		.get("accounts")
		.and_then(|v| v.as_array())
		.ok_or_else(|| AccountError::Implementation("accounts array is required".into()))?;

	let mut entries = Vec::with_capacity(accounts.len());
	for entry in accounts {
		let get_str = |field: &str| {
			entry
				.get(field)
				.and_then(|v| v.as_str())
				.map(str::to_string)
				.ok_or_else(|| {
					AccountError::Implementation(format!("account entry missing '{}'", field))
				})
		};

		let id = get_str("id")?;
		let api_key = get_str("api_key")?;
		let account_type: AccountType = get_str("account_type")?
			.parse()
			.map_err(|_| AccountError::Implementation("unknown account_type".into()))?;
		let display_name = entry
			.get("display_name")
			.and_then(|v| v.as_str())
			.unwrap_or(&id)
			.to_string();

		entries.push((api_key, Actor::new(id, account_type, display_name)));
	}

	Ok(Box::new(LocalDirectory::new(entries)))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn directory() -> Box<dyn AccountInterface> {
		let config: toml::Value = toml::from_str(
			r#"
[[accounts]]
id = "D1"
api_key = "key-d1"
account_type = "DISTRIBUTOR"
display_name = "Medline South"

[[accounts]]
id = "R1"
api_key = "key-r1"
account_type = "RETAILER"
"#,
		)
		.unwrap();
		create_directory(&config).unwrap()
	}

	#[tokio::test]
	async fn authenticates_known_key() {
		let dir = directory();
		let actor = dir.authenticate("key-d1").await.unwrap();
		assert_eq!(actor.account_id, "D1");
		assert_eq!(actor.account_type, AccountType::Distributor);
		assert_eq!(actor.display_name, "Medline South");
	}

	#[tokio::test]
	async fn rejects_unknown_key() {
		let dir = directory();
		assert!(matches!(
			dir.authenticate("nope").await,
			Err(AccountError::UnknownKey)
		));
	}

	#[tokio::test]
	async fn lookup_by_id_defaults_display_name() {
		let dir = directory();
		let actor = dir.lookup("R1").await.unwrap();
		assert_eq!(actor.display_name, "R1");
		assert!(matches!(
			dir.lookup("R9").await,
			Err(AccountError::UnknownAccount(_))
		));
	}

	#[test]
	fn schema_rejects_bad_account_type() {
		let config: toml::Value = toml::from_str(
			r#"
[[accounts]]
id = "X"
api_key = "k"
account_type = "WIZARD"
"#,
		)
		.unwrap();
		let schema = LocalDirectorySchema;
		assert!(ConfigSchema::validate(&schema, &config).is_err());
	}
}
