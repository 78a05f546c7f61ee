//! Access to the host configuration mapping

use crate::error::{SettingsError, SettingsResult};
use parking_lot::RwLock;
use serde_json::{Map, Value};

/// Source of the host application's configuration mapping
///
/// Factories receive one of these in place of a dependency-injection
/// container and only ever ask it for `config`.
pub trait ConfigContainer: Send + Sync {
	/// The full configuration mapping
	fn config(&self) -> SettingsResult<Value>;

	/// The configuration mapping, or an empty one
	///
	/// Lookup failures and non-mapping values are treated as an empty
	/// configuration.
	fn config_or_empty(&self) -> Value {
		match self.config() {
			Ok(value @ Value::Object(_)) => value,
			Ok(other) => {
				tracing::debug!(kind = ?other, "Configuration is not a mapping, using empty");
				Value::Object(Map::new())
			}
			Err(e) => {
				tracing::debug!(error = %e, "Configuration unavailable, using empty");
				Value::Object(Map::new())
			}
		}
	}
}

/// A container holding a configuration value in memory
#[derive(Debug, Default)]
pub struct InMemoryContainer {
	config: RwLock<Option<Value>>,
}

impl InMemoryContainer {
	/// Create a container with the given configuration
	pub fn new(config: Value) -> Self {
		Self {
			config: RwLock::new(Some(config)),
		}
	}

	/// Create a container without configuration; lookups fail
	pub fn empty() -> Self {
		Self::default()
	}

	/// Replace the configuration
	pub fn set_config(&self, config: Value) {
		*self.config.write() = Some(config);
	}
}

impl ConfigContainer for InMemoryContainer {
	fn config(&self) -> SettingsResult<Value> {
		self.config
			.read()
			.clone()
			.ok_or_else(|| SettingsError::Unavailable("no 'config' entry".to_string()))
	}
}
