//! Configuration dump collector

use super::DataCollector;
use crate::error::ToolbarResult;
use serde_json::{Map, Value, json};
use std::any::Any;
use std::sync::Arc;

/// Shows a configuration mapping, one entry per top-level key
///
/// Scalar values are shown as-is; nested values are pretty-printed JSON.
pub struct ConfigCollector {
	name: String,
	config: Value,
}

impl ConfigCollector {
	/// Create a collector named `config`
	pub fn new(config: Value) -> Self {
		Self::with_name(config, "config")
	}

	/// Create a collector under a custom name
	pub fn with_name(config: Value, name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			config,
		}
	}
}

impl DataCollector for ConfigCollector {
	fn name(&self) -> &str {
		&self.name
	}

	fn collect(&self) -> ToolbarResult<Value> {
		let mut data = Map::new();
		if let Value::Object(entries) = &self.config {
			for (key, value) in entries {
				let shown = match value {
					Value::String(s) => s.clone(),
					Value::Object(_) | Value::Array(_) => serde_json::to_string_pretty(value)?,
					other => other.to_string(),
				};
				data.insert(key.clone(), Value::String(shown));
			}
		}
		Ok(Value::Object(data))
	}

	fn widgets(&self) -> Value {
		json!({
			(self.name.clone()): {
				"icon": "gear",
				"widget": "DevBar.Widgets.VariableListWidget",
				"map": self.name,
				"default": "{}",
			},
		})
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}
