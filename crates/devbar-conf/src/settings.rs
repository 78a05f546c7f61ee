//! The `debugbar` configuration block

use crate::error::SettingsResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the debugbar block in the host configuration mapping
pub const CONFIG_KEY: &str = "debugbar";

fn default_true() -> bool {
	true
}

fn default_asset_path() -> String {
	"/debugbar".to_string()
}

/// Settings for the toolbar middleware and asset handler
///
/// Every field has a default, so an empty or missing block is valid.
///
/// `enabled` is informational: whether the toolbar is injected is decided by
/// [`EnvironmentSignals`](crate::EnvironmentSignals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugBarSettings {
	/// Informational enable flag
	#[serde(default = "default_true")]
	pub enabled: bool,

	/// URL prefix the assets are served under
	#[serde(default = "default_asset_path")]
	pub asset_path: String,

	/// Directory holding the toolbar's static resources
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resources_path: Option<PathBuf>,

	/// Collector toggles
	#[serde(default)]
	pub collectors: CollectorSettings,
}

impl Default for DebugBarSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			asset_path: default_asset_path(),
			resources_path: None,
			collectors: CollectorSettings::default(),
		}
	}
}

impl DebugBarSettings {
	/// Read the `debugbar` block from a host configuration mapping
	///
	/// A missing or `null` block yields the defaults.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Json`](crate::SettingsError::Json) if the block
	/// is present but malformed, e.g. `asset_path` is not a string.
	pub fn from_config(config: &Value) -> SettingsResult<Self> {
		match config.get(CONFIG_KEY) {
			None | Some(Value::Null) => Ok(Self::default()),
			Some(block) => Ok(serde_json::from_value(block.clone())?),
		}
	}

	/// Read the `[debugbar]` table from TOML text
	pub fn from_toml_str(source: &str) -> SettingsResult<Self> {
		#[derive(Deserialize)]
		struct Document {
			#[serde(default)]
			debugbar: DebugBarSettings,
		}

		let document: Document = toml::from_str(source)?;
		Ok(document.debugbar)
	}

	/// Read the `[debugbar]` table from a TOML file
	pub fn from_toml_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
		let path = path.as_ref();
		tracing::debug!(path = %path.display(), "Loading debugbar settings");
		let source = fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	/// The settings as a JSON mapping, as published by the config provider
	pub fn to_value(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}
}

/// Named collector toggles
///
/// The five standard collectors default to on; `config` (a dump of the host
/// configuration) defaults to off. Unknown names are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorSettings {
	/// Message log
	#[serde(default = "default_true")]
	pub messages: bool,
	/// Timeline
	#[serde(default = "default_true")]
	pub time: bool,
	/// Peak memory
	#[serde(default = "default_true")]
	pub memory: bool,
	/// Recorded errors
	#[serde(default = "default_true")]
	pub exceptions: bool,
	/// Request data
	#[serde(default = "default_true")]
	pub request: bool,
	/// Configuration dump
	#[serde(default)]
	pub config: bool,
	/// Toggles for collectors this crate does not know about
	#[serde(flatten)]
	pub extra: BTreeMap<String, bool>,
}

impl Default for CollectorSettings {
	fn default() -> Self {
		Self {
			messages: true,
			time: true,
			memory: true,
			exceptions: true,
			request: true,
			config: false,
			extra: BTreeMap::new(),
		}
	}
}
