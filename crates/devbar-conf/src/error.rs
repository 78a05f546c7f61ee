//! Settings error types

/// Result alias for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors raised while loading settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// Settings file could not be read
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Settings file is not valid TOML
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Settings mapping does not have the expected shape
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// The host configuration could not be obtained
	#[error("Configuration unavailable: {0}")]
	Unavailable(String),
}
