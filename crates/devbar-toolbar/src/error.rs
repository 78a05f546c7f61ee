//! Toolbar error types

use thiserror::Error;

/// Result alias for toolbar operations
pub type ToolbarResult<T> = Result<T, ToolbarError>;

/// Errors raised by the toolbar engine
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ToolbarError {
	/// No collector registered under the given name
	#[error("Collector not found: {0}")]
	CollectorNotFound(String),

	/// A collector with the same name is already registered
	#[error("Collector already registered: {0}")]
	DuplicateCollector(String),

	/// A measure was stopped without having been started
	#[error("Failed stopping measure '{0}' because it hasn't been started")]
	MeasureNotStarted(String),

	/// Collected data could not be serialized
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Rendering failed for another reason
	#[error("Render error: {0}")]
	Render(String),
}
