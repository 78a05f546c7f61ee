//! Error type shared by handlers and middleware.

use thiserror::Error;

/// Result alias used throughout the request pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building requests or handling them
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
	/// The request URI could not be parsed
	#[error("Invalid URI: {0}")]
	InvalidUri(String),

	/// A header name or value was rejected
	#[error("Invalid header: {0}")]
	InvalidHeader(String),

	/// A route pattern could not be compiled
	#[error("Invalid route pattern: {0}")]
	InvalidPattern(String),

	/// Generic HTTP-level failure raised by a handler
	#[error("HTTP error: {0}")]
	Http(String),

	/// Unexpected failure inside a handler
	#[error("Internal error: {0}")]
	Internal(String),
}
