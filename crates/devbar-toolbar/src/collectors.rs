//! Data collectors
//!
//! Each collector owns one tab of the toolbar. Collectors are registered on
//! a [`DebugBar`](crate::DebugBar) by name and collected in registration
//! order when the toolbar is rendered.

pub mod config;
pub mod exceptions;
pub mod memory;
pub mod messages;
pub mod request;
pub mod time;

pub use config::ConfigCollector;
pub use exceptions::ExceptionsCollector;
pub use memory::MemoryCollector;
pub use messages::MessagesCollector;
pub use request::RequestDataCollector;
pub use time::TimeDataCollector;

use crate::error::ToolbarResult;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

/// A named source of toolbar data
pub trait DataCollector: Send + Sync {
	/// Unique name; also the dataset key in the rendered toolbar
	fn name(&self) -> &str;

	/// Snapshot the collector's data
	fn collect(&self) -> ToolbarResult<Value>;

	/// Widget configuration for the front-end, keyed by widget name
	fn widgets(&self) -> Value {
		Value::Null
	}

	/// Drop per-request data after the toolbar has been rendered
	fn reset(&self) {}

	/// Upcast for typed lookups via [`DebugBar::collector`](crate::DebugBar::collector)
	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Human readable duration, e.g. `850μs`, `12.34ms`, `1.5s`
pub fn format_duration(duration: Duration) -> String {
	let micros = duration.as_micros();
	if micros < 1_000 {
		format!("{}μs", micros)
	} else if micros < 1_000_000 {
		format!("{:.2}ms", micros as f64 / 1_000.0)
	} else {
		format!("{:.2}s", duration.as_secs_f64())
	}
}

/// Human readable byte count, e.g. `512B`, `1.5KB`, `12MB`
pub fn format_bytes(bytes: u64) -> String {
	const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
	if bytes < 1024 {
		return format!("{}B", bytes);
	}

	let mut value = bytes as f64;
	let mut unit = 0;
	while value >= 1024.0 && unit < UNITS.len() - 1 {
		value /= 1024.0;
		unit += 1;
	}

	let rounded = (value * 100.0).round() / 100.0;
	format!("{}{}", rounded, UNITS[unit])
}
