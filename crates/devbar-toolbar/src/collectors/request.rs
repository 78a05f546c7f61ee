//! Request data collector

use super::DataCollector;
use crate::error::ToolbarResult;
use http::{HeaderMap, Method, Uri};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::any::Any;
use std::sync::Arc;

/// Headers whose values are never shown in the toolbar
const REDACTED_HEADERS: &[&str] = &["authorization", "cookie", "proxy-authorization", "set-cookie"];

#[derive(Debug, Clone)]
struct RequestSnapshot {
	method: String,
	uri: String,
	headers: Vec<(String, String)>,
}

/// Captures the method, URI and headers of the current request
pub struct RequestDataCollector {
	current: Mutex<Option<RequestSnapshot>>,
}

impl RequestDataCollector {
	/// Create an empty collector
	pub fn new() -> Self {
		Self {
			current: Mutex::new(None),
		}
	}

	/// Record the request being processed, replacing any previous one
	pub fn record(&self, method: &Method, uri: &Uri, headers: &HeaderMap) {
		let headers = headers
			.iter()
			.map(|(name, value)| {
				let shown = if REDACTED_HEADERS.contains(&name.as_str()) {
					"[redacted]".to_string()
				} else {
					value.to_str().unwrap_or("<binary>").to_string()
				};
				(name.to_string(), shown)
			})
			.collect();

		*self.current.lock() = Some(RequestSnapshot {
			method: method.to_string(),
			uri: uri.to_string(),
			headers,
		});
	}
}

impl Default for RequestDataCollector {
	fn default() -> Self {
		Self::new()
	}
}

impl DataCollector for RequestDataCollector {
	fn name(&self) -> &str {
		"request"
	}

	fn collect(&self) -> ToolbarResult<Value> {
		let current = self.current.lock();
		let Some(snapshot) = current.as_ref() else {
			return Ok(json!({}));
		};

		let mut headers = Map::new();
		for (name, value) in &snapshot.headers {
			headers.insert(name.clone(), Value::String(value.clone()));
		}

		Ok(json!({
			"method": snapshot.method,
			"uri": snapshot.uri,
			"headers": headers,
		}))
	}

	fn widgets(&self) -> Value {
		json!({
			"request": {
				"icon": "tags",
				"widget": "DevBar.Widgets.VariableListWidget",
				"map": "request",
				"default": "{}",
			},
		})
	}

	fn reset(&self) {
		*self.current.lock() = None;
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}
