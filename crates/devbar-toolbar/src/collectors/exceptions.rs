//! Exception collector

use super::DataCollector;
use crate::error::ToolbarResult;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Value, json};
use std::any::Any;
use std::error::Error;
use std::sync::Arc;

/// A recorded error with its source chain
#[derive(Debug, Clone, Serialize)]
pub struct RecordedException {
	/// Top-level error message
	pub message: String,
	/// Messages of the `source()` chain, outermost first
	pub causes: Vec<String>,
	/// When the error was recorded
	pub time: DateTime<Utc>,
}

/// Collects errors raised while handling a request
pub struct ExceptionsCollector {
	exceptions: Mutex<Vec<RecordedException>>,
}

impl ExceptionsCollector {
	/// Create an empty collector
	pub fn new() -> Self {
		Self {
			exceptions: Mutex::new(Vec::new()),
		}
	}

	/// Record an error and its source chain
	pub fn add_exception(&self, error: &(dyn Error + 'static)) {
		let mut causes = Vec::new();
		let mut source = error.source();
		while let Some(cause) = source {
			causes.push(cause.to_string());
			source = cause.source();
		}

		self.exceptions.lock().push(RecordedException {
			message: error.to_string(),
			causes,
			time: Utc::now(),
		});
	}

	/// Copy of the recorded errors
	pub fn exceptions(&self) -> Vec<RecordedException> {
		self.exceptions.lock().clone()
	}
}

impl Default for ExceptionsCollector {
	fn default() -> Self {
		Self::new()
	}
}

impl DataCollector for ExceptionsCollector {
	fn name(&self) -> &str {
		"exceptions"
	}

	fn collect(&self) -> ToolbarResult<Value> {
		let exceptions = self.exceptions.lock();
		Ok(json!({
			"count": exceptions.len(),
			"exceptions": serde_json::to_value(&*exceptions)?,
		}))
	}

	fn widgets(&self) -> Value {
		json!({
			"exceptions": {
				"icon": "bug",
				"widget": "DevBar.Widgets.ExceptionsWidget",
				"map": "exceptions",
				"default": "{}",
			},
			"exceptions:badge": {
				"map": "exceptions.count",
				"default": "null",
			},
		})
	}

	fn reset(&self) {
		self.exceptions.lock().clear();
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::fmt;

	#[derive(Debug)]
	struct Outer(std::io::Error);

	impl fmt::Display for Outer {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			write!(f, "template failed")
		}
	}

	impl Error for Outer {
		fn source(&self) -> Option<&(dyn Error + 'static)> {
			Some(&self.0)
		}
	}

	#[rstest]
	fn test_records_source_chain() {
		let collector = ExceptionsCollector::new();
		let err = Outer(std::io::Error::other("disk full"));
		collector.add_exception(&err);

		let recorded = collector.exceptions();
		assert_eq!(recorded.len(), 1);
		assert_eq!(recorded[0].message, "template failed");
		assert_eq!(recorded[0].causes, vec!["disk full".to_string()]);

		let data = collector.collect().unwrap();
		assert_eq!(data["count"], 1);
	}
}
