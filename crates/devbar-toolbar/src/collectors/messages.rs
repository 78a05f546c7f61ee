//! Message log collector

use super::DataCollector;
use crate::error::ToolbarResult;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Value, json};
use std::any::Any;
use std::sync::Arc;

/// A single labelled log entry
#[derive(Debug, Clone, Serialize)]
pub struct Message {
	/// Message text
	pub message: String,
	/// Label, e.g. `info`, `warning`, `error`
	pub label: String,
	/// When the message was added
	pub time: DateTime<Utc>,
}

/// Collects labelled messages shown in the toolbar's message log
pub struct MessagesCollector {
	name: String,
	messages: Mutex<Vec<Message>>,
}

impl MessagesCollector {
	/// Create a collector named `messages`
	pub fn new() -> Self {
		Self::with_name("messages")
	}

	/// Create a collector under a custom name
	pub fn with_name(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			messages: Mutex::new(Vec::new()),
		}
	}

	/// Append a message
	pub fn add_message(&self, message: impl Into<String>, label: impl Into<String>) {
		self.messages.lock().push(Message {
			message: message.into(),
			label: label.into(),
			time: Utc::now(),
		});
	}

	/// Copy of the pending messages
	pub fn messages(&self) -> Vec<Message> {
		self.messages.lock().clone()
	}
}

impl Default for MessagesCollector {
	fn default() -> Self {
		Self::new()
	}
}

impl DataCollector for MessagesCollector {
	fn name(&self) -> &str {
		&self.name
	}

	fn collect(&self) -> ToolbarResult<Value> {
		let messages = self.messages.lock();
		Ok(json!({
			"count": messages.len(),
			"messages": serde_json::to_value(&*messages)?,
		}))
	}

	fn widgets(&self) -> Value {
		json!({
			(self.name.clone()): {
				"icon": "list-alt",
				"widget": "DevBar.Widgets.MessagesWidget",
				"map": format!("{}.messages", self.name),
				"default": "[]",
			},
			(format!("{}:badge", self.name)): {
				"map": format!("{}.count", self.name),
				"default": "null",
			},
		})
	}

	fn reset(&self) {
		self.messages.lock().clear();
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}
