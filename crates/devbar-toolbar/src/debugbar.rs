//! The toolbar engine

use crate::collectors::{
	DataCollector, ExceptionsCollector, MemoryCollector, MessagesCollector, RequestDataCollector,
	TimeDataCollector,
};
use crate::error::{ToolbarError, ToolbarResult};
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::{Map, Value, json};
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

/// Ordered registry of data collectors
///
/// The bar is shared between requests, so every method takes `&self`.
/// Registration order is the order tabs appear in the rendered toolbar.
pub struct DebugBar {
	collectors: RwLock<Vec<Arc<dyn DataCollector>>>,
}

impl DebugBar {
	/// Create a bar without collectors
	pub fn new() -> Self {
		Self {
			collectors: RwLock::new(Vec::new()),
		}
	}

	/// Create a bar with the standard collector set
	///
	/// Registers `messages`, `time`, `memory`, `exceptions` and `request`.
	pub fn standard() -> Self {
		let standard: [Arc<dyn DataCollector>; 5] = [
			Arc::new(MessagesCollector::new()),
			Arc::new(TimeDataCollector::new()),
			Arc::new(MemoryCollector::new()),
			Arc::new(ExceptionsCollector::new()),
			Arc::new(RequestDataCollector::new()),
		];
		Self {
			collectors: RwLock::new(standard.into()),
		}
	}

	/// Register a collector
	///
	/// # Errors
	///
	/// Returns [`ToolbarError::DuplicateCollector`] if a collector with the
	/// same name is already registered.
	pub fn add_collector(&self, collector: Arc<dyn DataCollector>) -> ToolbarResult<()> {
		let mut collectors = self.collectors.write();
		if collectors.iter().any(|c| c.name() == collector.name()) {
			return Err(ToolbarError::DuplicateCollector(collector.name().to_string()));
		}
		tracing::debug!(collector = collector.name(), "Registered toolbar collector");
		collectors.push(collector);
		Ok(())
	}

	/// Whether a collector is registered under `name`
	pub fn has_collector(&self, name: &str) -> bool {
		self.collectors.read().iter().any(|c| c.name() == name)
	}

	/// Look up a collector by name
	pub fn get_collector(&self, name: &str) -> ToolbarResult<Arc<dyn DataCollector>> {
		self.collectors
			.read()
			.iter()
			.find(|c| c.name() == name)
			.cloned()
			.ok_or_else(|| ToolbarError::CollectorNotFound(name.to_string()))
	}

	/// Look up a collector by name and concrete type
	///
	/// Returns `None` if nothing is registered under `name` or the collector
	/// is of a different type.
	pub fn collector<T>(&self, name: &str) -> Option<Arc<T>>
	where
		T: DataCollector + 'static,
	{
		let collector = self.get_collector(name).ok()?;
		let any: Arc<dyn Any + Send + Sync> = collector.into_any();
		any.downcast::<T>().ok()
	}

	/// Names of the registered collectors, in registration order
	pub fn collector_names(&self) -> Vec<String> {
		self.collectors
			.read()
			.iter()
			.map(|c| c.name().to_string())
			.collect()
	}

	/// The `messages` collector, if registered
	pub fn messages(&self) -> Option<Arc<MessagesCollector>> {
		self.collector("messages")
	}

	/// The `time` collector, if registered
	pub fn time(&self) -> Option<Arc<TimeDataCollector>> {
		self.collector("time")
	}

	/// The `exceptions` collector, if registered
	pub fn exceptions(&self) -> Option<Arc<ExceptionsCollector>> {
		self.collector("exceptions")
	}

	/// The `request` collector, if registered
	pub fn request_data(&self) -> Option<Arc<RequestDataCollector>> {
		self.collector("request")
	}

	/// Append a message to the `messages` collector
	///
	/// # Errors
	///
	/// Returns [`ToolbarError::CollectorNotFound`] if no messages collector
	/// is registered.
	pub fn add_message(&self, message: impl Into<String>, label: impl Into<String>) -> ToolbarResult<()> {
		let messages = self
			.messages()
			.ok_or_else(|| ToolbarError::CollectorNotFound("messages".to_string()))?;
		messages.add_message(message, label);
		Ok(())
	}

	/// Snapshot every collector and drain per-request data
	///
	/// The result maps each collector name to its data, plus a `__meta` entry
	/// identifying this snapshot. Collectors are reset only after all of them
	/// were collected successfully.
	pub fn collect(&self) -> ToolbarResult<Value> {
		let collectors = self.collectors.read();

		let mut data = Map::new();
		data.insert(
			"__meta".to_string(),
			json!({
				"id": Uuid::new_v4().to_string(),
				"datetime": Utc::now().to_rfc3339(),
				"collectors": collectors.iter().map(|c| c.name()).collect::<Vec<_>>(),
			}),
		);
		for collector in collectors.iter() {
			data.insert(collector.name().to_string(), collector.collect()?);
		}

		for collector in collectors.iter() {
			collector.reset();
		}
		Ok(Value::Object(data))
	}

	/// Drop per-request data from every collector without collecting it
	///
	/// Running measures are kept.
	pub fn reset(&self) {
		for collector in self.collectors.read().iter() {
			collector.reset();
		}
	}

	/// Merged widget configuration of every collector
	pub fn widgets(&self) -> Value {
		let mut widgets = Map::new();
		for collector in self.collectors.read().iter() {
			if let Value::Object(entries) = collector.widgets() {
				widgets.extend(entries);
			}
		}
		Value::Object(widgets)
	}
}

impl Default for DebugBar {
	fn default() -> Self {
		Self::standard()
	}
}
