//! Factories building the middleware and asset handler from host configuration

use crate::assets::AssetsHandler;
use crate::error::AssetsError;
use crate::middleware::DebugBarMiddleware;
use devbar_conf::{CollectorSettings, ConfigContainer, DebugBarSettings, EnvironmentSignals};
use devbar_toolbar::{
	ConfigCollector, DataCollector, DebugBar, ExceptionsCollector, MemoryCollector,
	MessagesCollector, RequestDataCollector, TimeDataCollector,
};
use serde_json::Value;
use std::sync::Arc;

/// Read the `debugbar` settings, falling back to defaults when malformed
fn settings_from(config: &Value) -> DebugBarSettings {
	DebugBarSettings::from_config(config).unwrap_or_else(|e| {
		tracing::warn!(error = %e, "Invalid debugbar settings, using defaults");
		DebugBarSettings::default()
	})
}

/// Build a toolbar with the collectors switched on in `toggles`
///
/// `config` is the host configuration shown by the `config` collector.
pub fn build_debug_bar(toggles: &CollectorSettings, config: &Value) -> DebugBar {
	let bar = DebugBar::new();
	let collectors: [(bool, Arc<dyn DataCollector>); 6] = [
		(toggles.messages, Arc::new(MessagesCollector::new())),
		(toggles.time, Arc::new(TimeDataCollector::new())),
		(toggles.memory, Arc::new(MemoryCollector::new())),
		(toggles.exceptions, Arc::new(ExceptionsCollector::new())),
		(toggles.request, Arc::new(RequestDataCollector::new())),
		(toggles.config, Arc::new(ConfigCollector::new(config.clone()))),
	];

	for (enabled, collector) in collectors {
		if !enabled {
			continue;
		}
		if let Err(e) = bar.add_collector(collector) {
			tracing::warn!(error = %e, "Skipped toolbar collector");
		}
	}
	for name in toggles.extra.keys() {
		tracing::debug!(collector = %name, "No built-in collector for toggle");
	}
	bar
}

/// Builds [`DebugBarMiddleware`] from a container's configuration
///
/// A missing or unreadable configuration counts as empty, so the factory
/// always produces a middleware.
#[derive(Debug, Clone, Default)]
pub struct DebugBarMiddlewareFactory {
	environment: Option<EnvironmentSignals>,
}

impl DebugBarMiddlewareFactory {
	/// Factory using the process environment for the gate
	pub fn new() -> Self {
		Self::default()
	}

	/// Factory using explicit environment signals
	pub fn with_environment(environment: EnvironmentSignals) -> Self {
		Self {
			environment: Some(environment),
		}
	}

	/// Build the middleware
	pub fn create(&self, container: &dyn ConfigContainer) -> DebugBarMiddleware {
		let config = container.config_or_empty();
		let settings = settings_from(&config);
		let debug_bar = build_debug_bar(&settings.collectors, &config);

		let middleware = DebugBarMiddleware::with_debug_bar(Arc::new(debug_bar), settings.asset_path);
		match &self.environment {
			Some(environment) => middleware.with_environment(environment.clone()),
			None => middleware,
		}
	}
}

/// Builds [`AssetsHandler`] from a container's configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetsHandlerFactory;

impl AssetsHandlerFactory {
	/// Create the factory
	pub fn new() -> Self {
		Self
	}

	/// Build the handler, mounted under the configured `asset_path`
	///
	/// # Errors
	///
	/// Returns [`AssetsError::ResourcesNotFound`] when `resources_path` is
	/// not configured and no conventional location exists.
	pub fn create(&self, container: &dyn ConfigContainer) -> Result<AssetsHandler, AssetsError> {
		let settings = settings_from(&container.config_or_empty());
		Ok(AssetsHandler::new(settings.resources_path)?.with_prefix(&settings.asset_path))
	}
}
