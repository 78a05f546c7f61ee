//! Environment signals deciding whether the toolbar is active

use std::env;

/// `APP_ENV` value that disables the toolbar
pub const PRODUCTION: &str = "production";

/// Where the process is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
	/// Serving HTTP requests
	#[default]
	Web,
	/// Command-line or batch execution
	Cli,
}

/// Snapshot of the signals that gate the toolbar
///
/// Built once, typically at middleware construction, so request handling
/// never reads the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSignals {
	app_env: Option<String>,
	debug: Option<String>,
	context: ExecutionContext,
}

impl EnvironmentSignals {
	/// Signals with nothing set: development, web context
	pub fn new() -> Self {
		Self::default()
	}

	/// Read `APP_ENV` and `DEBUG` from the process environment, web context
	pub fn from_env() -> Self {
		Self::from_env_with_context(ExecutionContext::Web)
	}

	/// Read `APP_ENV` and `DEBUG` from the process environment
	pub fn from_env_with_context(context: ExecutionContext) -> Self {
		let signals = Self {
			app_env: env::var("APP_ENV").ok(),
			debug: env::var("DEBUG").ok(),
			context,
		};
		tracing::debug!(
			app_env = ?signals.app_env,
			debug = ?signals.debug,
			context = ?signals.context,
			development = signals.is_development(),
			"Resolved debugbar environment"
		);
		signals
	}

	/// Set the `APP_ENV` signal
	pub fn with_app_env(mut self, app_env: impl Into<String>) -> Self {
		self.app_env = Some(app_env.into());
		self
	}

	/// Set the `DEBUG` signal
	pub fn with_debug(mut self, debug: impl Into<String>) -> Self {
		self.debug = Some(debug.into());
		self
	}

	/// Set the execution context
	pub fn with_context(mut self, context: ExecutionContext) -> Self {
		self.context = context;
		self
	}

	/// The application environment; absent or empty means `development`
	pub fn app_env(&self) -> &str {
		match self.app_env.as_deref() {
			None | Some("") => "development",
			Some(env) => env,
		}
	}

	/// The raw `DEBUG` signal
	pub fn debug(&self) -> Option<&str> {
		self.debug.as_deref()
	}

	/// The execution context
	pub fn context(&self) -> ExecutionContext {
		self.context
	}

	/// Whether the toolbar should be active
	///
	/// False when `APP_ENV` is `production`, when `DEBUG` is `false` or `0`,
	/// or in the command-line context. Comparisons are exact.
	pub fn is_development(&self) -> bool {
		if self.app_env() == PRODUCTION {
			return false;
		}
		if matches!(self.debug(), Some("false") | Some("0")) {
			return false;
		}
		self.context != ExecutionContext::Cli
	}
}
