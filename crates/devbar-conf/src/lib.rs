//! # devbar-conf
//!
//! Configuration for the devbar middleware.
//!
//! - [`DebugBarSettings`]: the `debugbar` block of the host configuration,
//!   read from a `serde_json::Value` mapping or a TOML file.
//! - [`EnvironmentSignals`]: `APP_ENV`, `DEBUG` and the execution context,
//!   resolved once and passed to the middleware instead of being read on
//!   every request.
//! - [`ConfigContainer`]: access to the host's configuration mapping, the way
//!   factories see a dependency-injection container.
//!
//! ```rust
//! use devbar_conf::{DebugBarSettings, EnvironmentSignals, ExecutionContext};
//! use serde_json::json;
//!
//! let settings = DebugBarSettings::from_config(&json!({
//!     "debugbar": { "asset_path": "/_debugbar" }
//! }))
//! .unwrap();
//! assert_eq!(settings.asset_path, "/_debugbar");
//! assert!(settings.collectors.time);
//!
//! let env = EnvironmentSignals::new().with_app_env("production");
//! assert!(!env.is_development());
//! assert_eq!(env.context(), ExecutionContext::Web);
//! ```

#![warn(missing_docs)]

pub mod container;
pub mod environment;
pub mod error;
pub mod settings;

pub use container::{ConfigContainer, InMemoryContainer};
pub use environment::{EnvironmentSignals, ExecutionContext};
pub use error::{SettingsError, SettingsResult};
pub use settings::{CollectorSettings, DebugBarSettings};
