//! # devbar-middleware
//!
//! Development-time toolbar for HTTP applications.
//!
//! - [`DebugBarMiddleware`] times and logs each request and splices the
//!   toolbar markup into HTML responses before `</body>`. It is inert unless
//!   the [`EnvironmentSignals`](devbar_conf::EnvironmentSignals) it was built
//!   with describe a development web process.
//! - [`AssetsHandler`] serves the toolbar's CSS, JavaScript, fonts and images
//!   from a resources directory, refusing anything that resolves outside it.
//! - [`ConfigProvider`] declares factory bindings, the asset route and the
//!   default `debugbar` settings; [`DebugBarMiddlewareFactory`] and
//!   [`AssetsHandlerFactory`] build the components from host configuration.
//!
//! ## Features
//!
//! - `tower` - [`DebugBarLayer`] and [`assets_router`] for axum applications
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use devbar_conf::{EnvironmentSignals, InMemoryContainer};
//! use devbar_http::{MiddlewareChain, Router};
//! use devbar_middleware::{ConfigProvider, DebugBarMiddlewareFactory};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let container = InMemoryContainer::new(json!({
//!     "debugbar": { "resources_path": "/srv/debugbar/resources" }
//! }));
//!
//! let router = ConfigProvider::new().mount(Router::new(), &container)?;
//! let middleware = DebugBarMiddlewareFactory::with_environment(EnvironmentSignals::from_env())
//!     .create(&container);
//!
//! let app = MiddlewareChain::new(Arc::new(router)).with_middleware(Arc::new(middleware));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod assets;
pub mod branding;
pub mod error;
pub mod factory;
pub mod injection;
#[cfg(feature = "tower")]
pub mod layer;
pub mod middleware;
pub mod mime;
pub mod provider;

pub use assets::AssetsHandler;
pub use error::AssetsError;
pub use factory::{AssetsHandlerFactory, DebugBarMiddlewareFactory};
pub use middleware::DebugBarMiddleware;
pub use provider::{ConfigProvider, Dependencies, FactoryBinding};

#[cfg(feature = "tower")]
pub use layer::{DebugBarLayer, DebugBarService, assets_router};
