//! # devbar
//!
//! A development-time debug toolbar for HTTP applications.
//!
//! devbar wraps an application's handler pipeline and, while the process runs
//! in development, injects a debug toolbar (request timing, peak memory,
//! message log, recorded errors, request data) into every HTML response. A
//! companion asset handler serves the toolbar's stylesheets, scripts and
//! fonts from a resources directory without ever leaving it.
//!
//! ## Crates
//!
//! - [`http`] - request/response types, `Handler`/`Middleware`, `Router`
//! - [`toolbar`] - the toolbar engine: collectors and the renderer
//! - [`conf`] - settings, environment signals, configuration container
//! - [`middleware`] - the injection middleware, asset handler, factories,
//!   configuration provider and (feature `tower`) the axum layer
//!
//! ## Feature Flags
//!
//! - `tower` (default) - `DebugBarLayer` and `assets_router` for axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use devbar::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! struct Home;
//!
//! #[async_trait]
//! impl Handler for Home {
//!     async fn handle(&self, _request: Request) -> Result<Response> {
//!         Ok(Response::ok()
//!             .with_header("content-type", "text/html")
//!             .with_body("<html><body><h1>Home</h1></body></html>"))
//!     }
//! }
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let container = InMemoryContainer::new(json!({
//!     "debugbar": { "resources_path": "/srv/debugbar/resources" }
//! }));
//!
//! let router = ConfigProvider::new()
//!     .mount(Router::new(), &container)?
//!     .route(RouteDefinition::new("home", "/", "home"), Arc::new(Home))?;
//!
//! let middleware = DebugBarMiddlewareFactory::new().create(&container);
//! let app = MiddlewareChain::new(Arc::new(router)).with_middleware(Arc::new(middleware));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub use devbar_conf as conf;
pub use devbar_http as http;
pub use devbar_middleware as middleware;
pub use devbar_toolbar as toolbar;

pub use devbar_conf::{
	CollectorSettings, ConfigContainer, DebugBarSettings, EnvironmentSignals, ExecutionContext,
	InMemoryContainer, SettingsError,
};
pub use devbar_http::{
	Error, Handler, Middleware, MiddlewareChain, Request, Response, Result, RouteDefinition, Router,
	StatusCode,
};
pub use devbar_middleware::{
	AssetsError, AssetsHandler, AssetsHandlerFactory, ConfigProvider, DebugBarMiddleware,
	DebugBarMiddlewareFactory,
};
pub use devbar_toolbar::{
	DataCollector, DebugBar, JavascriptRenderer, Renderer, TOOLBAR_MARKER, ToolbarError,
	ToolbarResult,
};

#[cfg(feature = "tower")]
pub use devbar_middleware::{DebugBarLayer, DebugBarService, assets_router};

/// Prelude module for convenient imports
///
/// Import everything needed to mount the toolbar with:
/// ```rust
/// use devbar::prelude::*;
/// ```
pub mod prelude {
	pub use crate::{
		AssetsHandler, ConfigContainer, ConfigProvider, DebugBar, DebugBarMiddleware,
		DebugBarMiddlewareFactory, DebugBarSettings, EnvironmentSignals, Error, ExecutionContext,
		Handler, InMemoryContainer, Middleware, MiddlewareChain, Renderer, Request, Response,
		Result, RouteDefinition, Router, StatusCode,
	};

	#[cfg(feature = "tower")]
	pub use crate::{DebugBarLayer, assets_router};

	// External
	pub use async_trait::async_trait;
}
