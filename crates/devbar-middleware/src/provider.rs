//! Declarative wiring for hosts: factory bindings, the asset route and default settings

use crate::assets::AssetsHandler;
use crate::error::AssetsError;
use crate::factory::{AssetsHandlerFactory, DebugBarMiddlewareFactory};
use crate::middleware::DebugBarMiddleware;
use devbar_conf::{ConfigContainer, DebugBarSettings};
use devbar_http::{Method, RouteDefinition, Router};
use serde::Serialize;
use serde_json::{Value, json};
use std::any::type_name;
use std::sync::Arc;

/// Name of the asset route
pub const ASSETS_ROUTE_NAME: &str = "debugbar.assets";

/// Binds a service type to the factory that builds it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryBinding {
	/// Fully qualified service type name
	pub service: &'static str,
	/// Fully qualified factory type name
	pub factory: &'static str,
}

impl FactoryBinding {
	fn of<S, F>() -> Self {
		Self {
			service: type_name::<S>(),
			factory: type_name::<F>(),
		}
	}
}

/// Dependency declarations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependencies {
	/// Factory bindings
	pub factories: Vec<FactoryBinding>,
}

/// Everything a host needs to wire the toolbar in
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigProvider;

impl ConfigProvider {
	/// Create the provider
	pub fn new() -> Self {
		Self
	}

	/// Dependencies, routes and default settings as one mapping
	pub fn config(&self) -> Value {
		let routes: Vec<Value> = self
			.routes()
			.iter()
			.map(|route| {
				json!({
					"name": route.name,
					"path": route.path,
					"middleware": route.handler,
					"allowed_methods": route
						.allowed_methods
						.iter()
						.map(Method::as_str)
						.collect::<Vec<_>>(),
				})
			})
			.collect();

		json!({
			"dependencies": self.dependencies(),
			"routes": routes,
			"debugbar": self.debugbar_config().to_value(),
		})
	}

	/// Factory bindings for the middleware and the asset handler
	pub fn dependencies(&self) -> Dependencies {
		Dependencies {
			factories: vec![
				FactoryBinding::of::<DebugBarMiddleware, DebugBarMiddlewareFactory>(),
				FactoryBinding::of::<AssetsHandler, AssetsHandlerFactory>(),
			],
		}
	}

	/// The asset route for the default settings
	pub fn routes(&self) -> Vec<RouteDefinition> {
		vec![assets_route(&self.debugbar_config().asset_path)]
	}

	/// Default `debugbar` settings
	pub fn debugbar_config(&self) -> DebugBarSettings {
		DebugBarSettings::default()
	}

	/// Register the asset route on `router`, built from the container's
	/// configuration
	///
	/// # Errors
	///
	/// Fails when the resources directory cannot be located or the route
	/// pattern is rejected.
	pub fn mount(&self, router: Router, container: &dyn ConfigContainer) -> Result<Router, AssetsError> {
		let handler = AssetsHandlerFactory::new().create(container)?;
		let route = assets_route(handler.prefix());
		Ok(router.route(route, Arc::new(handler))?)
	}
}

/// `GET <asset_path>/{file:.+}`, greedy over the rest of the path
pub fn assets_route(asset_path: &str) -> RouteDefinition {
	RouteDefinition::new(
		ASSETS_ROUTE_NAME,
		format!("{}/{{file:.+}}", asset_path.trim_end_matches('/')),
		type_name::<AssetsHandler>(),
	)
	.with_methods([Method::GET])
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_routes() {
		let routes = ConfigProvider::new().routes();
		assert_eq!(routes.len(), 1);
		assert_eq!(routes[0].name, "debugbar.assets");
		assert_eq!(routes[0].path, "/debugbar/{file:.+}");
		assert_eq!(routes[0].allowed_methods, vec![Method::GET]);
		assert!(routes[0].handler.ends_with("AssetsHandler"));
	}

	#[rstest]
	fn test_dependencies() {
		let deps = ConfigProvider::new().dependencies();
		assert_eq!(deps.factories.len(), 2);
		assert!(deps.factories[0].service.ends_with("DebugBarMiddleware"));
		assert!(deps.factories[0].factory.ends_with("DebugBarMiddlewareFactory"));
		assert!(deps.factories[1].factory.ends_with("AssetsHandlerFactory"));
	}

	#[rstest]
	fn test_config_mapping() {
		let config = ConfigProvider::new().config();

		assert_eq!(config["debugbar"]["enabled"], true);
		assert_eq!(config["debugbar"]["asset_path"], "/debugbar");
		for name in ["messages", "time", "memory", "exceptions", "request"] {
			assert_eq!(config["debugbar"]["collectors"][name], true, "{}", name);
		}
		assert_eq!(config["routes"][0]["allowed_methods"], json!(["GET"]));
		assert_eq!(config["dependencies"]["factories"].as_array().unwrap().len(), 2);
	}

	#[rstest]
	#[case("/debugbar", "/debugbar/{file:.+}")]
	#[case("/_bar/", "/_bar/{file:.+}")]
	fn test_assets_route_path(#[case] asset_path: &str, #[case] expected: &str) {
		assert_eq!(assets_route(asset_path).path, expected);
	}
}
