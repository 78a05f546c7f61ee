//! Middleware error types

use std::path::PathBuf;

/// Errors raised while setting up the asset handler
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AssetsError {
	/// No resources directory was configured and none was found
	#[error(
		"Could not find the debug toolbar resources directory (searched: {}). Set `debugbar.resources_path`.",
		display_paths(.searched)
	)]
	ResourcesNotFound {
		/// Locations probed, in order
		searched: Vec<PathBuf>,
	},

	/// The asset route could not be registered
	#[error("Route error: {0}")]
	Route(#[from] devbar_http::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
	paths
		.iter()
		.map(|p| p.display().to_string())
		.collect::<Vec<_>>()
		.join(", ")
}
