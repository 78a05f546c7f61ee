//! Static asset handler for the toolbar's CSS, JavaScript, fonts and images

use crate::error::AssetsError;
use crate::mime::content_type_for;
use async_trait::async_trait;
use bytes::Bytes;
use devbar_http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use devbar_http::{Handler, Request, Response, Result};
use std::env;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// `Cache-Control` sent with every served asset
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=3600";

/// Default URL prefix the assets are mounted under
pub const DEFAULT_PREFIX: &str = "/debugbar";

/// Install locations probed when no resources directory is configured
///
/// Relative to this crate's manifest directory, then to the working directory.
pub fn candidate_paths() -> Vec<PathBuf> {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	let mut candidates = vec![
		manifest_dir.join("resources"),
		manifest_dir.join("../../resources/debugbar"),
	];
	if let Ok(cwd) = env::current_dir() {
		candidates.push(cwd.join("resources/debugbar"));
		candidates.push(cwd.join("vendor/debugbar/resources"));
	}
	candidates
}

/// First candidate that is a directory
///
/// # Errors
///
/// Returns [`AssetsError::ResourcesNotFound`] listing every probed location
/// when none of them is a directory.
pub fn find_resources_path(candidates: &[PathBuf]) -> std::result::Result<PathBuf, AssetsError> {
	candidates
		.iter()
		.find(|path| path.is_dir())
		.cloned()
		.ok_or_else(|| AssetsError::ResourcesNotFound {
			searched: candidates.to_vec(),
		})
}

/// Serves files from the toolbar resources directory
///
/// Requests are expected under `<prefix>/<file>`. A file is served only when
/// its canonical path lies inside the canonical resources root; everything
/// else, including missing files and directories, is a bare 404.
#[derive(Debug, Clone)]
pub struct AssetsHandler {
	resources_path: PathBuf,
	prefix: String,
}

impl AssetsHandler {
	/// Create a handler for `resources_path`, or for the first conventional
	/// install location that exists
	///
	/// # Errors
	///
	/// Returns [`AssetsError::ResourcesNotFound`] when no path is given and
	/// discovery finds nothing.
	pub fn new(resources_path: Option<PathBuf>) -> std::result::Result<Self, AssetsError> {
		let resources_path = match resources_path {
			Some(path) => path,
			None => find_resources_path(&candidate_paths())?,
		};
		tracing::debug!(path = %resources_path.display(), "Serving debug toolbar assets");

		Ok(Self {
			resources_path,
			prefix: format!("{}/", DEFAULT_PREFIX),
		})
	}

	/// Mount under a different URL prefix, e.g. `/_debugbar`
	pub fn with_prefix(mut self, prefix: impl AsRef<str>) -> Self {
		self.prefix = format!("{}/", prefix.as_ref().trim_end_matches('/'));
		self
	}

	/// The resources root files are served from
	pub fn resources_path(&self) -> &Path {
		&self.resources_path
	}

	/// URL prefix including the trailing slash
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Canonical path of the requested file, if it may be served
	async fn resolve(&self, request_path: &str) -> Option<PathBuf> {
		let relative = request_path.strip_prefix(&self.prefix)?;
		// `join` would replace the root with a rooted name
		let rooted = Path::new(relative)
			.components()
			.any(|c| matches!(c, Component::RootDir | Component::Prefix(_)));
		if relative.is_empty() || rooted {
			return None;
		}
		let candidate = self.resources_path.join(relative);

		let canonical_root = fs::canonicalize(&self.resources_path).await.ok()?;
		let canonical = fs::canonicalize(&candidate).await.ok()?;

		// Component-wise, so `<root>-evil` is not inside `<root>`
		if !canonical.starts_with(&canonical_root) {
			tracing::warn!(path = %request_path, "Blocked asset request outside the resources directory");
			return None;
		}

		let metadata = fs::metadata(&canonical).await.ok()?;
		metadata.is_file().then_some(canonical)
	}

	/// Respond to an asset request path
	pub async fn serve(&self, request_path: &str) -> Response {
		let Some(path) = self.resolve(request_path).await else {
			return not_found();
		};

		let content = match fs::read(&path).await {
			Ok(content) => Bytes::from(content),
			Err(e) => {
				tracing::debug!(error = %e, "Failed to read asset");
				return not_found();
			}
		};

		tracing::debug!(path = %request_path, bytes = content.len(), "Served asset");

		let mut response = Response::ok();
		response.headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static(content_type_for(&path)),
		);
		response
			.headers
			.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
		response
			.headers
			.insert(CONTENT_LENGTH, HeaderValue::from(content.len()));
		response.body = content;
		response
	}
}

fn not_found() -> Response {
	let mut response = Response::not_found();
	response
		.headers
		.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
	response
}

#[async_trait]
impl Handler for AssetsHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		Ok(self.serve(request.path()).await)
	}
}
