//! Asset handler integration tests
//!
//! Serving, traversal rejection and routing through the declared asset route.

use bytes::Bytes;
use devbar_conf::InMemoryContainer;
use devbar_http::header::{CACHE_CONTROL, CONTENT_LENGTH};
use devbar_http::{Handler, Method, Request, Router, StatusCode};
use devbar_middleware::{AssetsError, AssetsHandler, ConfigProvider};
use proptest::prelude::*;
use rstest::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Layout with a resources root and a sibling directory sharing its name prefix
struct Layout {
	_dir: TempDir,
	root: PathBuf,
	sibling: PathBuf,
}

#[fixture]
fn layout() -> Layout {
	let dir = TempDir::new().expect("Failed to create temporary directory");
	let root = dir.path().join("root");
	let sibling = dir.path().join("root-evil");

	fs::create_dir_all(root.join("css/widgets")).unwrap();
	fs::create_dir_all(root.join("vendor/font-awesome/fonts")).unwrap();
	fs::create_dir_all(&sibling).unwrap();

	fs::write(
		root.join("css/widgets/widgets.base.css"),
		".devbar-widgets { margin: 0; }\n",
	)
	.unwrap();
	fs::write(
		root.join("vendor/font-awesome/fonts/fontawesome-webfont.woff2"),
		[0x77u8, 0x4f, 0x46, 0x32, 0x00, 0xff],
	)
	.unwrap();
	fs::write(sibling.join("secret.txt"), "do not serve").unwrap();
	fs::write(dir.path().join("outside.txt"), "outside").unwrap();

	Layout {
		_dir: dir,
		root,
		sibling,
	}
}

fn handler(layout: &Layout) -> AssetsHandler {
	AssetsHandler::new(Some(layout.root.clone())).unwrap()
}

fn assert_not_found(response: &devbar_http::Response) {
	assert_eq!(response.status, StatusCode::NOT_FOUND);
	assert_eq!(response.content_type(), Some("text/plain"));
	assert!(response.body.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_serves_widget_stylesheet(layout: Layout) {
	let response = handler(&layout)
		.serve("/debugbar/css/widgets/widgets.base.css")
		.await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.content_type(), Some("text/css"));
	assert_eq!(response.headers[CACHE_CONTROL], "public, max-age=3600");
	assert_eq!(
		response.body,
		Bytes::from(fs::read(layout.root.join("css/widgets/widgets.base.css")).unwrap())
	);
}

#[rstest]
#[tokio::test]
async fn test_serves_binary_font(layout: Layout) {
	let response = handler(&layout)
		.serve("/debugbar/vendor/font-awesome/fonts/fontawesome-webfont.woff2")
		.await;

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.content_type(), Some("font/woff2"));
	assert_eq!(response.headers[CONTENT_LENGTH], "6");
	assert_eq!(response.body.as_ref(), &[0x77u8, 0x4f, 0x46, 0x32, 0x00, 0xff]);
}

#[rstest]
#[case("/debugbar/../../../etc/passwd")]
#[case("/debugbar/../outside.txt")]
#[case("/debugbar/../root-evil/secret.txt")]
#[case("/debugbar/css/../../root-evil/secret.txt")]
#[case("/debugbar//etc/passwd")]
#[case("/debugbar/css/widgets/")]
#[case("/debugbar/nope.js")]
#[tokio::test]
async fn test_rejects_paths_outside_root(layout: Layout, #[case] path: &str) {
	let response = handler(&layout).serve(path).await;
	assert_not_found(&response);
}

#[rstest]
#[tokio::test]
async fn test_rejected_response_does_not_leak_paths(layout: Layout) {
	let escape = format!(
		"/debugbar/../{}/secret.txt",
		layout.sibling.file_name().unwrap().to_str().unwrap()
	);
	let blocked = handler(&layout).serve(&escape).await;
	let missing = handler(&layout).serve("/debugbar/missing.txt").await;

	assert_eq!(blocked.status, missing.status);
	assert_eq!(blocked.headers, missing.headers);
	assert_eq!(blocked.body, missing.body);
}

#[cfg(unix)]
#[rstest]
#[tokio::test]
async fn test_rejects_symlink_escaping_root(layout: Layout) {
	std::os::unix::fs::symlink(layout.sibling.join("secret.txt"), layout.root.join("link.txt"))
		.unwrap();

	let response = handler(&layout).serve("/debugbar/link.txt").await;
	assert_not_found(&response);
}

#[rstest]
fn test_missing_configured_root_is_accepted_then_404s(layout: Layout) {
	// An explicit path is trusted at construction; requests against it 404
	let handler = AssetsHandler::new(Some(layout.root.join("absent"))).unwrap();
	let rt = tokio::runtime::Runtime::new().unwrap();
	let response = rt.block_on(handler.serve("/debugbar/css/widgets/widgets.base.css"));
	assert_not_found(&response);
}

#[rstest]
#[tokio::test]
async fn test_provider_route_serves_get_only(layout: Layout) {
	let container = InMemoryContainer::new(json!({
		"debugbar": { "resources_path": layout.root },
	}));
	let router = ConfigProvider::new()
		.mount(Router::new(), &container)
		.unwrap();

	let get = Request::builder()
		.uri("/debugbar/css/widgets/widgets.base.css")
		.build()
		.unwrap();
	let response = router.handle(get).await.unwrap();
	assert_eq!(response.status, StatusCode::OK);

	let post = Request::builder()
		.method(Method::POST)
		.uri("/debugbar/css/widgets/widgets.base.css")
		.build()
		.unwrap();
	let response = router.handle(post).await.unwrap();
	assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
	assert_eq!(response.headers["allow"], "GET");
}

#[rstest]
fn test_discovery_failure_reports_searched_paths() {
	let dir = TempDir::new().unwrap();
	let container = InMemoryContainer::new(json!({
		"debugbar": { "resources_path": dir.path().join("missing") },
	}));

	// Explicit paths are not probed, so mounting succeeds
	assert!(ConfigProvider::new().mount(Router::new(), &container).is_ok());

	let err = devbar_middleware::assets::find_resources_path(&[dir.path().join("missing")])
		.unwrap_err();
	assert!(matches!(err, AssetsError::ResourcesNotFound { .. }));
	assert!(err.to_string().contains("missing"));
}

#[rstest]
#[tokio::test]
async fn test_handler_behind_shared_arc(layout: Layout) {
	let handler: Arc<dyn Handler> = Arc::new(handler(&layout));
	let request = Request::builder()
		.uri("/debugbar/css/widgets/widgets.base.css")
		.build()
		.unwrap();

	let response = handler.handle(request).await.unwrap();
	assert_eq!(response.status, StatusCode::OK);
}

proptest! {
	/// Any path climbing out of the root with `..` is refused
	fn prop_parent_segments_never_escape(
		depth in 1usize..6,
		target in prop::sample::select(vec!["outside.txt", "root-evil/secret.txt", "etc/passwd"]),
	) {
		let layout = layout();
		let handler = handler(&layout);
		let path = format!("/debugbar/{}{}", "../".repeat(depth), target);

		let rt = tokio::runtime::Runtime::new().unwrap();
		let response = rt.block_on(handler.serve(&path));
		prop_assert_eq!(response.status, StatusCode::NOT_FOUND);
		prop_assert!(response.body.is_empty());
	}

	/// Names under the root are either served from inside it or refused
	fn prop_arbitrary_names_stay_inside_root(name in "[a-z./]{0,24}") {
		let layout = layout();
		let handler = handler(&layout);

		let rt = tokio::runtime::Runtime::new().unwrap();
		let response = rt.block_on(handler.serve(&format!("/debugbar/{}", name)));
		if response.status == StatusCode::OK {
			let served = layout.root.join(&name).canonicalize().unwrap();
			prop_assert!(served.starts_with(layout.root.canonicalize().unwrap()));
		} else {
			prop_assert_eq!(response.status, StatusCode::NOT_FOUND);
		}
	}
}
