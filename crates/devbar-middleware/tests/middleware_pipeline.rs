//! Middleware integration tests
//!
//! The middleware runs inside a `MiddlewareChain` in front of a `Router`, the
//! way a host application mounts it.

use async_trait::async_trait;
use devbar_conf::{EnvironmentSignals, ExecutionContext, InMemoryContainer};
use devbar_http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use devbar_http::{
	Error, Handler, MiddlewareChain, Request, Response, Result, RouteDefinition, Router, StatusCode,
};
use devbar_middleware::{DebugBarMiddleware, DebugBarMiddlewareFactory};
use devbar_toolbar::{Renderer, TOOLBAR_MARKER, ToolbarError, ToolbarResult};
use rstest::*;
use serde_json::json;
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const PAGE: &str = "<html><body><h1>Test</h1></body></html>";

/// Handler returning a fixed body and counting its invocations
struct Fixed {
	content_type: Option<&'static str>,
	body: &'static str,
	calls: AtomicUsize,
}

impl Fixed {
	fn new(content_type: Option<&'static str>, body: &'static str) -> Arc<Self> {
		Arc::new(Self {
			content_type,
			body,
			calls: AtomicUsize::new(0),
		})
	}
}

#[async_trait]
impl Handler for Fixed {
	async fn handle(&self, _request: Request) -> Result<Response> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		let mut response = Response::ok().with_body(self.body);
		if let Some(ct) = self.content_type {
			response.headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
		}
		response
			.headers
			.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));
		response
			.headers
			.insert("x-app", HeaderValue::from_static("kept"));
		Ok(response)
	}
}

struct Failing;

#[async_trait]
impl Handler for Failing {
	async fn handle(&self, _request: Request) -> Result<Response> {
		Err(Error::Internal("database unavailable".to_string()))
	}
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
	fn render_head(&self) -> ToolbarResult<String> {
		Err(ToolbarError::Render("template missing".to_string()))
	}

	fn render(&self) -> ToolbarResult<String> {
		Ok(String::new())
	}
}

fn development() -> EnvironmentSignals {
	EnvironmentSignals::new()
		.with_app_env("development")
		.with_debug("true")
}

fn chain(middleware: Arc<DebugBarMiddleware>, handler: Arc<dyn Handler>) -> MiddlewareChain {
	let router = Router::new()
		.route(RouteDefinition::new("page", "/page", "page"), handler)
		.unwrap();
	MiddlewareChain::new(Arc::new(router)).with_middleware(middleware)
}

fn get(path: &str) -> Request {
	Request::builder()
		.uri(path)
		.header("host", "app.test")
		.build()
		.unwrap()
}

fn text(response: &Response) -> &str {
	std::str::from_utf8(&response.body).unwrap()
}

#[rstest]
#[tokio::test]
async fn test_development_page_gets_toolbar() {
	let middleware = Arc::new(DebugBarMiddleware::new().with_environment(development()));
	let handler = Fixed::new(Some("text/html; charset=UTF-8"), PAGE);
	let app = chain(middleware, handler.clone());

	let response = app.handle(get("/page")).await.unwrap();
	let body = text(&response);

	assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
	assert_eq!(body.matches("</body>").count(), 1);
	assert!(body.contains("<h1>Test</h1>"));

	let (before, after) = body.split_once("</body>").unwrap();
	assert!(before.len() > "<html><body><h1>Test</h1>".len());
	assert!(before.contains(TOOLBAR_MARKER));
	assert!(before.contains("<style type=\"text/css\">"));
	assert_eq!(after, "</html>");

	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.headers["x-app"], "kept");
	assert_eq!(response.headers[CONTENT_LENGTH], body.len().to_string().as_str());
}

#[rstest]
#[case(EnvironmentSignals::new().with_app_env("production"))]
#[case(EnvironmentSignals::new().with_app_env("production").with_debug("true"))]
#[case(EnvironmentSignals::new().with_debug("false"))]
#[case(EnvironmentSignals::new().with_debug("0"))]
#[case(development().with_context(ExecutionContext::Cli))]
#[tokio::test]
async fn test_gate_closed_is_byte_for_byte(#[case] environment: EnvironmentSignals) {
	let middleware = Arc::new(DebugBarMiddleware::new().with_environment(environment));
	let handler = Fixed::new(Some("text/html"), PAGE);
	let app = chain(middleware.clone(), handler.clone());

	let response = app.handle(get("/page")).await.unwrap();

	assert_eq!(response.body, PAGE.as_bytes());
	assert!(!text(&response).contains(TOOLBAR_MARKER));
	assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
	assert!(middleware.debug_bar().messages().unwrap().messages().is_empty());
}

#[rstest]
#[case("application/json", r#"{"test": true}"#)]
#[case("text/plain", "plain </body> text")]
#[case("text/css", "body { color: red }")]
#[tokio::test]
async fn test_non_html_is_untouched(#[case] content_type: &'static str, #[case] body: &'static str) {
	let middleware = Arc::new(DebugBarMiddleware::new().with_environment(development()));
	let app = chain(middleware, Fixed::new(Some(content_type), body));

	let response = app.handle(get("/page")).await.unwrap();
	assert_eq!(response.body, body.as_bytes());
}

#[rstest]
#[tokio::test]
async fn test_render_failure_is_logged_and_response_kept() {
	use tracing_subscriber::layer::SubscriberExt as _;
	use tracing_subscriber::util::SubscriberInitExt as _;

	/// Captures the level and message of every event
	struct LogCapture {
		logs: Arc<Mutex<Vec<String>>>,
	}

	impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
		fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
			struct MessageVisitor {
				message: String,
			}

			impl tracing::field::Visit for MessageVisitor {
				fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
					if field.name() == "message" {
						self.message = format!("{:?}", value);
					}
				}
			}

			let mut visitor = MessageVisitor {
				message: String::new(),
			};
			event.record(&mut visitor);
			self.logs
				.lock()
				.unwrap()
				.push(format!("[{}] {}", event.metadata().level(), visitor.message));
		}
	}

	let logs = Arc::new(Mutex::new(Vec::new()));
	let _guard = tracing_subscriber::registry()
		.with(LogCapture { logs: logs.clone() })
		.set_default();

	let middleware = Arc::new(
		DebugBarMiddleware::new()
			.with_environment(development())
			.with_renderer(Arc::new(FailingRenderer)),
	);
	let app = chain(middleware, Fixed::new(Some("text/html"), PAGE));

	let response = app.handle(get("/page")).await.unwrap();
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(response.body, PAGE.as_bytes());
	assert_eq!(response.headers[CONTENT_LENGTH], PAGE.len().to_string().as_str());

	let captured = logs.lock().unwrap();
	assert!(
		captured
			.iter()
			.any(|line| line.starts_with("[ERROR]") && line.contains("DebugBar injection failed")),
		"expected an error log, got {:?}",
		*captured
	);
}

#[rstest]
#[tokio::test]
async fn test_inner_error_passes_through() {
	let middleware = Arc::new(DebugBarMiddleware::new().with_environment(development()));
	let app = chain(middleware.clone(), Arc::new(Failing));

	let err = app.handle(get("/page")).await.unwrap_err();
	assert!(matches!(err, Error::Internal(ref msg) if msg == "database unavailable"));

	let bar = middleware.debug_bar();
	assert!(!bar.time().unwrap().has_started_measure("request"));
	assert!(bar.time().unwrap().measures().is_empty());
	assert!(bar.messages().unwrap().messages().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_unmatched_route_has_no_anchor() {
	let middleware = Arc::new(DebugBarMiddleware::new().with_environment(development()));
	let app = chain(middleware, Fixed::new(None, PAGE));

	// Router answers 404 with an empty body: nothing to anchor on
	let response = app.handle(get("/missing")).await.unwrap();
	assert_eq!(response.status, StatusCode::NOT_FOUND);
	assert!(response.body.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_request_message_and_data_rendered_into_page() {
	let middleware = Arc::new(DebugBarMiddleware::new().with_environment(development()));
	let app = chain(middleware, Fixed::new(None, PAGE));

	let response = app.handle(get("/page?tab=2")).await.unwrap();
	let body = text(&response);

	assert!(body.contains("Request: GET http://app.test/page?tab=2"));
	assert!(body.contains("Request Processing"));
}

#[rstest]
#[tokio::test]
async fn test_shared_middleware_serves_concurrent_requests() {
	let middleware = Arc::new(DebugBarMiddleware::new().with_environment(development()));
	let app = Arc::new(chain(middleware.clone(), Fixed::new(Some("application/json"), "{}")));

	let tasks: Vec<_> = (0..16)
		.map(|_| {
			let app = app.clone();
			tokio::spawn(async move { app.handle(get("/page")).await.unwrap() })
		})
		.collect();
	for task in tasks {
		assert_eq!(task.await.unwrap().status, StatusCode::OK);
	}

	// Every request drains the shared engine once its response is ready
	let bar = middleware.debug_bar();
	assert!(bar.messages().unwrap().messages().is_empty());
	assert!(bar.time().unwrap().measures().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_unrendered_requests_do_not_accumulate() {
	let middleware = Arc::new(DebugBarMiddleware::new().with_environment(development()));
	let router = Router::new()
		.route(
			RouteDefinition::new("api", "/api", "api"),
			Fixed::new(Some("application/json"), r#"{"ok": true}"#),
		)
		.unwrap()
		.route(RouteDefinition::new("page", "/page", "page"), Fixed::new(None, PAGE))
		.unwrap()
		.route(RouteDefinition::new("boom", "/boom", "boom"), Arc::new(Failing))
		.unwrap();
	let app = MiddlewareChain::new(Arc::new(router)).with_middleware(middleware.clone());

	for i in 0..500 {
		app.handle(get(&format!("/api?n={}", i))).await.unwrap();
	}
	app.handle(get("/boom")).await.unwrap_err();

	let bar = middleware.debug_bar();
	assert!(bar.messages().unwrap().messages().is_empty());
	assert!(bar.time().unwrap().measures().is_empty());
	assert!(bar.exceptions().unwrap().exceptions().is_empty());

	// The next page shows only its own request
	let response = app.handle(get("/page")).await.unwrap();
	let body = text(&response);
	assert_eq!(body.matches("Request: GET").count(), 1);
	assert!(body.contains("Request: GET http://app.test/page"));
}

#[rstest]
#[tokio::test]
async fn test_latin1_page_gets_toolbar() {
	const LATIN1_PAGE: &[u8] = b"<html><body>caf\xe9</body></html>";

	struct Latin1;

	#[async_trait]
	impl Handler for Latin1 {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok()
				.with_header("content-type", "text/html; charset=iso-8859-1")
				.with_body(LATIN1_PAGE))
		}
	}

	let middleware = Arc::new(DebugBarMiddleware::new().with_environment(development()));
	let app = chain(middleware, Arc::new(Latin1));

	let response = app.handle(get("/page")).await.unwrap();
	let body = response.body.as_ref();
	let marker = TOOLBAR_MARKER.as_bytes();

	assert!(body.len() > LATIN1_PAGE.len());
	assert!(body.starts_with(b"<html><body>caf\xe9"));
	assert!(body.ends_with(b"</body></html>"));
	assert!(body.windows(marker.len()).any(|window| window == marker));
}

#[rstest]
#[serial(process_env)]
#[tokio::test]
async fn test_factory_reads_process_environment() {
	// SAFETY: serialized with every other test touching these variables
	unsafe {
		std::env::set_var("APP_ENV", "production");
		std::env::remove_var("DEBUG");
	}
	let middleware = DebugBarMiddlewareFactory::new().create(&InMemoryContainer::new(json!({})));
	unsafe {
		std::env::remove_var("APP_ENV");
	}

	assert!(!middleware.is_development_mode());
	let app = chain(Arc::new(middleware), Fixed::new(Some("text/html"), PAGE));
	let response = app.handle(get("/page")).await.unwrap();
	assert_eq!(response.body, PAGE.as_bytes());
}

#[rstest]
#[serial(process_env)]
#[tokio::test]
async fn test_process_environment_development() {
	unsafe {
		std::env::set_var("APP_ENV", "development");
		std::env::set_var("DEBUG", "true");
	}
	let middleware = DebugBarMiddleware::new();
	unsafe {
		std::env::remove_var("APP_ENV");
		std::env::remove_var("DEBUG");
	}

	let app = chain(Arc::new(middleware), Fixed::new(None, PAGE));
	let response = app.handle(get("/page")).await.unwrap();
	let body = text(&response);

	assert!(body.contains(TOOLBAR_MARKER));
	assert_eq!(body.matches("</body>").count(), 1);
	assert!(body.contains("<h1>Test</h1>"));
}
