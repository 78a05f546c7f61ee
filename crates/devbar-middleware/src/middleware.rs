//! Debug toolbar injection middleware

use crate::assets::DEFAULT_PREFIX;
use crate::branding;
use crate::injection;
use async_trait::async_trait;
use devbar_conf::EnvironmentSignals;
use devbar_http::{HeaderMap, Handler, Method, Middleware, Request, Response, Result, Uri};
use devbar_toolbar::{DebugBar, JavascriptRenderer, Renderer, ToolbarResult};
use std::sync::Arc;

/// Name of the measure spanning the inner handler
pub const REQUEST_MEASURE: &str = "request";

/// Engine and renderer shared by every request one middleware serves
#[derive(Clone)]
struct ToolbarSession {
	debug_bar: Arc<DebugBar>,
	renderer: Arc<dyn Renderer>,
}

/// Injects the debug toolbar into HTML responses during development
///
/// Whether the middleware is active is decided once, from the
/// [`EnvironmentSignals`] it was built with. When inactive, requests pass
/// straight through and the instrumentation methods do nothing.
///
/// When active, each request is timed and logged to the toolbar, and HTML
/// responses (a `Content-Type` containing `text/html`, or none at all) that
/// contain `</body>` get the toolbar markup spliced in front of the last
/// closing body tag. A rendering failure is logged and the response is
/// returned untouched. Whatever the request left in the toolbar engine is
/// dropped once its response is ready, whether or not a toolbar was
/// rendered.
///
/// # Examples
///
/// ```rust
/// use devbar_conf::EnvironmentSignals;
/// use devbar_middleware::DebugBarMiddleware;
///
/// let middleware = DebugBarMiddleware::new()
///     .with_environment(EnvironmentSignals::new().with_app_env("production"));
/// assert!(!middleware.is_development_mode());
/// ```
pub struct DebugBarMiddleware {
	session: ToolbarSession,
	environment: EnvironmentSignals,
	development: bool,
}

impl DebugBarMiddleware {
	/// Standard toolbar, assets under `/debugbar`, gate from the process
	/// environment
	pub fn new() -> Self {
		Self::with_debug_bar(Arc::new(DebugBar::standard()), DEFAULT_PREFIX)
	}

	/// Use an existing toolbar engine with assets under `asset_path`
	pub fn with_debug_bar(debug_bar: Arc<DebugBar>, asset_path: impl Into<String>) -> Self {
		let renderer = JavascriptRenderer::new(debug_bar.clone())
			.with_base_url(asset_path)
			.with_include_vendors(true)
			.with_enable_jquery_no_conflict(false);
		let environment = EnvironmentSignals::from_env();
		let development = environment.is_development();

		Self {
			session: ToolbarSession {
				debug_bar,
				renderer: Arc::new(renderer),
			},
			environment,
			development,
		}
	}

	/// Replace the environment signals and re-evaluate the gate
	pub fn with_environment(mut self, environment: EnvironmentSignals) -> Self {
		self.development = environment.is_development();
		self.environment = environment;
		self
	}

	/// Replace the renderer
	pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
		self.session.renderer = renderer;
		self
	}

	/// The toolbar engine
	pub fn debug_bar(&self) -> &Arc<DebugBar> {
		&self.session.debug_bar
	}

	/// The renderer producing the injected markup
	pub fn renderer(&self) -> &Arc<dyn Renderer> {
		&self.session.renderer
	}

	/// The signals the gate was evaluated from
	pub fn environment(&self) -> &EnvironmentSignals {
		&self.environment
	}

	/// Whether requests are instrumented and responses decorated
	pub fn is_development_mode(&self) -> bool {
		self.development
	}

	/// Add a labelled message to the toolbar's message log
	pub fn add_message(&self, message: impl Into<String>, label: impl Into<String>) {
		if !self.development {
			return;
		}
		if let Err(e) = self.session.debug_bar.add_message(message, label) {
			tracing::debug!(error = %e, "Dropped toolbar message");
		}
	}

	/// Start a named timer; `label` defaults to the name
	pub fn start_measure(&self, name: &str, label: Option<&str>) {
		if !self.development {
			return;
		}
		if let Some(time) = self.session.debug_bar.time() {
			time.start_measure(name, label);
		}
	}

	/// Stop a named timer
	///
	/// Stopping a timer that is not running is logged and otherwise ignored.
	pub fn stop_measure(&self, name: &str) {
		if !self.development {
			return;
		}
		if let Some(time) = self.session.debug_bar.time()
			&& let Err(e) = time.stop_measure(name)
		{
			tracing::debug!(error = %e, "Ignored stop of a measure that was not running");
		}
	}

	/// Start timing a request and record it on the toolbar
	pub(crate) fn begin_request(&self, method: &Method, uri: &Uri, headers: &HeaderMap, full_url: &str) {
		self.start_measure(REQUEST_MEASURE, Some("Request Processing"));
		self.add_message(format!("Request: {} {}", method, full_url), "info");
		if let Some(request_data) = self.session.debug_bar.request_data() {
			request_data.record(method, uri, headers);
		}
	}

	/// Stop timing the request
	pub(crate) fn end_request(&self) {
		self.stop_measure(REQUEST_MEASURE);
	}

	/// Drop the request's data from the engine
	///
	/// Rendering already drains it; this covers responses that were never
	/// rendered into.
	pub(crate) fn finish_request(&self) {
		self.session.debug_bar.reset();
	}

	/// The body with the toolbar injected, or `None` to keep it as is
	///
	/// The body is searched as bytes, so any charset works. Bodies without
	/// `</body>` are kept. Render errors are logged and the body is kept.
	pub(crate) fn decorate_body(&self, body: &[u8]) -> Option<Vec<u8>> {
		injection::closing_body_position(body)?;

		match self.render_markup() {
			Ok(markup) => injection::inject_markup(body, &markup),
			Err(e) => {
				tracing::error!(error = %e, "DebugBar injection failed");
				None
			}
		}
	}

	fn render_markup(&self) -> ToolbarResult<String> {
		let head = self.session.renderer.render_head()?;
		let body = self.session.renderer.render()?;
		Ok(format!(
			"<style type=\"text/css\">{}</style>{}{}",
			branding::minimal_css(),
			head,
			body
		))
	}

	fn decorate(&self, response: &mut Response) {
		if !injection::is_html(&response.headers) {
			return;
		}
		if let Some(injected) = self.decorate_body(&response.body) {
			response.replace_body(injected);
		}
	}
}

impl Default for DebugBarMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Middleware for DebugBarMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		if !self.development {
			return next.handle(request).await;
		}

		self.begin_request(&request.method, &request.uri, &request.headers, &request.full_url());
		let result = next.handle(request).await;
		self.end_request();

		let result = match result {
			Ok(mut response) => {
				self.decorate(&mut response);
				Ok(response)
			}
			Err(e) => {
				tracing::debug!(error = %e, "Inner handler failed, no toolbar rendered");
				Err(e)
			}
		};

		self.finish_request();
		result
	}
}
