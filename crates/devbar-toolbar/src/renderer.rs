//! Toolbar renderers

use crate::debugbar::DebugBar;
use crate::error::{ToolbarError, ToolbarResult};
use std::sync::Arc;

/// Attribute present on the toolbar container in rendered markup
pub const TOOLBAR_MARKER: &str = "data-devbar-id";

const VENDOR_CSS: &[&str] = &["vendor/font-awesome/css/font-awesome.min.css"];
const VENDOR_JS: &[&str] = &["vendor/jquery/dist/jquery.min.js"];
const CORE_CSS: &[&str] = &["debugbar.css", "widgets.css", "openhandler.css"];
const CORE_JS: &[&str] = &["debugbar.js", "widgets.js", "openhandler.js"];

/// Turns a [`DebugBar`] into HTML fragments
pub trait Renderer: Send + Sync {
	/// Markup for the document head: stylesheets and scripts
	fn render_head(&self) -> ToolbarResult<String>;

	/// Markup for the toolbar itself, collecting the bar's current data
	fn render(&self) -> ToolbarResult<String>;
}

/// Renders the toolbar for the JavaScript front-end
///
/// Asset URLs are built from the base URL, which must match the route the
/// assets handler is mounted on.
#[derive(Clone)]
pub struct JavascriptRenderer {
	debug_bar: Arc<DebugBar>,
	base_url: String,
	include_vendors: bool,
	enable_jquery_no_conflict: bool,
}

impl JavascriptRenderer {
	/// Create a renderer with base URL `/debugbar`
	pub fn new(debug_bar: Arc<DebugBar>) -> Self {
		Self {
			debug_bar,
			base_url: "/debugbar".to_string(),
			include_vendors: true,
			enable_jquery_no_conflict: true,
		}
	}

	/// Set the URL prefix used for asset links
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		let base_url = base_url.into();
		self.base_url = base_url.trim_end_matches('/').to_string();
		self
	}

	/// Whether to link the bundled vendor libraries
	pub fn with_include_vendors(mut self, include: bool) -> Self {
		self.include_vendors = include;
		self
	}

	/// Whether to release jQuery's `$` after loading it
	pub fn with_enable_jquery_no_conflict(mut self, enable: bool) -> Self {
		self.enable_jquery_no_conflict = enable;
		self
	}

	/// URL prefix used for asset links
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// The engine this renderer reads from
	pub fn debug_bar(&self) -> &Arc<DebugBar> {
		&self.debug_bar
	}

	/// Stylesheet and script URLs, vendors first
	pub fn asset_urls(&self) -> (Vec<String>, Vec<String>) {
		let pick = |vendor: &[&str], core: &[&str]| {
			let vendor = if self.include_vendors { vendor } else { &[] };
			vendor
				.iter()
				.chain(core.iter())
				.map(|file| format!("{}/{}", self.base_url, file))
				.collect::<Vec<_>>()
		};
		(pick(VENDOR_CSS, CORE_CSS), pick(VENDOR_JS, CORE_JS))
	}
}

impl Renderer for JavascriptRenderer {
	fn render_head(&self) -> ToolbarResult<String> {
		let (css, js) = self.asset_urls();
		let mut html = String::new();
		for url in css {
			html.push_str(&format!(
				"<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">\n",
				escape_attr(&url)
			));
		}
		for url in js {
			html.push_str(&format!(
				"<script type=\"text/javascript\" src=\"{}\"></script>\n",
				escape_attr(&url)
			));
		}
		if self.include_vendors && self.enable_jquery_no_conflict {
			html.push_str("<script type=\"text/javascript\">jQuery.noConflict(true);</script>\n");
		}
		Ok(html)
	}

	fn render(&self) -> ToolbarResult<String> {
		let data = self.debug_bar.collect()?;
		let id = data
			.get("__meta")
			.and_then(|meta| meta.get("id"))
			.and_then(|id| id.as_str())
			.ok_or_else(|| ToolbarError::Render("collected data has no id".to_string()))?
			.to_string();

		let widgets = script_json(&serde_json::to_string(&self.debug_bar.widgets())?);
		let dataset = script_json(&serde_json::to_string(&data)?);

		Ok(format!(
			"<div class=\"devbar\" {marker}=\"{id}\"></div>\n\
			<script type=\"text/javascript\">\n\
			var devbar = new DevBar.StandardDebugBar({{ container: '[{marker}=\"{id}\"]' }});\n\
			devbar.addWidgets({widgets});\n\
			devbar.addDataSet({dataset}, \"{id}\");\n\
			</script>\n",
			marker = TOOLBAR_MARKER,
			id = escape_attr(&id),
		))
	}
}

fn escape_attr(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('"', "&quot;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

/// JSON embedded in a script element must not close it
fn script_json(json: &str) -> String {
	json.replace("</", "<\\/")
}
