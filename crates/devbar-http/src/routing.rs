//! Path patterns, route definitions, and a small dispatching router.
//!
//! Pattern syntax:
//!
//! - `{name}` captures one path segment (no `/`)
//! - `{name:*}` captures the rest of the path, including `/`
//! - `{name:<regex>}` captures whatever `<regex>` matches, e.g. `{file:.+}`
//! - everything else is matched literally
//!
//! Greedy captures may contain `..` segments. Handlers that touch the
//! filesystem with a captured value must confine it themselves.

use crate::error::{Error, Result};
use crate::middleware::Handler;
use crate::{Request, Response};
use async_trait::async_trait;
use hyper::Method;
use hyper::header::{ALLOW, HeaderValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Upper bound on compiled regex size for route patterns
const MAX_PATTERN_REGEX_SIZE: usize = 1 << 20;

/// A compiled route path pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
	regex: regex::Regex,
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compile a pattern string
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidPattern`] for unbalanced braces or a
	/// constraint that is not a valid regex.
	///
	/// # Examples
	///
	/// ```
	/// use devbar_http::PathPattern;
	///
	/// let pattern = PathPattern::new("/debugbar/{file:.+}").unwrap();
	/// let params = pattern.matches("/debugbar/css/app.css").unwrap();
	/// assert_eq!(params["file"], "css/app.css");
	/// assert!(pattern.matches("/debugbar/").is_none());
	/// ```
	pub fn new(pattern: &str) -> Result<Self> {
		let (regex_str, param_names) = Self::compile(pattern)?;
		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_PATTERN_REGEX_SIZE)
			.build()
			.map_err(|e| Error::InvalidPattern(format!("{}: {}", pattern, e)))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	fn compile(pattern: &str) -> Result<(String, Vec<String>)> {
		let mut regex_str = String::from("^");
		let mut param_names = Vec::new();
		let mut chars = pattern.chars();

		while let Some(c) = chars.next() {
			if c != '{' {
				regex_str.push_str(&regex::escape(&c.to_string()));
				continue;
			}

			// Read up to the matching '}' so constraints may contain braces
			let mut placeholder = String::new();
			let mut depth = 1;
			for next in chars.by_ref() {
				match next {
					'{' => depth += 1,
					'}' => depth -= 1,
					_ => {}
				}
				if depth == 0 {
					break;
				}
				placeholder.push(next);
			}
			if depth != 0 {
				return Err(Error::InvalidPattern(format!(
					"{}: unclosed '{{'",
					pattern
				)));
			}

			let (name, constraint) = match placeholder.split_once(':') {
				Some((name, constraint)) => (name, Some(constraint)),
				None => (placeholder.as_str(), None),
			};
			if name.is_empty() {
				return Err(Error::InvalidPattern(format!(
					"{}: empty parameter name",
					pattern
				)));
			}

			let body = match constraint {
				None => "[^/]+",
				Some("*") => ".*",
				Some(custom) => custom,
			};
			regex_str.push_str(&format!("(?P<{}>{})", name, body));
			param_names.push(name.to_string());
		}

		regex_str.push('$');
		Ok((regex_str, param_names))
	}

	/// The original pattern string
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Names of the captured parameters, in order
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Match a path, returning captured parameters on success
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.regex.captures(path).map(|caps| {
			self.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect()
		})
	}
}

/// Declarative route: a named path pattern bound to a handler role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
	/// Route name, e.g. `debugbar.assets`
	pub name: String,
	/// Path pattern, e.g. `/debugbar/{file:.+}`
	pub path: String,
	/// Name of the handler role serving this route
	pub handler: String,
	/// Methods accepted on this route; empty means any
	pub allowed_methods: Vec<Method>,
}

impl RouteDefinition {
	/// Create a route accepting any method
	pub fn new(name: impl Into<String>, path: impl Into<String>, handler: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			path: path.into(),
			handler: handler.into(),
			allowed_methods: Vec::new(),
		}
	}

	/// Restrict the route to the given methods
	pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
		self.allowed_methods = methods.into_iter().collect();
		self
	}

	/// Whether `method` is accepted by this route
	pub fn allows(&self, method: &Method) -> bool {
		self.allowed_methods.is_empty() || self.allowed_methods.contains(method)
	}
}

struct Route {
	definition: RouteDefinition,
	pattern: PathPattern,
	handler: Arc<dyn Handler>,
}

/// Dispatches requests to handlers by [`RouteDefinition`]
///
/// A path that matches a route but not its methods yields
/// `405 Method Not Allowed` with an `Allow` header. Unmatched paths go to
/// the fallback handler, or `404 Not Found` when none is set.
#[derive(Default)]
pub struct Router {
	routes: Vec<Route>,
	fallback: Option<Arc<dyn Handler>>,
}

impl Router {
	/// Create an empty router
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a route
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidPattern`] if the route path does not compile.
	pub fn route(mut self, definition: RouteDefinition, handler: Arc<dyn Handler>) -> Result<Self> {
		let pattern = PathPattern::new(&definition.path)?;
		self.routes.push(Route {
			definition,
			pattern,
			handler,
		});
		Ok(self)
	}

	/// Set the handler for requests no route matches
	pub fn fallback(mut self, handler: Arc<dyn Handler>) -> Self {
		self.fallback = Some(handler);
		self
	}

	/// Registered route definitions, in registration order
	pub fn definitions(&self) -> impl Iterator<Item = &RouteDefinition> {
		self.routes.iter().map(|r| &r.definition)
	}
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		let mut allowed: Vec<&Method> = Vec::new();

		for route in &self.routes {
			let Some(params) = route.pattern.matches(request.path()) else {
				continue;
			};
			if !route.definition.allows(&request.method) {
				allowed.extend(route.definition.allowed_methods.iter());
				continue;
			}

			tracing::trace!(route = %route.definition.name, path = %request.path(), "route matched");
			request.path_params = params;
			return route.handler.handle(request).await;
		}

		if !allowed.is_empty() {
			let allow = allowed
				.iter()
				.map(|m| m.as_str())
				.collect::<Vec<_>>()
				.join(", ");
			let mut response = Response::method_not_allowed();
			if let Ok(value) = HeaderValue::from_str(&allow) {
				response.headers.insert(ALLOW, value);
			}
			return Ok(response);
		}

		match &self.fallback {
			Some(fallback) => fallback.handle(request).await,
			None => Ok(Response::not_found()),
		}
	}
}
