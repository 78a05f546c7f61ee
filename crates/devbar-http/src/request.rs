//! Incoming HTTP request representation.

use crate::error::{Error, Result};
use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;

/// HTTP request as seen by handlers and middleware
#[derive(Debug, Clone)]
pub struct Request {
	/// Request method
	pub method: Method,
	/// Request target (often origin-form, e.g. `/path?query`)
	pub uri: Uri,
	/// Protocol version
	pub version: Version,
	/// Request headers
	pub headers: HeaderMap,
	/// Fully buffered request body
	pub body: Bytes,
	/// Parameters captured by the router
	pub path_params: HashMap<String, String>,
	is_secure: bool,
}

impl Request {
	/// Create a request from its parts
	///
	/// # Examples
	///
	/// ```
	/// use devbar_http::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/debugbar/debugbar.js"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.path(), "/debugbar/debugbar.js");
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			is_secure: false,
		}
	}

	/// Start building a request
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Path component of the request URI
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Whether the request arrived over TLS
	pub fn is_secure(&self) -> bool {
		self.is_secure
	}

	/// Reconstruct the absolute URL of the request
	///
	/// Absolute-form URIs are returned as-is. Origin-form URIs are completed
	/// with the `Host` header when one is present.
	///
	/// # Examples
	///
	/// ```
	/// use devbar_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/users?page=2")
	///     .header("host", "localhost:8080")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.full_url(), "http://localhost:8080/users?page=2");
	/// ```
	pub fn full_url(&self) -> String {
		absolute_url(&self.uri, &self.headers, self.is_secure)
	}

	/// Look up a parameter captured by the router
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}
}

/// Reconstruct an absolute URL from a request target and its headers
///
/// Absolute-form URIs are returned as-is. Origin-form URIs are completed with
/// the `Host` header when one is present, otherwise the path and query are
/// returned alone.
pub fn absolute_url(uri: &Uri, headers: &HeaderMap, secure: bool) -> String {
	if uri.scheme().is_some() && uri.authority().is_some() {
		return uri.to_string();
	}

	let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

	match headers.get(hyper::header::HOST).and_then(|h| h.to_str().ok()) {
		Some(host) => {
			let scheme = if secure { "https" } else { "http" };
			format!("{}://{}{}", scheme, host, path_and_query)
		}
		None => path_and_query.to_string(),
	}
}

/// Builder for [`Request`]
#[must_use = "builder does nothing until you call build()"]
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	version: Version,
	headers: HeaderMap,
	pending_headers: Vec<(String, String)>,
	body: Bytes,
	secure: bool,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: None,
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			pending_headers: Vec::new(),
			body: Bytes::new(),
			secure: false,
		}
	}
}

impl RequestBuilder {
	/// Set the request method
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Set the request URI
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	/// Set the protocol version
	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Replace all headers
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Add a single header; validated on [`build`](Self::build)
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.pending_headers.push((name.into(), value.into()));
		self
	}

	/// Set the request body
	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Mark the request as received over TLS
	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	/// Build the request
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidUri`] for an unparsable URI and
	/// [`Error::InvalidHeader`] for a malformed header.
	pub fn build(self) -> Result<Request> {
		let uri = match self.uri {
			Some(raw) => raw
				.parse::<Uri>()
				.map_err(|e| Error::InvalidUri(format!("{}: {}", raw, e)))?,
			None => Uri::from_static("/"),
		};

		let mut headers = self.headers;
		for (name, value) in self.pending_headers {
			let header_name = HeaderName::from_bytes(name.as_bytes())
				.map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
			let header_value = HeaderValue::from_str(&value)
				.map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
			headers.append(header_name, header_value);
		}

		let mut request = Request::new(self.method, uri, self.version, headers, self.body);
		request.is_secure = self.secure;
		Ok(request)
	}
}
