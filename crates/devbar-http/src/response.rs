//! Outgoing HTTP response representation.

use bytes::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};

/// HTTP response produced by handlers
#[derive(Debug, Clone)]
pub struct Response {
	/// Status code
	pub status: StatusCode,
	/// Response headers
	pub headers: HeaderMap,
	/// Fully buffered body
	pub body: Bytes,
}

impl Response {
	/// Create an empty response with the given status
	///
	/// # Examples
	///
	/// ```
	/// use devbar_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::ACCEPTED);
	/// assert_eq!(response.status, StatusCode::ACCEPTED);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// 200 OK
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// 404 Not Found
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// 405 Method Not Allowed
	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	/// 500 Internal Server Error
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Set the response body
	///
	/// # Examples
	///
	/// ```
	/// use devbar_http::Response;
	/// use bytes::Bytes;
	///
	/// let response = Response::ok().with_body("Hello");
	/// assert_eq!(response.body, Bytes::from("Hello"));
	/// ```
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Insert a header, silently skipping invalid names or values
	///
	/// # Examples
	///
	/// ```
	/// use devbar_http::Response;
	///
	/// let response = Response::ok().with_header("Content-Type", "text/html");
	/// assert_eq!(response.content_type(), Some("text/html"));
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(header_name), Ok(header_value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(header_name, header_value);
		}
		self
	}

	/// Value of the `Content-Type` header, if present and valid UTF-8
	pub fn content_type(&self) -> Option<&str> {
		self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
	}

	/// Replace the body and keep `Content-Length` consistent with it
	///
	/// A `Content-Length` header is written only when one was present before,
	/// so streaming-style responses without the header keep that shape.
	pub fn replace_body(&mut self, body: impl Into<Bytes>) {
		self.body = body.into();
		if self.headers.contains_key(CONTENT_LENGTH) {
			self.headers
				.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));
		}
	}
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}
