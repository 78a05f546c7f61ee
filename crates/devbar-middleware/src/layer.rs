//! Tower layer and axum router for the toolbar

use crate::assets::AssetsHandler;
use crate::injection;
use crate::middleware::DebugBarMiddleware;
use axum::body::Body;
use axum::extract::Request as AxumRequest;
use axum::http::header::CONTENT_LENGTH;
use axum::http::{HeaderValue, Request as HttpRequest, StatusCode};
use axum::response::Response as AxumResponse;
use axum::routing::get;
use devbar_http::absolute_url;
use http_body_util::BodyExt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer running [`DebugBarMiddleware`] around an axum service
#[derive(Clone)]
pub struct DebugBarLayer {
	middleware: Arc<DebugBarMiddleware>,
}

impl DebugBarLayer {
	/// Wrap a middleware
	pub fn new(middleware: DebugBarMiddleware) -> Self {
		Self::from_shared(Arc::new(middleware))
	}

	/// Share a middleware that is also used elsewhere, e.g. for instrumentation
	pub fn from_shared(middleware: Arc<DebugBarMiddleware>) -> Self {
		Self { middleware }
	}

	/// The wrapped middleware
	pub fn middleware(&self) -> &Arc<DebugBarMiddleware> {
		&self.middleware
	}
}

impl<S> Layer<S> for DebugBarLayer {
	type Service = DebugBarService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		DebugBarService {
			inner,
			middleware: self.middleware.clone(),
		}
	}
}

/// Service produced by [`DebugBarLayer`]
#[derive(Clone)]
pub struct DebugBarService<S> {
	inner: S,
	middleware: Arc<DebugBarMiddleware>,
}

impl<S> Service<AxumRequest> for DebugBarService<S>
where
	S: Service<AxumRequest, Response = AxumResponse> + Clone + Send + 'static,
	S::Future: Send + 'static,
	S::Error: Send + 'static,
{
	type Response = AxumResponse;
	type Error = S::Error;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, request: AxumRequest) -> Self::Future {
		let middleware = self.middleware.clone();
		if !middleware.is_development_mode() {
			return Box::pin(self.inner.call(request));
		}

		// The clone is not guaranteed ready, so drive the one poll_ready saw
		let clone = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, clone);

		Box::pin(async move {
			let full_url = absolute_url(request.uri(), request.headers(), false);
			middleware.begin_request(request.method(), request.uri(), request.headers(), &full_url);
			let result = inner.call(request).await;
			middleware.end_request();

			let result = match result {
				Ok(response) => Ok(decorate_response(&middleware, response).await),
				Err(e) => Err(e),
			};
			middleware.finish_request();
			result
		})
	}
}

async fn decorate_response(middleware: &DebugBarMiddleware, response: AxumResponse) -> AxumResponse {
	if !injection::is_html(response.headers()) {
		return response;
	}

	let (mut parts, body) = response.into_parts();
	let bytes = match body.collect().await {
		Ok(collected) => collected.to_bytes(),
		Err(e) => {
			tracing::error!(error = %e, "Failed to buffer response body for toolbar injection");
			return buffering_failed();
		}
	};

	match middleware.decorate_body(&bytes) {
		Some(injected) => {
			if parts.headers.contains_key(CONTENT_LENGTH) {
				parts
					.headers
					.insert(CONTENT_LENGTH, HeaderValue::from(injected.len()));
			}
			AxumResponse::from_parts(parts, Body::from(injected))
		}
		None => AxumResponse::from_parts(parts, Body::from(bytes)),
	}
}

/// Reply sent when the inner body cannot be read, instead of a truncated copy
fn buffering_failed() -> AxumResponse {
	let mut response = AxumResponse::new(Body::empty());
	*response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
	response
}

/// Router serving `handler` under `<prefix>{*file}`
pub fn assets_router(handler: Arc<AssetsHandler>) -> axum::Router {
	let path = format!("{}{{*file}}", handler.prefix());
	axum::Router::new().route(
		&path,
		get(move |request: HttpRequest<Body>| {
			let handler = handler.clone();
			async move { into_axum_response(handler.serve(request.uri().path()).await) }
		}),
	)
}

fn into_axum_response(response: devbar_http::Response) -> AxumResponse {
	let mut out = AxumResponse::new(Body::from(response.body));
	*out.status_mut() = response.status;
	*out.headers_mut() = response.headers;
	out
}
