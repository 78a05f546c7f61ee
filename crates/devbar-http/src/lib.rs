//! # devbar-http
//!
//! Minimal HTTP message types and the handler/middleware pipeline that the
//! devbar middleware and asset handler are written against.
//!
//! ## Pipeline
//!
//! - [`Handler`] turns a [`Request`] into a [`Response`]
//! - [`Middleware`] wraps the next handler (`process(request, next)`)
//! - [`MiddlewareChain`] composes middleware around a terminal handler
//! - [`Router`] dispatches requests by [`RouteDefinition`]
//!
//! ## Example
//!
//! ```rust
//! use devbar_http::{Handler, Request, Response, Result};
//! use async_trait::async_trait;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> Result<Response> {
//!         Ok(Response::ok().with_body("<html><body>Hello</body></html>"))
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod middleware;
pub mod request;
pub mod response;
pub mod routing;

pub use error::{Error, Result};
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{Request, RequestBuilder, absolute_url};
pub use response::Response;
pub use routing::{PathPattern, RouteDefinition, Router};

// Re-export the HTTP primitives used in public signatures
pub use hyper::{HeaderMap, Method, StatusCode, Uri, Version, header};
