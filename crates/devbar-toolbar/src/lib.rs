//! # devbar-toolbar
//!
//! The debug toolbar engine behind the devbar middleware.
//!
//! A [`DebugBar`] owns an ordered set of [`DataCollector`]s (messages,
//! timing, memory, exceptions, request data, configuration dump). A
//! [`Renderer`] turns the collected data into the markup injected into HTML
//! pages: [`Renderer::render_head`] emits the stylesheet and script tags
//! pointing at the asset route, [`Renderer::render`] emits the toolbar
//! container and its dataset.
//!
//! ## Concurrency
//!
//! One `DebugBar` is shared by every request a middleware instance serves.
//! Each collector guards its tables with a `parking_lot::Mutex`, so the
//! engine can be mutated from any number of tasks. Per-request data
//! (messages, finished measures, exceptions, request info) is drained when
//! the toolbar is rendered.
//!
//! ## Quick Start
//!
//! ```rust
//! use devbar_toolbar::{DebugBar, JavascriptRenderer, Renderer};
//! use std::sync::Arc;
//!
//! let bar = Arc::new(DebugBar::standard());
//! bar.add_message("hello", "info").unwrap();
//!
//! let renderer = JavascriptRenderer::new(bar.clone()).with_base_url("/debugbar");
//! let head = renderer.render_head().unwrap();
//! assert!(head.contains("/debugbar/debugbar.css"));
//! let body = renderer.render().unwrap();
//! assert!(body.contains(devbar_toolbar::TOOLBAR_MARKER));
//! ```

#![warn(missing_docs)]

pub mod collectors;
pub mod debugbar;
pub mod error;
pub mod renderer;

pub use collectors::{
	ConfigCollector, DataCollector, ExceptionsCollector, MemoryCollector, MessagesCollector,
	RequestDataCollector, TimeDataCollector,
};
pub use debugbar::DebugBar;
pub use error::{ToolbarError, ToolbarResult};
pub use renderer::{JavascriptRenderer, Renderer, TOOLBAR_MARKER};
