//! HTML injection

use devbar_http::HeaderMap;
use devbar_http::header::CONTENT_TYPE;

/// Anchor the toolbar markup is placed in front of
pub const CLOSING_BODY_TAG: &str = "</body>";

/// Whether a response with these headers should receive the toolbar
///
/// True when `Content-Type` is absent or empty, or contains `text/html`
/// (case-sensitive). Multiple values are joined with `, ` before matching.
pub fn is_html(headers: &HeaderMap) -> bool {
	let values: Vec<&str> = headers
		.get_all(CONTENT_TYPE)
		.iter()
		.map(|v| v.to_str().unwrap_or(""))
		.collect();
	let content_type = values.join(", ");

	content_type.trim().is_empty() || content_type.contains("text/html")
}

/// Byte offset of the last `</body>` in `body`
pub fn closing_body_position(body: &[u8]) -> Option<usize> {
	let tag = CLOSING_BODY_TAG.as_bytes();
	body.windows(tag.len()).rposition(|window| window == tag)
}

/// Insert `markup` before the last `</body>` of `body`
///
/// Works on raw bytes so bodies in any ASCII-compatible charset are handled.
/// Returns `None` when there is no closing body tag to anchor on.
pub fn inject_markup(body: &[u8], markup: &str) -> Option<Vec<u8>> {
	let pos = closing_body_position(body)?;

	let mut injected = Vec::with_capacity(body.len() + markup.len());
	injected.extend_from_slice(&body[..pos]);
	injected.extend_from_slice(markup.as_bytes());
	injected.extend_from_slice(&body[pos..]);
	Some(injected)
}
