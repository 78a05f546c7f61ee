//! Content types for toolbar assets

use std::path::Path;

/// Fallback for unknown extensions
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for a file, from its extension (case-insensitive)
///
/// # Examples
///
/// ```
/// use devbar_middleware::mime::content_type_for;
/// use std::path::Path;
///
/// assert_eq!(content_type_for(Path::new("widgets.CSS")), "text/css");
/// assert_eq!(content_type_for(Path::new("LICENSE")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
	let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
		return OCTET_STREAM;
	};

	match extension.to_ascii_lowercase().as_str() {
		"css" => "text/css",
		"js" => "application/javascript",
		"png" => "image/png",
		"gif" => "image/gif",
		"jpg" | "jpeg" => "image/jpeg",
		"svg" => "image/svg+xml",
		"woff" => "font/woff",
		"woff2" => "font/woff2",
		"ttf" => "font/ttf",
		"eot" => "application/vnd.ms-fontobject",
		"ico" => "image/x-icon",
		"json" => "application/json",
		"xml" => "application/xml",
		"txt" => "text/plain",
		_ => OCTET_STREAM,
	}
}
