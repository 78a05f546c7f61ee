//! Branding styles layered over the toolbar's own stylesheet
//!
//! The logo is embedded as an SVG data URI, percent-encoded with everything
//! except RFC 3986 unreserved characters escaped.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything but `A-Z a-z 0-9 - . _ ~`
const RFC3986_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'.')
	.remove(b'_')
	.remove(b'~');

const LOGO_PATHS: &str = concat!(
	r##"<path d="m6.958 42.353 9.78-5.647 9.782 5.647L16.739 48Z" fill="#faa"/>"##,
	r##"<path d="M6.958 42.353v-28.19l9.78 5.602V48Z" fill="#d40000"/>"##,
	r##"<path d="M6.958 14.162 31.41 0l9.781 5.647L16.74 19.765Z" fill="#f55"/>"##,
	r##"<path d="M41.191 5.647v11.294l-14.671 8.47v16.942L16.739 48V19.765Z" fill="#a00"/>"##,
);

fn logo_svg(size: u32) -> String {
	format!(
		r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 48 48">{LOGO_PATHS}</svg>"#
	)
}

/// The logo as a `data:` URI
pub fn logo_data_uri(size: u32) -> String {
	format!(
		"data:image/svg+xml,{}",
		utf8_percent_encode(&logo_svg(size), RFC3986_RESERVED)
	)
}

/// Logo plus header, tab and badge accents
pub fn full_css() -> String {
	format!(
		r#"a.devbar-restore-btn:after {{
	background: var(--devbar-header) url("{logo}") no-repeat center / 16px 16px !important;
}}
div.devbar-header {{
	background: linear-gradient(135deg, var(--devbar-header) 0%, var(--devbar-header) 95%, rgba(255, 85, 85, 0.1) 100%) !important;
}}
a.devbar-tab.devbar-active {{
	border-bottom-color: #ff5555 !important;
}}
a.devbar-tab span.devbar-badge.devbar-important {{
	background: #d40000 !important;
}}
"#,
		logo = logo_data_uri(20),
	)
}

/// Logo replacement only; this is what the middleware injects
pub fn minimal_css() -> String {
	format!(
		r#"a.devbar-restore-btn {{
	width: 32px !important;
	height: 32px !important;
	background: transparent !important;
	padding: 0 !important;
	display: flex !important;
	align-items: center !important;
	justify-content: center !important;
}}
a.devbar-restore-btn:after {{
	background: transparent url("{logo}") no-repeat center !important;
	background-size: 28px 28px !important;
	width: 28px !important;
	height: 28px !important;
	position: static !important;
}}
"#,
		logo = logo_data_uri(32),
	)
}
