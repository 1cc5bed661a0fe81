// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locating the source map that belongs to a fetched script.

use std::sync::LazyLock;

use loom_source_core::UrlResult;
use regex::Regex;

/// Headers checked in priority order.
const SOURCEMAP_HEADERS: [&str; 2] = ["x-sourcemap", "sourcemap"];

static SOURCE_MAPPING_URL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?m)//[@#][ \t]*sourceMappingURL=(\S+)[ \t\r]*$").unwrap()
});

/// Find the source map reference for a fetched script.
///
/// Headers win over the body. In the body the last
/// `//# sourceMappingURL=` (or legacy `//@`) comment wins. Returns `None` when
/// the script names no source map.
pub fn discover(result: &UrlResult) -> Option<String> {
	for name in SOURCEMAP_HEADERS {
		if let Some(value) = result.header(name).map(str::trim) {
			if !value.is_empty() {
				return Some(value.to_string());
			}
		}
	}

	SOURCE_MAPPING_URL
		.captures_iter(result.body())
		.last()
		.and_then(|caps| caps.get(1))
		.map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	const MAP_URL: &str = "http://example.com/source.map.js";

	fn body(body: &str) -> UrlResult {
		UrlResult::from_body("http://example.com", body)
	}

	#[test]
	fn test_no_reference() {
		assert_eq!(discover(&body("")), None);
		assert_eq!(discover(&body("console.log(true)")), None);
	}

	#[test]
	fn test_headers() {
		let result = UrlResult::new("http://example.com", [("x-sourcemap", MAP_URL)], "");
		assert_eq!(discover(&result).as_deref(), Some(MAP_URL));

		let result = UrlResult::new("http://example.com", [("SourceMap", MAP_URL)], "");
		assert_eq!(discover(&result).as_deref(), Some(MAP_URL));
	}

	#[test]
	fn test_body_comments() {
		let cases = [
			format!("//@ sourceMappingURL={MAP_URL}\nconsole.log(true)"),
			format!("//# sourceMappingURL={MAP_URL}\nconsole.log(true)"),
			format!("console.log(true)\n//@ sourceMappingURL={MAP_URL}"),
			format!("console.log(true)\n//# sourceMappingURL={MAP_URL}"),
			format!("console.log(true)\n//# sourceMappingURL={MAP_URL}\r\n"),
			format!("console.log(true);//# sourceMappingURL={MAP_URL}"),
		];

		for case in cases {
			assert_eq!(discover(&body(&case)).as_deref(), Some(MAP_URL), "body {case:?}");
		}
	}

	#[test]
	fn test_last_comment_wins() {
		let result = body(
			"//# sourceMappingURL=http://example.com/stale.map\nconsole.log(true)\n//# sourceMappingURL=app.js.map",
		);
		assert_eq!(discover(&result).as_deref(), Some("app.js.map"));
	}

	#[test]
	fn test_header_beats_comment() {
		let result = UrlResult::new(
			"http://example.com",
			[("sourcemap", "from-header.map")],
			"console.log(true)\n//# sourceMappingURL=from-comment.map",
		);
		assert_eq!(discover(&result).as_deref(), Some("from-header.map"));
	}

	#[test]
	fn test_x_sourcemap_beats_sourcemap() {
		let result = UrlResult::new(
			"http://example.com",
			[("sourcemap", "plain.map"), ("X-SourceMap", "x.map")],
			"",
		);
		assert_eq!(discover(&result).as_deref(), Some("x.map"));
	}

	#[test]
	fn test_empty_header_is_ignored() {
		let result = UrlResult::new(
			"http://example.com",
			[("x-sourcemap", " ")],
			"//# sourceMappingURL=app.js.map",
		);
		assert_eq!(discover(&result).as_deref(), Some("app.js.map"));
	}

	#[test]
	fn test_inline_data_uri_reference() {
		let uri = "data:application/json;base64,e30=";
		let result = body(&format!("x()\n//# sourceMappingURL={uri}"));
		assert_eq!(discover(&result).as_deref(), Some(uri));
	}
}
