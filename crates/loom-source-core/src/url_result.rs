// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fetch outcome shared between fetchers, discovery and expansion.

use std::collections::BTreeMap;

/// The result of fetching a URL: where it came from, its headers and its body.
///
/// Header names are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResult {
	url: String,
	headers: BTreeMap<String, String>,
	body: String,
}

impl UrlResult {
	pub fn new<I, K, V>(url: impl Into<String>, headers: I, body: impl Into<String>) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let headers = headers
			.into_iter()
			.map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
			.collect();

		Self {
			url: url.into(),
			headers,
			body: body.into(),
		}
	}

	/// A result with no headers, e.g. a decoded `data:` URI.
	pub fn from_body(url: impl Into<String>, body: impl Into<String>) -> Self {
		Self::new(url, std::iter::empty::<(&str, String)>(), body)
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn body(&self) -> &str {
		&self.body
	}

	/// Look up a header by name, ignoring case.
	pub fn header(&self, name: &str) -> Option<&str> {
		self
			.headers
			.get(&name.to_ascii_lowercase())
			.map(String::as_str)
	}

	pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
		self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_lookup_ignores_case() {
		let result = UrlResult::new(
			"http://example.com/app.js",
			[("X-SourceMap", "app.js.map")],
			"",
		);

		assert_eq!(result.header("x-sourcemap"), Some("app.js.map"));
		assert_eq!(result.header("X-SOURCEMAP"), Some("app.js.map"));
		assert_eq!(result.header("sourcemap"), None);
	}

	#[test]
	fn from_body_has_no_headers() {
		let result = UrlResult::from_body("data:text/plain,hi", "hi");
		assert_eq!(result.headers().count(), 0);
		assert_eq!(result.body(), "hi");
		assert_eq!(result.url(), "data:text/plain,hi");
	}
}
