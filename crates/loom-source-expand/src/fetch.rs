// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The fetch seam used by the expander.

use std::collections::HashMap;

use async_trait::async_trait;
use loom_source_core::UrlResult;

use crate::error::{FetchError, Result};

/// Retrieves scripts, source maps and original sources by URL.
///
/// Implementations own their timeout and retry policy. The expander treats
/// every error as "this URL is unavailable for the rest of the pass".
#[async_trait]
pub trait SourceFetcher: Send + Sync {
	async fn fetch(&self, url: &str) -> Result<UrlResult>;
}

#[async_trait]
impl<T: SourceFetcher + ?Sized> SourceFetcher for std::sync::Arc<T> {
	async fn fetch(&self, url: &str) -> Result<UrlResult> {
		(**self).fetch(url).await
	}
}

/// Serves pre-registered artifacts, e.g. files uploaded alongside a release.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFetcher {
	artifacts: HashMap<String, UrlResult>,
}

impl InMemoryFetcher {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a body with no headers under `url`.
	pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
		let url = url.into();
		let result = UrlResult::from_body(url.clone(), body);
		self.artifacts.insert(url, result);
	}

	/// Register a complete fetch result under its own URL.
	pub fn insert_result(&mut self, result: UrlResult) {
		self.artifacts.insert(result.url().to_string(), result);
	}

	pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
		self.insert(url, body);
		self
	}
}

#[async_trait]
impl SourceFetcher for InMemoryFetcher {
	async fn fetch(&self, url: &str) -> Result<UrlResult> {
		self
			.artifacts
			.get(url)
			.cloned()
			.ok_or_else(|| FetchError::NotFound(url.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_registered_artifact_is_served() {
		let fetcher = InMemoryFetcher::new().with("http://example.com/app.js", "boom()");
		let result = fetcher.fetch("http://example.com/app.js").await.unwrap();
		assert_eq!(result.body(), "boom()");
		assert_eq!(result.headers().count(), 0);
	}

	#[tokio::test]
	async fn test_missing_artifact_is_not_found() {
		let fetcher = InMemoryFetcher::new();
		let err = fetcher.fetch("http://example.com/missing.js").await.unwrap_err();
		assert!(matches!(err, FetchError::NotFound(url) if url.ends_with("missing.js")));
	}

	#[tokio::test]
	async fn test_headers_are_kept() {
		let mut fetcher = InMemoryFetcher::new();
		fetcher.insert_result(UrlResult::new(
			"http://example.com/app.js",
			[("SourceMap", "app.js.map")],
			"",
		));
		let result = fetcher.fetch("http://example.com/app.js").await.unwrap();
		assert_eq!(result.header("sourcemap"), Some("app.js.map"));
	}
}
