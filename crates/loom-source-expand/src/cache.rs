// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Memoization scoped to a single expansion pass.
//!
//! Every distinct URL is fetched at most once per pass. Failures are cached
//! as `None` so a broken URL is not retried by later frames.

use std::collections::HashMap;
use std::sync::Arc;

use loom_source_core::UrlResult;
use loom_source_map::{decode, discover, is_data_uri, SourceMapIndex};
use tracing::{debug, warn};
use url::Url;

use crate::fetch::SourceFetcher;

/// A decoded source map plus the URL its sources are resolved against.
#[derive(Debug)]
pub struct LoadedSourceMap {
	pub base_url: String,
	pub index: SourceMapIndex,
}

#[derive(Default)]
pub struct PassCache {
	fetched: HashMap<String, Option<Arc<UrlResult>>>,
	discovered: HashMap<String, Option<String>>,
	sourcemaps: HashMap<String, Option<Arc<LoadedSourceMap>>>,
	fetch_failures: usize,
	decode_failures: usize,
}

impl PassCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn fetch<F>(&mut self, fetcher: &F, url: &str) -> Option<Arc<UrlResult>>
	where
		F: SourceFetcher + ?Sized,
	{
		if let Some(cached) = self.fetched.get(url) {
			debug!(url, hit = cached.is_some(), "fetch cache hit");
			return cached.clone();
		}

		let result = match fetcher.fetch(url).await {
			Ok(result) => Some(Arc::new(result)),
			Err(e) => {
				warn!(error = %e, url, "failed to fetch");
				self.fetch_failures += 1;
				None
			}
		};

		self.fetched.insert(url.to_string(), result.clone());
		result
	}

	/// The absolute source map reference for a fetched script, if it names one.
	pub fn discover(&mut self, script: &UrlResult) -> Option<String> {
		if let Some(cached) = self.discovered.get(script.url()) {
			return cached.clone();
		}

		let reference = discover(script).map(|reference| resolve_url(script.url(), &reference));
		if reference.is_none() {
			debug!(url = script.url(), "no source map reference");
		}

		self
			.discovered
			.insert(script.url().to_string(), reference.clone());
		reference
	}

	/// Fetch (unless inline) and decode the source map named by `reference`.
	pub async fn sourcemap<F>(
		&mut self,
		fetcher: &F,
		reference: &str,
		script_url: &str,
	) -> Option<Arc<LoadedSourceMap>>
	where
		F: SourceFetcher + ?Sized,
	{
		if let Some(cached) = self.sourcemaps.get(reference) {
			return cached.clone();
		}

		let loaded = if is_data_uri(reference) {
			self.decode(reference, script_url)
		} else {
			match self.fetch(fetcher, reference).await {
				Some(result) => self.decode(result.body(), reference),
				None => None,
			}
		};

		self.sourcemaps.insert(reference.to_string(), loaded.clone());
		loaded
	}

	fn decode(&mut self, raw: &str, base_url: &str) -> Option<Arc<LoadedSourceMap>> {
		match decode(raw) {
			Ok(index) => {
				debug!(base_url, entries = index.len(), "decoded source map");
				Some(Arc::new(LoadedSourceMap {
					base_url: base_url.to_string(),
					index,
				}))
			}
			Err(e) => {
				warn!(error = %e, base_url, "failed to decode source map");
				self.decode_failures += 1;
				None
			}
		}
	}

	pub fn fetch_failures(&self) -> usize {
		self.fetch_failures
	}

	pub fn decode_failures(&self) -> usize {
		self.decode_failures
	}
}

/// Resolve `reference` against `base`.
///
/// `data:` URIs and absolute URLs are returned unchanged. When `base` is not
/// an absolute URL (e.g. a bare path) the reference is joined onto the
/// directory of `base`.
pub fn resolve_url(base: &str, reference: &str) -> String {
	if is_data_uri(reference) || Url::parse(reference).is_ok() {
		return reference.to_string();
	}

	if let Ok(joined) = Url::parse(base).and_then(|base| base.join(reference)) {
		return joined.into();
	}

	match base.rfind('/') {
		Some(slash) if !reference.starts_with('/') => format!("{}{}", &base[..=slash], reference),
		_ => reference.to_string(),
	}
}
