// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP fetcher backed by reqwest.

use async_trait::async_trait;
use loom_source_config::FetchConfig;
use loom_source_core::UrlResult;
use loom_source_map::{decode_data_uri, is_data_uri};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{FetchError, Result};
use crate::fetch::SourceFetcher;
use crate::retry::{retry, RetryConfig};

/// Fetches `http(s)` URLs with a bounded body size and retries transient
/// failures. `data:` URIs are decoded locally and never touch the network.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
	client: Client,
	retry: RetryConfig,
	max_body_bytes: u64,
}

impl HttpFetcher {
	/// Build a fetcher from resolved configuration.
	///
	/// # Example
	/// ```ignore
	/// let config = loom_source_config::load_config()?;
	/// let fetcher = HttpFetcher::from_config(&config.fetch)?;
	/// ```
	pub fn from_config(config: &FetchConfig) -> Result<Self> {
		let client = Client::builder()
			.user_agent(config.user_agent.as_str())
			.timeout(config.timeout)
			.build()?;

		Ok(Self {
			client,
			retry: RetryConfig::from(config),
			max_body_bytes: config.max_body_bytes,
		})
	}

	pub fn with_retry(mut self, retry: RetryConfig) -> Self {
		self.retry = retry;
		self
	}

	async fn fetch_once(&self, url: &Url) -> Result<UrlResult> {
		let mut response = self.client.get(url.clone()).send().await?;

		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status {
				url: url.to_string(),
				status: status.as_u16(),
			});
		}

		if response
			.content_length()
			.is_some_and(|len| len > self.max_body_bytes)
		{
			return Err(self.too_large(url));
		}

		let headers: Vec<(String, String)> = response
			.headers()
			.iter()
			.filter_map(|(name, value)| {
				value
					.to_str()
					.ok()
					.map(|v| (name.as_str().to_string(), v.to_string()))
			})
			.collect();

		let mut body = Vec::new();
		while let Some(chunk) = response.chunk().await? {
			if (body.len() + chunk.len()) as u64 > self.max_body_bytes {
				return Err(self.too_large(url));
			}
			body.extend_from_slice(&chunk);
		}

		let body = String::from_utf8_lossy(&body).into_owned();
		debug!(url = %url, bytes = body.len(), "fetched");
		Ok(UrlResult::new(url.as_str(), headers, body))
	}

	fn too_large(&self, url: &Url) -> FetchError {
		FetchError::BodyTooLarge {
			url: url.to_string(),
			limit: self.max_body_bytes,
		}
	}
}

fn parse_http_url(raw: &str) -> Result<Url> {
	let url = Url::parse(raw).map_err(|source| FetchError::InvalidUrl {
		url: raw.to_string(),
		source,
	})?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		scheme => Err(FetchError::UnsupportedScheme {
			url: raw.to_string(),
			scheme: scheme.to_string(),
		}),
	}
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
	#[instrument(skip(self))]
	async fn fetch(&self, url: &str) -> Result<UrlResult> {
		if is_data_uri(url) {
			let body = decode_data_uri(url)?;
			return Ok(UrlResult::from_body(url, body));
		}

		let parsed = parse_http_url(url)?;
		retry(&self.retry, || self.fetch_once(&parsed)).await
	}
}
