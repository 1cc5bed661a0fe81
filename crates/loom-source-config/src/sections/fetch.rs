// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Remote fetch configuration.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;

/// Fetch configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
	pub timeout: Duration,
	pub max_body_bytes: u64,
	pub user_agent: String,
	pub max_attempts: u32,
	pub retry_base_delay: Duration,
}

impl Default for FetchConfig {
	fn default() -> Self {
		FetchConfigLayer::default().finalize()
	}
}

/// Fetch configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FetchConfigLayer {
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(default)]
	pub max_body_bytes: Option<u64>,
	#[serde(default)]
	pub user_agent: Option<String>,
	#[serde(default)]
	pub max_attempts: Option<u32>,
	#[serde(default)]
	pub retry_base_delay_ms: Option<u64>,
}

impl FetchConfigLayer {
	pub fn merge(&mut self, other: FetchConfigLayer) {
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.max_body_bytes.is_some() {
			self.max_body_bytes = other.max_body_bytes;
		}
		if other.user_agent.is_some() {
			self.user_agent = other.user_agent;
		}
		if other.max_attempts.is_some() {
			self.max_attempts = other.max_attempts;
		}
		if other.retry_base_delay_ms.is_some() {
			self.retry_base_delay_ms = other.retry_base_delay_ms;
		}
	}

	pub fn finalize(self) -> FetchConfig {
		FetchConfig {
			timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
			max_body_bytes: self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES),
			user_agent: self.user_agent.unwrap_or_else(default_user_agent),
			max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
			retry_base_delay: Duration::from_millis(
				self
					.retry_base_delay_ms
					.unwrap_or(DEFAULT_RETRY_BASE_DELAY_MS),
			),
		}
	}
}

/// Format: `loom-source/{version}`
pub fn default_user_agent() -> String {
	format!("loom-source/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = FetchConfigLayer::default().finalize();
		assert_eq!(config.timeout, Duration::from_secs(30));
		assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
		assert_eq!(config.max_attempts, 3);
		assert_eq!(config.retry_base_delay, Duration::from_millis(200));
		assert!(config.user_agent.starts_with("loom-source/"));
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = FetchConfigLayer {
			timeout_secs: Some(10),
			user_agent: Some("base/1.0".to_string()),
			..Default::default()
		};
		let overlay = FetchConfigLayer {
			timeout_secs: Some(5),
			max_attempts: Some(1),
			..Default::default()
		};
		base.merge(overlay);

		assert_eq!(base.timeout_secs, Some(5));
		assert_eq!(base.max_attempts, Some(1));
		assert_eq!(base.user_agent.as_deref(), Some("base/1.0"));
	}

	#[test]
	fn test_deserialize_partial() {
		let layer: FetchConfigLayer = toml::from_str("timeout_secs = 7\nuser_agent = \"probe\"").unwrap();
		let config = layer.finalize();
		assert_eq!(config.timeout, Duration::from_secs(7));
		assert_eq!(config.user_agent, "probe");
		assert_eq!(config.max_attempts, 3);
	}
}
