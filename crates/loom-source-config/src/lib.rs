// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for JavaScript stack trace source expansion.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`LOOM_SOURCE_*`)
//!
//! # Usage
//!
//! ```ignore
//! use loom_source_config::load_config;
//!
//! let config = load_config()?;
//! println!("fetch timeout: {:?}", config.fetch.timeout);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::SourceConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved source expansion configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceConfig {
	pub fetch: FetchConfig,
	pub context: ContextConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`LOOM_SOURCE_*`)
/// 2. Config file (`/etc/loom/source.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<SourceConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<SourceConfig, ConfigError> {
	load_from(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<SourceConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<SourceConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = SourceConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: SourceConfigLayer) -> Result<SourceConfig, ConfigError> {
	let fetch = layer.fetch.unwrap_or_default().finalize();
	let context = layer.context.unwrap_or_default().finalize();

	validate_fetch(&fetch)?;

	info!(
		timeout_secs = fetch.timeout.as_secs(),
		max_body_bytes = fetch.max_body_bytes,
		max_attempts = fetch.max_attempts,
		lines_before = context.lines_before,
		lines_after = context.lines_after,
		"Source expansion configuration loaded"
	);

	Ok(SourceConfig { fetch, context })
}

fn validate_fetch(fetch: &FetchConfig) -> Result<(), ConfigError> {
	if fetch.timeout.is_zero() {
		return Err(ConfigError::Validation(
			"fetch.timeout_secs must be greater than zero".to_string(),
		));
	}
	if fetch.max_attempts == 0 {
		return Err(ConfigError::Validation(
			"fetch.max_attempts must be at least 1".to_string(),
		));
	}
	if fetch.max_body_bytes == 0 {
		return Err(ConfigError::Validation(
			"fetch.max_body_bytes must be greater than zero".to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_finalize_defaults() {
		let config = finalize(SourceConfigLayer::default()).unwrap();
		assert_eq!(config, SourceConfig::default());
	}

	#[test]
	fn test_zero_attempts_rejected() {
		let layer = SourceConfigLayer {
			fetch: Some(FetchConfigLayer {
				max_attempts: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer).unwrap_err();
		assert!(err.to_string().contains("max_attempts"));
	}

	#[test]
	fn test_zero_timeout_rejected() {
		let layer = SourceConfigLayer {
			fetch: Some(FetchConfigLayer {
				timeout_secs: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(finalize(layer), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_file_overrides_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[context]\nlines_before = 2\nlines_after = 4").unwrap();

		let config = load_from(vec![
			Box::new(TomlSource::new(file.path())),
			Box::new(DefaultsSource),
		])
		.unwrap();

		assert_eq!(config.context.lines_before, 2);
		assert_eq!(config.context.lines_after, 4);
		assert_eq!(config.fetch, FetchConfig::default());
	}
}
