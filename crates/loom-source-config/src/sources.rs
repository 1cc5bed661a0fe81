// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::SourceConfigLayer;
use crate::sections::{ContextConfigLayer, FetchConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<SourceConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<SourceConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(SourceConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/loom/source.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<SourceConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(SourceConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: SourceConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: LOOM_SOURCE_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<SourceConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(SourceConfigLayer {
			fetch: Some(load_fetch_from_env()?),
			context: Some(load_context_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_fetch_from_env() -> Result<FetchConfigLayer, ConfigError> {
	Ok(FetchConfigLayer {
		timeout_secs: env_parse("LOOM_SOURCE_FETCH_TIMEOUT_SECS", "u64")?,
		max_body_bytes: env_parse("LOOM_SOURCE_FETCH_MAX_BODY_BYTES", "u64")?,
		user_agent: env_var("LOOM_SOURCE_FETCH_USER_AGENT"),
		max_attempts: env_parse("LOOM_SOURCE_FETCH_MAX_ATTEMPTS", "u32")?,
		retry_base_delay_ms: env_parse("LOOM_SOURCE_FETCH_RETRY_BASE_DELAY_MS", "u64")?,
	})
}

fn load_context_from_env() -> Result<ContextConfigLayer, ConfigError> {
	Ok(ContextConfigLayer {
		lines_before: env_parse("LOOM_SOURCE_CONTEXT_LINES_BEFORE", "usize")?,
		lines_after: env_parse("LOOM_SOURCE_CONTEXT_LINES_AFTER", "usize")?,
	})
}
