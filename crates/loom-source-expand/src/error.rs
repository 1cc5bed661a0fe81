// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for fetching scripts, source maps and original sources.

use thiserror::Error;

/// Errors that can occur while fetching a URL.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("{url} returned HTTP {status}")]
	Status { url: String, status: u16 },

	#[error("response body of {url} exceeds {limit} bytes")]
	BodyTooLarge { url: String, limit: u64 },

	#[error("unsupported URL scheme {scheme:?} in {url}")]
	UnsupportedScheme { url: String, scheme: String },

	#[error("invalid URL {url:?}: {source}")]
	InvalidUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	#[error("no artifact available for {0}")]
	NotFound(String),

	#[error("invalid data URI: {0}")]
	InvalidDataUri(#[from] loom_source_map::DecodeError),
}

pub type Result<T> = std::result::Result<T, FetchError>;
