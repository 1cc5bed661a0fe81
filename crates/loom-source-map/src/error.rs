// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for source map decoding.

use thiserror::Error;

/// Errors that can occur while decoding a source map document.
#[derive(Debug, Error)]
pub enum DecodeError {
	#[error("invalid source map JSON: {0}")]
	InvalidJson(#[from] serde_json::Error),

	#[error("invalid source map version: expected 3, got {0}")]
	InvalidVersion(u32),

	#[error("invalid data URI: {0}")]
	InvalidDataUri(String),

	#[error("invalid base64 payload: {0}")]
	InvalidBase64(#[from] base64::DecodeError),

	#[error("source map is not valid UTF-8: {0}")]
	InvalidUtf8(#[from] std::string::FromUtf8Error),

	#[error("invalid VLQ character: {0:?}")]
	InvalidVlqChar(char),

	#[error("truncated VLQ group in segment {0:?}")]
	TruncatedVlq(String),

	#[error("VLQ value overflows 32 bits in segment {0:?}")]
	VlqOverflow(String),

	#[error("malformed mapping segment {segment:?}: expected 1, 4 or 5 fields, got {fields}")]
	MalformedSegment { segment: String, fields: usize },

	#[error("negative {field} in mapping on generated line {line}")]
	NegativeValue { field: &'static str, line: u32 },

	#[error("{field} exceeds 2147483647 in mapping on generated line {line}")]
	ValueTooLarge { field: &'static str, line: u32 },

	#[error("source index {index} out of range ({len} sources)")]
	SourceIndexOutOfRange { index: u32, len: usize },

	#[error("name index {index} out of range ({len} names)")]
	NameIndexOutOfRange { index: u32, len: usize },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
