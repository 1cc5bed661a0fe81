// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map document decoding.
//!
//! Accepts a Source Map v3 JSON document, optionally wrapped in a base64
//! `data:` URI, and produces a [`SourceMapIndex`].

use std::collections::{BTreeMap, BTreeSet};

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use loom_source_core::split_lines;
use serde::Deserialize;
use tracing::trace;

use crate::error::{DecodeError, Result};
use crate::index::{MappingEntry, SourceMapIndex};
use crate::vlq::decode_mappings;

/// Base64 engine that accepts payloads with or without padding.
const DATA_URI_ENGINE: GeneralPurpose = GeneralPurpose::new(
	&alphabet::STANDARD,
	GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Prefix some servers put in front of JSON to defeat XSSI.
const XSSI_PREFIX: &str = ")]}";

/// Raw source map JSON structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
	version: u32,
	#[serde(default)]
	source_root: Option<String>,
	sources: Vec<String>,
	#[serde(default)]
	sources_content: Option<Vec<Option<String>>>,
	names: Vec<String>,
	mappings: String,
}

/// Returns true when `reference` is an inline `data:` URI.
pub fn is_data_uri(reference: &str) -> bool {
	reference
		.get(..5)
		.is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Decode a source map given either its JSON text or a `data:` URI.
pub fn decode(raw: &str) -> Result<SourceMapIndex> {
	let trimmed = raw.trim_start();
	if is_data_uri(trimmed) {
		let json = decode_data_uri(trimmed)?;
		decode_json(&json)
	} else {
		decode_json(raw)
	}
}

/// Extract the JSON text carried by a base64 `data:` URI.
///
/// The media type must be JSON-compatible (`application/json`,
/// `text/json`, `application/*+json`, ...).
pub fn decode_data_uri(uri: &str) -> Result<String> {
	if !is_data_uri(uri) {
		return Err(DecodeError::InvalidDataUri("missing data: scheme".to_string()));
	}

	let (header, payload) = uri[5..]
		.split_once(',')
		.ok_or_else(|| DecodeError::InvalidDataUri("missing ',' separator".to_string()))?;

	let mut params = header.split(';');
	let media_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
	if !media_type.contains("json") {
		return Err(DecodeError::InvalidDataUri(format!(
			"unsupported media type {media_type:?}"
		)));
	}
	if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
		return Err(DecodeError::InvalidDataUri(
			"only base64 payloads are supported".to_string(),
		));
	}

	let bytes = DATA_URI_ENGINE.decode(payload.trim())?;
	Ok(String::from_utf8(bytes)?)
}

/// Decode a source map JSON document.
pub fn decode_json(json: &str) -> Result<SourceMapIndex> {
	let json = strip_xssi_prefix(json);
	let raw: RawSourceMap = serde_json::from_str(json)?;

	if raw.version != 3 {
		return Err(DecodeError::InvalidVersion(raw.version));
	}

	let sources: Vec<String> = raw
		.sources
		.iter()
		.map(|source| resolve_source(raw.source_root.as_deref(), source))
		.collect();

	let segments = decode_mappings(&raw.mappings)?;
	let mut entries = Vec::with_capacity(segments.len());
	let mut referenced = BTreeSet::new();

	for segment in segments {
		let (source, original_line, original_col) = match segment.original {
			Some(original) => {
				let source = sources
					.get(original.source_index as usize)
					.ok_or(DecodeError::SourceIndexOutOfRange {
						index: original.source_index,
						len: sources.len(),
					})?;
				referenced.insert(source.clone());
				(Some(source.clone()), Some(original.line), Some(original.column))
			}
			None => (None, None, None),
		};

		let name = match segment.name_index {
			Some(index) => Some(
				raw.names
					.get(index as usize)
					.ok_or(DecodeError::NameIndexOutOfRange {
						index,
						len: raw.names.len(),
					})?
					.clone(),
			),
			None => None,
		};

		entries.push(MappingEntry {
			generated_line: segment.generated_line,
			generated_col: segment.generated_column,
			source,
			original_line,
			original_col,
			name,
		});
	}

	let contents: BTreeMap<String, Vec<String>> = raw
		.sources_content
		.unwrap_or_default()
		.into_iter()
		.zip(sources.iter())
		.filter_map(|(content, source)| {
			content.map(|text| {
				let lines = split_lines(&text).into_iter().map(str::to_string).collect();
				(source.clone(), lines)
			})
		})
		.collect();

	trace!(
		entries = entries.len(),
		sources = referenced.len(),
		inline_sources = contents.len(),
		"decoded source map"
	);

	Ok(SourceMapIndex::new(entries, referenced, contents))
}

fn strip_xssi_prefix(json: &str) -> &str {
	if json.starts_with(XSSI_PREFIX) {
		json.split_once('\n').map(|(_, rest)| rest).unwrap_or("")
	} else {
		json
	}
}

/// Prefix a source with `sourceRoot` when one is set.
fn resolve_source(root: Option<&str>, source: &str) -> String {
	match root {
		Some(root) if !root.is_empty() => {
			let root = root.trim_end_matches('/');
			format!("{}/{}", root, source.trim_start_matches('/'))
		}
		_ => source.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const BASE64_SOURCEMAP: &str = "data:application/json;base64,eyJ2ZXJzaW9uIjozLCJmaWxlIjoiZ2VuZXJhdGVkLmpzIiwic291cmNlcyI6WyIvdGVzdC5qcyJdLCJuYW1lcyI6W10sIm1hcHBpbmdzIjoiO0FBQUEiLCJzb3VyY2VzQ29udGVudCI6WyJjb25zb2xlLmxvZyhcImhlbGxvLCBXb3JsZCFcIikiXX0=";

	#[test]
	fn test_decode_base64_sourcemap() {
		let index = decode(BASE64_SOURCEMAP).unwrap();

		let entries = vec![MappingEntry {
			generated_line: 1,
			generated_col: 0,
			source: Some("/test.js".to_string()),
			original_line: Some(0),
			original_col: Some(0),
			name: None,
		}];
		let sources = BTreeSet::from(["/test.js".to_string()]);
		let contents = BTreeMap::from([(
			"/test.js".to_string(),
			vec!["console.log(\"hello, World!\")".to_string()],
		)]);

		assert_eq!(index, SourceMapIndex::new(entries, sources, contents));
		assert_eq!(index.keys(), &[(1, 0)]);
	}

	#[test]
	fn test_decode_json_with_names_and_content() {
		let json = r#"{
			"version": 3,
			"file": "out.js",
			"sources": ["src/index.ts", "src/unused.ts"],
			"sourcesContent": ["function hello() {\n  console.log('Hello, World!');\n}\n", null],
			"names": ["hello", "console", "log"],
			"mappings": "AAAA,SAASA;AACTC"
		}"#;

		let index = decode(json).unwrap();

		assert_eq!(index.len(), 3);
		assert_eq!(index.sources(), &BTreeSet::from(["src/index.ts".to_string()]));
		assert_eq!(index.entries()[1].name.as_deref(), Some("hello"));
		assert_eq!(index.entries()[1].generated_col, 9);
		assert_eq!(index.entries()[2].name.as_deref(), Some("console"));
		assert_eq!(index.entries()[2].original_line, Some(1));

		let lines = index.source_lines("src/index.ts").unwrap();
		assert_eq!(lines[1], "  console.log('Hello, World!');");
		assert_eq!(lines.len(), 4);
		assert!(index.source_lines("src/unused.ts").is_none());
	}

	#[test]
	fn test_source_root_is_applied() {
		let json = r#"{
			"version": 3,
			"sourceRoot": "webpack:///src/",
			"sources": ["index.ts"],
			"sourcesContent": ["x"],
			"names": [],
			"mappings": "AAAA"
		}"#;

		let index = decode(json).unwrap();
		assert_eq!(
			index.entries()[0].source.as_deref(),
			Some("webpack:///src/index.ts")
		);
		assert!(index.source_lines("webpack:///src/index.ts").is_some());
	}

	#[test]
	fn test_xssi_prefix_is_stripped() {
		let json = ")]}'\n{\"version\":3,\"sources\":[\"a.js\"],\"names\":[],\"mappings\":\"AAAA\"}";
		let index = decode(json).unwrap();
		assert_eq!(index.len(), 1);
	}

	#[test]
	fn test_invalid_version() {
		let json = r#"{"version": 2, "sources": [], "names": [], "mappings": ""}"#;
		assert!(matches!(decode(json), Err(DecodeError::InvalidVersion(2))));
	}

	#[test]
	fn test_missing_required_field() {
		let json = r#"{"version": 3, "sources": [], "mappings": ""}"#;
		assert!(matches!(decode(json), Err(DecodeError::InvalidJson(_))));
	}

	#[test]
	fn test_source_index_out_of_range() {
		let json = r#"{"version": 3, "sources": ["a.js"], "names": [], "mappings": "AAAA,ACAA"}"#;
		assert!(matches!(
			decode(json),
			Err(DecodeError::SourceIndexOutOfRange { index: 1, len: 1 })
		));
	}

	#[test]
	fn test_name_index_out_of_range() {
		let json = r#"{"version": 3, "sources": ["a.js"], "names": [], "mappings": "AAAAA"}"#;
		assert!(matches!(
			decode(json),
			Err(DecodeError::NameIndexOutOfRange { index: 0, len: 0 })
		));
	}

	#[test]
	fn test_invalid_base64_payload() {
		let uri = "data:application/json;base64,not*base64";
		assert!(matches!(decode(uri), Err(DecodeError::InvalidBase64(_))));
	}

	#[test]
	fn test_data_uri_media_type_must_be_json() {
		let uri = "data:text/plain;base64,e30=";
		assert!(matches!(decode(uri), Err(DecodeError::InvalidDataUri(_))));
	}

	#[test]
	fn test_data_uri_requires_base64() {
		let uri = "data:application/json,{}";
		assert!(matches!(decode(uri), Err(DecodeError::InvalidDataUri(_))));
	}

	#[test]
	fn test_data_uri_with_charset_and_no_padding() {
		// {"version":3,"sources":[],"names":[],"mappings":""}
		let uri = "data:application/json;charset=utf-8;base64,eyJ2ZXJzaW9uIjozLCJzb3VyY2VzIjpbXSwibmFtZXMiOltdLCJtYXBwaW5ncyI6IiJ9";
		let index = decode(uri).unwrap();
		assert!(index.is_empty());
	}

	#[test]
	fn test_invalid_utf8_payload() {
		// 0xff 0xfe
		let uri = "data:application/json;base64,//4=";
		assert!(matches!(decode(uri), Err(DecodeError::InvalidUtf8(_))));
	}
}
