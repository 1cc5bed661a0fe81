// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logical module names derived from script URLs.
//!
//! Build pipelines decorate script paths with version directories, commit
//! hashes and cache-busting suffixes. [`module_name`] strips that noise so
//! `http://cdn.example.com/v1.2.0/js/app/main-3f2a9c1d.min.js` and
//! `../../app/main.js` both become `app/main`.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Returned when there is no URL to derive a name from.
pub const UNKNOWN_MODULE: &str = "<unknown module>";

static VERSION_SEGMENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[vV]?\d+(?:\.\d+)*$").unwrap());

static HASH_SEGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{7,}$").unwrap());

static HASH_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-.][0-9a-fA-F]{7,}$").unwrap());

/// Derive a logical module name from a URL or path.
pub fn module_name(url: Option<&str>) -> String {
	let Some(url) = url else {
		return UNKNOWN_MODULE.to_string();
	};

	let path = url_path(url);
	let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

	let Some(filename) = segments.pop() else {
		return UNKNOWN_MODULE.to_string();
	};

	// The filename itself is never filtered, so a name made only of noise
	// directories still falls back to its basename.
	let stem = strip_hash_suffix(strip_extension(filename));
	if stem.is_empty() {
		return UNKNOWN_MODULE.to_string();
	}

	let mut kept: Vec<&str> = segments
		.into_iter()
		.filter(|segment| !is_noise_segment(segment))
		.collect();
	kept.push(stem);
	kept.join("/")
}

/// The path component of an absolute URL, or the input minus any query and
/// fragment when it is a relative path.
fn url_path(input: &str) -> String {
	match Url::parse(input) {
		Ok(url) if !url.cannot_be_a_base() => url.path().to_string(),
		_ => {
			let end = input.find(['?', '#']).unwrap_or(input.len());
			input[..end].to_string()
		}
	}
}

fn strip_extension(filename: &str) -> &str {
	let stem = match filename.rfind('.') {
		Some(pos) if pos > 0 => &filename[..pos],
		_ => filename,
	};
	stem.strip_suffix(".min").unwrap_or(stem)
}

fn strip_hash_suffix(stem: &str) -> &str {
	match HASH_SUFFIX.find(stem) {
		Some(m) if m.start() > 0 => &stem[..m.start()],
		_ => stem,
	}
}

/// Directory segments that carry no module identity.
fn is_noise_segment(segment: &str) -> bool {
	segment.starts_with(['_', '.', '~'])
		|| segment.eq_ignore_ascii_case("js")
		|| segment.eq_ignore_ascii_case("javascript")
		|| VERSION_SEGMENT.is_match(segment)
		|| HASH_SEGMENT.is_match(segment)
}
