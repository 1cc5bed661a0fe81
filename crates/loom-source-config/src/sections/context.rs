// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source context window configuration.

use serde::Deserialize;

const DEFAULT_LINES_BEFORE: usize = 3;
const DEFAULT_LINES_AFTER: usize = 5;

/// Context window configuration (runtime, fully resolved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextConfig {
	pub lines_before: usize,
	pub lines_after: usize,
}

impl Default for ContextConfig {
	fn default() -> Self {
		Self {
			lines_before: DEFAULT_LINES_BEFORE,
			lines_after: DEFAULT_LINES_AFTER,
		}
	}
}

/// Context configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ContextConfigLayer {
	#[serde(default)]
	pub lines_before: Option<usize>,
	#[serde(default)]
	pub lines_after: Option<usize>,
}

impl ContextConfigLayer {
	pub fn merge(&mut self, other: ContextConfigLayer) {
		if other.lines_before.is_some() {
			self.lines_before = other.lines_before;
		}
		if other.lines_after.is_some() {
			self.lines_after = other.lines_after;
		}
	}

	pub fn finalize(self) -> ContextConfig {
		ContextConfig {
			lines_before: self.lines_before.unwrap_or(DEFAULT_LINES_BEFORE),
			lines_after: self.lines_after.unwrap_or(DEFAULT_LINES_AFTER),
		}
	}
}
