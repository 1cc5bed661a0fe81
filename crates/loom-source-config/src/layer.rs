// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{ContextConfigLayer, FetchConfigLayer};

/// Source expansion configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SourceConfigLayer {
	#[serde(default)]
	pub fetch: Option<FetchConfigLayer>,
	#[serde(default)]
	pub context: Option<ContextConfigLayer>,
}

impl SourceConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: SourceConfigLayer) {
		merge_option(&mut self.fetch, other.fetch, FetchConfigLayer::merge);
		merge_option(&mut self.context, other.context, ContextConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
