// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decoded source map entries with nearest-preceding lookup.

use std::collections::{BTreeMap, BTreeSet};

/// A generated position: `(line, column)`, both 0-indexed.
pub type Position = (u32, u32);

/// One decoded source map record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
	pub generated_line: u32,
	pub generated_col: u32,
	pub source: Option<String>,
	pub original_line: Option<u32>,
	pub original_col: Option<u32>,
	pub name: Option<String>,
}

impl MappingEntry {
	pub fn key(&self) -> Position {
		(self.generated_line, self.generated_col)
	}
}

/// Ordered mapping entries plus the inline source contents of a source map.
///
/// `keys[i]` always mirrors `entries[i].key()` and both are sorted by key,
/// with ties kept in decode order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMapIndex {
	entries: Vec<MappingEntry>,
	keys: Vec<Position>,
	sources: BTreeSet<String>,
	contents: BTreeMap<String, Vec<String>>,
}

impl SourceMapIndex {
	pub fn new(
		mut entries: Vec<MappingEntry>,
		sources: BTreeSet<String>,
		contents: BTreeMap<String, Vec<String>>,
	) -> Self {
		// Stable, so a well-formed map keeps its decode order exactly.
		entries.sort_by_key(MappingEntry::key);
		let keys = entries.iter().map(MappingEntry::key).collect();

		Self {
			entries,
			keys,
			sources,
			contents,
		}
	}

	/// Find the entry with the greatest key not after `(line, column)`.
	pub fn lookup(&self, line: u32, column: u32) -> Option<&MappingEntry> {
		let idx = self.keys.partition_point(|key| *key <= (line, column));
		idx.checked_sub(1).map(|i| &self.entries[i])
	}

	pub fn entries(&self) -> &[MappingEntry] {
		&self.entries
	}

	pub fn keys(&self) -> &[Position] {
		&self.keys
	}

	pub fn sources(&self) -> &BTreeSet<String> {
		&self.sources
	}

	pub fn contents(&self) -> &BTreeMap<String, Vec<String>> {
		&self.contents
	}

	/// Inline source lines for `source`, if the map embedded them.
	pub fn source_lines(&self, source: &str) -> Option<&[String]> {
		self.contents.get(source).map(Vec::as_slice)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn entry(line: u32, col: u32, original_line: u32) -> MappingEntry {
		MappingEntry {
			generated_line: line,
			generated_col: col,
			source: Some("src/app.ts".to_string()),
			original_line: Some(original_line),
			original_col: Some(0),
			name: None,
		}
	}

	fn index(entries: Vec<MappingEntry>) -> SourceMapIndex {
		SourceMapIndex::new(entries, BTreeSet::new(), BTreeMap::new())
	}

	#[test]
	fn test_lookup_nearest_preceding() {
		let idx = index(vec![entry(0, 0, 0), entry(0, 10, 1), entry(0, 20, 2), entry(2, 4, 7)]);

		assert_eq!(idx.lookup(0, 5).unwrap().original_line, Some(0));
		assert_eq!(idx.lookup(0, 10).unwrap().original_line, Some(1));
		assert_eq!(idx.lookup(0, 25).unwrap().original_line, Some(2));
		// Line 1 has no entries, so the last one on line 0 applies.
		assert_eq!(idx.lookup(1, 0).unwrap().original_line, Some(2));
		assert_eq!(idx.lookup(2, 3).unwrap().original_line, Some(2));
		assert_eq!(idx.lookup(9, 0).unwrap().original_line, Some(7));
	}

	#[test]
	fn test_lookup_before_first_entry_is_absent() {
		let idx = index(vec![entry(1, 0, 0)]);
		assert!(idx.lookup(0, 0).is_none());
		assert!(idx.lookup(0, 500).is_none());
		assert!(index(vec![]).lookup(0, 0).is_none());
	}

	#[test]
	fn test_keys_mirror_entries() {
		let idx = index(vec![entry(3, 1, 0), entry(0, 2, 1), entry(3, 0, 2)]);
		let expected: Vec<Position> = idx.entries().iter().map(MappingEntry::key).collect();
		assert_eq!(idx.keys(), expected.as_slice());
		assert_eq!(idx.keys(), &[(0, 2), (3, 0), (3, 1)]);
	}

	#[test]
	fn test_ties_keep_decode_order() {
		let idx = index(vec![entry(0, 0, 1), entry(0, 0, 2)]);
		let originals: Vec<_> = idx.entries().iter().map(|e| e.original_line).collect();
		assert_eq!(originals, vec![Some(1), Some(2)]);
		// The last of the tied entries is the greatest key <= query.
		assert_eq!(idx.lookup(0, 0).unwrap().original_line, Some(2));
	}

	proptest! {
		#[test]
		fn lookup_returns_greatest_key_not_after_query(
			positions in prop::collection::vec((0u32..20, 0u32..50), 0..40),
			query in (0u32..25, 0u32..60),
		) {
			let entries = positions
				.iter()
				.enumerate()
				.map(|(i, (line, col))| entry(*line, *col, i as u32))
				.collect();
			let idx = index(entries);

			let expected = positions.iter().filter(|p| **p <= query).max().copied();
			prop_assert_eq!(idx.lookup(query.0, query.1).map(MappingEntry::key), expected);
		}
	}
}
