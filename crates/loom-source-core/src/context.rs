// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source context extraction around a line.

/// Lines shown before the context line.
pub const CONTEXT_LINES_BEFORE: usize = 3;
/// Lines shown after the context line.
pub const CONTEXT_LINES_AFTER: usize = 5;

/// The lines surrounding a resolved position.
///
/// `pre_context` and `post_context` are `None` rather than empty when there
/// is nothing before or after the context line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
	pub pre_context: Option<Vec<String>>,
	pub context_line: String,
	pub post_context: Option<Vec<String>>,
}

/// Split source text into lines. `\n` is the only separator; `\r` is kept.
pub fn split_lines(text: &str) -> Vec<&str> {
	text.split('\n').collect()
}

/// Slice context around the 0-based line `index`.
///
/// Returns `None` when `index` is past the end of `lines`.
pub fn slice_context<S: AsRef<str>>(
	lines: &[S],
	index: usize,
	before: usize,
	after: usize,
) -> Option<SourceContext> {
	let context_line = lines.get(index)?.as_ref().to_string();

	let pre_start = index.saturating_sub(before);
	let post_end = index.saturating_add(1).saturating_add(after).min(lines.len());

	Some(SourceContext {
		pre_context: collect_non_empty(&lines[pre_start..index]),
		context_line,
		post_context: collect_non_empty(&lines[index + 1..post_end]),
	})
}

fn collect_non_empty<S: AsRef<str>>(lines: &[S]) -> Option<Vec<String>> {
	if lines.is_empty() {
		None
	} else {
		Some(lines.iter().map(|l| l.as_ref().to_string()).collect())
	}
}
