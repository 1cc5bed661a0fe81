// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Frame expansion: fetch, discover, decode, look up and slice context.

use loom_source_config::{ContextConfig, SourceConfig};
use loom_source_core::{
	module_name, slice_context, split_lines, ExceptionData, Frame, SourceContext, UrlResult,
	CONTEXT_LINES_AFTER, CONTEXT_LINES_BEFORE,
};
use tracing::{debug, info, instrument};

use crate::cache::{resolve_url, LoadedSourceMap, PassCache};
use crate::fetch::SourceFetcher;

/// Context window used when slicing source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
	pub lines_before: usize,
	pub lines_after: usize,
}

impl Default for ExpandOptions {
	fn default() -> Self {
		Self {
			lines_before: CONTEXT_LINES_BEFORE,
			lines_after: CONTEXT_LINES_AFTER,
		}
	}
}

impl From<ContextConfig> for ExpandOptions {
	fn from(config: ContextConfig) -> Self {
		Self {
			lines_before: config.lines_before,
			lines_after: config.lines_after,
		}
	}
}

impl From<&SourceConfig> for ExpandOptions {
	fn from(config: &SourceConfig) -> Self {
		config.context.into()
	}
}

/// What happened during one expansion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandReport {
	/// Frames visited.
	pub frames: usize,
	/// Frames that received source context.
	pub expanded: usize,
	/// Frames rewritten to an original source location.
	pub remapped: usize,
	/// Distinct URLs that could not be fetched.
	pub fetch_failures: usize,
	/// Distinct source maps that could not be decoded.
	pub decode_failures: usize,
}

/// An original location resolved through a source map, with its context.
struct Remapped {
	source: String,
	/// 1-based.
	lineno: u32,
	colno: u32,
	function: Option<String>,
	context: SourceContext,
}

/// Enriches JavaScript stack frames with source context, resolving them
/// through source maps where the scripts reference one.
pub struct FrameExpander<F> {
	fetcher: F,
	options: ExpandOptions,
}

impl<F: SourceFetcher> FrameExpander<F> {
	pub fn new(fetcher: F) -> Self {
		Self::with_options(fetcher, ExpandOptions::default())
	}

	pub fn with_options(fetcher: F, options: ExpandOptions) -> Self {
		Self { fetcher, options }
	}

	pub fn fetcher(&self) -> &F {
		&self.fetcher
	}

	/// Expand every frame of `data` in place.
	///
	/// Never fails: a frame whose script, map or original source cannot be
	/// obtained keeps its original fields. Caches live for this call only.
	#[instrument(skip(self, data), fields(frame_count = data.frame_count()))]
	pub async fn expand(&self, data: &mut ExceptionData) -> ExpandReport {
		let mut cache = PassCache::new();
		let mut report = ExpandReport::default();

		for frame in data.frames_mut() {
			report.frames += 1;
			self.expand_frame(&mut cache, frame, &mut report).await;
		}

		report.fetch_failures = cache.fetch_failures();
		report.decode_failures = cache.decode_failures();

		info!(
			frames = report.frames,
			expanded = report.expanded,
			remapped = report.remapped,
			fetch_failures = report.fetch_failures,
			decode_failures = report.decode_failures,
			"expanded stack frames"
		);

		report
	}

	async fn expand_frame(&self, cache: &mut PassCache, frame: &mut Frame, report: &mut ExpandReport) {
		let Some(abs_path) = frame.abs_path.clone() else {
			return;
		};
		let Some(lineno) = frame.lineno.filter(|&line| line > 0) else {
			debug!(abs_path = %abs_path, "frame has no line number, skipping");
			return;
		};
		let colno = frame.colno.unwrap_or(0);

		let Some(script) = cache.fetch(&self.fetcher, &abs_path).await else {
			return;
		};

		if let Some(remapped) = self.remap(cache, &script, lineno - 1, colno).await {
			let module = module_name(Some(&remapped.source));
			frame.filename = Some(module.clone());
			frame.module = Some(module);
			frame.lineno = Some(remapped.lineno);
			frame.colno = Some(remapped.colno);
			if remapped.function.is_some() {
				frame.function = remapped.function;
			}
			frame.set_context(remapped.context);
			report.remapped += 1;
			report.expanded += 1;
			return;
		}

		let lines = split_lines(script.body());
		if let Some(context) = self.slice(&lines, (lineno - 1) as usize) {
			frame.set_context(context);
			report.expanded += 1;
		} else {
			debug!(abs_path = %abs_path, lineno, "line out of range of fetched source");
		}
	}

	/// Resolve a 0-based generated position through the script's source map.
	///
	/// `None` unless the original source text is available, so the caller
	/// falls back to the generated script.
	async fn remap(
		&self,
		cache: &mut PassCache,
		script: &UrlResult,
		line: u32,
		column: u32,
	) -> Option<Remapped> {
		let reference = cache.discover(script)?;
		let map = cache
			.sourcemap(&self.fetcher, &reference, script.url())
			.await?;

		let Some(entry) = map.index.lookup(line, column) else {
			debug!(url = script.url(), line, column, "no mapping for position");
			return None;
		};
		let source = entry.source.clone()?;
		let original_line = entry.original_line?;
		let lineno = original_line.checked_add(1)?;
		let colno = entry.original_col.unwrap_or(0);
		let function = entry.name.clone();

		let Some(context) = self
			.original_context(cache, &map, &source, original_line as usize)
			.await
		else {
			debug!(source = %source, original_line, "original source unavailable, using generated script");
			return None;
		};

		Some(Remapped {
			source,
			lineno,
			colno,
			function,
			context,
		})
	}

	/// Context from inline `sourcesContent`, else from fetching the source
	/// relative to the map.
	async fn original_context(
		&self,
		cache: &mut PassCache,
		map: &LoadedSourceMap,
		source: &str,
		line: usize,
	) -> Option<SourceContext> {
		if let Some(lines) = map.index.source_lines(source) {
			return self.slice(lines, line);
		}

		let url = resolve_url(&map.base_url, source);
		let result = cache.fetch(&self.fetcher, &url).await?;
		self.slice(&split_lines(result.body()), line)
	}

	fn slice<S: AsRef<str>>(&self, lines: &[S], index: usize) -> Option<SourceContext> {
		slice_context(
			lines,
			index,
			self.options.lines_before,
			self.options.lines_after,
		)
	}
}
