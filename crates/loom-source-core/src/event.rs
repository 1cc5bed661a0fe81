// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Exception payload types.
//!
//! The payload is owned by the caller; expansion only mutates frame fields.

use serde::{Deserialize, Serialize};

use crate::context::SourceContext;

/// The exception interface of an event: one or more chained exceptions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExceptionData {
	#[serde(default)]
	pub values: Vec<ExceptionValue>,
}

impl ExceptionData {
	/// Iterate over every frame of every exception, in payload order.
	pub fn frames_mut(&mut self) -> impl Iterator<Item = &mut Frame> {
		self
			.values
			.iter_mut()
			.filter_map(|value| value.stacktrace.as_mut())
			.flat_map(|stacktrace| stacktrace.frames.iter_mut())
	}

	pub fn frame_count(&self) -> usize {
		self
			.values
			.iter()
			.filter_map(|value| value.stacktrace.as_ref())
			.map(|stacktrace| stacktrace.frames.len())
			.sum()
	}
}

/// A single exception with its (optional) stack trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExceptionValue {
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub exception_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stacktrace: Option<Stacktrace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stacktrace {
	#[serde(default)]
	pub frames: Vec<Frame>,
}

/// A stack frame as reported by a JavaScript runtime.
///
/// `lineno` is 1-based, `colno` is 0-based.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub abs_path: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub filename: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub function: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lineno: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub colno: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pre_context: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub context_line: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub post_context: Option<Vec<String>>,
	#[serde(default)]
	pub in_app: bool,
}

impl Frame {
	/// Replace all three context fields at once.
	pub fn set_context(&mut self, context: SourceContext) {
		self.pre_context = context.pre_context;
		self.context_line = Some(context.context_line);
		self.post_context = context.post_context;
	}

	pub fn has_context(&self) -> bool {
		self.context_line.is_some()
	}
}
