// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Base64 VLQ decoding of the source map `mappings` field.
//!
//! Each generated line is separated by `;`, each segment by `,`. A segment
//! holds 1, 4 or 5 signed, delta-encoded values:
//! generated column, source index, original line, original column, name index.
//! The generated column delta restarts at zero on every line; the other four
//! accumulate across the whole stream.

use crate::error::{DecodeError, Result};

const CONTINUATION_BIT: u32 = 0b10_0000;
const VALUE_MASK: u32 = 0b01_1111;

/// Largest shift that still leaves room for a full 5-bit group in 35 bits,
/// enough for a sign bit plus a 32-bit magnitude.
const MAX_SHIFT: u32 = 30;

fn decode_char(ch: u8) -> Result<u32> {
	let value = match ch {
		b'A'..=b'Z' => ch - b'A',
		b'a'..=b'z' => ch - b'a' + 26,
		b'0'..=b'9' => ch - b'0' + 52,
		b'+' => 62,
		b'/' => 63,
		_ => return Err(DecodeError::InvalidVlqChar(ch as char)),
	};
	Ok(u32::from(value))
}

/// Decode a VLQ-encoded segment into its signed values.
pub fn decode_vlq_segment(segment: &str) -> Result<Vec<i64>> {
	let mut values = Vec::with_capacity(5);
	let mut accumulator = 0u64;
	let mut shift = 0u32;
	let mut pending = false;

	for ch in segment.bytes() {
		let digit = decode_char(ch)?;
		if shift > MAX_SHIFT {
			return Err(DecodeError::VlqOverflow(segment.to_string()));
		}

		accumulator |= u64::from(digit & VALUE_MASK) << shift;
		pending = true;

		if digit & CONTINUATION_BIT != 0 {
			shift += 5;
			continue;
		}

		// Lowest bit is the sign, the rest is the magnitude.
		let magnitude = (accumulator >> 1) as i64;
		if magnitude > i64::from(i32::MAX) {
			return Err(DecodeError::VlqOverflow(segment.to_string()));
		}
		values.push(if accumulator & 1 != 0 { -magnitude } else { magnitude });

		accumulator = 0;
		shift = 0;
		pending = false;
	}

	if pending {
		return Err(DecodeError::TruncatedVlq(segment.to_string()));
	}

	Ok(values)
}

/// One decoded segment with absolute values, still holding raw indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
	/// Line in the generated file (0-indexed).
	pub generated_line: u32,
	/// Column in the generated file (0-indexed).
	pub generated_column: u32,
	pub original: Option<OriginalRef>,
	pub name_index: Option<u32>,
}

/// The source half of a segment that carries 4 or 5 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalRef {
	pub source_index: u32,
	/// Line in the original file (0-indexed).
	pub line: u32,
	/// Column in the original file (0-indexed).
	pub column: u32,
}

/// Decode a full `mappings` string into segments, in stream order.
pub fn decode_mappings(mappings: &str) -> Result<Vec<Segment>> {
	let mut segments = Vec::new();

	let mut source = 0i64;
	let mut original_line = 0i64;
	let mut original_column = 0i64;
	let mut name = 0i64;

	for (line_idx, line) in mappings.split(';').enumerate() {
		let generated_line = line_idx as u32;
		let mut generated_column = 0i64;

		for raw in line.split(',') {
			if raw.is_empty() {
				continue;
			}

			let values = decode_vlq_segment(raw)?;
			if !matches!(values.len(), 1 | 4 | 5) {
				return Err(DecodeError::MalformedSegment {
					segment: raw.to_string(),
					fields: values.len(),
				});
			}

			generated_column += values[0];

			let original = if values.len() >= 4 {
				source += values[1];
				original_line += values[2];
				original_column += values[3];
				Some(OriginalRef {
					source_index: to_u32(source, "source index", generated_line)?,
					line: to_u32(original_line, "original line", generated_line)?,
					column: to_u32(original_column, "original column", generated_line)?,
				})
			} else {
				None
			};

			let name_index = if values.len() == 5 {
				name += values[4];
				Some(to_u32(name, "name index", generated_line)?)
			} else {
				None
			};

			segments.push(Segment {
				generated_line,
				generated_column: to_u32(generated_column, "generated column", generated_line)?,
				original,
				name_index,
			});
		}
	}

	Ok(segments)
}

/// Accumulated values must stay within `0..=i32::MAX`.
fn to_u32(value: i64, field: &'static str, line: u32) -> Result<u32> {
	if value < 0 {
		return Err(DecodeError::NegativeValue { field, line });
	}
	if value > i64::from(i32::MAX) {
		return Err(DecodeError::ValueTooLarge { field, line });
	}
	Ok(value as u32)
}
