// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map decoding for JavaScript stack trace expansion.
//!
//! This crate provides functionality for:
//! - Discovering the source map reference of a fetched script
//! - Decoding Source Map v3 documents, including base64 `data:` URIs
//! - Looking up the original position of a generated line and column
//!
//! # Example
//!
//! ```
//! use loom_source_map::decode;
//!
//! let index = decode(r#"{
//!     "version": 3,
//!     "sources": ["src/app.ts"],
//!     "sourcesContent": ["const answer = 42;\nthrow new Error(answer);"],
//!     "names": [],
//!     "mappings": "AAAA;AACA"
//! }"#).unwrap();
//!
//! let entry = index.lookup(1, 12).unwrap();
//! assert_eq!(entry.source.as_deref(), Some("src/app.ts"));
//! assert_eq!(entry.original_line, Some(1));
//! assert_eq!(index.source_lines("src/app.ts").unwrap()[1], "throw new Error(answer);");
//! ```

pub mod decode;
pub mod discover;
pub mod error;
pub mod index;
pub mod vlq;

pub use decode::{decode, decode_data_uri, decode_json, is_data_uri};
pub use discover::discover;
pub use error::{DecodeError, Result};
pub use index::{MappingEntry, Position, SourceMapIndex};
