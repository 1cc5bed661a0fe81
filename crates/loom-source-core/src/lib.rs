// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for JavaScript stack trace source expansion.
//!
//! This crate provides the shared pieces used by the source map decoder and
//! the frame expander:
//! - [`UrlResult`]: the immutable outcome of fetching a URL
//! - [`ExceptionData`] and friends: the mutable exception payload whose frames
//!   get enriched with source context
//! - [`module_name`]: turns arbitrary URLs into stable logical module names
//! - [`slice_context`]: extracts the lines surrounding a position

pub mod context;
pub mod event;
pub mod module;
pub mod url_result;

pub use context::{slice_context, split_lines, SourceContext, CONTEXT_LINES_AFTER, CONTEXT_LINES_BEFORE};
pub use event::{ExceptionData, ExceptionValue, Frame, Stacktrace};
pub use module::{module_name, UNKNOWN_MODULE};
pub use url_result::UrlResult;
