// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source expansion for JavaScript stack traces.
//!
//! For every frame of an exception the [`FrameExpander`]:
//! 1. Fetches the script named by `abs_path` (once per URL per pass)
//! 2. Discovers its source map from headers or a `sourceMappingURL` trailer
//! 3. Decodes the map and looks up the original position
//! 4. Slices context lines from the original source, or from the fetched
//!    script when no mapping applies
//!
//! Fetching goes through the [`SourceFetcher`] trait. [`HttpFetcher`] talks
//! to the network with retries; [`InMemoryFetcher`] serves uploaded artifacts.
//!
//! # Example
//!
//! ```ignore
//! use loom_source_expand::{ExpandOptions, FrameExpander, HttpFetcher};
//!
//! let config = loom_source_config::load_config()?;
//! let expander = FrameExpander::with_options(
//!     HttpFetcher::from_config(&config.fetch)?,
//!     ExpandOptions::from(&config),
//! );
//! let report = expander.expand(&mut exception).await;
//! ```

pub mod cache;
pub mod error;
pub mod expander;
pub mod fetch;
pub mod http;
pub mod retry;

pub use cache::{resolve_url, LoadedSourceMap, PassCache};
pub use error::{FetchError, Result};
pub use expander::{ExpandOptions, ExpandReport, FrameExpander};
pub use fetch::{InMemoryFetcher, SourceFetcher};
pub use http::HttpFetcher;
pub use retry::{retry, RetryConfig, RetryableError};
