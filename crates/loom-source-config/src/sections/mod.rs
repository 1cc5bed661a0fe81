// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for source expansion.

pub mod context;
pub mod fetch;

pub use context::{ContextConfig, ContextConfigLayer};
pub use fetch::{FetchConfig, FetchConfigLayer};
