// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Retry with exponential backoff for remote fetches.

use std::time::Duration;

use loom_source_config::FetchConfig;
use tracing::warn;

use crate::error::FetchError;

const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

#[derive(Debug, Clone)]
pub struct RetryConfig {
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
	pub backoff_factor: f64,
	pub jitter: bool,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			base_delay: Duration::from_millis(200),
			max_delay: Duration::from_secs(5),
			backoff_factor: 2.0,
			jitter: true,
		}
	}
}

impl From<&FetchConfig> for RetryConfig {
	fn from(config: &FetchConfig) -> Self {
		Self {
			max_attempts: config.max_attempts.max(1),
			base_delay: config.retry_base_delay,
			..Self::default()
		}
	}
}

pub trait RetryableError {
	fn is_retryable(&self) -> bool;
}

impl RetryableError for FetchError {
	fn is_retryable(&self) -> bool {
		match self {
			FetchError::Http(e) => {
				if e.is_timeout() || e.is_connect() {
					return true;
				}
				e.status()
					.is_some_and(|status| RETRYABLE_STATUSES.contains(&status.as_u16()))
			}
			FetchError::Status { status, .. } => RETRYABLE_STATUSES.contains(status),
			_ => false,
		}
	}
}

fn calculate_delay(cfg: &RetryConfig, attempt: u32) -> Duration {
	let exponential_delay = cfg.base_delay.as_secs_f64() * cfg.backoff_factor.powi(attempt as i32);
	let capped_delay = exponential_delay.min(cfg.max_delay.as_secs_f64());

	let final_delay = if cfg.jitter {
		capped_delay * (0.5 + fastrand::f64())
	} else {
		capped_delay
	};

	Duration::from_secs_f64(final_delay)
}

/// Run `f` until it succeeds, fails with a non-retryable error, or
/// `max_attempts` is reached.
pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, mut f: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: std::future::Future<Output = Result<T, E>>,
	E: RetryableError + std::fmt::Display,
{
	let mut attempt = 0;

	loop {
		match f().await {
			Ok(result) => return Ok(result),
			Err(err) => {
				attempt += 1;

				if !err.is_retryable() {
					return Err(err);
				}

				if attempt >= cfg.max_attempts {
					warn!(
						error = %err,
						attempt,
						max_attempts = cfg.max_attempts,
						"max retry attempts exhausted"
					);
					return Err(err);
				}

				let delay = calculate_delay(cfg, attempt - 1);
				warn!(
					error = %err,
					attempt,
					max_attempts = cfg.max_attempts,
					delay_ms = delay.as_millis() as u64,
					"retrying fetch after error"
				);

				tokio::time::sleep(delay).await;
			}
		}
	}
}
