// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the access layer.

use std::time::Duration;

use crate::rate_limit::{DEFAULT_CAP, DEFAULT_WINDOW};

/// Environment variable for the rate-limit window in seconds.
pub const RATE_WINDOW_ENV_VAR: &str = "TRELLIS_ACCESS_RATE_WINDOW_SECS";

/// Environment variable for the rate-limit cap per window.
pub const RATE_CAP_ENV_VAR: &str = "TRELLIS_ACCESS_RATE_CAP";

/// Environment variable enabling the legacy any-role space/board check.
pub const LEGACY_ANY_ROLE_ENV_VAR: &str = "TRELLIS_ACCESS_LEGACY_ANY_ROLE";

/// Configuration for access middleware behavior.
#[derive(Debug, Clone)]
pub struct AccessConfig {
	/// Sliding-window length for the per-user rate limiter.
	pub rate_limit_window: Duration,
	/// Operations admitted per user per window.
	pub rate_limit_cap: usize,
	/// Compatibility toggle: when set, space- and board-level checks pass on
	/// any resolvable workspace role instead of consulting the role matrix,
	/// reproducing the pre-normalization behavior.
	pub legacy_any_role: bool,
}

impl Default for AccessConfig {
	fn default() -> Self {
		Self {
			rate_limit_window: DEFAULT_WINDOW,
			rate_limit_cap: DEFAULT_CAP,
			legacy_any_role: false,
		}
	}
}

impl AccessConfig {
	/// Create a config with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a config from environment variables.
	///
	/// Unset or unparseable variables fall back to the defaults.
	pub fn from_env() -> Self {
		let mut config = Self::default();

		if let Some(secs) = std::env::var(RATE_WINDOW_ENV_VAR)
			.ok()
			.and_then(|v| v.parse::<u64>().ok())
		{
			config.rate_limit_window = Duration::from_secs(secs);
		}

		if let Some(cap) = std::env::var(RATE_CAP_ENV_VAR)
			.ok()
			.and_then(|v| v.parse::<usize>().ok())
		{
			config.rate_limit_cap = cap;
		}

		config.legacy_any_role = std::env::var(LEGACY_ANY_ROLE_ENV_VAR)
			.map(|v| v == "1" || v.to_lowercase() == "true")
			.unwrap_or(false);

		config
	}

	/// Set the rate-limit window.
	pub fn with_rate_limit_window(mut self, window: Duration) -> Self {
		self.rate_limit_window = window;
		self
	}

	/// Set the rate-limit cap.
	pub fn with_rate_limit_cap(mut self, cap: usize) -> Self {
		self.rate_limit_cap = cap;
		self
	}

	/// Set the legacy any-role compatibility toggle.
	pub fn with_legacy_any_role(mut self, enabled: bool) -> Self {
		self.legacy_any_role = enabled;
		self
	}
}
