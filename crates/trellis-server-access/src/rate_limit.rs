// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-user sliding-window rate limiting for sensitive operations.
//!
//! State is an in-memory map from user id to operation timestamps, pruned
//! lazily on each check. The map lives behind a single async `RwLock`, so
//! concurrent requests from the same user serialize on the write lock and no
//! increment is lost. The limiter is advisory (defense against abuse, not a
//! hard quota), which is why an in-process counter is acceptable.
//!
//! This state is process-local. Horizontally scaled deployments must provide
//! a [`RateLimit`] implementation backed by a shared store; the trait exists
//! so call sites do not change when that happens.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::types::UserId;

/// Default sliding window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Default number of operations allowed per window.
pub const DEFAULT_CAP: usize = 10;

/// Per-user rate limiting interface.
///
/// `true` means the operation is admitted and has been counted.
#[async_trait]
pub trait RateLimit: Send + Sync {
	async fn check(&self, user: UserId) -> bool;
}

/// In-process sliding-window limiter.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
	entries: RwLock<HashMap<UserId, Vec<Instant>>>,
	window: Duration,
	cap: usize,
}

impl SlidingWindowLimiter {
	/// Create a limiter with the given window and cap.
	pub fn new(window: Duration, cap: usize) -> Self {
		Self {
			entries: RwLock::new(HashMap::new()),
			window,
			cap,
		}
	}

	/// Remaining operations in the current window for a user.
	pub async fn remaining(&self, user: UserId) -> usize {
		let now = Instant::now();
		let entries = self.entries.read().await;
		let used = entries
			.get(&user)
			.map(|stamps| {
				stamps
					.iter()
					.filter(|t| now.saturating_duration_since(**t) < self.window)
					.count()
			})
			.unwrap_or(0);
		self.cap.saturating_sub(used)
	}

	/// Drop a user's window entirely.
	pub async fn reset(&self, user: UserId) {
		self.entries.write().await.remove(&user);
	}

	async fn check_at(&self, user: UserId, now: Instant) -> bool {
		let mut entries = self.entries.write().await;
		let stamps = entries.entry(user).or_default();
		stamps.retain(|t| now.saturating_duration_since(*t) < self.window);

		if stamps.len() >= self.cap {
			warn!(user_id = %user, cap = self.cap, "rate limit exceeded");
			return false;
		}

		stamps.push(now);
		debug!(user_id = %user, used = stamps.len(), cap = self.cap, "rate limit check passed");
		true
	}
}

impl Default for SlidingWindowLimiter {
	fn default() -> Self {
		Self::new(DEFAULT_WINDOW, DEFAULT_CAP)
	}
}

#[async_trait]
impl RateLimit for SlidingWindowLimiter {
	async fn check(&self, user: UserId) -> bool {
		self.check_at(user, Instant::now()).await
	}
}
