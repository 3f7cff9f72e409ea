// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared state for the access middleware family.

use std::sync::Arc;

use trellis_server_access::{
	AccessConfig, AccessEngine, HierarchyResolver, MemoryDirectory, RateLimit,
	SlidingWindowLimiter,
};

/// Everything the access middleware needs per request.
///
/// Cheap to clone; all components are behind `Arc`s. The limiter is held as
/// a trait object so the in-process sliding window can be swapped for a
/// shared counter without touching middleware call sites.
#[derive(Clone)]
pub struct AccessState {
	pub resolver: HierarchyResolver,
	pub engine: AccessEngine,
	pub limiter: Arc<dyn RateLimit>,
	pub config: Arc<AccessConfig>,
}

impl AccessState {
	/// Assemble state from explicit components.
	pub fn new(
		resolver: HierarchyResolver,
		engine: AccessEngine,
		limiter: Arc<dyn RateLimit>,
		config: AccessConfig,
	) -> Self {
		Self {
			resolver,
			engine,
			limiter,
			config: Arc::new(config),
		}
	}

	/// Wire up state over a single in-memory directory.
	///
	/// The directory backs all four entity stores; the engine uses the
	/// standard matrix and the limiter is built from the config's window and
	/// cap. Used by tests and single-process embeddings.
	pub fn with_directory(directory: Arc<MemoryDirectory>, config: AccessConfig) -> Self {
		let resolver = HierarchyResolver::new(
			directory.clone(),
			directory.clone(),
			directory.clone(),
			directory,
		);
		let limiter = Arc::new(SlidingWindowLimiter::new(
			config.rate_limit_window,
			config.rate_limit_cap,
		));
		Self::new(resolver, AccessEngine::standard(), limiter, config)
	}
}
