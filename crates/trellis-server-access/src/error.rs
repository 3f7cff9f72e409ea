// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access-control error types.

use thiserror::Error;

use crate::types::{ResourceKind, WorkspaceRole};

/// Failure raised by an entity store or the user directory.
///
/// Store failures (unavailability, timeouts, cancelled lookups) are surfaced
/// as server errors, never as authorization denials, so monitoring can
/// distinguish "intentionally denied" from "system degraded".
#[derive(Debug, Clone, Error)]
#[error("entity store failure: {0}")]
pub struct StoreError(pub String);

impl StoreError {
	/// Create a store error with the given detail.
	pub fn new(detail: impl Into<String>) -> Self {
		Self(detail.into())
	}
}

/// Errors that can occur while authorizing a request.
///
/// All variants are terminal for the current request; nothing is retried
/// internally.
#[derive(Debug, Clone, Error)]
pub enum AccessError {
	// =========================================================================
	// Request Shape Errors
	// =========================================================================
	/// No resource id could be extracted from the request.
	#[error("missing resource id")]
	MissingResourceId,

	/// No authenticated user context is attached to the request.
	#[error("authentication required")]
	Unauthenticated,

	// =========================================================================
	// Resolution Errors
	// =========================================================================
	/// An entity (or a link in its containment chain) does not exist.
	#[error("{0} not found")]
	EntityNotFound(ResourceKind),

	// =========================================================================
	// Authorization Errors
	// =========================================================================
	/// The user has no resolvable role in the owning workspace.
	#[error("no workspace access")]
	NoWorkspaceAccess,

	/// The user's system role is not on the allow-list.
	#[error("invalid system role")]
	InvalidSystemRole,

	/// The role matrix denies this (role, path, method) combination.
	#[error("permission denied for {role} on {method} {path}")]
	PermissionDenied {
		role: WorkspaceRole,
		path: String,
		method: http::Method,
	},

	/// The user is not the owner of the named resource field.
	#[error("resource owner mismatch")]
	NotResourceOwner,

	// =========================================================================
	// Throttling
	// =========================================================================
	/// The per-user sliding window is exhausted.
	#[error("too many requests")]
	RateLimited,

	// =========================================================================
	// Infrastructure Errors
	// =========================================================================
	/// An entity store or the user directory failed.
	#[error(transparent)]
	Store(#[from] StoreError),
}

impl AccessError {
	/// Returns true if this error should be logged at error level.
	pub fn is_internal(&self) -> bool {
		matches!(self, AccessError::Store(_))
	}

	/// Returns the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			// 400 Bad Request
			AccessError::MissingResourceId => 400,

			// 401 Unauthorized
			AccessError::Unauthenticated => 401,

			// 403 Forbidden
			AccessError::NoWorkspaceAccess
			| AccessError::InvalidSystemRole
			| AccessError::PermissionDenied { .. }
			| AccessError::NotResourceOwner => 403,

			// 404 Not Found
			AccessError::EntityNotFound(_) => 404,

			// 429 Too Many Requests
			AccessError::RateLimited => 429,

			// 500 Internal Server Error
			AccessError::Store(_) => 500,
		}
	}
}
