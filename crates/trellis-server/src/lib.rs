// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP access-control middleware for Trellis.
//!
//! This crate adapts the [`trellis_server_access`] policy core to axum:
//! per-resource middleware that resolves the containment chain, authorizes
//! the request, and attaches the resolved entities to request extensions for
//! handlers downstream. Routing and request handlers themselves live in the
//! embedding server.
//!
//! # Request Flow
//!
//! ```text
//! Request → extract resource id → resolve chain → validate system role
//!         → resolve workspace role → role matrix decision
//!         → attach ResolvedHierarchy → handler
//! ```
//!
//! Denials terminate the request with a classified [`error::ErrorResponse`];
//! the status mapping is 400 for a missing id, 401 for a missing
//! authenticated context, 404 for a broken containment chain, 403 for every
//! deny, 429 for rate limiting, and 500 for collaborator failures.

pub mod access_middleware;
pub mod error;
pub mod extract;
pub mod state;

pub use access_middleware::{
	any_of, require_board_access, require_rate_limit, require_resource_owner,
	require_space_access, require_task_access, require_task_edit, require_workspace_access,
	RequireSystemRole,
};
pub use error::{AccessRejection, ErrorResponse};
pub use state::AccessState;
