// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hierarchical resource access control for Trellis.
//!
//! This crate provides:
//! - The four-level containment hierarchy (workspace → space → board → task)
//! - The role/permission matrix, evaluated deny-by-default
//! - Role resolution (membership-first, owner-fallback) against the owning
//!   workspace
//! - The permission decision engine with the task direct-access short-circuit
//! - Per-user sliding-window rate limiting
//! - Audit records for access decisions
//!
//! # Design Rationale
//!
//! Authorization for every resource kind resolves through the containment
//! chain to the owning workspace, then evaluates one static table:
//!
//! - **Chain resolution is explicit**: [`HierarchyResolver`] returns the full
//!   chain in one pass, so the not-found-versus-denied distinction is applied
//!   in exactly one place and middleware never re-derives parent links.
//! - **Policy is data, not branches**: the [`RoleMatrix`] is a table built at
//!   process start; the [`AccessEngine`] evaluating it is pure and
//!   independently testable.
//! - **One deliberate bypass**: a task's assignee, reporter, or watcher
//!   retains access to that task independent of workspace role. Nothing else
//!   bypasses role evaluation.
//!
//! # Security Considerations
//!
//! - Absent matrix entries deny; unknown roles and paths never fail open
//! - Store failures surface as server errors, never as denials, so outages
//!   cannot masquerade as revoked access
//! - Decision logs carry identifiers only, never tokens or entity payloads

pub mod audit;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod matrix;
pub mod rate_limit;
pub mod resolver;
pub mod roles;
pub mod store;
pub mod types;

pub use audit::{AccessAuditEntry, AccessAuditEvent};
pub use config::{
	AccessConfig, LEGACY_ANY_ROLE_ENV_VAR, RATE_CAP_ENV_VAR, RATE_WINDOW_ENV_VAR,
};
pub use context::{AuthContext, CurrentUser};
pub use engine::{AccessEngine, Decision};
pub use error::{AccessError, StoreError};
pub use hierarchy::{
	Board, Space, SpaceMembership, SpaceRole, Task, Workspace, WorkspaceMembership,
};
pub use matrix::{MatrixRule, PathPattern, RoleMatrix};
pub use rate_limit::{RateLimit, SlidingWindowLimiter, DEFAULT_CAP, DEFAULT_WINDOW};
pub use resolver::{HierarchyResolver, ResolvedHierarchy};
pub use roles::{effective_role, require_role, validate_system_role, UserRoles, WorkspaceRoleEntry};
pub use store::{
	BoardStore, MemoryDirectory, SpaceStore, TaskStore, UserDirectory, WorkspaceStore,
};
pub use types::{
	AccessMode, BoardId, ResourceKind, SpaceId, SystemRole, TaskId, UserId, WorkspaceId,
	WorkspaceRole,
};
