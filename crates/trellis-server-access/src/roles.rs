// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role resolution against the owning workspace.
//!
//! A user's aggregate role set is computed once per authenticated request by
//! the upstream layer and carried through the request context; resolution
//! here is a pure lookup against that aggregate plus the workspace record.
//!
//! Resolution order is membership-first, owner-fallback-second: an explicit
//! membership role is authoritative and is never overridden by the owner
//! shortcut, so a deliberately downgraded owner keeps the downgraded role.
//! The fallback exists because the recorded workspace `owner` must always
//! resolve to `owner` even when no membership row was ever written.

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::hierarchy::Workspace;
use crate::types::{SystemRole, UserId, WorkspaceId, WorkspaceRole};

/// One entry of a user's aggregate role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRoleEntry {
	pub workspace_id: WorkspaceId,
	pub role: WorkspaceRole,
}

/// A user's aggregate role set, precomputed once per authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoles {
	pub user_id: UserId,
	/// System role as provided by the upstream authentication layer.
	pub system_role: String,
	pub workspace_roles: Vec<WorkspaceRoleEntry>,
}

impl UserRoles {
	/// Create an aggregate with no workspace roles and the `user` system role.
	pub fn new(user_id: UserId) -> Self {
		Self {
			user_id,
			system_role: SystemRole::User.to_string(),
			workspace_roles: Vec::new(),
		}
	}

	/// Builder: set the system role string.
	pub fn with_system_role(mut self, system_role: impl Into<String>) -> Self {
		self.system_role = system_role.into();
		self
	}

	/// Builder: add a workspace role entry.
	pub fn with_workspace_role(mut self, workspace_id: WorkspaceId, role: WorkspaceRole) -> Self {
		self
			.workspace_roles
			.push(WorkspaceRoleEntry { workspace_id, role });
		self
	}

	/// The role recorded for the given workspace in this aggregate, if any.
	pub fn role_in(&self, workspace_id: WorkspaceId) -> Option<WorkspaceRole> {
		self
			.workspace_roles
			.iter()
			.find(|entry| entry.workspace_id == workspace_id)
			.map(|entry| entry.role)
	}
}

/// Validate the system role axis.
///
/// An unrecognized system role is an immediate deny, classified separately
/// from "no workspace access".
pub fn validate_system_role(roles: &UserRoles) -> Result<SystemRole, AccessError> {
	SystemRole::parse(&roles.system_role).ok_or(AccessError::InvalidSystemRole)
}

/// Resolve the user's effective role in the given workspace.
///
/// 1. An explicit entry in the aggregate role set is authoritative.
/// 2. Otherwise the recorded workspace owner resolves to a transient
///    `owner` role (not persisted).
/// 3. Otherwise there is no role; callers treat this as
///    [`AccessError::NoWorkspaceAccess`].
pub fn effective_role(roles: &UserRoles, workspace: &Workspace) -> Option<WorkspaceRole> {
	if let Some(role) = roles.role_in(workspace.id) {
		return Some(role);
	}
	if workspace.is_owner(roles.user_id) {
		return Some(WorkspaceRole::Owner);
	}
	None
}

/// [`effective_role`] with the missing-role case materialized as an error.
pub fn require_role(roles: &UserRoles, workspace: &Workspace) -> Result<WorkspaceRole, AccessError> {
	effective_role(roles, workspace).ok_or(AccessError::NoWorkspaceAccess)
}
