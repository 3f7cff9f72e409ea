// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for hierarchical access control.
//!
//! This module defines the foundational types used throughout the access layer:
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for each entity kind
//!   ([`UserId`], [`WorkspaceId`], [`SpaceId`], [`BoardId`], [`TaskId`])
//!   preventing accidental mixing
//! - **Role enums**: Workspace-scoped roles ([`WorkspaceRole`]) and the
//!   orthogonal system-level axis ([`SystemRole`])
//! - **Resource kinds**: The four levels of the containment hierarchy
//!   ([`ResourceKind`])
//! - **Access modes**: Read vs write for the task direct-access allowlist
//!   ([`AccessMode`])
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(WorkspaceId, "Unique identifier for a workspace.");
define_id_type!(SpaceId, "Unique identifier for a space.");
define_id_type!(BoardId, "Unique identifier for a board.");
define_id_type!(TaskId, "Unique identifier for a task.");

// =============================================================================
// Workspace Roles
// =============================================================================

/// Roles a user can hold within a workspace.
///
/// Role resolution for a request always happens at workspace level: spaces,
/// boards, and tasks inherit access transitively through their containing
/// workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
	/// Cross-workspace administrative role carried on a role assignment.
	SuperAdmin,
	/// Full workspace control, can delete the workspace.
	Owner,
	/// Manage members and settings, cannot delete the workspace.
	Admin,
	/// Standard member access.
	Member,
	/// Read-only access.
	Viewer,
}

impl WorkspaceRole {
	/// Returns all available workspace roles.
	pub fn all() -> &'static [WorkspaceRole] {
		&[
			WorkspaceRole::SuperAdmin,
			WorkspaceRole::Owner,
			WorkspaceRole::Admin,
			WorkspaceRole::Member,
			WorkspaceRole::Viewer,
		]
	}

	/// Returns true if this role has at least the permissions of the given role.
	pub fn has_permission_of(&self, other: &WorkspaceRole) -> bool {
		self.rank() >= other.rank()
	}

	fn rank(&self) -> u8 {
		match self {
			WorkspaceRole::Viewer => 0,
			WorkspaceRole::Member => 1,
			WorkspaceRole::Admin => 2,
			WorkspaceRole::Owner => 3,
			WorkspaceRole::SuperAdmin => 4,
		}
	}
}

impl fmt::Display for WorkspaceRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			WorkspaceRole::SuperAdmin => write!(f, "super_admin"),
			WorkspaceRole::Owner => write!(f, "owner"),
			WorkspaceRole::Admin => write!(f, "admin"),
			WorkspaceRole::Member => write!(f, "member"),
			WorkspaceRole::Viewer => write!(f, "viewer"),
		}
	}
}

// =============================================================================
// System Roles
// =============================================================================

/// System-level roles, orthogonal to workspace roles.
///
/// The system role gates whether the workspace-role hierarchy check runs at
/// all, not which specific permission is granted. Values arrive from the
/// upstream authentication layer as strings; anything outside this enum is
/// rejected before role resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
	/// Regular user account.
	User,
	/// Moderation privileges.
	Moderator,
	/// System administration.
	Admin,
	/// Unrestricted system administration.
	SuperAdmin,
}

impl SystemRole {
	/// Returns all recognized system roles.
	pub fn all() -> &'static [SystemRole] {
		&[
			SystemRole::User,
			SystemRole::Moderator,
			SystemRole::Admin,
			SystemRole::SuperAdmin,
		]
	}

	/// Parse a system role from its upstream string form.
	///
	/// Returns `None` for unrecognized values; callers classify that as an
	/// invalid system role, distinct from lacking workspace access.
	pub fn parse(value: &str) -> Option<SystemRole> {
		match value {
			"user" => Some(SystemRole::User),
			"moderator" => Some(SystemRole::Moderator),
			"admin" => Some(SystemRole::Admin),
			"super_admin" => Some(SystemRole::SuperAdmin),
			_ => None,
		}
	}
}

impl fmt::Display for SystemRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SystemRole::User => write!(f, "user"),
			SystemRole::Moderator => write!(f, "moderator"),
			SystemRole::Admin => write!(f, "admin"),
			SystemRole::SuperAdmin => write!(f, "super_admin"),
		}
	}
}

// =============================================================================
// Resource Kinds
// =============================================================================

/// The four levels of the containment hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
	Workspace,
	Space,
	Board,
	Task,
}

impl ResourceKind {
	/// The logical path namespace for this resource kind.
	pub fn namespace(&self) -> &'static str {
		match self {
			ResourceKind::Workspace => "/workspace",
			ResourceKind::Space => "/space",
			ResourceKind::Board => "/board",
			ResourceKind::Task => "/task",
		}
	}
}

impl fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResourceKind::Workspace => write!(f, "workspace"),
			ResourceKind::Space => write!(f, "space"),
			ResourceKind::Board => write!(f, "board"),
			ResourceKind::Task => write!(f, "task"),
		}
	}
}

// =============================================================================
// Access Modes
// =============================================================================

/// Read vs write intent, used by the task direct-access allowlist.
///
/// Watchers are admitted for [`AccessMode::Read`] only; assignees and the
/// reporter are admitted for both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
	Read,
	Write,
}

impl fmt::Display for AccessMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AccessMode::Read => write!(f, "read"),
			AccessMode::Write => write!(f, "write"),
		}
	}
}
