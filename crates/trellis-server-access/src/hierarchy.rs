// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entity records for the four-level containment hierarchy.
//!
//! Workspace → Space → Board → Task. Every board belongs to exactly one
//! space, every space to exactly one workspace, and every task to exactly
//! one board; the access layer resolves that chain upward on each request.
//!
//! These records are read transiently per request and discarded. Creation,
//! mutation, and deletion belong to the entity stores, which are external
//! collaborators of this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BoardId, SpaceId, TaskId, UserId, WorkspaceId, WorkspaceRole};

// =============================================================================
// Workspace
// =============================================================================

/// The root tenant container.
///
/// The recorded `owner` is always implicitly authorized as `owner`, whether
/// or not a membership row exists for them. Explicit membership rows take
/// precedence during role resolution, so a deliberately downgraded owner is
/// honored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
	pub id: WorkspaceId,
	pub owner: UserId,
	pub members: Vec<WorkspaceMembership>,
	pub name: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Workspace {
	/// Create a new workspace owned by the given user.
	pub fn new(owner: UserId, name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: WorkspaceId::generate(),
			owner,
			members: Vec::new(),
			name: name.into(),
			created_at: now,
			updated_at: now,
		}
	}

	/// Add a membership row, builder-style.
	pub fn with_member(mut self, user_id: UserId, role: WorkspaceRole) -> Self {
		self.members.push(WorkspaceMembership::new(user_id, role));
		self
	}

	/// The explicit membership role recorded for the given user, if any.
	pub fn membership_role(&self, user_id: UserId) -> Option<WorkspaceRole> {
		self
			.members
			.iter()
			.find(|m| m.user_id == user_id)
			.map(|m| m.role)
	}

	/// Returns true if the given user is the recorded owner.
	pub fn is_owner(&self, user_id: UserId) -> bool {
		self.owner == user_id
	}
}

/// A user's membership row in a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMembership {
	pub user_id: UserId,
	pub role: WorkspaceRole,
	pub created_at: DateTime<Utc>,
}

impl WorkspaceMembership {
	/// Create a new workspace membership.
	pub fn new(user_id: UserId, role: WorkspaceRole) -> Self {
		Self {
			user_id,
			role,
			created_at: Utc::now(),
		}
	}
}

// =============================================================================
// Space
// =============================================================================

/// Roles within a space.
///
/// Space-local roles drive space-level business logic only; access-control
/// role resolution is always against the containing workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceRole {
	Admin,
	Member,
	Viewer,
}

impl std::fmt::Display for SpaceRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SpaceRole::Admin => write!(f, "admin"),
			SpaceRole::Member => write!(f, "member"),
			SpaceRole::Viewer => write!(f, "viewer"),
		}
	}
}

/// A project grouping within a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
	pub id: SpaceId,
	pub workspace: WorkspaceId,
	pub members: Vec<SpaceMembership>,
	pub name: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Space {
	/// Create a new space in the given workspace.
	pub fn new(workspace: WorkspaceId, name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: SpaceId::generate(),
			workspace,
			members: Vec::new(),
			name: name.into(),
			created_at: now,
			updated_at: now,
		}
	}
}

/// A user's membership row in a space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceMembership {
	pub user_id: UserId,
	pub role: SpaceRole,
	pub created_at: DateTime<Utc>,
}

impl SpaceMembership {
	/// Create a new space membership.
	pub fn new(user_id: UserId, role: SpaceRole) -> Self {
		Self {
			user_id,
			role,
			created_at: Utc::now(),
		}
	}
}

// =============================================================================
// Board
// =============================================================================

/// A kanban/list view within a space.
///
/// Boards have no independent membership; access is inherited transitively
/// through space and workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
	pub id: BoardId,
	pub space: SpaceId,
	pub name: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Board {
	/// Create a new board in the given space.
	pub fn new(space: SpaceId, name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: BoardId::generate(),
			space,
			name: name.into(),
			created_at: now,
			updated_at: now,
		}
	}
}

// =============================================================================
// Task
// =============================================================================

/// A unit of work within a board.
///
/// `assignees`, `reporter`, and `watchers` form the direct-access allowlist:
/// task participants retain access to their own tasks independent of the
/// workspace role hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
	pub id: TaskId,
	pub board: BoardId,
	pub assignees: Vec<UserId>,
	pub reporter: Option<UserId>,
	pub watchers: Vec<UserId>,
	pub title: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Task {
	/// Create a new task on the given board.
	pub fn new(board: BoardId, title: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: TaskId::generate(),
			board,
			assignees: Vec::new(),
			reporter: None,
			watchers: Vec::new(),
			title: title.into(),
			created_at: now,
			updated_at: now,
		}
	}

	/// Builder: set the reporter.
	pub fn with_reporter(mut self, user_id: UserId) -> Self {
		self.reporter = Some(user_id);
		self
	}

	/// Builder: add an assignee.
	pub fn with_assignee(mut self, user_id: UserId) -> Self {
		self.assignees.push(user_id);
		self
	}

	/// Builder: add a watcher.
	pub fn with_watcher(mut self, user_id: UserId) -> Self {
		self.watchers.push(user_id);
		self
	}

	/// Returns true if the given user is an assignee.
	pub fn is_assignee(&self, user_id: UserId) -> bool {
		self.assignees.contains(&user_id)
	}

	/// Returns true if the given user is the reporter.
	pub fn is_reporter(&self, user_id: UserId) -> bool {
		self.reporter == Some(user_id)
	}

	/// Returns true if the given user is a watcher.
	pub fn is_watcher(&self, user_id: UserId) -> bool {
		self.watchers.contains(&user_id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	mod workspace {
		use super::*;

		#[test]
		fn new_records_owner() {
			let owner = UserId::generate();
			let workspace = Workspace::new(owner, "Acme");

			assert!(workspace.is_owner(owner));
			assert!(workspace.members.is_empty());
			assert_eq!(workspace.name, "Acme");
		}

		#[test]
		fn membership_role_finds_explicit_row() {
			let owner = UserId::generate();
			let member = UserId::generate();
			let workspace =
				Workspace::new(owner, "Acme").with_member(member, WorkspaceRole::Admin);

			assert_eq!(
				workspace.membership_role(member),
				Some(WorkspaceRole::Admin)
			);
			assert_eq!(workspace.membership_role(owner), None);
		}

		#[test]
		fn new_sets_timestamps() {
			let before = Utc::now();
			let workspace = Workspace::new(UserId::generate(), "Acme");
			let after = Utc::now();

			assert!(workspace.created_at >= before && workspace.created_at <= after);
			assert_eq!(workspace.created_at, workspace.updated_at);
		}
	}

	mod task {
		use super::*;

		#[test]
		fn participant_helpers() {
			let assignee = UserId::generate();
			let reporter = UserId::generate();
			let watcher = UserId::generate();
			let outsider = UserId::generate();

			let task = Task::new(BoardId::generate(), "Ship it")
				.with_assignee(assignee)
				.with_reporter(reporter)
				.with_watcher(watcher);

			assert!(task.is_assignee(assignee));
			assert!(task.is_reporter(reporter));
			assert!(task.is_watcher(watcher));

			assert!(!task.is_assignee(outsider));
			assert!(!task.is_reporter(outsider));
			assert!(!task.is_watcher(outsider));
		}

		#[test]
		fn new_task_has_no_participants() {
			let task = Task::new(BoardId::generate(), "Empty");
			assert!(task.assignees.is_empty());
			assert!(task.reporter.is_none());
			assert!(task.watchers.is_empty());
		}

		#[test]
		fn serializes_participant_sets() {
			let assignee = UserId::generate();
			let task = Task::new(BoardId::generate(), "Ship it").with_assignee(assignee);
			let json = serde_json::to_string(&task).unwrap();
			assert!(json.contains(&assignee.to_string()));
		}
	}

	mod space {
		use super::*;

		#[test]
		fn space_local_roles_live_on_the_record() {
			let user = UserId::generate();
			let mut space = Space::new(WorkspaceId::generate(), "Platform");
			space.members.push(SpaceMembership::new(user, SpaceRole::Viewer));

			assert_eq!(space.members.len(), 1);
			assert_eq!(space.members[0].user_id, user);
			assert_eq!(space.members[0].role, SpaceRole::Viewer);
		}

		#[test]
		fn space_role_serializes_snake_case() {
			let json = serde_json::to_string(&SpaceRole::Admin).unwrap();
			assert_eq!(json, "\"admin\"");
		}
	}

	mod chain_references {
		use super::*;

		#[test]
		fn space_references_workspace() {
			let workspace = Workspace::new(UserId::generate(), "Acme");
			let space = Space::new(workspace.id, "Platform");
			assert_eq!(space.workspace, workspace.id);
		}

		#[test]
		fn board_references_space() {
			let space = Space::new(WorkspaceId::generate(), "Platform");
			let board = Board::new(space.id, "Sprint 12");
			assert_eq!(board.space, space.id);
		}

		#[test]
		fn task_references_board() {
			let board = Board::new(SpaceId::generate(), "Sprint 12");
			let task = Task::new(board.id, "Fix login");
			assert_eq!(task.board, board.id);
		}
	}
}
