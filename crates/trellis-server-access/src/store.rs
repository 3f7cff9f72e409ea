// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entity store and user directory interfaces.
//!
//! Persistence is an external collaborator of the access layer: these traits
//! are the narrow find-by-id surface the resolver consumes. Implementations
//! are expected to be read-only and idempotent from this crate's point of
//! view; lookups carry no transaction or locking requirement.
//!
//! [`MemoryDirectory`] is the in-process implementation used by tests and by
//! single-process embeddings.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::hierarchy::{Board, Space, Task, Workspace};
use crate::roles::UserRoles;
use crate::types::{BoardId, SpaceId, TaskId, UserId, WorkspaceId};

/// Lookup interface for workspaces.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
	async fn find_workspace(&self, id: WorkspaceId) -> Result<Option<Workspace>, StoreError>;
}

/// Lookup interface for spaces.
#[async_trait]
pub trait SpaceStore: Send + Sync {
	async fn find_space(&self, id: SpaceId) -> Result<Option<Space>, StoreError>;
}

/// Lookup interface for boards.
#[async_trait]
pub trait BoardStore: Send + Sync {
	async fn find_board(&self, id: BoardId) -> Result<Option<Board>, StoreError>;
}

/// Lookup interface for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
	async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError>;
}

/// Lookup interface for a user's aggregate role set.
#[async_trait]
pub trait UserDirectory: Send + Sync {
	async fn user_roles(&self, id: UserId) -> Result<Option<UserRoles>, StoreError>;
}

/// In-memory entity directory.
///
/// Backs all four entity stores plus the user directory with `RwLock`-guarded
/// maps. Suitable for tests and single-process embeddings; production
/// deployments implement the traits against their document stores.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
	workspaces: RwLock<HashMap<WorkspaceId, Workspace>>,
	spaces: RwLock<HashMap<SpaceId, Space>>,
	boards: RwLock<HashMap<BoardId, Board>>,
	tasks: RwLock<HashMap<TaskId, Task>>,
	roles: RwLock<HashMap<UserId, UserRoles>>,
}

impl MemoryDirectory {
	/// Create an empty directory.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace a workspace.
	pub async fn put_workspace(&self, workspace: Workspace) {
		self.workspaces.write().await.insert(workspace.id, workspace);
	}

	/// Insert or replace a space.
	pub async fn put_space(&self, space: Space) {
		self.spaces.write().await.insert(space.id, space);
	}

	/// Insert or replace a board.
	pub async fn put_board(&self, board: Board) {
		self.boards.write().await.insert(board.id, board);
	}

	/// Insert or replace a task.
	pub async fn put_task(&self, task: Task) {
		self.tasks.write().await.insert(task.id, task);
	}

	/// Insert or replace a user's aggregate role set.
	pub async fn put_user_roles(&self, roles: UserRoles) {
		self.roles.write().await.insert(roles.user_id, roles);
	}

	/// Remove a space, leaving dangling references behind.
	///
	/// Used to exercise broken containment chains.
	pub async fn remove_space(&self, id: SpaceId) {
		self.spaces.write().await.remove(&id);
	}

	/// Remove a board, leaving dangling references behind.
	pub async fn remove_board(&self, id: BoardId) {
		self.boards.write().await.remove(&id);
	}
}

#[async_trait]
impl WorkspaceStore for MemoryDirectory {
	async fn find_workspace(&self, id: WorkspaceId) -> Result<Option<Workspace>, StoreError> {
		Ok(self.workspaces.read().await.get(&id).cloned())
	}
}

#[async_trait]
impl SpaceStore for MemoryDirectory {
	async fn find_space(&self, id: SpaceId) -> Result<Option<Space>, StoreError> {
		Ok(self.spaces.read().await.get(&id).cloned())
	}
}

#[async_trait]
impl BoardStore for MemoryDirectory {
	async fn find_board(&self, id: BoardId) -> Result<Option<Board>, StoreError> {
		Ok(self.boards.read().await.get(&id).cloned())
	}
}

#[async_trait]
impl TaskStore for MemoryDirectory {
	async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
		Ok(self.tasks.read().await.get(&id).cloned())
	}
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
	async fn user_roles(&self, id: UserId) -> Result<Option<UserRoles>, StoreError> {
		Ok(self.roles.read().await.get(&id).cloned())
	}
}
