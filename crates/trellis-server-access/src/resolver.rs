// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Containment chain resolution.
//!
//! Given a resource kind and id, [`HierarchyResolver`] walks the chain
//! upward (Task → Board → Space → Workspace) and returns the full
//! [`ResolvedHierarchy`] so middleware can attach every intermediate entity
//! to the request without redundant lookups.
//!
//! Failure semantics: a missing link anywhere in the chain is
//! [`AccessError::EntityNotFound`] naming the missing kind, never a deny.
//! Store failures propagate as [`AccessError::Store`].

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::AccessError;
use crate::hierarchy::{Board, Space, Task, Workspace};
use crate::store::{BoardStore, SpaceStore, TaskStore, WorkspaceStore};
use crate::types::{BoardId, ResourceKind, SpaceId, TaskId, WorkspaceId};

/// The fully resolved containment chain for a request's target resource.
///
/// `workspace` is always present; the lower levels are populated down to the
/// level of the requested resource.
#[derive(Debug, Clone)]
pub struct ResolvedHierarchy {
	pub workspace: Workspace,
	pub space: Option<Space>,
	pub board: Option<Board>,
	pub task: Option<Task>,
}

impl ResolvedHierarchy {
	/// The kind of the deepest resolved entity.
	pub fn kind(&self) -> ResourceKind {
		if self.task.is_some() {
			ResourceKind::Task
		} else if self.board.is_some() {
			ResourceKind::Board
		} else if self.space.is_some() {
			ResourceKind::Space
		} else {
			ResourceKind::Workspace
		}
	}
}

/// Resolves resources to their full containment chain via the entity stores.
#[derive(Clone)]
pub struct HierarchyResolver {
	workspaces: Arc<dyn WorkspaceStore>,
	spaces: Arc<dyn SpaceStore>,
	boards: Arc<dyn BoardStore>,
	tasks: Arc<dyn TaskStore>,
}

impl HierarchyResolver {
	/// Create a resolver over the given stores.
	pub fn new(
		workspaces: Arc<dyn WorkspaceStore>,
		spaces: Arc<dyn SpaceStore>,
		boards: Arc<dyn BoardStore>,
		tasks: Arc<dyn TaskStore>,
	) -> Self {
		Self {
			workspaces,
			spaces,
			boards,
			tasks,
		}
	}

	/// Resolve a resource of the given kind to its full chain.
	#[instrument(level = "debug", skip(self))]
	pub async fn resolve(
		&self,
		kind: ResourceKind,
		id: Uuid,
	) -> Result<ResolvedHierarchy, AccessError> {
		match kind {
			ResourceKind::Workspace => {
				let workspace = self.workspace(WorkspaceId::new(id)).await?;
				Ok(ResolvedHierarchy {
					workspace,
					space: None,
					board: None,
					task: None,
				})
			}
			ResourceKind::Space => {
				let space = self.space(SpaceId::new(id)).await?;
				let workspace = self.workspace(space.workspace).await?;
				Ok(ResolvedHierarchy {
					workspace,
					space: Some(space),
					board: None,
					task: None,
				})
			}
			ResourceKind::Board => {
				let board = self.board(BoardId::new(id)).await?;
				let space = self.space(board.space).await?;
				let workspace = self.workspace(space.workspace).await?;
				Ok(ResolvedHierarchy {
					workspace,
					space: Some(space),
					board: Some(board),
					task: None,
				})
			}
			ResourceKind::Task => {
				let task = self.task(TaskId::new(id)).await?;
				let board = self.board(task.board).await?;
				let space = self.space(board.space).await?;
				let workspace = self.workspace(space.workspace).await?;
				Ok(ResolvedHierarchy {
					workspace,
					space: Some(space),
					board: Some(board),
					task: Some(task),
				})
			}
		}
	}

	async fn workspace(&self, id: WorkspaceId) -> Result<Workspace, AccessError> {
		self
			.workspaces
			.find_workspace(id)
			.await?
			.ok_or(AccessError::EntityNotFound(ResourceKind::Workspace))
	}

	async fn space(&self, id: SpaceId) -> Result<Space, AccessError> {
		self
			.spaces
			.find_space(id)
			.await?
			.ok_or(AccessError::EntityNotFound(ResourceKind::Space))
	}

	async fn board(&self, id: BoardId) -> Result<Board, AccessError> {
		self
			.boards
			.find_board(id)
			.await?
			.ok_or(AccessError::EntityNotFound(ResourceKind::Board))
	}

	async fn task(&self, id: TaskId) -> Result<Task, AccessError> {
		self
			.tasks
			.find_task(id)
			.await?
			.ok_or(AccessError::EntityNotFound(ResourceKind::Task))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::StoreError;
	use crate::store::MemoryDirectory;
	use crate::types::UserId;
	use async_trait::async_trait;

	async fn seeded() -> (Arc<MemoryDirectory>, Workspace, Space, Board, Task) {
		let directory = Arc::new(MemoryDirectory::new());
		let workspace = Workspace::new(UserId::generate(), "Acme");
		let space = Space::new(workspace.id, "Platform");
		let board = Board::new(space.id, "Sprint 12");
		let task = Task::new(board.id, "Fix login");

		directory.put_workspace(workspace.clone()).await;
		directory.put_space(space.clone()).await;
		directory.put_board(board.clone()).await;
		directory.put_task(task.clone()).await;

		(directory, workspace, space, board, task)
	}

	fn resolver(directory: Arc<MemoryDirectory>) -> HierarchyResolver {
		HierarchyResolver::new(
			directory.clone(),
			directory.clone(),
			directory.clone(),
			directory,
		)
	}

	#[tokio::test]
	async fn resolves_task_to_full_chain() {
		let (directory, workspace, space, board, task) = seeded().await;
		let resolver = resolver(directory);

		let chain = resolver
			.resolve(ResourceKind::Task, task.id.into_inner())
			.await
			.unwrap();

		assert_eq!(chain.workspace.id, workspace.id);
		assert_eq!(chain.space.as_ref().map(|s| s.id), Some(space.id));
		assert_eq!(chain.board.as_ref().map(|b| b.id), Some(board.id));
		assert_eq!(chain.task.as_ref().map(|t| t.id), Some(task.id));
		assert_eq!(chain.kind(), ResourceKind::Task);
	}

	#[tokio::test]
	async fn resolves_workspace_directly() {
		let (directory, workspace, ..) = seeded().await;
		let resolver = resolver(directory);

		let chain = resolver
			.resolve(ResourceKind::Workspace, workspace.id.into_inner())
			.await
			.unwrap();

		assert_eq!(chain.workspace.id, workspace.id);
		assert!(chain.space.is_none());
		assert_eq!(chain.kind(), ResourceKind::Workspace);
	}

	#[tokio::test]
	async fn missing_task_is_task_not_found() {
		let (directory, ..) = seeded().await;
		let resolver = resolver(directory);

		let err = resolver
			.resolve(ResourceKind::Task, Uuid::new_v4())
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			AccessError::EntityNotFound(ResourceKind::Task)
		));
	}

	#[tokio::test]
	async fn broken_link_names_the_missing_kind() {
		// Board resolves, but its space reference points at a deleted space.
		let (directory, _workspace, space, board, _task) = seeded().await;
		directory.remove_space(space.id).await;
		let resolver = resolver(directory);

		let err = resolver
			.resolve(ResourceKind::Board, board.id.into_inner())
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			AccessError::EntityNotFound(ResourceKind::Space)
		));
	}

	struct UnavailableStore;

	#[async_trait]
	impl WorkspaceStore for UnavailableStore {
		async fn find_workspace(
			&self,
			_id: WorkspaceId,
		) -> Result<Option<Workspace>, StoreError> {
			Err(StoreError::new("connection refused"))
		}
	}

	#[tokio::test]
	async fn store_failure_is_not_a_deny() {
		let (directory, _workspace, space, ..) = seeded().await;
		let resolver = HierarchyResolver::new(
			Arc::new(UnavailableStore),
			directory.clone(),
			directory.clone(),
			directory,
		);

		let err = resolver
			.resolve(ResourceKind::Space, space.id.into_inner())
			.await
			.unwrap_err();

		assert!(matches!(err, AccessError::Store(_)));
		assert_eq!(err.status_code(), 500);
	}
}
