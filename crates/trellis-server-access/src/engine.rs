// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The permission decision engine.
//!
//! Pure evaluation over the role matrix plus the task direct-access
//! short-circuit. All decisions are side-effect free and idempotent; the
//! engine holds no mutable state, so repeated identical checks against
//! unchanged inputs yield identical decisions.
//!
//! Two entry points:
//!
//! 1. **Strict check** ([`AccessEngine::decide`] / [`AccessEngine::check`]):
//!    the role matrix must explicitly allow `(role, path, method)`.
//! 2. **Direct access** ([`AccessEngine::task_direct_access`]): a task's
//!    assignee, reporter, or watcher bypasses matrix evaluation entirely.
//!    Task involvement is a stronger access signal than generic role
//!    membership, so participants retain access to their own tasks even when
//!    their workspace role would deny the specific path.

use http::Method;
use std::sync::Arc;
use tracing::instrument;

use crate::error::AccessError;
use crate::hierarchy::Task;
use crate::matrix::RoleMatrix;
use crate::types::{AccessMode, UserId, WorkspaceRole};

/// The outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
	Allow,
	Deny,
}

/// Evaluates permission checks against a role matrix.
#[derive(Clone)]
pub struct AccessEngine {
	matrix: Arc<RoleMatrix>,
}

impl AccessEngine {
	/// Create an engine over the given matrix.
	pub fn new(matrix: Arc<RoleMatrix>) -> Self {
		Self { matrix }
	}

	/// Create an engine over the standard Trellis table.
	pub fn standard() -> Self {
		Self::new(Arc::new(RoleMatrix::standard()))
	}

	/// Strict matrix evaluation for `(role, path, method)`.
	#[instrument(level = "debug", skip(self))]
	pub fn decide(&self, role: WorkspaceRole, path: &str, method: &Method) -> Decision {
		if self.matrix.has_permission(role, path, method) {
			tracing::debug!("matrix allowed");
			Decision::Allow
		} else {
			tracing::info!("matrix denied");
			Decision::Deny
		}
	}

	/// [`decide`](Self::decide) with the deny reason materialized.
	pub fn check(&self, role: WorkspaceRole, path: &str, method: &Method) -> Result<(), AccessError> {
		match self.decide(role, path, method) {
			Decision::Allow => Ok(()),
			Decision::Deny => Err(AccessError::PermissionDenied {
				role,
				path: path.to_string(),
				method: method.clone(),
			}),
		}
	}

	/// The task-participant short-circuit.
	///
	/// Read admits assignees, the reporter, and watchers; write narrows to
	/// assignees and the reporter. The task must already have been resolved:
	/// direct access never bypasses existence of the chain.
	#[instrument(level = "debug", skip(self, task), fields(task_id = %task.id))]
	pub fn task_direct_access(&self, task: &Task, user_id: UserId, mode: AccessMode) -> bool {
		let granted = match mode {
			AccessMode::Read => {
				task.is_assignee(user_id) || task.is_reporter(user_id) || task.is_watcher(user_id)
			}
			AccessMode::Write => task.is_assignee(user_id) || task.is_reporter(user_id),
		};
		if granted {
			tracing::debug!("direct access granted");
		}
		granted
	}
}
