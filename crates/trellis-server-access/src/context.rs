// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authenticated request context.
//!
//! Authentication happens upstream of this subsystem: the authentication
//! layer resolves credentials to a user, loads the user's aggregate role set
//! once per request, and attaches a [`CurrentUser`] to the request. The
//! access middleware only ever reads that context; it never authenticates.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::roles::UserRoles;
use crate::store::UserDirectory;
use crate::types::UserId;

/// The currently authenticated user, extracted from request context.
///
/// Carries the aggregate role set so role resolution during authorization is
/// a pure lookup, computed once per authenticated request rather than once
/// per resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
	pub roles: UserRoles,
}

impl CurrentUser {
	/// Wrap a preloaded aggregate role set.
	pub fn new(roles: UserRoles) -> Self {
		Self { roles }
	}

	/// Load the aggregate role set for a user from the directory.
	///
	/// Returns `Ok(None)` when the directory has no record of the user.
	pub async fn load(
		directory: &dyn UserDirectory,
		user_id: UserId,
	) -> Result<Option<Self>, StoreError> {
		Ok(directory.user_roles(user_id).await?.map(Self::new))
	}

	/// The authenticated user's id.
	pub fn user_id(&self) -> UserId {
		self.roles.user_id
	}

	/// The upstream-provided system role string.
	pub fn system_role(&self) -> &str {
		&self.roles.system_role
	}
}

/// Authentication state for request processing.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	/// Whether the request is authenticated.
	pub is_authenticated: bool,
	/// The current user, if authenticated.
	pub current_user: Option<CurrentUser>,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self {
			is_authenticated: false,
			current_user: None,
		}
	}

	/// Create a new authenticated context.
	pub fn authenticated(current_user: CurrentUser) -> Self {
		Self {
			is_authenticated: true,
			current_user: Some(current_user),
		}
	}

	/// Get the current user, if authenticated.
	pub fn user(&self) -> Option<&CurrentUser> {
		self.current_user.as_ref()
	}
}
