// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Route-level access-control middleware for the containment hierarchy.
//!
//! # Architecture
//!
//! Authorization uses a two-tier approach:
//!
//! 1. **Route-level layers**: [`RequireSystemRole`] gates a route subtree on
//!    the system-role axis without touching entity stores
//! 2. **Resource-level middleware**: per-kind async functions that resolve
//!    the containment chain, compute the effective workspace role, and
//!    evaluate the role matrix for the current request path and method
//!
//! # Resource-Level Middleware
//!
//! - [`require_workspace_access`], [`require_space_access`],
//!   [`require_board_access`] - strict matrix check at each hierarchy level
//! - [`require_task_access`] - task visibility: participant short-circuit,
//!   else any resolvable workspace role
//! - [`require_task_edit`] - task mutation: assignee/reporter short-circuit,
//!   else strict matrix check
//! - [`require_resource_owner`] - hierarchy-independent owner equality check
//! - [`require_rate_limit`] - per-user sliding-window throttle
//! - [`any_of`] - OR-combinator over pure check futures
//!
//! On success the resolved [`ResolvedHierarchy`] is inserted into request
//! extensions so handlers never repeat lookups. On failure the request
//! terminates with a classified [`AccessRejection`].
//!
//! # Security Properties
//!
//! - Requests without an authenticated context are rejected with 401
//! - All deny decisions are logged with user_id, path, and method
//! - A broken containment chain is a 404 naming the missing kind, never a
//!   silent deny, and store failures surface as 500s
//! - Checks are read-only; a denied attempt leaves no observable state

use axum::{
	body::Body,
	extract::{RawPathParams, Request, State},
	http::{Method, StatusCode},
	middleware::Next,
	response::{IntoResponse, Response},
	Json,
};
use pin_project_lite::pin_project;
use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};
use tower::{Layer, Service};

use trellis_server_access::{
	require_role, validate_system_role, AccessAuditEntry, AccessError, AccessMode, AuthContext,
	CurrentUser, ResolvedHierarchy, ResourceKind, SystemRole,
};

use crate::error::{AccessRejection, ErrorResponse};
use crate::extract::{extract_named_field, extract_resource_id};
use crate::state::AccessState;

// =============================================================================
// Resource-Level Middleware
// =============================================================================

/// Per-kind extraction parameters.
#[derive(Debug, Clone, Copy)]
struct HierarchyTarget {
	kind: ResourceKind,
	param_keys: &'static [&'static str],
	body_key: &'static str,
}

impl HierarchyTarget {
	const WORKSPACE: Self = Self {
		kind: ResourceKind::Workspace,
		param_keys: &["workspace_id", "id"],
		body_key: "workspace",
	};
	const SPACE: Self = Self {
		kind: ResourceKind::Space,
		param_keys: &["space_id", "id"],
		body_key: "space",
	};
	const BOARD: Self = Self {
		kind: ResourceKind::Board,
		param_keys: &["board_id", "id"],
		body_key: "board",
	};
	const TASK: Self = Self {
		kind: ResourceKind::Task,
		param_keys: &["task_id", "id"],
		body_key: "task",
	};
}

/// Strict workspace-level access check.
pub async fn require_workspace_access(
	State(state): State<AccessState>,
	params: RawPathParams,
	request: Request,
	next: Next,
) -> Result<Response, AccessRejection> {
	hierarchy_middleware(state, params, request, next, HierarchyTarget::WORKSPACE).await
}

/// Strict space-level access check.
pub async fn require_space_access(
	State(state): State<AccessState>,
	params: RawPathParams,
	request: Request,
	next: Next,
) -> Result<Response, AccessRejection> {
	hierarchy_middleware(state, params, request, next, HierarchyTarget::SPACE).await
}

/// Strict board-level access check.
pub async fn require_board_access(
	State(state): State<AccessState>,
	params: RawPathParams,
	request: Request,
	next: Next,
) -> Result<Response, AccessRejection> {
	hierarchy_middleware(state, params, request, next, HierarchyTarget::BOARD).await
}

/// Task visibility check.
///
/// Assignees, the reporter, and watchers are admitted without role
/// evaluation; everyone else needs any resolvable role in the owning
/// workspace. No method check happens here: this governs visibility, not
/// mutation.
pub async fn require_task_access(
	State(state): State<AccessState>,
	params: RawPathParams,
	request: Request,
	next: Next,
) -> Result<Response, AccessRejection> {
	task_middleware(state, params, request, next, AccessMode::Read).await
}

/// Task mutation check.
///
/// Direct access narrows to assignees and the reporter; the role-hierarchy
/// fallback consults the matrix for the current request path and method.
pub async fn require_task_edit(
	State(state): State<AccessState>,
	params: RawPathParams,
	request: Request,
	next: Next,
) -> Result<Response, AccessRejection> {
	task_middleware(state, params, request, next, AccessMode::Write).await
}

/// Per-user rate limiting for sensitive operations.
pub async fn require_rate_limit(
	State(state): State<AccessState>,
	request: Request,
	next: Next,
) -> Result<Response, AccessRejection> {
	let user = current_user(&request)?;

	if !state.limiter.check(user.user_id()).await {
		AccessAuditEntry::rate_limited(
			user.user_id(),
			request.uri().path(),
			request.method().as_str(),
		)
		.emit();
		return Err(AccessRejection(AccessError::RateLimited));
	}

	Ok(next.run(request).await)
}

/// Boxed future returned by [`require_resource_owner`] closures.
type OwnerCheckFuture = Pin<Box<dyn Future<Output = Result<Response, AccessRejection>> + Send>>;

/// Hierarchy-independent owner check for user-owned resources.
///
/// The authenticated user id must equal the named field, taken from route
/// parameters first, then from the JSON body. Apply with
/// `axum::middleware::from_fn(require_resource_owner("user_id"))`.
pub fn require_resource_owner(
	field: &'static str,
) -> impl Fn(RawPathParams, Request, Next) -> OwnerCheckFuture + Clone {
	move |params, request, next| Box::pin(resource_owner_middleware(field, params, request, next))
}

async fn resource_owner_middleware(
	field: &'static str,
	params: RawPathParams,
	request: Request,
	next: Next,
) -> Result<Response, AccessRejection> {
	let user = current_user(&request)?;
	let (request, value) = extract_named_field(&params, request, field).await?;
	let value = value.ok_or(AccessError::MissingResourceId)?;

	if value != user.user_id().to_string() {
		AccessAuditEntry::denied(
			user.user_id(),
			request.uri().path(),
			request.method().as_str(),
		)
		.with_reason(AccessError::NotResourceOwner.to_string())
		.emit();
		return Err(AccessRejection(AccessError::NotResourceOwner));
	}

	Ok(next.run(request).await)
}

/// OR-combinator over pure check futures.
///
/// Checks run in order; the first success short-circuits. When every check
/// fails the last failure is returned, and an empty check list denies.
/// Checks must be side-effect free: failed attempts are discarded.
pub async fn any_of<I>(checks: I) -> Result<(), AccessError>
where
	I: IntoIterator,
	I::Item: Future<Output = Result<(), AccessError>>,
{
	let mut last = None;
	for check in checks {
		match check.await {
			Ok(()) => return Ok(()),
			Err(err) => last = Some(err),
		}
	}
	Err(last.unwrap_or(AccessError::NoWorkspaceAccess))
}

// =============================================================================
// Shared evaluation
// =============================================================================

fn current_user(request: &Request) -> Result<CurrentUser, AccessError> {
	request
		.extensions()
		.get::<AuthContext>()
		.and_then(|ctx| ctx.current_user.clone())
		.ok_or(AccessError::Unauthenticated)
}

fn deepest_resource_id(chain: &ResolvedHierarchy) -> uuid::Uuid {
	if let Some(task) = &chain.task {
		task.id.into_inner()
	} else if let Some(board) = &chain.board {
		board.id.into_inner()
	} else if let Some(space) = &chain.space {
		space.id.into_inner()
	} else {
		chain.workspace.id.into_inner()
	}
}

async fn hierarchy_middleware(
	state: AccessState,
	params: RawPathParams,
	request: Request,
	next: Next,
	target: HierarchyTarget,
) -> Result<Response, AccessRejection> {
	let user = current_user(&request)?;
	let path = request.uri().path().to_string();
	let method = request.method().clone();

	match authorize_hierarchy(&state, &user, &params, request, target, &path, &method).await {
		Ok((mut request, chain)) => {
			AccessAuditEntry::granted(user.user_id(), &path, method.as_str())
				.with_resource(chain.kind(), deepest_resource_id(&chain))
				.emit();
			request.extensions_mut().insert(chain);
			Ok(next.run(request).await)
		}
		Err(err) => Err(reject(&user, &path, &method, err)),
	}
}

async fn authorize_hierarchy(
	state: &AccessState,
	user: &CurrentUser,
	params: &RawPathParams,
	request: Request,
	target: HierarchyTarget,
	path: &str,
	method: &Method,
) -> Result<(Request, ResolvedHierarchy), AccessError> {
	let (request, id) =
		extract_resource_id(params, request, target.param_keys, target.body_key).await?;
	let chain = state.resolver.resolve(target.kind, id).await?;

	validate_system_role(&user.roles)?;
	let role = require_role(&user.roles, &chain.workspace)?;

	// Compatibility toggle: the pre-normalization space/board checks passed
	// on any resolvable workspace role without consulting the matrix.
	let lenient = state.config.legacy_any_role && target.kind != ResourceKind::Workspace;
	if !lenient {
		state.engine.check(role, path, method)?;
	}

	Ok((request, chain))
}

async fn task_middleware(
	state: AccessState,
	params: RawPathParams,
	request: Request,
	next: Next,
	mode: AccessMode,
) -> Result<Response, AccessRejection> {
	let user = current_user(&request)?;
	let path = request.uri().path().to_string();
	let method = request.method().clone();

	match authorize_task(&state, &user, &params, request, &path, &method, mode).await {
		Ok((mut request, chain)) => {
			AccessAuditEntry::granted(user.user_id(), &path, method.as_str())
				.with_resource(ResourceKind::Task, deepest_resource_id(&chain))
				.emit();
			request.extensions_mut().insert(chain);
			Ok(next.run(request).await)
		}
		Err(err) => Err(reject(&user, &path, &method, err)),
	}
}

async fn authorize_task(
	state: &AccessState,
	user: &CurrentUser,
	params: &RawPathParams,
	request: Request,
	path: &str,
	method: &Method,
	mode: AccessMode,
) -> Result<(Request, ResolvedHierarchy), AccessError> {
	let target = HierarchyTarget::TASK;
	let (request, id) =
		extract_resource_id(params, request, target.param_keys, target.body_key).await?;
	let chain = state.resolver.resolve(target.kind, id).await?;
	let task = chain
		.task
		.clone()
		.ok_or(AccessError::EntityNotFound(ResourceKind::Task))?;

	// Task involvement is the single deliberate bypass of role evaluation.
	if state.engine.task_direct_access(&task, user.user_id(), mode) {
		return Ok((request, chain));
	}

	validate_system_role(&user.roles)?;
	let role = require_role(&user.roles, &chain.workspace)?;

	match mode {
		// Visibility: holding any role in the owning workspace suffices.
		AccessMode::Read => {}
		AccessMode::Write => state.engine.check(role, path, method)?,
	}

	Ok((request, chain))
}

fn reject(user: &CurrentUser, path: &str, method: &Method, err: AccessError) -> AccessRejection {
	if !err.is_internal() {
		AccessAuditEntry::denied(user.user_id(), path, method.as_str())
			.with_reason(err.to_string())
			.emit();
	}
	AccessRejection(err)
}

// =============================================================================
// Route-Level System Role Layer
// =============================================================================

/// Route layer gating a subtree on the system-role axis.
///
/// The system role gates whether hierarchy evaluation runs at all, so this
/// layer performs no entity lookups: it reads the authenticated context,
/// validates the role string, and checks it against the allowed set.
///
/// # Role Combinations
///
/// - [`RequireSystemRole::any_authenticated()`] - any recognized system role
/// - [`RequireSystemRole::moderator()`] - moderator and above
/// - [`RequireSystemRole::admin()`] - admin and super_admin only
///
/// # Example
///
/// ```ignore
/// Router::new()
///     .route("/admin/workspaces", get(list_all_workspaces))
///     .route_layer(RequireSystemRole::admin());
/// ```
#[derive(Clone)]
pub struct RequireSystemRole {
	allowed: &'static [SystemRole],
}

impl RequireSystemRole {
	/// Allow any recognized system role.
	pub fn any_authenticated() -> Self {
		Self {
			allowed: SystemRole::all(),
		}
	}

	/// Allow moderators, admins, and super admins.
	pub fn moderator() -> Self {
		Self {
			allowed: &[
				SystemRole::Moderator,
				SystemRole::Admin,
				SystemRole::SuperAdmin,
			],
		}
	}

	/// Allow admins and super admins.
	pub fn admin() -> Self {
		Self {
			allowed: &[SystemRole::Admin, SystemRole::SuperAdmin],
		}
	}
}

impl<S> Layer<S> for RequireSystemRole {
	type Service = RequireSystemRoleService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequireSystemRoleService {
			inner,
			allowed: self.allowed,
		}
	}
}

/// Service wrapper for [`RequireSystemRole`].
#[derive(Clone)]
pub struct RequireSystemRoleService<S> {
	inner: S,
	allowed: &'static [SystemRole],
}

impl<S> Service<Request<Body>> for RequireSystemRoleService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = RequireSystemRoleFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let auth_ctx = req
			.extensions()
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		let Some(current_user) = auth_ctx.current_user else {
			tracing::debug!("system role check denied: not authenticated");
			return RequireSystemRoleFuture::Rejected {
				resp: Some(AccessRejection(AccessError::Unauthenticated).into_response()),
			};
		};

		let Some(role) = SystemRole::parse(current_user.system_role()) else {
			tracing::info!(
				user_id = %current_user.user_id(),
				system_role = current_user.system_role(),
				"system role check denied: unrecognized role"
			);
			return RequireSystemRoleFuture::Rejected {
				resp: Some(AccessRejection(AccessError::InvalidSystemRole).into_response()),
			};
		};

		if !self.allowed.contains(&role) {
			tracing::info!(
				user_id = %current_user.user_id(),
				system_role = %role,
				"system role check denied: insufficient privileges"
			);
			return RequireSystemRoleFuture::Rejected {
				resp: Some(forbidden_response()),
			};
		}

		tracing::debug!(user_id = %current_user.user_id(), "system role check passed");

		RequireSystemRoleFuture::Inner {
			fut: self.inner.call(req),
		}
	}
}

pin_project! {
	/// Future for [`RequireSystemRoleService`].
	#[project = RequireSystemRoleFutureProj]
	pub enum RequireSystemRoleFuture<F> {
		Inner { #[pin] fut: F },
		Rejected { resp: Option<Response> },
	}
}

impl<F, E> Future for RequireSystemRoleFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			RequireSystemRoleFutureProj::Inner { fut } => fut.poll(cx),
			RequireSystemRoleFutureProj::Rejected { resp } => {
				Poll::Ready(Ok(resp.take().expect("polled after completion")))
			}
		}
	}
}

fn forbidden_response() -> Response {
	(
		StatusCode::FORBIDDEN,
		Json(ErrorResponse {
			error: "forbidden".to_string(),
			message: "Insufficient permissions".to_string(),
		}),
	)
		.into_response()
}
