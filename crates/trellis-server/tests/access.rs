// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end access-control scenarios against a real router.
//!
//! Builds the canonical hierarchy (workspace W1 → space S1 → board B1 →
//! task Tk1) in an in-memory directory and drives the middleware family
//! through `tower::ServiceExt::oneshot`, asserting the externally visible
//! status codes.

use axum::{
	body::Body,
	extract::{Extension, Request},
	http::StatusCode,
	middleware,
	response::IntoResponse,
	routing::{get, patch, post},
	Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use trellis_server::{
	require_board_access, require_rate_limit, require_space_access, require_task_access,
	require_task_edit, require_workspace_access, AccessState,
};
use trellis_server_access::{
	AccessConfig, AuthContext, Board, CurrentUser, MemoryDirectory, ResolvedHierarchy, Space,
	Task, UserId, UserRoles, Workspace, WorkspaceRole,
};

struct World {
	directory: Arc<MemoryDirectory>,
	workspace: Workspace,
	space: Space,
	board: Board,
	task: Task,
	owner: UserId,
	reporter: UserId,
	watcher: UserId,
	stranger: UserId,
}

/// Workspace W1 owned by U1, space S1, board B1, task Tk1 with reporter U2
/// and one watcher. None of the task participants hold a membership row.
async fn world() -> World {
	let owner = UserId::generate();
	let reporter = UserId::generate();
	let watcher = UserId::generate();
	let stranger = UserId::generate();

	let workspace = Workspace::new(owner, "W1");
	let space = Space::new(workspace.id, "S1");
	let board = Board::new(space.id, "B1");
	let task = Task::new(board.id, "Tk1")
		.with_reporter(reporter)
		.with_watcher(watcher);

	let directory = Arc::new(MemoryDirectory::new());
	directory.put_workspace(workspace.clone()).await;
	directory.put_space(space.clone()).await;
	directory.put_board(board.clone()).await;
	directory.put_task(task.clone()).await;

	World {
		directory,
		workspace,
		space,
		board,
		task,
		owner,
		reporter,
		watcher,
		stranger,
	}
}

fn state(world: &World) -> AccessState {
	AccessState::with_directory(world.directory.clone(), AccessConfig::default())
}

async fn ok_handler() -> &'static str {
	"ok"
}

fn app(state: AccessState) -> Router {
	Router::new()
		.route(
			"/workspace/{id}",
			get(ok_handler).delete(ok_handler).route_layer(
				middleware::from_fn_with_state(state.clone(), require_workspace_access),
			),
		)
		.route(
			"/space/{id}/archive",
			post(ok_handler).route_layer(middleware::from_fn_with_state(
				state.clone(),
				require_space_access,
			)),
		)
		.route(
			"/board/{id}",
			get(ok_handler).route_layer(middleware::from_fn_with_state(
				state.clone(),
				require_board_access,
			)),
		)
		.route(
			"/task/{id}",
			get(ok_handler).route_layer(middleware::from_fn_with_state(
				state.clone(),
				require_task_access,
			)),
		)
		.route(
			"/task/{id}/status",
			patch(ok_handler).route_layer(middleware::from_fn_with_state(
				state.clone(),
				require_task_edit,
			)),
		)
		.route(
			"/task/move",
			post(ok_handler).route_layer(middleware::from_fn_with_state(
				state,
				require_task_edit,
			)),
		)
}

fn as_user(mut request: Request, roles: UserRoles) -> Request {
	request
		.extensions_mut()
		.insert(AuthContext::authenticated(CurrentUser::new(roles)));
	request
}

async fn send(app: &Router, request: Request) -> StatusCode {
	app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn owner_without_membership_row_has_owner_access() {
	let world = world().await;
	let app = app(state(&world));

	let req = as_user(
		Request::delete(format!("/workspace/{}", world.workspace.id))
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.owner),
	);

	assert_eq!(send(&app, req).await, StatusCode::OK);
}

#[tokio::test]
async fn downgraded_owner_keeps_explicit_membership_role() {
	let world = world().await;
	let app = app(state(&world));

	// Owner also holds an explicit viewer membership: the membership wins,
	// and viewers cannot delete workspaces.
	let roles =
		UserRoles::new(world.owner).with_workspace_role(world.workspace.id, WorkspaceRole::Viewer);
	let req = as_user(
		Request::delete(format!("/workspace/{}", world.workspace.id))
			.body(Body::empty())
			.unwrap(),
		roles,
	);

	assert_eq!(send(&app, req).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reporter_without_membership_can_edit_task() {
	let world = world().await;
	let app = app(state(&world));

	let req = as_user(
		Request::patch(format!("/task/{}/status", world.task.id))
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.reporter),
	);

	assert_eq!(send(&app, req).await, StatusCode::OK);
}

#[tokio::test]
async fn stranger_is_denied_task_edit() {
	let world = world().await;
	let app = app(state(&world));

	let req = as_user(
		Request::patch(format!("/task/{}/status", world.task.id))
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.stranger),
	);

	assert_eq!(send(&app, req).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn watcher_reads_but_cannot_write() {
	let world = world().await;
	let app = app(state(&world));

	let read = as_user(
		Request::get(format!("/task/{}", world.task.id))
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.watcher),
	);
	assert_eq!(send(&app, read).await, StatusCode::OK);

	let write = as_user(
		Request::patch(format!("/task/{}/status", world.task.id))
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.watcher),
	);
	assert_eq!(send(&app, write).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn workspace_member_can_edit_task_through_role_fallback() {
	let world = world().await;
	let app = app(state(&world));

	let roles = UserRoles::new(world.stranger)
		.with_workspace_role(world.workspace.id, WorkspaceRole::Member);
	let req = as_user(
		Request::patch(format!("/task/{}/status", world.task.id))
			.body(Body::empty())
			.unwrap(),
		roles,
	);

	assert_eq!(send(&app, req).await, StatusCode::OK);
}

#[tokio::test]
async fn viewer_sees_tasks_but_cannot_mutate_them() {
	let world = world().await;
	let app = app(state(&world));

	let roles = UserRoles::new(world.stranger)
		.with_workspace_role(world.workspace.id, WorkspaceRole::Viewer);

	let read = as_user(
		Request::get(format!("/task/{}", world.task.id))
			.body(Body::empty())
			.unwrap(),
		roles.clone(),
	);
	assert_eq!(send(&app, read).await, StatusCode::OK);

	let write = as_user(
		Request::patch(format!("/task/{}/status", world.task.id))
			.body(Body::empty())
			.unwrap(),
		roles,
	);
	assert_eq!(send(&app, write).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn task_id_can_arrive_in_the_request_body() {
	let world = world().await;
	let app = app(state(&world));

	let payload = serde_json::json!({ "task": world.task.id.to_string() }).to_string();
	let req = as_user(
		Request::post("/task/move")
			.header("content-type", "application/json")
			.body(Body::from(payload))
			.unwrap(),
		UserRoles::new(world.reporter),
	);

	assert_eq!(send(&app, req).await, StatusCode::OK);
}

#[tokio::test]
async fn missing_body_id_is_400() {
	let world = world().await;
	let app = app(state(&world));

	let req = as_user(
		Request::post("/task/move")
			.header("content-type", "application/json")
			.body(Body::from("{}"))
			.unwrap(),
		UserRoles::new(world.reporter),
	);

	assert_eq!(send(&app, req).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn broken_chain_is_not_found_not_forbidden() {
	let world = world().await;
	world.directory.remove_space(world.space.id).await;
	let app = app(state(&world));

	let req = as_user(
		Request::get(format!("/board/{}", world.board.id))
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.owner),
	);

	assert_eq!(send(&app, req).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn direct_access_still_requires_the_task_to_exist() {
	let world = world().await;
	let app = app(state(&world));

	let req = as_user(
		Request::patch(format!("/task/{}/status", uuid::Uuid::new_v4()))
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.reporter),
	);

	assert_eq!(send(&app, req).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_system_role_is_denied_before_role_resolution() {
	let world = world().await;
	let app = app(state(&world));

	let roles = UserRoles::new(world.owner).with_system_role("root");
	let req = as_user(
		Request::get(format!("/workspace/{}", world.workspace.id))
			.body(Body::empty())
			.unwrap(),
		roles,
	);

	assert_eq!(send(&app, req).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn strict_check_applies_at_space_level_by_default() {
	let world = world().await;
	let app = app(state(&world));

	// Viewers hold a role but the matrix denies POST on /space paths.
	let roles = UserRoles::new(world.stranger)
		.with_workspace_role(world.workspace.id, WorkspaceRole::Viewer);
	let req = as_user(
		Request::post(format!("/space/{}/archive", world.space.id))
			.body(Body::empty())
			.unwrap(),
		roles,
	);

	assert_eq!(send(&app, req).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn legacy_toggle_restores_any_role_space_checks() {
	let world = world().await;
	let state = AccessState::with_directory(
		world.directory.clone(),
		AccessConfig::new().with_legacy_any_role(true),
	);
	let app = app(state);

	let roles = UserRoles::new(world.stranger)
		.with_workspace_role(world.workspace.id, WorkspaceRole::Viewer);
	let req = as_user(
		Request::post(format!("/space/{}/archive", world.space.id))
			.body(Body::empty())
			.unwrap(),
		roles,
	);

	assert_eq!(send(&app, req).await, StatusCode::OK);
}

#[tokio::test]
async fn repeated_checks_are_idempotent() {
	let world = world().await;
	let app = app(state(&world));

	for _ in 0..3 {
		let allowed = as_user(
			Request::get(format!("/task/{}", world.task.id))
				.body(Body::empty())
				.unwrap(),
			UserRoles::new(world.watcher),
		);
		assert_eq!(send(&app, allowed).await, StatusCode::OK);

		let denied = as_user(
			Request::patch(format!("/task/{}/status", world.task.id))
				.body(Body::empty())
				.unwrap(),
			UserRoles::new(world.stranger),
		);
		assert_eq!(send(&app, denied).await, StatusCode::FORBIDDEN);
	}
}

#[tokio::test]
async fn rate_limit_admits_the_cap_then_rejects_per_user() {
	let world = world().await;
	let state = AccessState::with_directory(
		world.directory.clone(),
		AccessConfig::new().with_rate_limit_cap(10),
	);
	let app = Router::new()
		.route("/workspace/transfer", post(ok_handler))
		.route_layer(middleware::from_fn_with_state(state, require_rate_limit));

	for _ in 0..10 {
		let req = as_user(
			Request::post("/workspace/transfer")
				.body(Body::empty())
				.unwrap(),
			UserRoles::new(world.owner),
		);
		assert_eq!(send(&app, req).await, StatusCode::OK);
	}

	let over_cap = as_user(
		Request::post("/workspace/transfer")
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.owner),
	);
	assert_eq!(send(&app, over_cap).await, StatusCode::TOO_MANY_REQUESTS);

	// A different user still has a fresh window.
	let other = as_user(
		Request::post("/workspace/transfer")
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.stranger),
	);
	assert_eq!(send(&app, other).await, StatusCode::OK);
}

#[tokio::test]
async fn resolved_hierarchy_is_attached_for_handlers() {
	let world = world().await;
	let expected_board = world.board.id;

	async fn chain_handler(Extension(chain): Extension<ResolvedHierarchy>) -> impl IntoResponse {
		format!(
			"{}:{}",
			chain.workspace.id,
			chain.board.map(|b| b.id.to_string()).unwrap_or_default()
		)
	}

	let app = Router::new()
		.route("/task/{id}", get(chain_handler))
		.route_layer(middleware::from_fn_with_state(
			state(&world),
			require_task_access,
		));

	let req = as_user(
		Request::get(format!("/task/{}", world.task.id))
			.body(Body::empty())
			.unwrap(),
		UserRoles::new(world.reporter),
	);

	let resp = app.oneshot(req).await.unwrap();
	assert_eq!(resp.status(), StatusCode::OK);

	let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
	let body = String::from_utf8(bytes.to_vec()).unwrap();
	assert_eq!(
		body,
		format!("{}:{expected_board}", world.workspace.id)
	);
}
