// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit records for access-control decisions.
//!
//! Every allow, deny, and rate-limit outcome can be captured as a structured
//! [`AccessAuditEntry`] and emitted through tracing, so monitoring can
//! distinguish intentional denials from degraded collaborators without
//! parsing free-form log lines. Entries never carry tokens or entity
//! payloads, only identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ResourceKind, UserId};

/// The outcome recorded by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAuditEvent {
	/// Access to a resource was granted.
	AccessGranted,
	/// Access to a resource was denied.
	AccessDenied,
	/// The request was rejected by the rate limiter.
	RateLimited,
}

impl std::fmt::Display for AccessAuditEvent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			AccessAuditEvent::AccessGranted => "access_granted",
			AccessAuditEvent::AccessDenied => "access_denied",
			AccessAuditEvent::RateLimited => "rate_limited",
		};
		write!(f, "{s}")
	}
}

/// A single access-control decision, ready for structured logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessAuditEntry {
	pub id: Uuid,
	pub event: AccessAuditEvent,
	pub user_id: UserId,
	pub resource_kind: Option<ResourceKind>,
	pub resource_id: Option<Uuid>,
	pub path: String,
	pub method: String,
	pub reason: Option<String>,
	pub created_at: DateTime<Utc>,
}

impl AccessAuditEntry {
	fn new(
		event: AccessAuditEvent,
		user_id: UserId,
		path: impl Into<String>,
		method: impl Into<String>,
	) -> Self {
		Self {
			id: Uuid::new_v4(),
			event,
			user_id,
			resource_kind: None,
			resource_id: None,
			path: path.into(),
			method: method.into(),
			reason: None,
			created_at: Utc::now(),
		}
	}

	/// Record a granted decision.
	pub fn granted(user_id: UserId, path: impl Into<String>, method: impl Into<String>) -> Self {
		Self::new(AccessAuditEvent::AccessGranted, user_id, path, method)
	}

	/// Record a denied decision.
	pub fn denied(user_id: UserId, path: impl Into<String>, method: impl Into<String>) -> Self {
		Self::new(AccessAuditEvent::AccessDenied, user_id, path, method)
	}

	/// Record a rate-limited request.
	pub fn rate_limited(
		user_id: UserId,
		path: impl Into<String>,
		method: impl Into<String>,
	) -> Self {
		Self::new(AccessAuditEvent::RateLimited, user_id, path, method)
	}

	/// Builder: name the resolved resource.
	pub fn with_resource(mut self, kind: ResourceKind, id: Uuid) -> Self {
		self.resource_kind = Some(kind);
		self.resource_id = Some(id);
		self
	}

	/// Builder: attach the deny reason.
	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());
		self
	}

	/// Emit the entry through tracing as a structured event.
	pub fn emit(&self) {
		match self.event {
			AccessAuditEvent::AccessGranted => tracing::debug!(
				audit_id = %self.id,
				event = %self.event,
				user_id = %self.user_id,
				path = %self.path,
				method = %self.method,
				"access decision"
			),
			AccessAuditEvent::AccessDenied | AccessAuditEvent::RateLimited => tracing::info!(
				audit_id = %self.id,
				event = %self.event,
				user_id = %self.user_id,
				path = %self.path,
				method = %self.method,
				reason = self.reason.as_deref().unwrap_or(""),
				"access decision"
			),
		}
	}
}
