// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP error responses for access-control failures.
//!
//! Classified failures map to stable `{error, message}` JSON bodies. Deny
//! messages never name entities: whether a resource exists is only revealed
//! through the 404 family, which the embedding server may additionally
//! collapse into 403 when stricter information hiding is required.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};
use trellis_server_access::AccessError;

/// JSON body returned for every access-control failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Stable machine-readable error code.
	pub error: String,
	/// Human-readable message.
	pub message: String,
}

/// Newtype carrying an [`AccessError`] out of middleware as a response.
#[derive(Debug)]
pub struct AccessRejection(pub AccessError);

impl From<AccessError> for AccessRejection {
	fn from(err: AccessError) -> Self {
		Self(err)
	}
}

impl AccessRejection {
	fn code(&self) -> &'static str {
		match &self.0 {
			AccessError::MissingResourceId => "missing_resource_id",
			AccessError::Unauthenticated => "unauthorized",
			AccessError::EntityNotFound(_) => "not_found",
			AccessError::NoWorkspaceAccess
			| AccessError::InvalidSystemRole
			| AccessError::PermissionDenied { .. }
			| AccessError::NotResourceOwner => "forbidden",
			AccessError::RateLimited => "rate_limited",
			AccessError::Store(_) => "internal",
		}
	}

	fn message(&self) -> String {
		match &self.0 {
			// Store detail stays in the logs.
			AccessError::Store(_) => "internal server error".to_string(),
			other => other.to_string(),
		}
	}
}

impl IntoResponse for AccessRejection {
	fn into_response(self) -> Response {
		if self.0.is_internal() {
			tracing::error!(error = %self.0, "access layer collaborator failure");
		}

		let status = StatusCode::from_u16(self.0.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = ErrorResponse {
			error: self.code().to_string(),
			message: self.message(),
		};
		(status, Json(body)).into_response()
	}
}
