// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource-id extraction from requests.
//!
//! The id of the resource under authorization can arrive in several request
//! locations; the first non-empty value wins:
//!
//! 1. a kind-specific route parameter (`workspace_id`, `space_id`, ...)
//! 2. the generic `id` route parameter
//! 3. a named field of a JSON request body
//!
//! Reading the body consumes it, so the buffered bytes are re-attached to
//! the request before it continues down the middleware chain. Bodies are
//! only buffered when the route parameters did not produce an id.

use axum::body::Body;
use axum::extract::{RawPathParams, Request};
use serde_json::Value;
use uuid::Uuid;

use trellis_server_access::AccessError;

/// Maximum buffered body size when extracting an id from a JSON body.
pub const BODY_LIMIT: usize = 256 * 1024;

/// First non-empty value among the named route parameters.
pub fn param_value(params: &RawPathParams, keys: &[&str]) -> Option<String> {
	keys.iter().find_map(|key| {
		params
			.iter()
			.find(|(name, value)| name == key && !value.is_empty())
			.map(|(_, value)| value.to_string())
	})
}

/// A string field of a parsed JSON body.
pub fn body_field(body: &Value, key: &str) -> Option<String> {
	body
		.get(key)
		.and_then(Value::as_str)
		.filter(|s| !s.is_empty())
		.map(|s| s.to_string())
}

/// Buffer the request body and parse it as JSON.
///
/// Returns the rebuilt request together with the parsed body, or `None` when
/// the body is empty or not valid JSON. An unreadable body is treated as a
/// malformed request.
pub async fn buffer_json_body(request: Request) -> Result<(Request, Option<Value>), AccessError> {
	let (parts, body) = request.into_parts();
	let bytes = axum::body::to_bytes(body, BODY_LIMIT)
		.await
		.map_err(|_| AccessError::MissingResourceId)?;

	let parsed = if bytes.is_empty() {
		None
	} else {
		serde_json::from_slice::<Value>(&bytes).ok()
	};

	let request = Request::from_parts(parts, Body::from(bytes));
	Ok((request, parsed))
}

/// Extract and parse the target resource id.
///
/// Checks the given route parameters first, then the named JSON body field.
/// A missing or malformed id is [`AccessError::MissingResourceId`].
pub async fn extract_resource_id(
	params: &RawPathParams,
	request: Request,
	param_keys: &[&str],
	body_key: &str,
) -> Result<(Request, Uuid), AccessError> {
	if let Some(raw) = param_value(params, param_keys) {
		let id = Uuid::parse_str(&raw).map_err(|_| AccessError::MissingResourceId)?;
		return Ok((request, id));
	}

	let (request, body) = buffer_json_body(request).await?;
	let raw = body
		.as_ref()
		.and_then(|value| body_field(value, body_key))
		.ok_or(AccessError::MissingResourceId)?;
	let id = Uuid::parse_str(&raw).map_err(|_| AccessError::MissingResourceId)?;
	Ok((request, id))
}

/// Extract a named owner field from route parameters or the JSON body.
pub async fn extract_named_field(
	params: &RawPathParams,
	request: Request,
	field: &str,
) -> Result<(Request, Option<String>), AccessError> {
	if let Some(value) = param_value(params, &[field]) {
		return Ok((request, Some(value)));
	}

	let (request, body) = buffer_json_body(request).await?;
	let value = body.as_ref().and_then(|value| body_field(value, field));
	Ok((request, value))
}
