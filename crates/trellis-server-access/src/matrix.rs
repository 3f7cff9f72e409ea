// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The role/permission matrix.
//!
//! A static table of which workspace roles may perform which HTTP methods on
//! which resource paths. The table is plain data built once at process start
//! and evaluated by pure lookups, keeping the decision engine independently
//! testable.
//!
//! Lookup is a pattern match, not exact string equality: a `:param` segment
//! matches any single non-empty path segment, and a trailing `*` segment
//! matches any remaining suffix, so one rule covers parameterized sub-paths
//! such as `/space/:id/archive`.
//!
//! Absence of a matching rule is a denial. Unknown roles, unknown paths, and
//! unknown methods all resolve to `false`.

use http::Method;

use crate::types::WorkspaceRole;

// =============================================================================
// Path Patterns
// =============================================================================

/// A slash-separated path pattern.
///
/// Segments are matched positionally: a literal segment must match exactly,
/// `:name` matches any single non-empty segment, and a trailing `*` matches
/// one or more remaining segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
	segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Param,
	Rest,
}

impl PathPattern {
	/// Parse a pattern such as `/space/:id/archive` or `/board/*`.
	pub fn new(pattern: &str) -> Self {
		let segments = pattern
			.split('/')
			.filter(|s| !s.is_empty())
			.map(|s| {
				if s == "*" {
					Segment::Rest
				} else if s.starts_with(':') {
					Segment::Param
				} else {
					Segment::Literal(s.to_string())
				}
			})
			.collect();
		Self { segments }
	}

	/// Returns true if the given concrete path matches this pattern.
	pub fn matches(&self, path: &str) -> bool {
		let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

		let mut i = 0;
		for segment in &self.segments {
			match segment {
				Segment::Rest => return i < parts.len(),
				Segment::Param => {
					if i >= parts.len() {
						return false;
					}
					i += 1;
				}
				Segment::Literal(lit) => {
					if parts.get(i) != Some(&lit.as_str()) {
						return false;
					}
					i += 1;
				}
			}
		}
		i == parts.len()
	}
}

// =============================================================================
// Matrix Rules
// =============================================================================

/// A single matrix rule: one role, one path pattern, a set of methods.
#[derive(Debug, Clone)]
pub struct MatrixRule {
	pub role: WorkspaceRole,
	pub pattern: PathPattern,
	pub methods: Vec<Method>,
}

impl MatrixRule {
	fn new(role: WorkspaceRole, pattern: &str, methods: &[Method]) -> Self {
		Self {
			role,
			pattern: PathPattern::new(pattern),
			methods: methods.to_vec(),
		}
	}
}

/// The full role/permission table.
#[derive(Debug, Clone, Default)]
pub struct RoleMatrix {
	rules: Vec<MatrixRule>,
}

const ALL_METHODS: &[Method] = &[
	Method::GET,
	Method::POST,
	Method::PUT,
	Method::PATCH,
	Method::DELETE,
];

const WRITE_METHODS: &[Method] = &[Method::POST, Method::PUT, Method::PATCH];

const READ_METHODS: &[Method] = &[Method::GET];

impl RoleMatrix {
	/// An empty matrix that denies everything.
	pub fn empty() -> Self {
		Self { rules: Vec::new() }
	}

	/// The standard Trellis permission table.
	///
	/// - `super_admin` and `owner`: every method on every hierarchy namespace.
	/// - `admin`: everything except `DELETE /workspace/:id`, which is
	///   owner-only.
	/// - `member`: read everywhere; create/update within spaces, boards, and
	///   tasks; no deletes.
	/// - `viewer`: read only.
	pub fn standard() -> Self {
		let mut rules = Vec::new();

		for role in [WorkspaceRole::SuperAdmin, WorkspaceRole::Owner] {
			for ns in ["/workspace", "/space", "/board", "/task"] {
				rules.push(MatrixRule::new(role, ns, ALL_METHODS));
				rules.push(MatrixRule::new(role, &format!("{ns}/*"), ALL_METHODS));
			}
		}

		// Admin: full control below workspace level, no workspace deletion.
		rules.push(MatrixRule::new(
			WorkspaceRole::Admin,
			"/workspace",
			&[Method::GET, Method::POST],
		));
		rules.push(MatrixRule::new(
			WorkspaceRole::Admin,
			"/workspace/*",
			&[Method::GET, Method::POST, Method::PUT, Method::PATCH],
		));
		for ns in ["/space", "/board", "/task"] {
			rules.push(MatrixRule::new(WorkspaceRole::Admin, ns, ALL_METHODS));
			rules.push(MatrixRule::new(
				WorkspaceRole::Admin,
				&format!("{ns}/*"),
				ALL_METHODS,
			));
		}

		// Member: read everywhere, write within existing containers.
		for ns in ["/workspace", "/space", "/board", "/task"] {
			rules.push(MatrixRule::new(WorkspaceRole::Member, ns, READ_METHODS));
			rules.push(MatrixRule::new(
				WorkspaceRole::Member,
				&format!("{ns}/*"),
				READ_METHODS,
			));
		}
		for ns in ["/space", "/board", "/task"] {
			rules.push(MatrixRule::new(
				WorkspaceRole::Member,
				&format!("{ns}/:id"),
				WRITE_METHODS,
			));
			rules.push(MatrixRule::new(
				WorkspaceRole::Member,
				&format!("{ns}/:id/*"),
				WRITE_METHODS,
			));
		}

		// Viewer: read only.
		for ns in ["/workspace", "/space", "/board", "/task"] {
			rules.push(MatrixRule::new(WorkspaceRole::Viewer, ns, READ_METHODS));
			rules.push(MatrixRule::new(
				WorkspaceRole::Viewer,
				&format!("{ns}/*"),
				READ_METHODS,
			));
		}

		Self { rules }
	}

	/// Append a rule. Used by deployments that extend the standard table.
	pub fn with_rule(mut self, role: WorkspaceRole, pattern: &str, methods: &[Method]) -> Self {
		self.rules.push(MatrixRule::new(role, pattern, methods));
		self
	}

	/// Returns true if the matrix explicitly allows `(role, path, method)`.
	///
	/// Deny-by-default: no matching rule means `false`.
	pub fn has_permission(&self, role: WorkspaceRole, path: &str, method: &Method) -> bool {
		self.rules.iter().any(|rule| {
			rule.role == role && rule.methods.contains(method) && rule.pattern.matches(path)
		})
	}
}
