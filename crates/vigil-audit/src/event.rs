// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The audit event data model.
//!
//! Events use a typed taxonomy for the cases the application knows about
//! and degrade gracefully for the ones it does not: unknown `event_type`
//! strings deserialize into [`AuditEventType::Other`], and any payload
//! fields beyond the typed HTTP context land in the flattened `context`
//! map.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Types of events recorded in the audit trail.
///
/// The set is open-ended by convention: producers may emit any
/// SCREAMING_SNAKE_CASE tag, and tags without a variant round-trip through
/// [`AuditEventType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
	// Authentication events
	LoginSuccess,
	LoginWrongPassword,
	LoginUnknownUser,
	Logout,

	// Registration events
	RegisterSuccess,
	RegisterDuplicateEmail,
	RegisterFailed,

	// Profile events
	PasswordChanged,
	ProfileUpdated,

	// Admin panel events
	AdminCreateUser,
	AdminUpdateUser,
	AdminDeleteUser,

	// Request-cycle events emitted by the ingestion middleware
	Request,

	// Catch-all for tags this build does not know
	#[serde(untagged)]
	Other(String),
}

impl AuditEventType {
	/// Returns the default severity for this event type.
	pub fn default_severity(&self) -> AuditSeverity {
		match self {
			// Info: normal operations
			AuditEventType::LoginSuccess
			| AuditEventType::Logout
			| AuditEventType::RegisterSuccess
			| AuditEventType::ProfileUpdated
			| AuditEventType::Request => AuditSeverity::Info,

			// Notice: administrative/credential changes
			AuditEventType::PasswordChanged
			| AuditEventType::AdminCreateUser
			| AuditEventType::AdminUpdateUser
			| AuditEventType::AdminDeleteUser => AuditSeverity::Notice,

			// Warning: security-relevant failures
			AuditEventType::LoginWrongPassword
			| AuditEventType::LoginUnknownUser
			| AuditEventType::RegisterDuplicateEmail => AuditSeverity::Warning,

			// Error: operation failures
			AuditEventType::RegisterFailed => AuditSeverity::Error,

			AuditEventType::Other(_) => AuditSeverity::Info,
		}
	}
}

impl fmt::Display for AuditEventType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			AuditEventType::LoginSuccess => "LOGIN_SUCCESS",
			AuditEventType::LoginWrongPassword => "LOGIN_WRONG_PASSWORD",
			AuditEventType::LoginUnknownUser => "LOGIN_UNKNOWN_USER",
			AuditEventType::Logout => "LOGOUT",
			AuditEventType::RegisterSuccess => "REGISTER_SUCCESS",
			AuditEventType::RegisterDuplicateEmail => "REGISTER_DUPLICATE_EMAIL",
			AuditEventType::RegisterFailed => "REGISTER_FAILED",
			AuditEventType::PasswordChanged => "PASSWORD_CHANGED",
			AuditEventType::ProfileUpdated => "PROFILE_UPDATED",
			AuditEventType::AdminCreateUser => "ADMIN_CREATE_USER",
			AuditEventType::AdminUpdateUser => "ADMIN_UPDATE_USER",
			AuditEventType::AdminDeleteUser => "ADMIN_DELETE_USER",
			AuditEventType::Request => "REQUEST",
			AuditEventType::Other(tag) => tag,
		};
		write!(f, "{s}")
	}
}

/// Severity levels for audit events, compatible with RFC 5424 syslog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
	Debug = 7,
	#[default]
	Info = 6,
	Notice = 5,
	Warning = 4,
	Error = 3,
	Critical = 2,
}

impl PartialOrd for AuditSeverity {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for AuditSeverity {
	fn cmp(&self, other: &Self) -> Ordering {
		// Lower numeric value = higher severity (Critical=2 > Debug=7)
		(*other as u8).cmp(&(*self as u8))
	}
}

impl fmt::Display for AuditSeverity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			AuditSeverity::Debug => "debug",
			AuditSeverity::Info => "info",
			AuditSeverity::Notice => "notice",
			AuditSeverity::Warning => "warning",
			AuditSeverity::Error => "error",
			AuditSeverity::Critical => "critical",
		};
		write!(f, "{s}")
	}
}

/// An authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub id: String,
	pub email: String,
	pub role: String,
}

/// The actor associated with an audited action: either an authenticated
/// principal or the `"anonymous"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
	#[default]
	Anonymous,
	#[serde(untagged)]
	Principal(Principal),
}

impl Actor {
	pub fn principal(
		id: impl Into<String>,
		email: impl Into<String>,
		role: impl Into<String>,
	) -> Self {
		Actor::Principal(Principal {
			id: id.into(),
			email: email.into(),
			role: role.into(),
		})
	}

	/// The key this actor aggregates under: the principal's email, or
	/// `"anonymous"`.
	pub fn display_key(&self) -> &str {
		match self {
			Actor::Anonymous => "anonymous",
			Actor::Principal(p) => &p.email,
		}
	}
}

/// Typed well-known fields of the request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HttpContext {
	pub method: String,
	pub path: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub remote_addr: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_agent: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<u16>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duration_ms: Option<u64>,
}

/// One audit record.
///
/// Created synchronously when an action completes, encrypted and appended
/// to the day's log, never individually updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
	/// Unique identifier for this record.
	pub id: Uuid,
	/// When the event was captured. Stamped once - at build time, or by
	/// the codec just before encryption if still absent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<DateTime<Utc>>,
	/// The type of event.
	pub event_type: AuditEventType,
	/// Who performed the action.
	#[serde(default)]
	pub actor: Actor,
	/// Request/response fields, when the event came from an HTTP cycle.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub http: Option<HttpContext>,
	/// Free-form event-specific payload. Sensitive fields are redacted
	/// before persistence, see [`crate::redaction`].
	#[serde(flatten)]
	pub context: Map<String, Value>,
}

impl AuditEvent {
	/// Create a new builder for the given event type.
	pub fn builder(event_type: AuditEventType) -> AuditEventBuilder {
		AuditEventBuilder::new(event_type)
	}

	/// Convenience constructor for domain events: an action performed by a
	/// known actor, outside any particular request cycle.
	pub fn action(event_type: AuditEventType, actor: Actor) -> AuditEventBuilder {
		AuditEventBuilder::new(event_type).actor(actor)
	}

	/// The severity of this event, derived from its type.
	pub fn severity(&self) -> AuditSeverity {
		self.event_type.default_severity()
	}
}

/// Builder for constructing audit events with a fluent API.
#[derive(Debug, Clone)]
pub struct AuditEventBuilder {
	event_type: AuditEventType,
	timestamp: Option<DateTime<Utc>>,
	actor: Actor,
	http: Option<HttpContext>,
	context: Map<String, Value>,
}

impl AuditEventBuilder {
	pub fn new(event_type: AuditEventType) -> Self {
		Self {
			event_type,
			timestamp: None,
			actor: Actor::Anonymous,
			http: None,
			context: Map::new(),
		}
	}

	/// Set the actor. Defaults to [`Actor::Anonymous`].
	pub fn actor(mut self, actor: Actor) -> Self {
		self.actor = actor;
		self
	}

	/// Set the capture timestamp. Defaults to now at build time.
	pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
		self.timestamp = Some(timestamp);
		self
	}

	/// Attach the request/response context.
	pub fn http(mut self, http: HttpContext) -> Self {
		self.http = Some(http);
		self
	}

	/// Add one payload field.
	pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.context.insert(key.into(), value.into());
		self
	}

	/// Merge a payload map.
	pub fn context(mut self, context: Map<String, Value>) -> Self {
		self.context.extend(context);
		self
	}

	pub fn build(self) -> AuditEvent {
		AuditEvent {
			id: Uuid::new_v4(),
			timestamp: Some(self.timestamp.unwrap_or_else(Utc::now)),
			event_type: self.event_type,
			actor: self.actor,
			http: self.http,
			context: self.context,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	mod audit_event_type {
		use super::*;

		#[test]
		fn display_returns_screaming_snake_case() {
			assert_eq!(AuditEventType::LoginSuccess.to_string(), "LOGIN_SUCCESS");
			assert_eq!(
				AuditEventType::LoginWrongPassword.to_string(),
				"LOGIN_WRONG_PASSWORD"
			);
			assert_eq!(
				AuditEventType::AdminDeleteUser.to_string(),
				"ADMIN_DELETE_USER"
			);
		}

		#[test]
		fn serde_matches_display() {
			let json = serde_json::to_value(AuditEventType::RegisterDuplicateEmail).unwrap();
			assert_eq!(json, json!("REGISTER_DUPLICATE_EMAIL"));
		}

		#[test]
		fn unknown_tags_roundtrip_through_other() {
			let parsed: AuditEventType = serde_json::from_value(json!("CAPTCHA_FAILED")).unwrap();
			assert_eq!(parsed, AuditEventType::Other("CAPTCHA_FAILED".to_string()));
			assert_eq!(
				serde_json::to_value(&parsed).unwrap(),
				json!("CAPTCHA_FAILED")
			);
		}

		#[test]
		fn known_tags_deserialize_to_variants() {
			let parsed: AuditEventType = serde_json::from_value(json!("LOGIN_SUCCESS")).unwrap();
			assert_eq!(parsed, AuditEventType::LoginSuccess);
		}

		#[test]
		fn failures_default_to_warning_severity() {
			assert_eq!(
				AuditEventType::LoginWrongPassword.default_severity(),
				AuditSeverity::Warning
			);
			assert_eq!(
				AuditEventType::LoginSuccess.default_severity(),
				AuditSeverity::Info
			);
			assert_eq!(
				AuditEventType::AdminDeleteUser.default_severity(),
				AuditSeverity::Notice
			);
		}
	}

	mod severity {
		use super::*;

		#[test]
		fn ordering_puts_critical_highest() {
			assert!(AuditSeverity::Critical > AuditSeverity::Error);
			assert!(AuditSeverity::Warning > AuditSeverity::Info);
			assert!(AuditSeverity::Info > AuditSeverity::Debug);
		}
	}

	mod actor {
		use super::*;

		#[test]
		fn anonymous_serializes_as_sentinel_string() {
			assert_eq!(serde_json::to_value(Actor::Anonymous).unwrap(), json!("anonymous"));
		}

		#[test]
		fn principal_serializes_as_object() {
			let actor = Actor::principal("7", "admin@example.com", "admin");
			assert_eq!(
				serde_json::to_value(&actor).unwrap(),
				json!({"id": "7", "email": "admin@example.com", "role": "admin"})
			);
		}

		#[test]
		fn deserializes_both_forms() {
			let anon: Actor = serde_json::from_value(json!("anonymous")).unwrap();
			assert_eq!(anon, Actor::Anonymous);

			let principal: Actor = serde_json::from_value(
				json!({"id": "9", "email": "user@example.com", "role": "user"}),
			)
			.unwrap();
			assert_eq!(principal, Actor::principal("9", "user@example.com", "user"));
		}

		#[test]
		fn display_key_is_email_or_anonymous() {
			assert_eq!(Actor::Anonymous.display_key(), "anonymous");
			assert_eq!(
				Actor::principal("1", "a@b.com", "user").display_key(),
				"a@b.com"
			);
		}
	}

	mod event {
		use super::*;

		#[test]
		fn builder_stamps_timestamp_and_id() {
			let event = AuditEvent::builder(AuditEventType::LoginSuccess).build();
			assert!(event.timestamp.is_some());
			assert!(!event.id.is_nil());
		}

		#[test]
		fn builder_keeps_explicit_timestamp() {
			let at = "2025-01-15T10:00:00Z".parse().unwrap();
			let event = AuditEvent::builder(AuditEventType::Logout)
				.timestamp(at)
				.build();
			assert_eq!(event.timestamp, Some(at));
		}

		#[test]
		fn context_flattens_into_top_level_fields() {
			let event = AuditEvent::builder(AuditEventType::AdminDeleteUser)
				.actor(Actor::principal("1", "admin@example.com", "admin"))
				.detail("target_user_id", "42")
				.build();

			let value = serde_json::to_value(&event).unwrap();
			assert_eq!(value["target_user_id"], json!("42"));
			assert_eq!(value["event_type"], json!("ADMIN_DELETE_USER"));
		}

		#[test]
		fn serde_roundtrip_preserves_event() {
			let event = AuditEvent::builder(AuditEventType::Request)
				.actor(Actor::principal("3", "user@example.com", "user"))
				.http(HttpContext {
					method: "POST".to_string(),
					path: "/login".to_string(),
					remote_addr: Some("203.0.113.9".to_string()),
					user_agent: Some("Mozilla/5.0".to_string()),
					status: Some(200),
					duration_ms: Some(18),
				})
				.detail("body", json!({"email": "user@example.com"}))
				.build();

			let encoded = serde_json::to_string(&event).unwrap();
			let decoded: AuditEvent = serde_json::from_str(&encoded).unwrap();
			assert_eq!(decoded, event);
		}

		#[test]
		fn severity_derives_from_type() {
			let event = AuditEvent::builder(AuditEventType::LoginWrongPassword).build();
			assert_eq!(event.severity(), AuditSeverity::Warning);
		}

		#[test]
		fn action_constructor_sets_actor() {
			let event = AuditEvent::action(
				AuditEventType::AdminDeleteUser,
				Actor::principal("1", "admin@example.com", "admin"),
			)
			.detail("target_user_id", "42")
			.build();

			assert_eq!(event.actor.display_key(), "admin@example.com");
			assert!(event.http.is_none());
		}
	}
}
