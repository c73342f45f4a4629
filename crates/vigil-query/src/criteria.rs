// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Field-predicate search over one day's events.

use chrono::NaiveDate;
use tracing::debug;
use vigil_audit::{Actor, AuditEvent};
use vigil_store::DailyLogStore;

/// Optional predicates, combined with AND semantics. An omitted field
/// matches everything. `path` is a substring match; all other predicates
/// are exact equality.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
	/// Day to search; today if omitted.
	pub date: Option<NaiveDate>,
	pub actor_id: Option<String>,
	pub email: Option<String>,
	pub method: Option<String>,
	pub status: Option<u16>,
	pub path: Option<String>,
}

impl SearchCriteria {
	pub fn matches(&self, event: &AuditEvent) -> bool {
		if let Some(ref actor_id) = self.actor_id {
			match &event.actor {
				Actor::Principal(p) if p.id == *actor_id => {}
				_ => return false,
			}
		}

		if let Some(ref email) = self.email {
			match &event.actor {
				Actor::Principal(p) if p.email == *email => {}
				_ => return false,
			}
		}

		if let Some(ref method) = self.method {
			match &event.http {
				Some(http) if http.method == *method => {}
				_ => return false,
			}
		}

		if let Some(status) = self.status {
			match &event.http {
				Some(http) if http.status == Some(status) => {}
				_ => return false,
			}
		}

		if let Some(ref path) = self.path {
			match &event.http {
				Some(http) if http.path.contains(path.as_str()) => {}
				_ => return false,
			}
		}

		true
	}
}

/// Load one day from the store and keep the events matching every supplied
/// predicate, in append order.
pub async fn search(store: &DailyLogStore, criteria: &SearchCriteria) -> Vec<AuditEvent> {
	let events = store.read_day(criteria.date).await;
	let total = events.len();

	let matched: Vec<AuditEvent> = events
		.into_iter()
		.filter(|event| criteria.matches(event))
		.collect();

	debug!(total, matched = matched.len(), "searched audit events");
	matched
}

#[cfg(test)]
mod tests {
	use super::*;
	use vigil_audit::{AuditEventType, HttpContext};

	fn event(email: Option<&str>, method: &str, status: u16, path: &str) -> AuditEvent {
		let actor = match email {
			Some(email) => Actor::principal("7", email, "user"),
			None => Actor::Anonymous,
		};
		AuditEvent::builder(AuditEventType::Request)
			.actor(actor)
			.http(HttpContext {
				method: method.to_string(),
				path: path.to_string(),
				remote_addr: None,
				user_agent: None,
				status: Some(status),
				duration_ms: None,
			})
			.build()
	}

	#[test]
	fn empty_criteria_matches_everything() {
		let criteria = SearchCriteria::default();
		assert!(criteria.matches(&event(Some("a@example.com"), "GET", 200, "/")));
		assert!(criteria.matches(&event(None, "POST", 500, "/login")));
	}

	#[test]
	fn method_and_status_are_exact_matches() {
		let criteria = SearchCriteria {
			method: Some("POST".to_string()),
			status: Some(200),
			..Default::default()
		};

		assert!(criteria.matches(&event(None, "POST", 200, "/login")));
		assert!(!criteria.matches(&event(None, "POST", 401, "/login")));
		assert!(!criteria.matches(&event(None, "GET", 200, "/login")));
	}

	#[test]
	fn path_is_substring_match() {
		let criteria = SearchCriteria {
			path: Some("login".to_string()),
			..Default::default()
		};

		assert!(criteria.matches(&event(None, "POST", 200, "/login")));
		assert!(criteria.matches(&event(None, "GET", 200, "/admin/login-history")));
		assert!(!criteria.matches(&event(None, "GET", 200, "/register")));
	}

	#[test]
	fn actor_predicates_never_match_anonymous() {
		let by_email = SearchCriteria {
			email: Some("a@example.com".to_string()),
			..Default::default()
		};
		let by_id = SearchCriteria {
			actor_id: Some("7".to_string()),
			..Default::default()
		};

		assert!(by_email.matches(&event(Some("a@example.com"), "GET", 200, "/")));
		assert!(!by_email.matches(&event(None, "GET", 200, "/")));
		assert!(by_id.matches(&event(Some("a@example.com"), "GET", 200, "/")));
		assert!(!by_id.matches(&event(None, "GET", 200, "/")));
	}

	#[test]
	fn predicates_combine_conjunctively() {
		let criteria = SearchCriteria {
			email: Some("a@example.com".to_string()),
			method: Some("POST".to_string()),
			path: Some("/login".to_string()),
			..Default::default()
		};

		assert!(criteria.matches(&event(Some("a@example.com"), "POST", 200, "/login")));
		assert!(!criteria.matches(&event(Some("b@example.com"), "POST", 200, "/login")));
		assert!(!criteria.matches(&event(Some("a@example.com"), "GET", 200, "/login")));
	}

	#[test]
	fn events_without_http_context_fail_http_predicates() {
		let logout = AuditEvent::builder(AuditEventType::Logout).build();
		let criteria = SearchCriteria {
			method: Some("POST".to_string()),
			..Default::default()
		};
		assert!(!criteria.matches(&logout));
	}
}
