// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Handler-to-middleware capture contract.

use std::convert::Infallible;

use axum::response::{IntoResponseParts, ResponseParts};
use serde_json::{Map, Value};
use vigil_audit::{Actor, AuditEventType};

/// Event details a handler wants recorded for the current request.
///
/// Handlers attach this to the response (it is a response extension, and
/// implements [`IntoResponseParts`] so it composes into handler return
/// tuples). The audit middleware removes it when the response completes
/// and merges it into the event it is about to append. Everything is
/// optional; a request with no capture is recorded as a plain
/// [`AuditEventType::Request`] cycle.
#[derive(Debug, Clone, Default)]
pub struct AuditCapture {
	/// Overrides the default `REQUEST` event type.
	pub event_type: Option<AuditEventType>,
	/// Overrides the session actor. Useful on login routes, where the
	/// session did not exist when the request arrived.
	pub actor: Option<Actor>,
	/// Submitted form fields, recorded under the `body` payload key.
	/// Sensitive fields are redacted before persistence.
	pub form: Map<String, Value>,
	/// Additional payload fields merged into the event context.
	pub context: Map<String, Value>,
}

impl AuditCapture {
	pub fn new(event_type: AuditEventType) -> Self {
		Self {
			event_type: Some(event_type),
			..Default::default()
		}
	}

	pub fn actor(mut self, actor: Actor) -> Self {
		self.actor = Some(actor);
		self
	}

	/// Record one submitted form field.
	pub fn form_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.form.insert(key.into(), value.into());
		self
	}

	/// Record a whole form at once.
	pub fn form(mut self, form: Map<String, Value>) -> Self {
		self.form.extend(form);
		self
	}

	/// Add one payload field.
	pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.context.insert(key.into(), value.into());
		self
	}
}

impl IntoResponseParts for AuditCapture {
	type Error = Infallible;

	fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
		res.extensions_mut().insert(self);
		Ok(res)
	}
}
