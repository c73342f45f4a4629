// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit ingestion middleware for axum services.
//!
//! [`AuditLayer`] observes one request/response cycle and appends one
//! audit event when the response completes: actor from the request's
//! session extension (or anonymous), method/path/address/user-agent,
//! status code, elapsed time, plus whatever [`AuditCapture`] details the
//! handler attached to the response.
//!
//! The append is fire-and-forget relative to the response: the event is
//! queued on the [`AuditWriter`] after the inner service has produced the
//! response, and no audit failure can alter or fail the response.
//!
//! # Example
//!
//! ```ignore
//! use vigil_middleware::AuditLayer;
//!
//! let app = Router::new()
//!     .route("/login", post(login))
//!     .layer(AuditLayer::new(writer));
//! // the session layer (outermost) inserts `Actor` into request extensions
//! ```

pub mod capture;

pub use capture::AuditCapture;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{body::Body, http::Request, response::Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::debug;
use vigil_audit::{redaction, Actor, AuditEvent, AuditEventType, HttpContext};
use vigil_store::AuditWriter;

/// Tower layer that records one audit event per request/response cycle.
#[derive(Clone)]
pub struct AuditLayer {
	writer: AuditWriter,
}

impl AuditLayer {
	pub fn new(writer: AuditWriter) -> Self {
		Self { writer }
	}
}

impl<S> Layer<S> for AuditLayer {
	type Service = AuditService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		AuditService {
			inner,
			writer: self.writer.clone(),
		}
	}
}

/// Service wrapper for [`AuditLayer`].
#[derive(Clone)]
pub struct AuditService<S> {
	inner: S,
	writer: AuditWriter,
}

/// Request-time observations, carried across the inner service's future.
struct RequestMeta {
	method: String,
	path: String,
	remote_addr: Option<String>,
	user_agent: Option<String>,
	actor: Option<Actor>,
}

impl<S> Service<Request<Body>> for AuditService<S>
where
	S: Service<Request<Body>, Response = Response> + Send,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = AuditFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let meta = RequestMeta {
			method: req.method().to_string(),
			path: req.uri().path().to_string(),
			remote_addr: remote_addr(&req),
			user_agent: header_value(&req, "user-agent"),
			actor: req.extensions().get::<Actor>().cloned(),
		};

		AuditFuture {
			inner: self.inner.call(req),
			meta: Some(meta),
			started: Instant::now(),
			writer: self.writer.clone(),
		}
	}
}

pin_project! {
	/// Future for [`AuditService`]: resolves to the inner response and
	/// queues the audit event as a side effect.
	pub struct AuditFuture<F> {
		#[pin]
		inner: F,
		meta: Option<RequestMeta>,
		started: Instant,
		writer: AuditWriter,
	}
}

impl<F, E> Future for AuditFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.project();

		let mut response = match this.inner.poll(cx) {
			Poll::Ready(Ok(response)) => response,
			other => return other,
		};

		let Some(meta) = this.meta.take() else {
			return Poll::Ready(Ok(response));
		};

		let capture = response
			.extensions_mut()
			.remove::<AuditCapture>()
			.unwrap_or_default();

		let event = build_event(
			meta,
			capture,
			response.status().as_u16(),
			this.started.elapsed().as_millis() as u64,
		);

		debug!(event_type = %event.event_type, "recording request audit event");
		this.writer.log(event);

		Poll::Ready(Ok(response))
	}
}

fn build_event(meta: RequestMeta, capture: AuditCapture, status: u16, elapsed_ms: u64) -> AuditEvent {
	let event_type = capture.event_type.unwrap_or(AuditEventType::Request);
	let actor = capture.actor.or(meta.actor).unwrap_or_default();

	let mut builder = AuditEvent::builder(event_type).actor(actor).http(HttpContext {
		method: meta.method,
		path: meta.path,
		remote_addr: meta.remote_addr,
		user_agent: meta.user_agent,
		status: Some(status),
		duration_ms: Some(elapsed_ms),
	});

	if !capture.form.is_empty() {
		// The codec redacts again at the encode choke point; doing it here
		// as well keeps the in-memory event clean for any other consumer.
		let mut form = capture.form;
		redaction::redact_map(&mut form);
		builder = builder.detail("body", serde_json::Value::Object(form));
	}

	builder.context(capture.context).build()
}

fn remote_addr(req: &Request<Body>) -> Option<String> {
	if let Some(forwarded) = header_value(req, "x-forwarded-for") {
		// First hop of the forwarding chain is the client.
		if let Some(client) = forwarded.split(',').next() {
			let client = client.trim();
			if !client.is_empty() {
				return Some(client.to_string());
			}
		}
	}

	req.extensions()
		.get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
		.map(|info| info.0.ip().to_string())
}

fn header_value(req: &Request<Body>, name: &str) -> Option<String> {
	req.headers()
		.get(name)
		.and_then(|value| value.to_str().ok())
		.map(|value| value.to_string())
}
