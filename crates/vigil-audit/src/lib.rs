// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core event types for the vigil audit trail.
//!
//! This crate provides:
//!
//! - [`AuditEvent`]: the unit of record, with a typed HTTP context and an
//!   open-ended payload map
//! - [`AuditEventType`]: the event taxonomy (known types plus a catch-all)
//! - [`Actor`]: the authenticated principal or the anonymous sentinel
//! - [`redaction`]: the sensitive-field redaction invariant
//! - [`LineCodec`]: encrypted newline-delimited encode/decode

pub mod codec;
pub mod error;
pub mod event;
pub mod redaction;

pub use codec::LineCodec;
pub use error::{CodecError, CodecResult};
pub use event::{
	Actor, AuditEvent, AuditEventBuilder, AuditEventType, AuditSeverity, HttpContext, Principal,
};
pub use redaction::REDACTED_PLACEHOLDER;
