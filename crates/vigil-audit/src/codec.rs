// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Encrypted newline-delimited record encoding.

use chrono::Utc;
use tracing::{debug, warn};
use vigil_crypto::{RecordCipher, Recovered, Token};

use crate::error::CodecResult;
use crate::event::AuditEvent;
use crate::redaction;

/// Encodes events to encrypted tokens and decodes day blobs back to event
/// sequences.
pub struct LineCodec {
	cipher: RecordCipher,
}

impl LineCodec {
	pub fn new(cipher: RecordCipher) -> Self {
		Self { cipher }
	}

	/// Encode one event as an encrypted token.
	///
	/// Applies the redaction invariant to the payload, stamps the capture
	/// timestamp if the producer left it absent, then encrypts. Cipher
	/// errors propagate to the caller.
	pub fn encode_line(&self, mut event: AuditEvent) -> CodecResult<Token> {
		redaction::redact_map(&mut event.context);
		event.timestamp.get_or_insert_with(Utc::now);

		let value = serde_json::to_value(&event)?;
		Ok(self.cipher.encrypt_value(&value)?)
	}

	/// Decode a blob of newline-delimited tokens, in order.
	///
	/// Blank lines are ignored. A line that fails to decrypt, or decrypts
	/// to something that is not an audit event, is skipped; the skip count
	/// is logged so corrupt blobs are observable without failing the read.
	pub fn decode_lines(&self, content: &str) -> Vec<AuditEvent> {
		let mut events = Vec::new();
		let mut skipped = 0usize;

		for line in content.lines() {
			let line = line.trim();
			if line.is_empty() {
				continue;
			}

			match self.cipher.decrypt(line) {
				Some(Recovered::Json(value)) => match serde_json::from_value(value) {
					Ok(event) => events.push(event),
					Err(e) => {
						debug!(error = %e, "decrypted line is not an audit event");
						skipped += 1;
					}
				},
				Some(Recovered::Text(_)) => {
					debug!("decrypted line is plain text, not an audit event");
					skipped += 1;
				}
				None => skipped += 1,
			}
		}

		if skipped > 0 {
			warn!(skipped, decoded = events.len(), "skipped undecodable audit log lines");
		}

		events
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::{Actor, AuditEventType, HttpContext};
	use crate::redaction::REDACTED_PLACEHOLDER;
	use proptest::prelude::*;
	use serde_json::json;
	use vigil_crypto::Sha256KeyProvider;

	fn test_codec() -> LineCodec {
		LineCodec::new(RecordCipher::new(&Sha256KeyProvider::new("codec-test-secret")))
	}

	fn login_event(email: &str) -> AuditEvent {
		AuditEvent::builder(AuditEventType::LoginSuccess)
			.actor(Actor::principal("1", email, "user"))
			.http(HttpContext {
				method: "POST".to_string(),
				path: "/login".to_string(),
				remote_addr: Some("198.51.100.7".to_string()),
				user_agent: None,
				status: Some(200),
				duration_ms: Some(25),
			})
			.build()
	}

	#[test]
	fn encode_decode_roundtrip() {
		let codec = test_codec();
		let event = login_event("user@example.com");

		let token = codec.encode_line(event.clone()).unwrap();
		let decoded = codec.decode_lines(&format!("{token}\n"));

		assert_eq!(decoded, vec![event]);
	}

	#[test]
	fn encode_stamps_missing_timestamp() {
		let codec = test_codec();
		let mut event = login_event("user@example.com");
		event.timestamp = None;

		let token = codec.encode_line(event).unwrap();
		let decoded = codec.decode_lines(&token.to_string());

		assert_eq!(decoded.len(), 1);
		assert!(decoded[0].timestamp.is_some());
	}

	#[test]
	fn encode_redacts_sensitive_payload_fields() {
		let codec = test_codec();
		let event = AuditEvent::builder(AuditEventType::LoginWrongPassword)
			.detail("body", json!({"email": "u@example.com", "password": "secreto123"}))
			.detail("password2", "secreto123")
			.build();

		let token = codec.encode_line(event).unwrap();
		let decoded = codec.decode_lines(&token.to_string());

		assert_eq!(decoded.len(), 1);
		assert_eq!(
			decoded[0].context["body"]["password"],
			json!(REDACTED_PLACEHOLDER)
		);
		assert_eq!(decoded[0].context["password2"], json!(REDACTED_PLACEHOLDER));
		// The persisted record never contains the original value anywhere.
		let raw = serde_json::to_string(&decoded[0]).unwrap();
		assert!(!raw.contains("secreto123"));
	}

	#[test]
	fn decode_skips_malformed_lines() {
		let codec = test_codec();
		let good = codec.encode_line(login_event("user@example.com")).unwrap();

		let blob = format!(
			"{good}\nnot-a-token\naabb:ccdd\nzz:11\n\n   \n"
		);
		let decoded = codec.decode_lines(&blob);

		assert_eq!(decoded.len(), 1);
		assert_eq!(decoded[0].actor.display_key(), "user@example.com");
	}

	#[test]
	fn decode_skips_plaintext_records() {
		let codec = test_codec();
		let cipher = RecordCipher::new(&Sha256KeyProvider::new("codec-test-secret"));
		let stray = cipher.encrypt_str("just a string, not an event").unwrap();
		let good = codec.encode_line(login_event("a@example.com")).unwrap();

		let decoded = codec.decode_lines(&format!("{stray}\n{good}\n"));
		assert_eq!(decoded.len(), 1);
	}

	#[test]
	fn decode_preserves_append_order() {
		let codec = test_codec();
		let mut blob = String::new();
		for i in 0..5 {
			let event = AuditEvent::builder(AuditEventType::Request)
				.detail("seq", i)
				.build();
			blob.push_str(&codec.encode_line(event).unwrap().to_string());
			blob.push('\n');
		}

		let decoded = codec.decode_lines(&blob);
		let seqs: Vec<i64> = decoded
			.iter()
			.map(|e| e.context["seq"].as_i64().unwrap())
			.collect();
		assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
	}

	#[test]
	fn decode_empty_blob_is_empty() {
		let codec = test_codec();
		assert!(codec.decode_lines("").is_empty());
		assert!(codec.decode_lines("\n\n").is_empty());
	}

	proptest! {
		#[test]
		fn prop_roundtrip_preserves_events(
			email in "[a-z]{1,10}@[a-z]{1,10}\\.com",
			status in 100u16..600,
			duration in 0u64..60_000,
		) {
			let codec = test_codec();
			let event = AuditEvent::builder(AuditEventType::Request)
				.actor(Actor::principal("1", email, "user"))
				.http(HttpContext {
					method: "GET".to_string(),
					path: "/".to_string(),
					remote_addr: None,
					user_agent: None,
					status: Some(status),
					duration_ms: Some(duration),
				})
				.build();

			let token = codec.encode_line(event.clone()).unwrap();
			prop_assert_eq!(codec.decode_lines(&token.to_string()), vec![event]);
		}
	}
}
