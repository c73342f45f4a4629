// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration sections and their layer/finalize pairs.

use serde::{Deserialize, Serialize};

/// The insecure default secret of the legacy deployment. A configuration
/// carrying this value (or no secret at all) fails validation.
pub const LEGACY_DEFAULT_SECRET: &str = "clave-por-defecto-32-caracteres";

const DEFAULT_BUCKET: &str = "audit-logs";
const DEFAULT_BLOB_PREFIX: &str = "audit-";
const DEFAULT_QUEUE_CAPACITY: usize = 1024;

fn default_queue_capacity() -> usize {
	DEFAULT_QUEUE_CAPACITY
}

// ---------------------------------------------------------------------------
// encryption

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EncryptionConfigLayer {
	pub secret: Option<String>,
	pub allow_insecure: Option<bool>,
}

impl EncryptionConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.secret.is_some() {
			self.secret = other.secret;
		}
		if other.allow_insecure.is_some() {
			self.allow_insecure = other.allow_insecure;
		}
	}

	pub fn finalize(self) -> EncryptionConfig {
		EncryptionConfig {
			secret: self.secret.unwrap_or_default(),
			allow_insecure: self.allow_insecure.unwrap_or(false),
		}
	}
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct EncryptionConfig {
	/// The passphrase the record key is derived from. Never logged.
	pub secret: String,
	/// Permits starting with a missing or default secret, in a loudly
	/// degraded mode. For tests and local development only.
	pub allow_insecure: bool,
}

impl EncryptionConfig {
	/// True when the secret is absent or still the known legacy default.
	pub fn is_insecure(&self) -> bool {
		self.secret.is_empty() || self.secret == LEGACY_DEFAULT_SECRET
	}
}

impl std::fmt::Debug for EncryptionConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EncryptionConfig")
			.field("secret", &"[REDACTED]")
			.field("allow_insecure", &self.allow_insecure)
			.finish()
	}
}

// ---------------------------------------------------------------------------
// storage

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfigLayer {
	pub base_url: Option<String>,
	pub bucket: Option<String>,
	pub token: Option<String>,
	pub prefix: Option<String>,
}

impl StorageConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.bucket.is_some() {
			self.bucket = other.bucket;
		}
		if other.token.is_some() {
			self.token = other.token;
		}
		if other.prefix.is_some() {
			self.prefix = other.prefix;
		}
	}

	pub fn finalize(self) -> StorageConfig {
		StorageConfig {
			base_url: self.base_url.unwrap_or_default(),
			bucket: self.bucket.unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
			token: self.token.unwrap_or_default(),
			prefix: self.prefix.unwrap_or_else(|| DEFAULT_BLOB_PREFIX.to_string()),
		}
	}
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
	/// Base URL of the object-store REST API.
	pub base_url: String,
	pub bucket: String,
	/// Bearer token for the store. Never logged.
	pub token: String,
	/// Day-blob name prefix.
	pub prefix: String,
}

impl std::fmt::Debug for StorageConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StorageConfig")
			.field("base_url", &self.base_url)
			.field("bucket", &self.bucket)
			.field("token", &"[REDACTED]")
			.field("prefix", &self.prefix)
			.finish()
	}
}

// ---------------------------------------------------------------------------
// audit

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuditConfigLayer {
	pub enabled: Option<bool>,
	pub queue_capacity: Option<usize>,
}

impl AuditConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.queue_capacity.is_some() {
			self.queue_capacity = other.queue_capacity;
		}
	}

	pub fn finalize(self) -> AuditConfig {
		AuditConfig {
			enabled: self.enabled.unwrap_or(true),
			queue_capacity: self.queue_capacity.unwrap_or_else(default_queue_capacity),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditConfig {
	pub enabled: bool,
	pub queue_capacity: usize,
}

impl Default for AuditConfig {
	fn default() -> Self {
		AuditConfigLayer::default().finalize()
	}
}

// ---------------------------------------------------------------------------
// logging

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfigLayer {
	pub level: Option<String>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.level.is_some() {
			self.level = other.level;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| "info".to_string()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
	pub level: String,
}
