// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for vigil.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file,
//!   environment)
//! - Consistent environment variable naming (`VIGIL_*`)
//! - Fail-fast validation: a missing encryption secret, or one equal to
//!   the known insecure legacy default, refuses to finalize unless the
//!   operator explicitly opts into a degraded mode
//!
//! # Usage
//!
//! ```ignore
//! let config = vigil_config::load_config()?;
//! let cipher = RecordCipher::new(&Sha256KeyProvider::new(&config.encryption.secret));
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::VigilConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;

use tracing::{debug, error, info};

/// Fully resolved vigil configuration.
#[derive(Debug, Clone)]
pub struct VigilConfig {
	pub encryption: EncryptionConfig,
	pub storage: StorageConfig,
	pub audit: AuditConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`VIGIL_*`)
/// 2. Config file (`/etc/vigil/vigil.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<VigilConfig, ConfigError> {
	finalize(load_layers(TomlSource::system())?)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<VigilConfig, ConfigError> {
	finalize(load_layers(TomlSource::new(config_path))?)
}

/// Load and merge all source layers without finalizing or validating.
///
/// Used by diagnostics (`vigil-logs check`) that must be able to inspect a
/// configuration which would fail validation.
pub fn load_layers(toml_source: TomlSource) -> Result<VigilConfigLayer, ConfigError> {
	let mut sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(toml_source),
		Box::new(EnvSource),
	];

	sources.sort_by_key(|s| s.precedence());

	let mut merged = VigilConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	Ok(merged)
}

/// Finalize configuration layers into resolved config.
fn finalize(layer: VigilConfigLayer) -> Result<VigilConfig, ConfigError> {
	let encryption = layer.encryption.unwrap_or_default().finalize();
	let storage = layer.storage.unwrap_or_default().finalize();
	let audit = layer.audit.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate(&encryption, &storage)?;

	info!(
		storage_url = %storage.base_url,
		bucket = %storage.bucket,
		audit_enabled = audit.enabled,
		queue_capacity = audit.queue_capacity,
		"configuration loaded"
	);

	Ok(VigilConfig {
		encryption,
		storage,
		audit,
		logging,
	})
}

fn validate(encryption: &EncryptionConfig, storage: &StorageConfig) -> Result<(), ConfigError> {
	if encryption.is_insecure() {
		if !encryption.allow_insecure {
			return Err(ConfigError::InsecureSecret);
		}
		// Degraded mode: encrypting under a well-known key protects
		// nothing. Flag it on every startup, not just the first.
		error!(
			"running with a missing or default encryption secret; \
			 audit records are NOT effectively protected"
		);
	}

	if storage.base_url.is_empty() {
		return Err(ConfigError::MissingValue("storage.base_url"));
	}
	if storage.token.is_empty() {
		return Err(ConfigError::MissingValue("storage.token"));
	}

	Ok(())
}
