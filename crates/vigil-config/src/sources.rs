// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment
//! variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::VigilConfigLayer;
use crate::sections::{
	AuditConfigLayer, EncryptionConfigLayer, LoggingConfigLayer, StorageConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<VigilConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(VigilConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/vigil/vigil.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(VigilConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: VigilConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `VIGIL_<SECTION>_<FIELD>`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(VigilConfigLayer {
			encryption: Some(load_encryption_from_env()),
			storage: Some(load_storage_from_env()),
			audit: Some(load_audit_from_env()?),
			logging: Some(load_logging_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_usize(name: &str) -> Result<Option<usize>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid usize value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_encryption_from_env() -> EncryptionConfigLayer {
	EncryptionConfigLayer {
		secret: env_var("VIGIL_ENCRYPTION_SECRET"),
		allow_insecure: env_bool("VIGIL_ENCRYPTION_ALLOW_INSECURE"),
	}
}

fn load_storage_from_env() -> StorageConfigLayer {
	StorageConfigLayer {
		base_url: env_var("VIGIL_STORAGE_URL"),
		bucket: env_var("VIGIL_STORAGE_BUCKET"),
		token: env_var("VIGIL_STORAGE_TOKEN"),
		prefix: env_var("VIGIL_STORAGE_PREFIX"),
	}
}

fn load_audit_from_env() -> Result<AuditConfigLayer, ConfigError> {
	Ok(AuditConfigLayer {
		enabled: env_bool("VIGIL_AUDIT_ENABLED"),
		queue_capacity: env_usize("VIGIL_AUDIT_QUEUE_CAPACITY")?,
	})
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("VIGIL_LOG_LEVEL"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.encryption.is_none());
		assert!(layer.storage.is_none());
	}

	#[test]
	fn toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/vigil.toml").load().unwrap();
		assert!(layer.encryption.is_none());
	}

	#[test]
	fn toml_source_parses_sections() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"
[encryption]
secret = "from-file"

[storage]
base_url = "https://store.example.com/storage/v1"
bucket = "audit-logs"
token = "file-token"

[audit]
queue_capacity = 256
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(
			layer.encryption.unwrap().secret.as_deref(),
			Some("from-file")
		);
		assert_eq!(layer.audit.unwrap().queue_capacity, Some(256));
	}

	#[test]
	fn toml_source_rejects_malformed_files() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "this is not toml [").unwrap();

		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}
}
