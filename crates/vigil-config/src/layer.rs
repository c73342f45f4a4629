// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The mergeable pre-finalize configuration layer.

use serde::{Deserialize, Serialize};

use crate::sections::{
	AuditConfigLayer, EncryptionConfigLayer, LoggingConfigLayer, StorageConfigLayer,
};

/// One source's worth of configuration; every field optional. Layers from
/// lower-precedence sources are merged under higher-precedence ones, then
/// finalized into [`crate::VigilConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VigilConfigLayer {
	pub encryption: Option<EncryptionConfigLayer>,
	pub storage: Option<StorageConfigLayer>,
	pub audit: Option<AuditConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

impl VigilConfigLayer {
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.encryption, other.encryption, EncryptionConfigLayer::merge);
		merge_section(&mut self.storage, other.storage, StorageConfigLayer::merge);
		merge_section(&mut self.audit, other.audit, AuditConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, overlay: Option<T>, merge: impl FnOnce(&mut T, T)) {
	match (base.as_mut(), overlay) {
		(Some(base), Some(overlay)) => merge(base, overlay),
		(None, Some(overlay)) => *base = Some(overlay),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_fills_missing_sections() {
		let mut base = VigilConfigLayer::default();
		base.merge(VigilConfigLayer {
			encryption: Some(EncryptionConfigLayer {
				secret: Some("s".to_string()),
				..Default::default()
			}),
			..Default::default()
		});

		assert_eq!(base.encryption.unwrap().secret.as_deref(), Some("s"));
	}

	#[test]
	fn merge_overlays_field_by_field() {
		let mut base = VigilConfigLayer {
			storage: Some(StorageConfigLayer {
				base_url: Some("https://a.example.com".to_string()),
				token: Some("base-token".to_string()),
				..Default::default()
			}),
			..Default::default()
		};

		base.merge(VigilConfigLayer {
			storage: Some(StorageConfigLayer {
				token: Some("overlay-token".to_string()),
				..Default::default()
			}),
			..Default::default()
		});

		let storage = base.storage.unwrap();
		assert_eq!(storage.base_url.as_deref(), Some("https://a.example.com"));
		assert_eq!(storage.token.as_deref(), Some("overlay-token"));
	}
}
