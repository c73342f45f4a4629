// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory blob store for tests and local development.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::blob::{BlobStore, ObjectInfo};
use crate::error::{BlobError, BlobResult};

struct StoredObject {
	content: String,
	created_at: DateTime<Utc>,
}

/// A [`BlobStore`] backed by a map. Not persistent; intended for tests and
/// for running the pipeline without a remote store.
#[derive(Default)]
pub struct MemoryBlobStore {
	objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryBlobStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored objects.
	pub async fn len(&self) -> usize {
		self.objects.lock().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.objects.lock().await.is_empty()
	}
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
	async fn download(&self, name: &str) -> BlobResult<Option<String>> {
		let objects = self.objects.lock().await;
		Ok(objects.get(name).map(|o| o.content.clone()))
	}

	async fn upload(&self, name: &str, content: &str, overwrite: bool) -> BlobResult<()> {
		let mut objects = self.objects.lock().await;
		if !overwrite && objects.contains_key(name) {
			return Err(BlobError::AlreadyExists(name.to_string()));
		}

		let created_at = objects
			.get(name)
			.map(|o| o.created_at)
			.unwrap_or_else(Utc::now);
		objects.insert(
			name.to_string(),
			StoredObject {
				content: content.to_string(),
				created_at,
			},
		);
		Ok(())
	}

	async fn list(&self, prefix: &str) -> BlobResult<Vec<ObjectInfo>> {
		let objects = self.objects.lock().await;
		Ok(objects
			.iter()
			.filter(|(name, _)| name.starts_with(prefix))
			.map(|(name, object)| ObjectInfo {
				name: name.clone(),
				size: object.content.len() as u64,
				created_at: Some(object.created_at),
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn download_missing_object_is_none() {
		let store = MemoryBlobStore::new();
		assert_eq!(store.download("missing.log").await.unwrap(), None);
	}

	#[tokio::test]
	async fn upload_then_download_roundtrips() {
		let store = MemoryBlobStore::new();
		store.upload("a.log", "line\n", true).await.unwrap();
		assert_eq!(
			store.download("a.log").await.unwrap(),
			Some("line\n".to_string())
		);
	}

	#[tokio::test]
	async fn upload_without_overwrite_rejects_existing() {
		let store = MemoryBlobStore::new();
		store.upload("a.log", "first", true).await.unwrap();
		let err = store.upload("a.log", "second", false).await.unwrap_err();
		assert!(matches!(err, BlobError::AlreadyExists(_)));
		assert_eq!(
			store.download("a.log").await.unwrap(),
			Some("first".to_string())
		);
	}

	#[tokio::test]
	async fn list_filters_by_prefix() {
		let store = MemoryBlobStore::new();
		store.upload("audit-2025-01-01.log", "a", true).await.unwrap();
		store.upload("audit-2025-01-02.log", "bb", true).await.unwrap();
		store.upload("other.txt", "c", true).await.unwrap();

		let listed = store.list("audit-").await.unwrap();
		assert_eq!(listed.len(), 2);
		assert_eq!(listed[0].name, "audit-2025-01-01.log");
		assert_eq!(listed[0].size, 1);
		assert_eq!(listed[1].size, 2);
	}
}
