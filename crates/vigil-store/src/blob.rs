// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The external blob-service boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BlobResult;

/// Metadata for one stored object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
	pub name: String,
	pub size: u64,
	pub created_at: Option<DateTime<Utc>>,
}

/// The three operations the audit pipeline needs from a remote object
/// store. Implementations decide transport and provider; the store above
/// this trait only sees named text blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
	/// Download an object's content. `None` means the object does not
	/// exist - that is an ordinary outcome, not an error.
	async fn download(&self, name: &str) -> BlobResult<Option<String>>;

	/// Upload an object, replacing any existing content when `overwrite`
	/// is set.
	async fn upload(&self, name: &str, content: &str, overwrite: bool) -> BlobResult<()>;

	/// List objects whose names start with `prefix`.
	async fn list(&self, prefix: &str) -> BlobResult<Vec<ObjectInfo>>;
}
