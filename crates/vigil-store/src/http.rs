// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP implementation of [`BlobStore`] for hosted object stores.
//!
//! Speaks the bucket-scoped REST dialect used by hosted storage services:
//! `GET {base}/object/{bucket}/{name}` to download,
//! `POST {base}/object/{bucket}/{name}` with an `x-upsert` header to
//! upload, `POST {base}/object/list/{bucket}` to list.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::blob::{BlobStore, ObjectInfo};
use crate::error::{BlobError, BlobResult};

/// Maximum objects requested per listing call.
const LIST_LIMIT: usize = 1000;

pub struct HttpBlobStore {
	client: Client,
	base_url: String,
	bucket: String,
	token: String,
}

impl HttpBlobStore {
	pub fn new(
		base_url: impl Into<String>,
		bucket: impl Into<String>,
		token: impl Into<String>,
	) -> Self {
		let client = Client::builder()
			.user_agent(user_agent())
			.build()
			.expect("failed to build HTTP client");

		Self {
			client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
			bucket: bucket.into(),
			token: token.into(),
		}
	}

	fn object_url(&self, name: &str) -> String {
		format!("{}/object/{}/{}", self.base_url, self.bucket, name)
	}

	fn list_url(&self) -> String {
		format!("{}/object/list/{}", self.base_url, self.bucket)
	}
}

/// The standard vigil User-Agent string, `vigil/{version}`.
pub fn user_agent() -> String {
	format!("vigil/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize)]
struct ListedObject {
	name: String,
	#[serde(default)]
	created_at: Option<DateTime<Utc>>,
	#[serde(default)]
	metadata: Option<ListedMetadata>,
}

#[derive(Debug, Deserialize)]
struct ListedMetadata {
	#[serde(default)]
	size: u64,
}

#[async_trait]
impl BlobStore for HttpBlobStore {
	async fn download(&self, name: &str) -> BlobResult<Option<String>> {
		let response = self
			.client
			.get(self.object_url(name))
			.bearer_auth(&self.token)
			.send()
			.await?;

		match response.status() {
			StatusCode::NOT_FOUND => {
				debug!(object = name, "object not found");
				Ok(None)
			}
			status if status.is_success() => Ok(Some(response.text().await?)),
			status => Err(BlobError::Server {
				status: status.as_u16(),
				message: response.text().await.unwrap_or_default(),
			}),
		}
	}

	async fn upload(&self, name: &str, content: &str, overwrite: bool) -> BlobResult<()> {
		let response = self
			.client
			.post(self.object_url(name))
			.bearer_auth(&self.token)
			.header("x-upsert", if overwrite { "true" } else { "false" })
			.header(reqwest::header::CONTENT_TYPE, "text/plain")
			.body(content.to_string())
			.send()
			.await?;

		let status = response.status();
		if status.is_success() {
			return Ok(());
		}

		let message = response.text().await.unwrap_or_default();
		if status == StatusCode::CONFLICT {
			return Err(BlobError::AlreadyExists(name.to_string()));
		}

		Err(BlobError::Server {
			status: status.as_u16(),
			message,
		})
	}

	async fn list(&self, prefix: &str) -> BlobResult<Vec<ObjectInfo>> {
		let response = self
			.client
			.post(self.list_url())
			.bearer_auth(&self.token)
			.json(&json!({ "prefix": prefix, "limit": LIST_LIMIT }))
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(BlobError::Server {
				status: status.as_u16(),
				message: response.text().await.unwrap_or_default(),
			});
		}

		let listed: Vec<ListedObject> = response.json().await?;
		Ok(listed
			.into_iter()
			.map(|object| ObjectInfo {
				size: object.metadata.as_ref().map(|m| m.size).unwrap_or(0),
				name: object.name,
				created_at: object.created_at,
			})
			.collect())
	}
}
