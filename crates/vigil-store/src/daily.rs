// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The day-partitioned log store.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, error, warn};
use vigil_audit::{AuditEvent, LineCodec};

use crate::blob::BlobStore;
use crate::error::StoreError;

/// Default blob name prefix; `audit-2025-01-15.log` and friends.
pub const DEFAULT_PREFIX: &str = "audit-";

/// One day's blob, as reported by [`DailyLogStore::list_days`].
#[derive(Debug, Clone, PartialEq)]
pub struct DayBlob {
	pub name: String,
	pub date: NaiveDate,
	pub size: u64,
	pub created_at: Option<DateTime<Utc>>,
}

/// Maps calendar days to remote blobs and owns their read-modify-write
/// append cycle.
///
/// Appends re-upload the whole day's content with overwrite semantics -
/// the blob service has no append primitive and no conditional writes.
/// Within one process, [`crate::AuditWriter`] serializes appends so they
/// cannot lose each other's updates; concurrent appends from OTHER
/// processes remain a last-write-wins race that can silently drop an
/// event. That is an accepted limitation of this design.
pub struct DailyLogStore {
	blobs: Arc<dyn BlobStore>,
	codec: LineCodec,
	prefix: String,
}

impl DailyLogStore {
	pub fn new(blobs: Arc<dyn BlobStore>, codec: LineCodec) -> Self {
		Self::with_prefix(blobs, codec, DEFAULT_PREFIX)
	}

	pub fn with_prefix(
		blobs: Arc<dyn BlobStore>,
		codec: LineCodec,
		prefix: impl Into<String>,
	) -> Self {
		Self {
			blobs,
			codec,
			prefix: prefix.into(),
		}
	}

	/// The blob name for a given day.
	pub fn blob_name(&self, date: NaiveDate) -> String {
		format!("{}{}.log", self.prefix, date.format("%Y-%m-%d"))
	}

	/// Append one event to today's blob.
	///
	/// Best-effort: any failure is logged and swallowed, because the
	/// business request this event records has already completed and must
	/// not fail retroactively over its audit trail.
	pub async fn append(&self, event: AuditEvent) {
		let date = today_utc();
		match self.append_for_day(date, event).await {
			Ok(name) => debug!(blob = %name, "audit event appended"),
			Err(e) => error!(error = %e, "failed to append audit event"),
		}
	}

	async fn append_for_day(&self, date: NaiveDate, event: AuditEvent) -> Result<String, StoreError> {
		let name = self.blob_name(date);

		let existing = self.blobs.download(&name).await?.unwrap_or_default();
		let token = self.codec.encode_line(event)?;

		let content = format!("{existing}{token}\n");
		self.blobs.upload(&name, &content, true).await?;

		Ok(name)
	}

	/// Read and decode one day's events, in append order.
	///
	/// An absent blob or a failed download yields an empty sequence, never
	/// an error; corrupt lines are skipped by the codec.
	pub async fn read_day(&self, date: Option<NaiveDate>) -> Vec<AuditEvent> {
		let name = self.blob_name(date.unwrap_or_else(today_utc));

		match self.blobs.download(&name).await {
			Ok(Some(content)) => self.codec.decode_lines(&content),
			Ok(None) => {
				debug!(blob = %name, "no audit log for this day");
				Vec::new()
			}
			Err(e) => {
				warn!(blob = %name, error = %e, "failed to download audit log");
				Vec::new()
			}
		}
	}

	/// List all day blobs, newest first.
	pub async fn list_days(&self) -> Vec<DayBlob> {
		let objects = match self.blobs.list(&self.prefix).await {
			Ok(objects) => objects,
			Err(e) => {
				warn!(error = %e, "failed to list audit logs");
				return Vec::new();
			}
		};

		let mut days: Vec<DayBlob> = objects
			.into_iter()
			.filter_map(|object| {
				let date = object
					.name
					.strip_prefix(&self.prefix)?
					.strip_suffix(".log")?
					.parse::<NaiveDate>()
					.ok()?;
				Some(DayBlob {
					name: object.name,
					date,
					size: object.size,
					created_at: object.created_at,
				})
			})
			.collect();

		days.sort_by(|a, b| b.date.cmp(&a.date));
		days
	}
}

fn today_utc() -> NaiveDate {
	Utc::now().date_naive()
}
