// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Day-partitioned encrypted audit log storage.
//!
//! The remote object store is an external collaborator reached through the
//! [`BlobStore`] trait: download-by-name, upload-by-name with overwrite,
//! list-by-prefix. [`DailyLogStore`] maps calendar days to blob names and
//! owns the read-modify-write append cycle; [`AuditWriter`] serializes all
//! appends within the process through a single background task.

pub mod blob;
pub mod daily;
pub mod error;
pub mod http;
pub mod memory;
pub mod writer;

pub use blob::{BlobStore, ObjectInfo};
pub use daily::{DailyLogStore, DayBlob};
pub use error::{BlobError, BlobResult, StoreError};
pub use http::HttpBlobStore;
pub use memory::MemoryBlobStore;
pub use writer::AuditWriter;
