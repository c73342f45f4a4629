// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

pub type BlobResult<T> = Result<T, BlobError>;

/// Errors from the remote blob service boundary.
#[derive(Error, Debug)]
pub enum BlobError {
	#[error("HTTP request failed: {0}")]
	Request(#[from] reqwest::Error),

	#[error("server error ({status}): {message}")]
	Server { status: u16, message: String },

	#[error("object already exists: {0}")]
	AlreadyExists(String),
}

/// Errors from the daily log store's own pipeline.
#[derive(Error, Debug)]
pub enum StoreError {
	#[error(transparent)]
	Blob(#[from] BlobError),

	#[error(transparent)]
	Codec(#[from] vigil_audit::CodecError),
}
