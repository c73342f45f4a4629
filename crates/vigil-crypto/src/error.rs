// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Error, Debug)]
pub enum CryptoError {
	#[error("invalid token format: expected exactly one ':' separator")]
	TokenFormat,

	#[error("invalid hex in token {half}: {source}")]
	TokenHex {
		half: &'static str,
		#[source]
		source: hex::FromHexError,
	},

	#[error("invalid IV length: expected {expected} bytes, got {actual}")]
	IvLength { expected: usize, actual: usize },

	#[error("encryption failed: {0}")]
	Encryption(String),

	#[error("decryption failed: {0}")]
	Decryption(String),

	#[error("record serialization failed: {0}")]
	Serialization(#[from] serde_json::Error),
}
