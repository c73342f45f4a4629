// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
	#[error("event serialization failed: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error(transparent)]
	Crypto(#[from] vigil_crypto::CryptoError),
}
