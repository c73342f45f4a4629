// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command implementations for the `vigil-logs` operator CLI.
//!
//! Commands print their reports to stdout and their diagnostics to stderr.
//! Handled failures (no logs for a date, a remote store that cannot be
//! reached) are reported as text; the process still exits successfully -
//! the CLI does not distinguish failure kinds through exit codes.

pub mod commands;

use std::sync::Arc;

use vigil_audit::LineCodec;
use vigil_config::VigilConfig;
use vigil_crypto::{RecordCipher, Sha256KeyProvider};
use vigil_store::{DailyLogStore, HttpBlobStore};

/// Build the read pipeline (blob client, cipher, day store) from resolved
/// configuration.
pub fn build_store(config: &VigilConfig) -> DailyLogStore {
	let blobs = Arc::new(HttpBlobStore::new(
		&config.storage.base_url,
		&config.storage.bucket,
		&config.storage.token,
	));
	let cipher = RecordCipher::new(&Sha256KeyProvider::new(&config.encryption.secret));
	DailyLogStore::with_prefix(blobs, LineCodec::new(cipher), config.storage.prefix.clone())
}
