// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Key derivation for the record cipher.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::cipher::KEY_SIZE;

/// Supplies the 256-bit key used by [`crate::RecordCipher`].
///
/// The trait is the substitution seam for key derivation: the cipher never
/// sees the secret, only the derived key, so a standards-based KDF (argon2,
/// HKDF) can replace [`Sha256KeyProvider`] without touching the cipher or
/// the token format.
pub trait KeyProvider: Send + Sync {
	fn derive_key(&self) -> Zeroizing<[u8; KEY_SIZE]>;
}

/// Derives the key as `SHA-256(secret)`.
///
/// This is NOT a proper key-derivation function: there is no salt, no work
/// factor, and a low-entropy passphrase stays cheap to brute-force. It is
/// kept because every record already at rest was encrypted under exactly
/// this derivation, and changing it would orphan them. New deployments that
/// do not need that compatibility should provide their own [`KeyProvider`].
pub struct Sha256KeyProvider {
	secret: Zeroizing<String>,
}

impl Sha256KeyProvider {
	pub fn new(secret: impl Into<String>) -> Self {
		Self {
			secret: Zeroizing::new(secret.into()),
		}
	}
}

impl KeyProvider for Sha256KeyProvider {
	fn derive_key(&self) -> Zeroizing<[u8; KEY_SIZE]> {
		let digest = Sha256::digest(self.secret.as_bytes());
		let mut key = Zeroizing::new([0u8; KEY_SIZE]);
		key.copy_from_slice(&digest);
		key
	}
}
