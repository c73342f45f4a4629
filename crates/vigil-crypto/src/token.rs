// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The `ivHex:ciphertextHex` at-rest encoding of one encrypted record.

use std::fmt;

use crate::cipher::IV_SIZE;
use crate::error::CryptoError;

/// One encrypted record: a 16-byte IV and the CBC ciphertext.
///
/// The textual form is `hex(iv):hex(ciphertext)` with exactly one `:`
/// separator and both halves strictly hexadecimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	iv: [u8; IV_SIZE],
	ciphertext: Vec<u8>,
}

impl Token {
	pub fn new(iv: [u8; IV_SIZE], ciphertext: Vec<u8>) -> Self {
		Self { iv, ciphertext }
	}

	pub fn iv(&self) -> &[u8; IV_SIZE] {
		&self.iv
	}

	pub fn ciphertext(&self) -> &[u8] {
		&self.ciphertext
	}

	/// Parses the two-part hex form. Rejects anything that is not exactly
	/// two hex halves with a 16-byte IV.
	pub fn parse(raw: &str) -> Result<Self, CryptoError> {
		let mut parts = raw.trim().split(':');
		let (iv_hex, ct_hex) = match (parts.next(), parts.next(), parts.next()) {
			(Some(iv), Some(ct), None) => (iv, ct),
			_ => return Err(CryptoError::TokenFormat),
		};

		let iv_bytes = hex::decode(iv_hex).map_err(|source| CryptoError::TokenHex {
			half: "iv",
			source,
		})?;
		let iv: [u8; IV_SIZE] = iv_bytes
			.try_into()
			.map_err(|bytes: Vec<u8>| CryptoError::IvLength {
				expected: IV_SIZE,
				actual: bytes.len(),
			})?;

		let ciphertext = hex::decode(ct_hex).map_err(|source| CryptoError::TokenHex {
			half: "ciphertext",
			source,
		})?;

		Ok(Self { iv, ciphertext })
	}

	/// Cheap format probe: does `raw` look like an encrypted token?
	///
	/// Checks the `hex:hex` shape only; it does not prove the token will
	/// decrypt. Used by the offline tool to tell a literal token apart
	/// from a file path.
	pub fn looks_encrypted(raw: &str) -> bool {
		Self::parse(raw).is_ok()
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", hex::encode(self.iv), hex::encode(&self.ciphertext))
	}
}
