// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! AES-256-CBC encrypt/decrypt of single records.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::key::KeyProvider;
use crate::token::Token;

/// Size of the derived encryption key in bytes (256 bits for AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of the CBC initialization vector in bytes (one AES block).
pub const IV_SIZE: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// A decrypted record: structured if the plaintext parsed as JSON,
/// otherwise the raw text. The store also has to read records that were
/// encrypted as plain strings, so a JSON parse failure here is a fallback,
/// not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovered {
	Json(serde_json::Value),
	Text(String),
}

/// Encrypts and decrypts individual records.
///
/// Every encryption draws a fresh random IV, so the same plaintext never
/// produces the same token twice. Encryption errors propagate; decryption
/// failures are logged and reported as `None` so one corrupt record never
/// aborts a batch read.
pub struct RecordCipher {
	key: Zeroizing<[u8; KEY_SIZE]>,
}

impl RecordCipher {
	pub fn new(provider: &dyn KeyProvider) -> Self {
		Self {
			key: provider.derive_key(),
		}
	}

	/// Encrypt a plain string.
	pub fn encrypt_str(&self, plaintext: &str) -> CryptoResult<Token> {
		let iv = generate_iv();

		let cipher = Aes256CbcEnc::new_from_slices(self.key.as_slice(), &iv)
			.map_err(|e| CryptoError::Encryption(format!("cipher init failed: {e}")))?;

		let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
		Ok(Token::new(iv, ciphertext))
	}

	/// Encrypt a structured value. Strings encrypt as-is; everything else
	/// is serialized to JSON first.
	pub fn encrypt_value(&self, value: &serde_json::Value) -> CryptoResult<Token> {
		match value {
			serde_json::Value::String(s) => self.encrypt_str(s),
			other => self.encrypt_str(&serde_json::to_string(other)?),
		}
	}

	/// Decrypt a parsed token back to its plaintext.
	pub fn decrypt_token(&self, token: &Token) -> CryptoResult<String> {
		let cipher = Aes256CbcDec::new_from_slices(self.key.as_slice(), token.iv())
			.map_err(|e| CryptoError::Decryption(format!("cipher init failed: {e}")))?;

		let plaintext = cipher
			.decrypt_padded_vec_mut::<Pkcs7>(token.ciphertext())
			.map_err(|e| CryptoError::Decryption(format!("bad padding: {e}")))?;

		String::from_utf8(plaintext)
			.map_err(|e| CryptoError::Decryption(format!("plaintext is not UTF-8: {e}")))
	}

	/// Decrypt one raw token string.
	///
	/// Any parse or cipher failure logs a warning and yields `None`; the
	/// caller skips the record and carries on.
	pub fn decrypt(&self, raw: &str) -> Option<Recovered> {
		let token = match Token::parse(raw) {
			Ok(token) => token,
			Err(e) => {
				warn!(error = %e, "skipping malformed audit token");
				return None;
			}
		};

		let plaintext = match self.decrypt_token(&token) {
			Ok(plaintext) => plaintext,
			Err(e) => {
				warn!(error = %e, "skipping undecryptable audit token");
				return None;
			}
		};

		match serde_json::from_str(&plaintext) {
			Ok(value) => Some(Recovered::Json(value)),
			Err(_) => Some(Recovered::Text(plaintext)),
		}
	}
}

fn generate_iv() -> [u8; IV_SIZE] {
	let mut iv = [0u8; IV_SIZE];
	OsRng.fill_bytes(&mut iv);
	iv
}
