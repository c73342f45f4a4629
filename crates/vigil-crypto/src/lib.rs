// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symmetric record encryption for the vigil audit trail.
//!
//! Every audit record is encrypted independently with AES-256-CBC and a
//! fresh random 16-byte IV, then encoded as a compact `ivHex:ciphertextHex`
//! text token. The key is derived from a configured secret by a
//! [`KeyProvider`]; the shipped provider hashes the secret with SHA-256,
//! which is the historical scheme this store must stay compatible with -
//! see [`Sha256KeyProvider`] for the caveats.
//!
//! CBC without authentication cannot detect tampering; a flipped ciphertext
//! bit surfaces as a padding or UTF-8 failure at best and as garbled
//! plaintext at worst. Readers treat any such failure as a corrupt record
//! and skip it.

pub mod cipher;
pub mod error;
pub mod key;
pub mod token;

pub use cipher::{RecordCipher, Recovered, IV_SIZE, KEY_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{KeyProvider, Sha256KeyProvider};
pub use token::Token;
