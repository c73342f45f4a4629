// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! `vigil-decrypt` - offline audit log decryptor.
//!
//! Decrypts without touching the remote store: the input is either a local
//! file of encrypted tokens (one per line) or a literal token pasted on
//! the command line. Each line is decrypted independently; lines that fail
//! get a per-line notice and the rest of the input still decodes.

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vigil_crypto::{RecordCipher, Recovered, Sha256KeyProvider, Token};

/// Offline decryptor for vigil audit tokens.
#[derive(Parser, Debug)]
#[command(
	name = "vigil-decrypt",
	about = "Decrypt vigil audit tokens from a file or the command line",
	version
)]
struct Args {
	/// Path to a file of encrypted tokens, or a literal `iv:ciphertext`
	/// token
	input: Option<String>,

	/// Encryption secret the records were written under
	#[arg(long, env = "VIGIL_ENCRYPTION_SECRET", hide_env_values = true)]
	secret: Option<String>,
}

fn main() {
	dotenvy::dotenv().ok();

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	let args = Args::parse();

	let Some(input) = args.input else {
		print_usage();
		return;
	};

	let Some(secret) = args.secret else {
		eprintln!("No encryption secret supplied.");
		eprintln!("Pass --secret or set VIGIL_ENCRYPTION_SECRET.");
		return;
	};

	let cipher = RecordCipher::new(&Sha256KeyProvider::new(secret));

	if Path::new(&input).exists() {
		decrypt_file(&cipher, &input);
	} else if Token::looks_encrypted(&input) {
		decrypt_text(&cipher, &input);
	} else {
		eprintln!("Input is neither an existing file nor an encrypted token.");
		eprintln!("Check that:");
		eprintln!("  1. the file exists, or");
		eprintln!("  2. the token has the expected format (ivhex:cipherhex)");
	}
}

fn print_usage() {
	println!("Usage:");
	println!("  vigil-decrypt <file>       decrypt a file of tokens, one per line");
	println!("  vigil-decrypt <token>      decrypt a literal iv:ciphertext token");
	println!();
	println!("The secret comes from --secret or VIGIL_ENCRYPTION_SECRET.");
}

fn decrypt_file(cipher: &RecordCipher, path: &str) {
	println!("Reading file: {path}\n");

	let content = match std::fs::read_to_string(path) {
		Ok(content) => content,
		Err(e) => {
			eprintln!("Failed to read {path}: {e}");
			return;
		}
	};

	decrypt_text(cipher, &content);
}

fn decrypt_text(cipher: &RecordCipher, content: &str) {
	let lines: Vec<&str> = content
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.collect();

	println!("Found {} encrypted line(s)\n", lines.len());

	for (index, line) in lines.iter().enumerate() {
		match cipher.decrypt(line) {
			Some(record) => {
				println!("{}", "=".repeat(60));
				println!("Entry #{}", index + 1);
				println!("{}", "=".repeat(60));
				print_record(record);
			}
			None => println!("Could not decrypt line #{}\n", index + 1),
		}
	}

	println!("{}", "=".repeat(60));
	println!("Done: {} line(s) processed", lines.len());
}

fn print_record(record: Recovered) {
	match record {
		Recovered::Json(value) => match serde_json::to_string_pretty(&value) {
			Ok(pretty) => println!("{pretty}\n"),
			Err(_) => println!("{value}\n"),
		},
		Recovered::Text(text) => println!("{text}\n"),
	}
}
