// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The `vigil-logs` subcommands.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use vigil_audit::AuditEvent;
use vigil_config::{TomlSource, VigilConfigLayer, LEGACY_DEFAULT_SECRET};
use vigil_crypto::{RecordCipher, Recovered, Sha256KeyProvider};
use vigil_query::{search as run_search, stats as run_stats, SearchCriteria};
use vigil_store::DailyLogStore;

/// `list` - enumerate the day blobs, newest first.
pub async fn list(store: &DailyLogStore) {
	println!("Listing audit log files...\n");

	let days = store.list_days().await;
	if days.is_empty() {
		println!("No audit log files found");
		return;
	}

	println!("Found {} file(s):\n", days.len());
	for (index, day) in days.iter().enumerate() {
		println!("{}. {}", index + 1, day.name);
		println!("   date: {}", day.date);
		println!("   size: {:.2} KB", day.size as f64 / 1024.0);
		match day.created_at {
			Some(created_at) => println!("   created: {created_at}\n"),
			None => println!("   created: unknown\n"),
		}
	}
}

/// `read <date>` - dump one day's decrypted events.
pub async fn read(store: &DailyLogStore, date: NaiveDate) {
	println!("Reading audit logs for {date}\n");

	let events = store.read_day(Some(date)).await;
	if events.is_empty() {
		println!("No logs found for this date");
		return;
	}

	println!("Found {} entr(ies)\n", events.len());
	print_events(&events);
}

/// `today` - dump today's decrypted events.
pub async fn today(store: &DailyLogStore) {
	let today = Utc::now().date_naive();
	println!("Reading audit logs for TODAY ({today})\n");
	read(store, today).await;
}

/// `stats [date]` - summarize one day.
pub async fn stats(store: &DailyLogStore, date: Option<NaiveDate>) {
	match date {
		Some(date) => println!("Statistics for {date}\n"),
		None => println!("Statistics for today\n"),
	}

	let day = run_stats(store, date).await;
	if day.total == 0 {
		println!("No statistics available");
		return;
	}

	println!("Total records:    {}", day.total);
	println!("Average duration: {}ms\n", day.average_duration_ms);

	println!("By HTTP method:");
	for (method, count) in &day.by_method {
		println!("  {method}: {count}");
	}

	println!("\nBy status code:");
	for (status, count) in &day.by_status {
		println!("  {status}: {count}");
	}

	println!("\nBy actor:");
	for (actor, count) in &day.by_actor {
		println!("  {actor}: {count}");
	}
}

/// `export <date> <output>` - write one day's decrypted events to a local
/// JSON file.
pub async fn export(store: &DailyLogStore, date: NaiveDate, output: &Path) {
	println!("Exporting logs for {date} to {}...\n", output.display());

	let events = store.read_day(Some(date)).await;
	if events.is_empty() {
		println!("No logs to export");
		return;
	}

	match write_export(&events, output) {
		Ok(path) => {
			println!("Exported {} log(s)", events.len());
			println!("File: {}", path.display());
		}
		Err(e) => eprintln!("Export failed: {e:#}"),
	}
}

fn write_export(events: &[AuditEvent], output: &Path) -> anyhow::Result<PathBuf> {
	if let Some(parent) = output.parent() {
		if !parent.as_os_str().is_empty() {
			std::fs::create_dir_all(parent)
				.with_context(|| format!("creating {}", parent.display()))?;
		}
	}

	let json = serde_json::to_string_pretty(events)?;
	std::fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;

	Ok(output
		.canonicalize()
		.unwrap_or_else(|_| output.to_path_buf()))
}

/// `search` - filter one day by field predicates.
pub async fn search(store: &DailyLogStore, criteria: SearchCriteria) {
	println!("Searching audit logs...\n");

	let events = run_search(store, &criteria).await;
	if events.is_empty() {
		println!("No matching logs found");
		return;
	}

	println!("Found {} matching entr(ies)\n", events.len());
	print_events(&events);
}

/// `test` - self-check of the record cipher round-trip.
pub fn self_test(secret: &str) {
	println!("Testing the encryption pipeline...\n");

	let cipher = RecordCipher::new(&Sha256KeyProvider::new(secret));
	let record = json!({
		"user": "admin@test.com",
		"action": "SELF_TEST",
		"timestamp": Utc::now().to_rfc3339(),
	});

	println!("Original record: {record}");

	let first = match cipher.encrypt_value(&record) {
		Ok(token) => token,
		Err(e) => {
			eprintln!("Encryption failed: {e}");
			return;
		}
	};
	println!("Encrypted: {first}");

	match cipher.decrypt(&first.to_string()) {
		Some(Recovered::Json(decrypted)) => {
			println!("Decrypted: {decrypted}");
			println!(
				"Round-trip: {}",
				if decrypted == record { "OK" } else { "MISMATCH" }
			);
		}
		_ => {
			eprintln!("Round-trip: FAILED (could not decrypt own token)");
			return;
		}
	}

	// Two encryptions of the same record must differ (fresh IV each time).
	match cipher.encrypt_value(&record) {
		Ok(second) => println!(
			"Fresh IV per record: {}",
			if second.to_string() != first.to_string() {
				"OK"
			} else {
				"MISMATCH"
			}
		),
		Err(e) => eprintln!("Second encryption failed: {e}"),
	}

	println!("\nSelf-test complete");
}

/// `check` - report which configuration values are present.
///
/// Works on the merged pre-validation layers, so it can describe a
/// configuration that `load_config` would refuse.
pub fn check(config_path: Option<PathBuf>) {
	println!("Checking vigil configuration:\n");

	let toml_source = match config_path {
		Some(path) => TomlSource::new(path),
		None => TomlSource::system(),
	};

	let layer = match vigil_config::load_layers(toml_source) {
		Ok(layer) => layer,
		Err(e) => {
			eprintln!("Failed to load configuration: {e}");
			return;
		}
	};

	report_check(&layer);
}

fn report_check(layer: &VigilConfigLayer) {
	let encryption = layer.encryption.clone().unwrap_or_default();
	match encryption.secret.as_deref() {
		Some(LEGACY_DEFAULT_SECRET) => {
			println!("encryption secret:  INSECURE (legacy default value)")
		}
		Some(secret) => println!("encryption secret:  configured ({}...)", truncate(secret, 10)),
		None => println!("encryption secret:  NOT configured"),
	}

	let storage = layer.storage.clone().unwrap_or_default();
	match storage.base_url.as_deref() {
		Some(url) => println!("storage url:        {url}"),
		None => println!("storage url:        NOT configured"),
	}
	match storage.bucket.as_deref() {
		Some(bucket) => println!("storage bucket:     {bucket}"),
		None => println!("storage bucket:     (default) audit-logs"),
	}
	match storage.token.as_deref() {
		Some(token) => println!("storage token:      configured ({}...)", truncate(token, 10)),
		None => println!("storage token:      NOT configured"),
	}

	let audit = layer.audit.clone().unwrap_or_default();
	println!(
		"audit enabled:      {}",
		audit.enabled.map_or("(default) true".to_string(), |e| e.to_string())
	);
}

fn truncate(s: &str, max: usize) -> &str {
	let end = s
		.char_indices()
		.nth(max)
		.map(|(index, _)| index)
		.unwrap_or(s.len());
	&s[..end]
}

fn print_events(events: &[AuditEvent]) {
	for (index, event) in events.iter().enumerate() {
		println!("{}", "=".repeat(60));
		println!("Entry #{} [{}]", index + 1, event.severity());
		println!("{}", "=".repeat(60));
		match serde_json::to_string_pretty(event) {
			Ok(pretty) => println!("{pretty}\n"),
			Err(e) => eprintln!("failed to render entry: {e}\n"),
		}
	}
}
