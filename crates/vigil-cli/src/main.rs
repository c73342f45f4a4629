// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! `vigil-logs` - operator tooling for the encrypted audit trail.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vigil_cli::{build_store, commands};
use vigil_query::SearchCriteria;

/// Operator tooling for the vigil encrypted audit trail.
#[derive(Parser, Debug)]
#[command(
	name = "vigil-logs",
	about = "List, decrypt, search and summarize vigil audit logs",
	version
)]
struct Args {
	/// Path to a custom configuration file
	#[arg(short, long)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// List all audit log files
	List,
	/// Read and decrypt the logs of one date (YYYY-MM-DD)
	Read {
		date: NaiveDate,
	},
	/// Read and decrypt today's logs
	Today,
	/// Show statistics for a date (today if omitted)
	Stats {
		date: Option<NaiveDate>,
	},
	/// Export one date's decrypted logs to a JSON file
	Export {
		date: NaiveDate,
		output: PathBuf,
	},
	/// Search logs by field predicates
	Search {
		/// Day to search (today if omitted)
		#[arg(long)]
		date: Option<NaiveDate>,
		/// Exact actor id
		#[arg(long)]
		actor_id: Option<String>,
		/// Exact actor email
		#[arg(long)]
		email: Option<String>,
		/// Exact HTTP method
		#[arg(long)]
		method: Option<String>,
		/// Exact status code
		#[arg(long)]
		status: Option<u16>,
		/// Path substring
		#[arg(long)]
		path: Option<String>,
	},
	/// Self-check the encryption pipeline
	Test,
	/// Verify which configuration values are present
	Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	// Load .env file if present
	dotenvy::dotenv().ok();

	let args = Args::parse();

	// `check` must be able to describe a configuration that would fail
	// validation, so it runs before load_config.
	if let Command::Check = args.command {
		init_tracing("info");
		commands::check(args.config);
		return Ok(());
	}

	let config = match args.config {
		Some(ref path) => vigil_config::load_config_with_file(path),
		None => vigil_config::load_config(),
	};
	let config = match config {
		Ok(config) => config,
		Err(e) => {
			// Handled failures print diagnostics; the exit status stays
			// uniform across failure kinds.
			eprintln!("Configuration error: {e}");
			eprintln!("Run `vigil-logs check` to inspect the current configuration");
			return Ok(());
		}
	};

	init_tracing(&config.logging.level);

	let store = build_store(&config);

	match args.command {
		Command::List => commands::list(&store).await,
		Command::Read { date } => commands::read(&store, date).await,
		Command::Today => commands::today(&store).await,
		Command::Stats { date } => commands::stats(&store, date).await,
		Command::Export { date, output } => commands::export(&store, date, &output).await,
		Command::Search {
			date,
			actor_id,
			email,
			method,
			status,
			path,
		} => {
			let criteria = SearchCriteria {
				date,
				actor_id,
				email,
				method,
				status,
				path,
			};
			commands::search(&store, criteria).await
		}
		Command::Test => commands::self_test(&config.encryption.secret),
		Command::Check => unreachable!("handled above"),
	}

	Ok(())
}

fn init_tracing(level: &str) {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
		)
		.with_writer(std::io::stderr)
		.init();
}
