// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Day-level summary statistics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use vigil_audit::AuditEvent;
use vigil_store::DailyLogStore;

/// Summary of one day's audit activity.
///
/// `by_status` keys are the status codes rendered as strings, with
/// `"UNKNOWN"` for events that carry no HTTP context; `by_actor` keys are
/// principal emails or `"anonymous"`. A day with no logs yields the zeroed
/// default, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayStats {
	pub total: u64,
	pub by_method: BTreeMap<String, u64>,
	pub by_status: BTreeMap<String, u64>,
	pub by_actor: BTreeMap<String, u64>,
	pub average_duration_ms: u64,
}

/// Load one day from the store and summarize it.
pub async fn stats(store: &DailyLogStore, date: Option<NaiveDate>) -> DayStats {
	let events = store.read_day(date).await;
	debug!(total = events.len(), "computing day statistics");
	compute(&events)
}

/// Tally a set of decrypted events.
pub fn compute(events: &[AuditEvent]) -> DayStats {
	if events.is_empty() {
		return DayStats::default();
	}

	let mut stats = DayStats {
		total: events.len() as u64,
		..Default::default()
	};

	let mut total_duration: u64 = 0;
	let mut timed_events: u64 = 0;

	for event in events {
		let method = event
			.http
			.as_ref()
			.map(|http| http.method.clone())
			.unwrap_or_else(|| "UNKNOWN".to_string());
		*stats.by_method.entry(method).or_insert(0) += 1;

		let status = event
			.http
			.as_ref()
			.and_then(|http| http.status)
			.map(|status| status.to_string())
			.unwrap_or_else(|| "UNKNOWN".to_string());
		*stats.by_status.entry(status).or_insert(0) += 1;

		*stats
			.by_actor
			.entry(event.actor.display_key().to_string())
			.or_insert(0) += 1;

		if let Some(duration) = event.http.as_ref().and_then(|http| http.duration_ms) {
			total_duration += duration;
			timed_events += 1;
		}
	}

	if timed_events > 0 {
		stats.average_duration_ms =
			((total_duration as f64) / (timed_events as f64)).round() as u64;
	}

	stats
}
