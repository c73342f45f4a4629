// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Single-writer append queue.
//!
//! All appends go through one bounded channel drained by one background
//! task, so within this process every append for a given day is strictly
//! ordered and the read-modify-write cycles cannot interleave. This is the
//! serialization point that removes the intra-process lost-update race;
//! races with other deployed processes remain, see [`crate::DailyLogStore`].

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::SendError};
use tracing::{instrument, warn};
use vigil_audit::AuditEvent;

use crate::daily::DailyLogStore;

/// Handle for enqueueing audit events. Cheap to clone; hand one to every
/// producer (middleware, route handlers, background jobs).
#[derive(Clone)]
pub struct AuditWriter {
	tx: mpsc::Sender<AuditEvent>,
}

impl AuditWriter {
	/// Spawns the background drain task and returns the producer handle.
	pub fn new(store: Arc<DailyLogStore>, queue_capacity: usize) -> Self {
		let (tx, rx) = mpsc::channel(queue_capacity);

		tokio::spawn(Self::drain(rx, store));

		Self { tx }
	}

	async fn drain(mut rx: mpsc::Receiver<AuditEvent>, store: Arc<DailyLogStore>) {
		while let Some(event) = rx.recv().await {
			store.append(event).await;
		}
	}

	/// Enqueue an event without waiting.
	///
	/// Returns `false` if the queue is full and the event was dropped -
	/// the producer's request must not block on audit backpressure.
	#[instrument(skip(self, event), fields(event_type = %event.event_type))]
	pub fn log(&self, event: AuditEvent) -> bool {
		match self.tx.try_send(event) {
			Ok(()) => true,
			Err(_) => {
				warn!("audit queue full, dropping event");
				false
			}
		}
	}

	/// Enqueue an event, waiting for queue space. For producers that can
	/// afford to wait (CLI tooling, tests).
	pub async fn log_blocking(&self, event: AuditEvent) -> Result<(), SendError<AuditEvent>> {
		self.tx.send(event).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory::MemoryBlobStore;
	use tokio::time::{sleep, Duration};
	use vigil_audit::{AuditEvent, AuditEventType, LineCodec};
	use vigil_crypto::{RecordCipher, Sha256KeyProvider};

	fn test_store() -> Arc<DailyLogStore> {
		let blobs = Arc::new(MemoryBlobStore::new());
		let codec = LineCodec::new(RecordCipher::new(&Sha256KeyProvider::new("writer-test")));
		Arc::new(DailyLogStore::new(blobs, codec))
	}

	fn event(seq: i64) -> AuditEvent {
		AuditEvent::builder(AuditEventType::Request)
			.detail("seq", seq)
			.build()
	}

	#[tokio::test]
	async fn logged_events_reach_the_store() {
		let store = test_store();
		let writer = AuditWriter::new(store.clone(), 16);

		assert!(writer.log(event(1)));

		sleep(Duration::from_millis(50)).await;
		assert_eq!(store.read_day(None).await.len(), 1);
	}

	#[tokio::test]
	async fn events_append_in_submission_order() {
		let store = test_store();
		let writer = AuditWriter::new(store.clone(), 16);

		for seq in 0..5 {
			writer.log_blocking(event(seq)).await.unwrap();
		}

		sleep(Duration::from_millis(100)).await;
		let seqs: Vec<i64> = store
			.read_day(None)
			.await
			.iter()
			.map(|e| e.context["seq"].as_i64().unwrap())
			.collect();
		assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
	}

	#[tokio::test]
	async fn concurrent_producers_lose_no_events() {
		let store = test_store();
		let writer = AuditWriter::new(store.clone(), 64);

		let mut handles = Vec::new();
		for seq in 0..20 {
			let writer = writer.clone();
			handles.push(tokio::spawn(async move {
				writer.log_blocking(event(seq)).await.unwrap();
			}));
		}
		for handle in handles {
			handle.await.unwrap();
		}

		sleep(Duration::from_millis(200)).await;
		assert_eq!(store.read_day(None).await.len(), 20);
	}
}
