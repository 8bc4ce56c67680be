//! In-process counters for refresh and retry activity.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters shared by every clone of a client.
#[derive(Debug, Default)]
pub struct ClientMetrics {
	refresh_attempts: AtomicU64,
	refresh_success: AtomicU64,
	refresh_failure: AtomicU64,
	token_reuse: AtomicU64,
	retries: AtomicU64,
}
impl ClientMetrics {
	/// Returns the number of refresh calls sent to the server.
	pub fn refresh_attempts(&self) -> u64 {
		self.refresh_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls that produced a new access token.
	pub fn refresh_successes(&self) -> u64 {
		self.refresh_success.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls that ended the session.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failure.load(Ordering::Relaxed)
	}

	/// Returns how often a waiting request reused a token refreshed by another request.
	pub fn token_reuses(&self) -> u64 {
		self.token_reuse.load(Ordering::Relaxed)
	}

	/// Returns the number of requests resubmitted after a refresh.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	pub(crate) fn record_refresh_attempt(&self) {
		self.refresh_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_success(&self) {
		self.refresh_success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_token_reuse(&self) {
		self.token_reuse.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}
}
