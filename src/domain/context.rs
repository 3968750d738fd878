use std::fmt;
use std::future::Future;
use std::time::Duration;

use derive_more::derive::{Display, Error};
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Request deadline exceeded")]
pub struct DeadlineExceeded;

/// Request-scoped context handed to every operation and forwarded unchanged to
/// every downstream call. Carries the id used to correlate log lines and the
/// optional deadline after which downstream work is abandoned.
#[derive(Debug, Clone)]
pub struct RequestContext {
	pub request_id: Uuid,
	deadline:       Option<Instant>,
}

impl RequestContext {
	pub fn new() -> Self {
		Self::with_request_id(Uuid::new_v4())
	}

	pub fn with_request_id(request_id: Uuid) -> Self {
		Self {
			request_id,
			deadline: None,
		}
	}

	pub fn with_timeout(self, timeout: Duration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		self.deadline = Some(deadline);
		self
	}

	/// Copy of this context whose deadline is at most `timeout` away. An
	/// earlier deadline already in place is kept.
	pub fn bounded(&self, timeout: Duration) -> Self {
		let cap = Instant::now() + timeout;
		Self {
			request_id: self.request_id,
			deadline:   Some(self.deadline.map_or(cap, |deadline| deadline.min(cap))),
		}
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Time left before the deadline; `None` when the request is unbounded.
	pub fn remaining(&self) -> Option<Duration> {
		self.deadline
			.map(|deadline| deadline.saturating_duration_since(Instant::now()))
	}

	pub fn is_expired(&self) -> bool {
		self.remaining().is_some_and(|left| left.is_zero())
	}

	/// Drives `operation` to completion or until the deadline passes, in
	/// which case the operation is dropped and `DeadlineExceeded` is returned
	/// through the caller's error type.
	pub async fn run<F, T, E>(&self, operation: F) -> Result<T, E>
	where
		F: Future<Output = Result<T, E>>,
		E: From<DeadlineExceeded>,
	{
		match self.deadline {
			None => operation.await,
			Some(deadline) => tokio::time::timeout_at(deadline, operation)
				.await
				.unwrap_or_else(|_| Err(E::from(DeadlineExceeded))),
		}
	}
}

impl Default for RequestContext {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for RequestContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "request_id={}", self.request_id)
	}
}
