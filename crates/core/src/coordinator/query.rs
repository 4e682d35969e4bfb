use std::time::{Duration, Instant};

use crate::search_pipeline::{QueryId, SearchScope};

/// A settled keystroke, ready to dispatch. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
	pub id: QueryId,
	pub pattern: String,
	pub scope: SearchScope,
	pub created_at: Instant,
}

/// Collapses bursts of input into a single deadline.
#[derive(Debug, Clone)]
pub(super) struct Debouncer {
	quiet: Duration,
	deadline: Option<Instant>,
}

impl Debouncer {
	pub(super) fn new(quiet: Duration) -> Self {
		Self {
			quiet,
			deadline: None,
		}
	}

	/// Restart the timer from `now`.
	pub(super) fn arm(&mut self, now: Instant) {
		self.deadline = Some(now + self.quiet);
	}

	pub(super) fn is_armed(&self) -> bool {
		self.deadline.is_some()
	}

	pub(super) fn cancel(&mut self) -> bool {
		self.deadline.take().is_some()
	}

	/// Returns true once, when the deadline has passed.
	pub(super) fn fire(&mut self, now: Instant) -> bool {
		match self.deadline {
			Some(deadline) if deadline <= now => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}
}

/// Truncate `text` to at most `max_chars` characters.
pub(super) fn truncate_chars(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((byte_index, _)) => &text[..byte_index],
		None => text,
	}
}
