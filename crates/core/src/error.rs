use thiserror::Error;

/// Failures surfaced by the search pipeline.
///
/// None of these are fatal: the worst outcome is a stalled result list with a
/// status cue. Stale replies are not errors and never appear here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
	/// The backend did not answer within the call timeout.
	#[error("search for '{pattern}' timed out")]
	BridgeTimeout { pattern: String },

	/// The backend reported an error, or the bridge could not deliver the call.
	#[error("search for '{pattern}' failed: {message}")]
	BridgeFailure { pattern: String, message: String },

	/// A corpus entry is missing required fields.
	#[error("malformed corpus entry: {reason}")]
	MalformedCorpusEntry { reason: String },

	/// A reply payload did not have the expected shape.
	#[error("malformed reply: {reason}")]
	MalformedReply { reason: String },
}

impl SearchError {
	pub fn malformed_entry(reason: impl Into<String>) -> Self {
		Self::MalformedCorpusEntry {
			reason: reason.into(),
		}
	}

	pub fn malformed_reply(reason: impl Into<String>) -> Self {
		Self::MalformedReply {
			reason: reason.into(),
		}
	}
}
