use std::fmt;

use serde::{Deserialize, Serialize};

use super::entry::CorpusEntry;

/// Strictly increasing identifier assigned to each dispatched query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryId(pub u64);

impl fmt::Display for QueryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "q{}", self.0)
	}
}

/// A corpus entry that matched a pattern, with its score and highlight
/// positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
	pub entry: CorpusEntry,
	pub score: i64,
	#[serde(default)]
	pub positions: Vec<usize>,
}

/// Ordered, bounded list of matches produced for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
	pub query_id: QueryId,
	pub pattern: String,
	pub results: Vec<MatchResult>,
	/// Number of matches before truncation.
	pub total_matches: usize,
}

impl ResultSet {
	/// The result set visible before any query completes.
	#[must_use]
	pub fn empty() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.results.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.results.is_empty()
	}

	/// Whether matches were dropped to respect the result cap.
	#[must_use]
	pub fn is_truncated(&self) -> bool {
		self.total_matches > self.results.len()
	}

	/// Iterate over the matched paths in display order.
	pub fn paths(&self) -> impl Iterator<Item = &str> {
		self.results.iter().map(|result| result.entry.path.as_str())
	}
}
