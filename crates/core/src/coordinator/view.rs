use crate::error::SearchError;
use crate::search_pipeline::{QueryId, ResultSet};

/// What the view should show next to the result list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchStatus {
	/// Nothing dispatched yet.
	#[default]
	Idle,
	/// The latest query is waiting for its results.
	Searching { query_id: QueryId },
	/// The latest query's results are visible.
	Ready { query_id: QueryId },
	/// The latest query failed or timed out. Input stays usable.
	Unavailable { query_id: QueryId, error: SearchError },
}

impl SearchStatus {
	#[must_use]
	pub fn is_searching(&self) -> bool {
		matches!(self, Self::Searching { .. })
	}

	#[must_use]
	pub fn is_unavailable(&self) -> bool {
		matches!(self, Self::Unavailable { .. })
	}
}

/// Consumer of accepted result sets: the presentation layer.
pub trait ResultsView {
	/// Called exactly once per accepted result set, in increasing query order.
	fn results_changed(&mut self, results: &ResultSet);

	/// Called whenever the status cue changes.
	fn status_changed(&mut self, _status: &SearchStatus) {}
}

impl<F> ResultsView for F
where
	F: FnMut(&ResultSet),
{
	fn results_changed(&mut self, results: &ResultSet) {
		self(results);
	}
}
