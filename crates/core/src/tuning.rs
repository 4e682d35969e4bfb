use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::search_pipeline::MAX_RENDERED_RESULTS;

pub const DEFAULT_DEBOUNCE_MS: u64 = 150;
/// Longest quiet interval a host should accept.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_MAX_PATTERN_CHARS: usize = 256;

/// Where ranking happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPlacement {
	/// The backend ranks and returns a bounded result list per query.
	#[default]
	Backend,
	/// The UI fetches a corpus snapshot once and ranks it itself.
	Local,
}

impl RankingPlacement {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Backend => "backend",
			Self::Local => "local",
		}
	}
}

/// Named tunables of the search pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchTuning {
	/// Quiet interval that collapses a burst of keystrokes into one query.
	pub debounce_ms: u64,
	/// Maximum number of results handed to the view.
	pub result_cap: usize,
	/// How long a bridge call may stay unanswered.
	pub timeout_ms: u64,
	/// Longer input is truncated, never rejected.
	pub max_pattern_chars: usize,
	pub placement: RankingPlacement,
}

impl Default for SearchTuning {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			result_cap: MAX_RENDERED_RESULTS,
			timeout_ms: DEFAULT_TIMEOUT_MS,
			max_pattern_chars: DEFAULT_MAX_PATTERN_CHARS,
			placement: RankingPlacement::default(),
		}
	}
}

impl SearchTuning {
	#[must_use]
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	#[must_use]
	pub fn call_timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_ms)
	}

	#[must_use]
	pub fn with_placement(mut self, placement: RankingPlacement) -> Self {
		self.placement = placement;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_documented_values() {
		let tuning = SearchTuning::default();
		assert_eq!(tuning.debounce(), Duration::from_millis(150));
		assert_eq!(tuning.result_cap, 100);
		assert_eq!(tuning.call_timeout(), Duration::from_secs(3));
		assert_eq!(tuning.placement, RankingPlacement::Backend);
	}

	#[test]
	fn partial_tables_fill_in_defaults() {
		let tuning: SearchTuning =
			serde_json::from_str(r#"{ "result_cap": 20, "placement": "local" }"#).unwrap();
		assert_eq!(tuning.result_cap, 20);
		assert_eq!(tuning.placement, RankingPlacement::Local);
		assert_eq!(tuning.debounce_ms, DEFAULT_DEBOUNCE_MS);
	}
}
