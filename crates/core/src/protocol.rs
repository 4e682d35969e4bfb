//! Command names, topics and payload shapes spoken over the bridge.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bridge::RequestId;
use crate::error::SearchError;
use crate::search_pipeline::{CorpusEntry, MatchResult, SearchScope};

/// Rank the backend's corpus for a pattern.
pub const SEARCH_COMMAND: &str = "search";
/// Return the backend's whole corpus for local ranking.
pub const SNAPSHOT_COMMAND: &str = "snapshot";

/// Published by the backend after its corpus changed.
pub const CORPUS_CHANGED_TOPIC: &str = "corpus.changed";
/// Sent to the backend to replace its corpus.
pub const CORPUS_REPLACE_TOPIC: &str = "corpus.replace";
/// Sent to the backend when a search call is no longer wanted.
pub const SEARCH_CANCEL_TOPIC: &str = "search.cancel";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
	pub pattern: String,
	#[serde(default)]
	pub scope: SearchScope,
	pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReply {
	pub results: Vec<MatchResult>,
	pub total_matches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotReply {
	pub entries: Vec<CorpusEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusReplace {
	pub entries: Vec<CorpusEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusChanged {
	pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCancel {
	pub id: RequestId,
}

/// Decode a search reply, dropping individual results whose entry is
/// malformed instead of rejecting the whole reply.
pub fn decode_search_reply(value: &Value) -> Result<SearchReply, SearchError> {
	let items = value
		.get("results")
		.and_then(Value::as_array)
		.ok_or_else(|| SearchError::malformed_reply("search reply has no `results` array"))?;

	let mut results = Vec::with_capacity(items.len());
	for item in items {
		match decode_match(item) {
			Ok(result) => results.push(result),
			Err(err) => log::debug!("skipping result: {err}"),
		}
	}

	let total_matches = value
		.get("total_matches")
		.and_then(Value::as_u64)
		.map_or(results.len(), |total| total as usize)
		.max(results.len());

	Ok(SearchReply {
		results,
		total_matches,
	})
}

/// Decode a snapshot reply, dropping malformed entries.
pub fn decode_snapshot_reply(value: &Value) -> Result<SnapshotReply, SearchError> {
	let items = value
		.get("entries")
		.and_then(Value::as_array)
		.ok_or_else(|| SearchError::malformed_reply("snapshot reply has no `entries` array"))?;
	Ok(SnapshotReply {
		entries: decode_entries(items),
	})
}

/// Decode a corpus replacement, dropping malformed entries.
pub fn decode_corpus_replace(value: &Value) -> Result<CorpusReplace, SearchError> {
	let items = value
		.get("entries")
		.and_then(Value::as_array)
		.ok_or_else(|| SearchError::malformed_reply("corpus replacement has no `entries` array"))?;
	Ok(CorpusReplace {
		entries: decode_entries(items),
	})
}

/// Decode a list of corpus entries, dropping the malformed ones.
fn decode_entries(items: &[Value]) -> Vec<CorpusEntry> {
	items
		.iter()
		.filter_map(|item| match CorpusEntry::from_value(item) {
			Ok(entry) => Some(entry),
			Err(err) => {
				log::debug!("skipping entry: {err}");
				None
			}
		})
		.collect()
}

fn decode_match(item: &Value) -> Result<MatchResult, SearchError> {
	let entry = item
		.get("entry")
		.ok_or_else(|| SearchError::malformed_entry("result has no `entry`"))
		.and_then(CorpusEntry::from_value)?;
	let score = item.get("score").and_then(Value::as_i64).unwrap_or_default();
	let positions = item
		.get("positions")
		.and_then(Value::as_array)
		.map(|positions| {
			positions
				.iter()
				.filter_map(|position| position.as_u64().map(|position| position as usize))
				.collect()
		})
		.unwrap_or_default();
	Ok(MatchResult {
		entry,
		score,
		positions,
	})
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn malformed_results_are_skipped() {
		let reply = json!({
			"results": [
				{ "entry": { "path": "src/lib.rs" }, "score": 10, "positions": [0, 1] },
				{ "entry": { "kind": "file" }, "score": 9 },
				{ "score": 8 },
				{ "entry": { "path": "src/main.rs", "kind": "file", "icon": "file-code" }, "score": 7 },
			],
			"total_matches": 12,
		});

		let decoded = decode_search_reply(&reply).unwrap();
		let paths: Vec<&str> = decoded
			.results
			.iter()
			.map(|result| result.entry.path.as_str())
			.collect();
		assert_eq!(paths, vec!["src/lib.rs", "src/main.rs"]);
		assert_eq!(decoded.results[0].positions, vec![0, 1]);
		assert_eq!(decoded.results[1].entry.icon.as_deref(), Some("file-code"));
		assert_eq!(decoded.total_matches, 12);
	}

	#[test]
	fn replies_without_results_are_rejected() {
		let err = decode_search_reply(&json!({ "entries": [] })).unwrap_err();
		assert!(matches!(err, SearchError::MalformedReply { .. }));
	}

	#[test]
	fn snapshot_skips_malformed_entries() {
		let reply = json!({ "entries": [{ "path": "a" }, { "path": "" }, 42, { "path": "b", "kind": "symbol" }] });
		let decoded = decode_snapshot_reply(&reply).unwrap();
		assert_eq!(
			decoded.entries,
			vec![CorpusEntry::new("a"), CorpusEntry::symbol("b")]
		);
	}

	#[test]
	fn corpus_replacement_needs_an_entries_array() {
		let replace = decode_corpus_replace(&json!({ "entries": [{ "path": "x" }, {}] })).unwrap();
		assert_eq!(replace.entries, vec![CorpusEntry::new("x")]);
		assert!(decode_corpus_replace(&json!({ "paths": ["x"] })).is_err());
	}

	#[test]
	fn search_request_scope_defaults_to_all() {
		let request: SearchRequest =
			serde_json::from_value(json!({ "pattern": "ab", "limit": 5 })).unwrap();
		assert_eq!(request.scope, SearchScope::All);
	}
}
