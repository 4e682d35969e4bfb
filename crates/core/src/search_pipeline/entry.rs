use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SearchError;

/// Category shown next to a corpus entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
	/// A path to a file on disk.
	#[default]
	File,
	/// A named symbol (class, function, ...) reported by an external indexer.
	Symbol,
}

/// Restricts ranking to one kind of entry, mirroring the popup's tab bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
	#[default]
	All,
	Files,
	Symbols,
}

impl SearchScope {
	/// Whether entries of `kind` are visible under this scope.
	#[must_use]
	pub fn admits(self, kind: EntryKind) -> bool {
		match self {
			Self::All => true,
			Self::Files => kind == EntryKind::File,
			Self::Symbols => kind == EntryKind::Symbol,
		}
	}
}

/// A single searchable item owned by the backend.
///
/// The UI only ever holds copies received over the bridge and never mutates
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
	/// Path-like text the matcher runs against.
	pub path: String,
	#[serde(default)]
	pub kind: EntryKind,
	/// Display icon name, if the supplier provided one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
}

impl CorpusEntry {
	/// Create a file entry without an icon.
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			kind: EntryKind::File,
			icon: None,
		}
	}

	/// Create a symbol entry without an icon.
	pub fn symbol(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			kind: EntryKind::Symbol,
			icon: None,
		}
	}

	#[must_use]
	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	/// Decode an entry received from the bridge, rejecting entries that lack a
	/// usable path.
	pub fn from_value(value: &Value) -> Result<Self, SearchError> {
		let entry: Self = serde_json::from_value(value.clone())
			.map_err(|err| SearchError::malformed_entry(err.to_string()))?;
		if entry.path.trim().is_empty() {
			return Err(SearchError::malformed_entry("entry path is empty"));
		}
		Ok(entry)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn decodes_entries_with_defaults() {
		let entry = CorpusEntry::from_value(&json!({ "path": "src/lib.rs" })).unwrap();
		assert_eq!(entry, CorpusEntry::new("src/lib.rs"));
	}

	#[test]
	fn rejects_entries_without_a_path() {
		let missing = CorpusEntry::from_value(&json!({ "kind": "file" }));
		assert!(matches!(missing, Err(SearchError::MalformedCorpusEntry { .. })));

		let blank = CorpusEntry::from_value(&json!({ "path": "  " }));
		assert!(matches!(blank, Err(SearchError::MalformedCorpusEntry { .. })));
	}

	#[test]
	fn scopes_filter_by_kind() {
		assert!(SearchScope::All.admits(EntryKind::Symbol));
		assert!(SearchScope::Files.admits(EntryKind::File));
		assert!(!SearchScope::Files.admits(EntryKind::Symbol));
		assert!(!SearchScope::Symbols.admits(EntryKind::File));
	}
}
