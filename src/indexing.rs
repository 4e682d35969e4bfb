//! Build a search corpus by walking a directory tree.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use ignore::WalkBuilder;
use sift_core::CorpusEntry;

/// Directory names never descended into, even with hidden files enabled.
const ALWAYS_SKIPPED: &[&str] = &[".git"];

/// Walker settings taken from the `[index]` configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexOptions {
	pub include_hidden: bool,
	pub follow_symlinks: bool,
	/// `None` walks the whole tree.
	pub max_depth: Option<usize>,
}

/// Walk `root` and return one file entry per regular file, with paths
/// relative to `root` using `/` separators, sorted by path.
///
/// `.gitignore`, `.ignore` and git exclude files are respected. Unreadable
/// entries are skipped.
pub fn build_corpus(root: &Path, options: &IndexOptions) -> Result<Vec<CorpusEntry>> {
	let metadata = root
		.metadata()
		.with_context(|| format!("failed to inspect index root {}", root.display()))?;
	ensure!(
		metadata.is_dir(),
		"index root {} must be a directory",
		root.display()
	);

	let walker = WalkBuilder::new(root)
		.hidden(!options.include_hidden)
		.follow_links(options.follow_symlinks)
		.max_depth(options.max_depth)
		.git_ignore(true)
		.git_global(true)
		.git_exclude(true)
		.ignore(true)
		.parents(true)
		.require_git(false)
		.sort_by_file_name(|a, b| a.cmp(b))
		.filter_entry(|entry| {
			let name = entry.file_name().to_string_lossy();
			!ALWAYS_SKIPPED.contains(&name.as_ref())
		})
		.build();

	let mut corpus = Vec::new();
	for entry in walker {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				log::debug!("skipping unreadable entry: {err}");
				continue;
			}
		};
		if !entry.file_type().is_some_and(|kind| kind.is_file()) {
			continue;
		}

		let path = entry.path();
		let relative = path.strip_prefix(root).unwrap_or(path);
		let display = relative.to_string_lossy().replace('\\', "/");
		if display.is_empty() {
			continue;
		}
		let icon = icon_for(relative);
		corpus.push(CorpusEntry::new(display).with_icon(icon));
	}

	corpus.sort_by(|a, b| a.path.cmp(&b.path));
	log::info!("indexed {} files under {}", corpus.len(), root.display());
	Ok(corpus)
}

/// Icon name for a file, chosen from its extension.
fn icon_for(path: &Path) -> &'static str {
	let extension = path
		.extension()
		.and_then(|ext| ext.to_str())
		.map(str::to_ascii_lowercase);

	match extension.as_deref() {
		Some(
			"rs" | "c" | "h" | "cc" | "cpp" | "go" | "java" | "js" | "jsx" | "ts" | "tsx" | "py"
			| "rb" | "sh" | "zig",
		) => "file-code",
		Some("md" | "txt" | "rst" | "adoc") => "file-text",
		Some("png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "ico") => "file-image",
		Some("toml" | "json" | "yaml" | "yml" | "ini" | "lock") => "cog",
		_ => "file",
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::tempdir;

	use super::*;

	fn touch(root: &Path, relative: &str) {
		let path = root.join(relative);
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		fs::write(path, b"").unwrap();
	}

	fn paths(corpus: &[CorpusEntry]) -> Vec<&str> {
		corpus.iter().map(|entry| entry.path.as_str()).collect()
	}

	#[test]
	fn walks_relative_sorted_paths() {
		let dir = tempdir().unwrap();
		touch(dir.path(), "src/main.rs");
		touch(dir.path(), "README.md");
		touch(dir.path(), "src/bridge/wire.rs");

		let corpus = build_corpus(dir.path(), &IndexOptions::default()).unwrap();
		assert_eq!(
			paths(&corpus),
			vec!["README.md", "src/bridge/wire.rs", "src/main.rs"]
		);
		assert_eq!(corpus[0].icon.as_deref(), Some("file-text"));
		assert_eq!(corpus[2].icon.as_deref(), Some("file-code"));
	}

	#[test]
	fn hidden_files_follow_the_option() {
		let dir = tempdir().unwrap();
		touch(dir.path(), ".env");
		touch(dir.path(), "visible.txt");
		touch(dir.path(), ".git/HEAD");

		let hidden_off = build_corpus(dir.path(), &IndexOptions::default()).unwrap();
		assert_eq!(paths(&hidden_off), vec!["visible.txt"]);

		let options = IndexOptions {
			include_hidden: true,
			..IndexOptions::default()
		};
		let hidden_on = build_corpus(dir.path(), &options).unwrap();
		assert_eq!(paths(&hidden_on), vec![".env", "visible.txt"]);
	}

	#[test]
	fn ignore_files_are_respected() {
		let dir = tempdir().unwrap();
		fs::write(dir.path().join(".ignore"), "target/\n").unwrap();
		touch(dir.path(), "target/debug/app");
		touch(dir.path(), "src/lib.rs");

		let corpus = build_corpus(dir.path(), &IndexOptions::default()).unwrap();
		assert_eq!(paths(&corpus), vec!["src/lib.rs"]);
	}

	#[test]
	fn max_depth_limits_descent() {
		let dir = tempdir().unwrap();
		touch(dir.path(), "top.rs");
		touch(dir.path(), "a/b/deep.rs");

		let options = IndexOptions {
			max_depth: Some(1),
			..IndexOptions::default()
		};
		let corpus = build_corpus(dir.path(), &options).unwrap();
		assert_eq!(paths(&corpus), vec!["top.rs"]);
	}

	#[test]
	fn missing_root_is_an_error() {
		let dir = tempdir().unwrap();
		assert!(build_corpus(&dir.path().join("absent"), &IndexOptions::default()).is_err());
	}
}
