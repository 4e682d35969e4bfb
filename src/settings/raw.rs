use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Error, Result, ensure};
use serde::Deserialize;
use sift::IndexOptions;
use sift_core::{RankingPlacement, SearchTuning};

use super::resolved::{ConfigSources, ResolvedConfig, SettingSource};
use crate::cli::CliArgs;

/// The `[search]` table as read from disk, before defaults are filled in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct SearchSection {
	pub(super) debounce_ms: Option<u64>,
	pub(super) result_cap: Option<usize>,
	pub(super) timeout_ms: Option<u64>,
	pub(super) max_pattern_chars: Option<usize>,
	pub(super) placement: Option<RankingPlacement>,
}

/// The `[index]` table as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct IndexSection {
	pub(super) root: Option<PathBuf>,
	pub(super) include_hidden: Option<bool>,
	pub(super) follow_symlinks: Option<bool>,
	pub(super) max_depth: Option<usize>,
}

/// Mirror of the configuration files before CLI overrides and validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	pub(super) search: SearchSection,
	pub(super) index: IndexSection,
}

/// A validated setting: its config key, environment variable and CLI flag.
struct Knob {
	key: &'static str,
	env: &'static str,
	flag: Option<&'static str>,
}

const DEBOUNCE_MS: Knob = Knob {
	key: "search.debounce_ms",
	env: "SIFT__SEARCH__DEBOUNCE_MS",
	flag: Some("--debounce-ms"),
};
const RESULT_CAP: Knob = Knob {
	key: "search.result_cap",
	env: "SIFT__SEARCH__RESULT_CAP",
	flag: Some("--result-cap"),
};
const TIMEOUT_MS: Knob = Knob {
	key: "search.timeout_ms",
	env: "SIFT__SEARCH__TIMEOUT_MS",
	flag: Some("--timeout-ms"),
};
const MAX_PATTERN_CHARS: Knob = Knob {
	key: "search.max_pattern_chars",
	env: "SIFT__SEARCH__MAX_PATTERN_CHARS",
	flag: None,
};
const MAX_DEPTH: Knob = Knob {
	key: "index.max_depth",
	env: "SIFT__INDEX__MAX_DEPTH",
	flag: Some("--max-depth"),
};

impl RawConfig {
	/// Apply CLI overrides on top of the values read from files and the
	/// environment.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		let search = &mut self.search;
		if let Some(value) = cli.debounce_ms {
			search.debounce_ms = Some(value);
		}
		if let Some(value) = cli.result_cap {
			search.result_cap = Some(value);
		}
		if let Some(value) = cli.timeout_ms {
			search.timeout_ms = Some(value);
		}
		if let Some(value) = cli.placement {
			search.placement = Some(value.into());
		}

		let index = &mut self.index;
		if let Some(root) = cli.root.clone() {
			index.root = Some(root);
		}
		if let Some(value) = cli.hidden {
			index.include_hidden = Some(value);
		}
		if let Some(value) = cli.follow_symlinks {
			index.follow_symlinks = Some(value);
		}
		if let Some(value) = cli.max_depth {
			index.max_depth = Some(value);
		}
	}

	/// Fill defaults, resolve the index root and validate.
	pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
		let sources = self.detect_sources(cli);
		let root = resolve_root(self.index.root)?;

		let defaults = SearchTuning::default();
		let search = self.search;
		let tuning = SearchTuning {
			debounce_ms: search.debounce_ms.unwrap_or(defaults.debounce_ms),
			result_cap: search.result_cap.unwrap_or(defaults.result_cap),
			timeout_ms: search.timeout_ms.unwrap_or(defaults.timeout_ms),
			max_pattern_chars: search.max_pattern_chars.unwrap_or(defaults.max_pattern_chars),
			placement: search.placement.unwrap_or(defaults.placement),
		};

		let index = IndexOptions {
			include_hidden: self.index.include_hidden.unwrap_or(false),
			follow_symlinks: self.index.follow_symlinks.unwrap_or(false),
			max_depth: self.index.max_depth,
		};

		let config = ResolvedConfig {
			root,
			index,
			tuning,
		};
		config.validate(&sources).map_err(Error::new)?;
		Ok(config)
	}

	fn detect_sources(&self, cli: &CliArgs) -> ConfigSources {
		let mut sources = ConfigSources::default();
		let knobs = [
			(&DEBOUNCE_MS, cli.debounce_ms.is_some(), self.search.debounce_ms.is_some()),
			(&RESULT_CAP, cli.result_cap.is_some(), self.search.result_cap.is_some()),
			(&TIMEOUT_MS, cli.timeout_ms.is_some(), self.search.timeout_ms.is_some()),
			(&MAX_PATTERN_CHARS, false, self.search.max_pattern_chars.is_some()),
			(&MAX_DEPTH, cli.max_depth.is_some(), self.index.max_depth.is_some()),
		];
		for (knob, cli_present, value_present) in knobs {
			if let Some(source) = detect_source(knob, cli_present, value_present) {
				sources.record(knob.key, source);
			}
		}
		sources
	}
}

fn detect_source(knob: &Knob, cli_present: bool, value_present: bool) -> Option<SettingSource> {
	if !value_present {
		return None;
	}

	if let Some(flag) = knob.flag
		&& cli_present
	{
		return Some(SettingSource::CliFlag(flag));
	}

	if env::var_os(knob.env).is_some() {
		return Some(SettingSource::Environment(knob.env));
	}

	Some(SettingSource::ConfigKey(knob.key))
}

fn resolve_root(configured: Option<PathBuf>) -> Result<PathBuf> {
	let mut root = match configured {
		Some(path) => path,
		None => env::current_dir().context("failed to determine working directory")?,
	};
	if root.is_relative() {
		root = env::current_dir()
			.context("failed to resolve current directory for root")?
			.join(root);
	}
	root = fs::canonicalize(&root)
		.with_context(|| format!("failed to canonicalize index root {}", root.display()))?;

	let metadata = fs::metadata(&root)
		.with_context(|| format!("failed to inspect index root {}", root.display()))?;
	ensure!(metadata.is_dir(), "index root must be a directory");

	Ok(root)
}
