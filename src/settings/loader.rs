use anyhow::{Result, anyhow};

use super::raw::RawConfig;
use super::resolved::ResolvedConfig;
use super::sources::build_config;
use crate::cli::CliArgs;

/// Load configuration by combining config files, environment variables and
/// CLI arguments, in increasing precedence.
pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	let builder = build_config(cli)?;
	let mut raw: RawConfig = builder
		.try_deserialize()
		.map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
	raw.apply_cli_overrides(cli);
	raw.resolve(cli)
}

#[cfg(test)]
mod tests {
	use std::fs;
	use std::path::Path;

	use clap::Parser;
	use sift_core::RankingPlacement;
	use tempfile::tempdir;

	use super::*;

	fn write_config(dir: &Path, body: &str) -> String {
		let path = dir.join("sift.toml");
		fs::write(&path, body).unwrap();
		path.display().to_string()
	}

	#[test]
	fn config_file_values_are_applied() {
		let dir = tempdir().unwrap();
		let config = write_config(
			dir.path(),
			"[search]\ndebounce_ms = 40\nresult_cap = 25\nplacement = \"local\"\n\n[index]\ninclude_hidden = true\nmax_depth = 3\n",
		);
		let root = dir.path().display().to_string();
		let cli = CliArgs::parse_from(["sift", "--no-config", "--config", &config, "--root", &root]);

		let resolved = load(&cli).unwrap();
		assert_eq!(resolved.tuning.debounce_ms, 40);
		assert_eq!(resolved.tuning.result_cap, 25);
		assert_eq!(resolved.tuning.placement, RankingPlacement::Local);
		assert!(resolved.index.include_hidden);
		assert_eq!(resolved.index.max_depth, Some(3));
		assert_eq!(resolved.root, fs::canonicalize(dir.path()).unwrap());
	}

	#[test]
	fn cli_flags_win_over_config_files() {
		let dir = tempdir().unwrap();
		let config = write_config(dir.path(), "[search]\nresult_cap = 25\nplacement = \"local\"\n");
		let root = dir.path().display().to_string();
		let cli = CliArgs::parse_from([
			"sift",
			"--no-config",
			"--config",
			&config,
			"--root",
			&root,
			"--result-cap",
			"7",
			"--placement",
			"backend",
		]);

		let resolved = load(&cli).unwrap();
		assert_eq!(resolved.tuning.result_cap, 7);
		assert_eq!(resolved.tuning.placement, RankingPlacement::Backend);
	}

	#[test]
	fn invalid_file_value_names_its_key() {
		let dir = tempdir().unwrap();
		let config = write_config(dir.path(), "[search]\nresult_cap = 0\n");
		let root = dir.path().display().to_string();
		let cli = CliArgs::parse_from(["sift", "--no-config", "--config", &config, "--root", &root]);

		let message = load(&cli).unwrap_err().to_string();
		assert!(message.contains("search.result_cap"), "{message}");
		assert!(message.contains("configuration key"), "{message}");
	}

	#[test]
	fn missing_explicit_config_file_is_an_error() {
		let dir = tempdir().unwrap();
		let missing = dir.path().join("absent.toml").display().to_string();
		let cli = CliArgs::parse_from(["sift", "--no-config", "--config", &missing]);
		assert!(load(&cli).is_err());
	}
}
