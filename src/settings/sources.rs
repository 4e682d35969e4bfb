use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use config::{Config, ConfigError, Environment, File};
use sift::app_dirs;

use crate::cli::CliArgs;

/// Prefix of environment overrides such as `SIFT__SEARCH__DEBOUNCE_MS`.
pub(super) const ENV_PREFIX: &str = "sift";
pub(super) const ENV_SEPARATOR: &str = "__";

/// Build a [`Config`] from the default file locations, explicit `--config`
/// files and the environment.
pub(super) fn build_config(cli: &CliArgs) -> Result<Config> {
	let mut builder = Config::builder();

	if !cli.no_config {
		for path in default_config_files() {
			builder = builder.add_source(File::from(path).required(false));
		}
	}

	for path in &cli.config {
		builder = builder.add_source(File::from(path.clone()).required(true));
	}

	builder = builder.add_source(
		Environment::with_prefix(ENV_PREFIX)
			.separator(ENV_SEPARATOR)
			.try_parsing(true),
	);

	builder.build().map_err(|err| match err {
		ConfigError::Frozen => anyhow!("configuration builder is frozen"),
		other => other.into(),
	})
}

/// Default configuration files, lowest precedence first.
pub(super) fn default_config_files() -> Vec<PathBuf> {
	let mut files = Vec::new();

	if let Ok(dir) = app_dirs::get_config_dir() {
		files.push(dir.join("config.toml"));
	}

	if let Ok(current_dir) = env::current_dir() {
		files.push(current_dir.join(".sift.toml"));
		files.push(current_dir.join("sift.toml"));
	}

	files
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_files_include_current_directory_variants() {
		let files = default_config_files();
		assert!(files.iter().any(|path| path.ends_with(".sift.toml")));
		assert!(files.iter().any(|path| path.ends_with("sift.toml")));
	}

	#[test]
	fn dotfile_is_consulted_before_plain_file() {
		let files = default_config_files();
		let dotfile = files.iter().position(|path| path.ends_with(".sift.toml"));
		let plain = files.iter().position(|path| path.ends_with("sift.toml") && !path.ends_with(".sift.toml"));
		assert!(dotfile < plain);
	}
}
