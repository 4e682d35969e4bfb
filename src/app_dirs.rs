//! Resolve configuration, cache, and data directories for `sift`.
//!
//! Environment overrides win over the platform locations provided by the
//! `directories` crate.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "albo";
const APPLICATION: &str = "sift";

pub const CONFIG_DIR_ENV: &str = "SIFT_CONFIG_DIR";
pub const DATA_DIR_ENV: &str = "SIFT_DATA_DIR";
pub const CACHE_DIR_ENV: &str = "SIFT_CACHE_DIR";

fn project_dirs() -> Result<ProjectDirs> {
	ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
		.ok_or_else(|| anyhow!("unable to determine project directories for sift"))
}

/// An empty value counts as unset.
fn dir_from_env(name: &str) -> Option<PathBuf> {
	env::var_os(name)
		.filter(|value| !value.is_empty())
		.map(PathBuf::from)
}

fn resolve(name: &str, fallback: impl FnOnce(&ProjectDirs) -> PathBuf) -> Result<PathBuf> {
	match dir_from_env(name) {
		Some(dir) => Ok(dir),
		None => Ok(fallback(&project_dirs()?)),
	}
}

/// Directory holding `config.toml`.
pub fn get_config_dir() -> Result<PathBuf> {
	resolve(CONFIG_DIR_ENV, |dirs| dirs.config_local_dir().to_path_buf())
}

/// Default location for log files.
pub fn get_data_dir() -> Result<PathBuf> {
	resolve(DATA_DIR_ENV, |dirs| dirs.data_local_dir().to_path_buf())
}

pub fn get_cache_dir() -> Result<PathBuf> {
	resolve(CACHE_DIR_ENV, |dirs| dirs.cache_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unset_variables_are_ignored() {
		assert_eq!(dir_from_env("SIFT_TEST_UNSET_DIRECTORY_VARIABLE"), None);
	}

	#[test]
	fn directories_resolve_somewhere() {
		// Either an override or the platform location; both must be non-empty.
		for dir in [get_config_dir(), get_data_dir(), get_cache_dir()]
			.into_iter()
			.flatten()
		{
			assert!(!dir.as_os_str().is_empty());
		}
	}
}
