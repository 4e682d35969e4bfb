use std::path::PathBuf;

use sift::IndexOptions;
use sift_core::SearchTuning;

mod errors;
mod sources;
mod summary;
mod validation;

pub(crate) use errors::ConfigError;
pub(crate) use sources::{ConfigSources, SettingSource};

/// Application-ready configuration derived from CLI flags, the environment,
/// config files and defaults.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
	/// Canonical directory the corpus is built from.
	pub(crate) root: PathBuf,
	pub(crate) index: IndexOptions,
	pub(crate) tuning: SearchTuning,
}

impl ResolvedConfig {
	pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
		validation::validate(self, sources)
	}

	/// Print a human readable summary of the effective configuration.
	pub(crate) fn print_summary(&self) {
		summary::print_summary(self);
	}
}
