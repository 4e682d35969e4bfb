//! Logger setup for the `sift` binary.
//!
//! Logs go to stderr by default so they never mix with stdout, which holds
//! printed results for `search` and the bridge itself for `serve`.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};

fn logger_config() -> Config {
	ConfigBuilder::new()
		.add_filter_allow_str("sift")
		.set_target_level(LevelFilter::Error)
		.set_thread_level(LevelFilter::Off)
		.build()
}

/// Install the global logger. Call once, before anything logs.
pub fn initialize(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
	if level == LevelFilter::Off {
		return Ok(());
	}

	match log_file {
		Some(path) => {
			if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
				fs::create_dir_all(parent).with_context(|| {
					format!("failed to create log directory {}", parent.display())
				})?;
			}
			let file = File::create(path)
				.with_context(|| format!("failed to create log file {}", path.display()))?;
			WriteLogger::init(level, logger_config(), file)
		}
		None => TermLogger::init(
			level,
			logger_config(),
			TerminalMode::Stderr,
			ColorChoice::Auto,
		),
	}
	.context("a logger is already installed")
}
