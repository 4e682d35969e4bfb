use sift_core::tuning::MAX_DEBOUNCE_MS;

use super::{ConfigError, ConfigSources, ResolvedConfig};

pub(super) fn validate(
	config: &ResolvedConfig,
	sources: &ConfigSources,
) -> Result<(), ConfigError> {
	let tuning = &config.tuning;

	if tuning.result_cap == 0 {
		return Err(invalid(sources, "search.result_cap", tuning.result_cap, "must be at least 1"));
	}

	if tuning.debounce_ms > MAX_DEBOUNCE_MS {
		return Err(invalid(
			sources,
			"search.debounce_ms",
			tuning.debounce_ms,
			format!("must not exceed {MAX_DEBOUNCE_MS}"),
		));
	}

	if tuning.timeout_ms == 0 {
		return Err(invalid(sources, "search.timeout_ms", tuning.timeout_ms, "must be at least 1"));
	}

	if tuning.max_pattern_chars == 0 {
		return Err(invalid(
			sources,
			"search.max_pattern_chars",
			tuning.max_pattern_chars,
			"must be at least 1",
		));
	}

	if let Some(max_depth) = config.index.max_depth
		&& max_depth == 0
	{
		return Err(invalid(sources, "index.max_depth", max_depth, "must be at least 1"));
	}

	Ok(())
}

fn invalid(
	sources: &ConfigSources,
	key: &'static str,
	value: impl ToString,
	reason: impl Into<String>,
) -> ConfigError {
	ConfigError::invalid(key, value, sources.source_for(key), reason)
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use sift::IndexOptions;
	use sift_core::SearchTuning;

	use super::super::SettingSource;
	use super::*;

	fn config(tuning: SearchTuning, index: IndexOptions) -> ResolvedConfig {
		ResolvedConfig {
			root: PathBuf::from("/tmp"),
			index,
			tuning,
		}
	}

	#[test]
	fn defaults_are_valid() {
		let config = config(SearchTuning::default(), IndexOptions::default());
		assert!(validate(&config, &ConfigSources::default()).is_ok());
	}

	#[test]
	fn validation_rejects_zero_result_cap() {
		let tuning = SearchTuning {
			result_cap: 0,
			..SearchTuning::default()
		};
		let mut sources = ConfigSources::default();
		sources.record("search.result_cap", SettingSource::CliFlag("--result-cap"));

		let err = validate(&config(tuning, IndexOptions::default()), &sources).unwrap_err();
		assert_eq!(err.key, "search.result_cap");
		let message = err.to_string();
		assert!(message.contains("value: 0"));
		assert!(message.contains("CLI flag"));
	}

	#[test]
	fn validation_rejects_long_debounce() {
		let tuning = SearchTuning {
			debounce_ms: MAX_DEBOUNCE_MS + 1,
			..SearchTuning::default()
		};
		let mut sources = ConfigSources::default();
		sources.record(
			"search.debounce_ms",
			SettingSource::Environment("SIFT__SEARCH__DEBOUNCE_MS"),
		);

		let err = validate(&config(tuning, IndexOptions::default()), &sources).unwrap_err();
		assert_eq!(err.key, "search.debounce_ms");
		assert!(err.to_string().contains("environment variable"));
	}

	#[test]
	fn validation_rejects_zero_timeout_and_pattern_length() {
		let zero_timeout = SearchTuning {
			timeout_ms: 0,
			..SearchTuning::default()
		};
		let err = validate(
			&config(zero_timeout, IndexOptions::default()),
			&ConfigSources::default(),
		)
		.unwrap_err();
		assert_eq!(err.key, "search.timeout_ms");
		assert!(err.to_string().contains("configuration key"));

		let zero_chars = SearchTuning {
			max_pattern_chars: 0,
			..SearchTuning::default()
		};
		let err = validate(
			&config(zero_chars, IndexOptions::default()),
			&ConfigSources::default(),
		)
		.unwrap_err();
		assert_eq!(err.key, "search.max_pattern_chars");
	}

	#[test]
	fn validation_rejects_zero_max_depth() {
		let index = IndexOptions {
			max_depth: Some(0),
			..IndexOptions::default()
		};
		let err = validate(
			&config(SearchTuning::default(), index),
			&ConfigSources::default(),
		)
		.unwrap_err();
		assert_eq!(err.key, "index.max_depth");
		assert!(err.to_string().contains("value: 0"));
	}
}
