use std::fmt;

/// Where a setting's effective value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
	CliFlag(&'static str),
	Environment(&'static str),
	ConfigKey(&'static str),
}

impl fmt::Display for SettingSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
			Self::Environment(var) => write!(f, "environment variable `{var}`"),
			Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
		}
	}
}

/// Origins of the validated settings, keyed by config key.
#[derive(Debug, Default, Clone)]
pub(crate) struct ConfigSources {
	entries: Vec<(&'static str, SettingSource)>,
}

impl ConfigSources {
	pub(crate) fn record(&mut self, key: &'static str, source: SettingSource) {
		self.entries.retain(|(existing, _)| *existing != key);
		self.entries.push((key, source));
	}

	/// Unknown keys are attributed to the config file.
	pub(crate) fn source_for(&self, key: &'static str) -> SettingSource {
		self.entries
			.iter()
			.find(|(existing, _)| *existing == key)
			.map(|(_, source)| source.clone())
			.unwrap_or(SettingSource::ConfigKey(key))
	}
}
