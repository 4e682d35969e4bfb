use clap::ValueEnum;
use log::LevelFilter;
use sift_core::{RankingPlacement, SearchScope};

/// Where ranking happens, as accepted on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum PlacementArg {
	Backend,
	Local,
}

impl From<PlacementArg> for RankingPlacement {
	fn from(value: PlacementArg) -> Self {
		match value {
			PlacementArg::Backend => Self::Backend,
			PlacementArg::Local => Self::Local,
		}
	}
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ScopeArg {
	#[default]
	All,
	Files,
	Symbols,
}

impl From<ScopeArg> for SearchScope {
	fn from(value: ScopeArg) -> Self {
		match value {
			ScopeArg::All => Self::All,
			ScopeArg::Files => Self::Files,
			ScopeArg::Symbols => Self::Symbols,
		}
	}
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogLevelArg {
	Off,
	Error,
	#[default]
	Warn,
	Info,
	Debug,
	Trace,
}

impl LogLevelArg {
	pub(crate) fn as_str(self) -> &'static str {
		match self {
			Self::Off => "off",
			Self::Error => "error",
			Self::Warn => "warn",
			Self::Info => "info",
			Self::Debug => "debug",
			Self::Trace => "trace",
		}
	}
}

impl From<LogLevelArg> for LevelFilter {
	fn from(value: LogLevelArg) -> Self {
		match value {
			LogLevelArg::Off => Self::Off,
			LogLevelArg::Error => Self::Error,
			LogLevelArg::Warn => Self::Warn,
			LogLevelArg::Info => Self::Info,
			LogLevelArg::Debug => Self::Debug,
			LogLevelArg::Trace => Self::Trace,
		}
	}
}

/// Output formats supported by `sift search`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
	#[default]
	Plain,
	/// One JSON object per query.
	Json,
}
