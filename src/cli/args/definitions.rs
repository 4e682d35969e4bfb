use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, ColorChoice, Parser, Subcommand};

use super::options::{LogLevelArg, OutputFormat, PlacementArg, ScopeArg};
use super::styles::{cli_styles, long_version};

/// Delay between typed characters when replaying a query.
pub(crate) const DEFAULT_KEYSTROKE_MS: u64 = 20;

/// Command-line arguments accepted by the `sift` binary.
#[derive(Parser, Debug)]
#[command(
	name = "sift",
	version,
	long_version = long_version(),
	about = "Incremental fuzzy path search over a command/event bridge",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[command(subcommand)]
	pub(crate) command: Option<Command>,
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "SIFT_CONFIG",
		action = ArgAction::Append,
		global = true,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		global = true,
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'r',
		long,
		value_name = "PATH",
		global = true,
		help = "Directory to build the corpus from (default: current directory)"
	)]
	pub(crate) root: Option<PathBuf>,
	#[arg(
		long,
		value_enum,
		global = true,
		help = "Rank on the backend or in this process (default: backend)"
	)]
	pub(crate) placement: Option<PlacementArg>,
	#[arg(
		long = "debounce-ms",
		value_name = "MS",
		global = true,
		help = "Quiet interval before a keystroke becomes a query (default: 150)"
	)]
	pub(crate) debounce_ms: Option<u64>,
	#[arg(
		long = "result-cap",
		value_name = "NUM",
		global = true,
		help = "Maximum number of results shown per query (default: 100)"
	)]
	pub(crate) result_cap: Option<usize>,
	#[arg(
		long = "timeout-ms",
		value_name = "MS",
		global = true,
		help = "How long a backend call may stay unanswered (default: 3000)"
	)]
	pub(crate) timeout_ms: Option<u64>,
	#[arg(
		short = 'H',
		long = "hidden",
		value_parser = BoolishValueParser::new(),
		global = true,
		help = "Include hidden files in the corpus (default: disabled)"
	)]
	pub(crate) hidden: Option<bool>,
	#[arg(
		long = "follow-symlinks",
		value_parser = BoolishValueParser::new(),
		global = true,
		help = "Follow symbolic links while indexing (default: disabled)"
	)]
	pub(crate) follow_symlinks: Option<bool>,
	#[arg(
		short = 'd',
		long = "max-depth",
		value_name = "NUM",
		global = true,
		help = "Limit directory traversal depth (default: unlimited)"
	)]
	pub(crate) max_depth: Option<usize>,
	#[arg(
		long = "log-level",
		value_enum,
		default_value_t = LogLevelArg::Warn,
		global = true,
		help = "Minimum level of log messages"
	)]
	pub(crate) log_level: LogLevelArg,
	#[arg(
		long = "log-file",
		value_name = "FILE",
		global = true,
		help = "Write logs to FILE instead of stderr (default: stderr)"
	)]
	pub(crate) log_file: Option<PathBuf>,
	#[arg(
		short = 'p',
		long = "print-config",
		global = true,
		help = "Print the resolved configuration to stderr before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
}

impl CliArgs {
	/// The subcommand to run; a bare `sift` behaves like `sift search`.
	pub(crate) fn subcommand(&self) -> Command {
		self.command.clone().unwrap_or_default()
	}
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
	/// Type queries through the coordinator and print the visible results.
	Search(SearchArgs),
	/// Serve the corpus over stdin/stdout to a front end in another process.
	Serve,
}

impl Default for Command {
	fn default() -> Self {
		Self::Search(SearchArgs::default())
	}
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchArgs {
	#[arg(
		value_name = "QUERY",
		help = "Queries to type, one after another (default: one per stdin line)"
	)]
	pub(crate) queries: Vec<String>,
	#[arg(
		short = 'o',
		long = "output",
		value_enum,
		default_value_t = OutputFormat::Plain,
		help = "Choose how to print results"
	)]
	pub(crate) output: OutputFormat,
	#[arg(
		short = 's',
		long = "scope",
		value_enum,
		default_value_t = ScopeArg::All,
		help = "Restrict results to one kind of entry"
	)]
	pub(crate) scope: ScopeArg,
	#[arg(
		long = "spawn-backend",
		help = "Run the backend in a child `sift serve` process (default: in-process thread)"
	)]
	pub(crate) spawn_backend: bool,
	#[arg(
		long = "keystroke-ms",
		value_name = "MS",
		default_value_t = DEFAULT_KEYSTROKE_MS,
		help = "Delay between typed characters"
	)]
	pub(crate) keystroke_ms: u64,
}

impl Default for SearchArgs {
	fn default() -> Self {
		Self {
			queries: Vec::new(),
			output: OutputFormat::default(),
			scope: ScopeArg::default(),
			spawn_backend: false,
			keystroke_ms: DEFAULT_KEYSTROKE_MS,
		}
	}
}
