use clap::CommandFactory;
use clap::Parser;

use super::definitions::DEFAULT_KEYSTROKE_MS;
use super::options::{LogLevelArg, PlacementArg, ScopeArg};
use super::{CliArgs, Command, OutputFormat, SearchArgs};

#[test]
fn command_definition_is_consistent() {
	CliArgs::command().debug_assert();
}

#[test]
fn bare_invocation_searches_stdin() {
	let cli = CliArgs::parse_from(["sift"]);
	assert_eq!(cli.subcommand(), Command::Search(SearchArgs::default()));
	assert_eq!(cli.log_level, LogLevelArg::Warn);
}

#[test]
fn search_accepts_queries_and_global_flags_after_the_subcommand() {
	let cli = CliArgs::parse_from([
		"sift",
		"search",
		"main",
		"lib",
		"--output",
		"json",
		"--placement",
		"local",
		"--scope",
		"files",
	]);

	let Command::Search(args) = cli.subcommand() else {
		panic!("expected the search command");
	};
	assert_eq!(args.queries, vec!["main", "lib"]);
	assert_eq!(args.output, OutputFormat::Json);
	assert_eq!(args.scope, ScopeArg::Files);
	assert_eq!(args.keystroke_ms, DEFAULT_KEYSTROKE_MS);
	assert_eq!(cli.placement, Some(PlacementArg::Local));
}

#[test]
fn serve_takes_index_flags() {
	let cli = CliArgs::parse_from(["sift", "serve", "--hidden", "true", "--max-depth", "2"]);
	assert_eq!(cli.subcommand(), Command::Serve);
	assert_eq!(cli.hidden, Some(true));
	assert_eq!(cli.max_depth, Some(2));
}
