mod cli;
mod settings;
mod workflow;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use cli::{CliArgs, Command, SearchArgs, parse_cli, print_report};
use settings::ResolvedConfig;
use sift::{build_corpus, logging};
use sift_core::{BackendService, LineTransport};
use workflow::SearchWorkflow;

fn main() -> Result<()> {
	let cli = parse_cli();
	logging::initialize(cli.log_level.into(), cli.log_file.as_deref())?;

	let resolved = settings::load(&cli)?;
	if cli.print_config {
		resolved.print_summary();
	}

	match cli.subcommand() {
		Command::Search(args) => run_search(&cli, &args, &resolved),
		Command::Serve => serve(&resolved),
	}
}

/// Type each query through the coordinator and print what the view shows.
fn run_search(cli: &CliArgs, args: &SearchArgs, config: &ResolvedConfig) -> Result<()> {
	let mut workflow = SearchWorkflow::start(cli, args, config)?;

	if args.queries.is_empty() {
		for line in io::stdin().lock().lines() {
			let line = line.context("failed to read query from stdin")?;
			print_report(&workflow.run_query(&line)?, args.output)?;
		}
	} else {
		for query in &args.queries {
			print_report(&workflow.run_query(query)?, args.output)?;
		}
	}

	workflow.finish()
}

/// Answer bridge commands on stdin/stdout until the front end hangs up.
fn serve(config: &ResolvedConfig) -> Result<()> {
	let corpus = build_corpus(&config.root, &config.index)?;
	BackendService::new(corpus, LineTransport::stdio()).serve();
	Ok(())
}
