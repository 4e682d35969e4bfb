mod args;
mod output;

pub(crate) use args::{CliArgs, Command, OutputFormat, SearchArgs, parse_cli};
pub(crate) use output::{QueryReport, UpdateCounter, print_report};
