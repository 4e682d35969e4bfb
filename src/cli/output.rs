use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

use anyhow::Result;
use serde_json::{Value, json};
use sift_core::{ResultSet, ResultsView, SearchStatus};

use super::OutputFormat;

/// What the view showed once a typed query settled.
#[derive(Debug, Clone)]
pub(crate) struct QueryReport {
	pub(crate) query: String,
	pub(crate) results: ResultSet,
	pub(crate) status: SearchStatus,
	/// How many result sets the view received while the query was typed.
	pub(crate) updates: usize,
}

/// A [`ResultsView`] that counts refreshes; the printed output comes from the
/// coordinator's final state.
#[derive(Debug, Clone, Default)]
pub(crate) struct UpdateCounter {
	updates: Rc<Cell<usize>>,
}

impl UpdateCounter {
	/// Return the number of refreshes since the last call and reset it.
	pub(crate) fn take(&self) -> usize {
		self.updates.replace(0)
	}
}

impl ResultsView for UpdateCounter {
	fn results_changed(&mut self, results: &ResultSet) {
		self.updates.set(self.updates.get() + 1);
		log::trace!("view refreshed with {} results for '{}'", results.len(), results.pattern);
	}

	fn status_changed(&mut self, status: &SearchStatus) {
		if let SearchStatus::Unavailable { error, .. } = status {
			log::info!("search unavailable: {error}");
		}
	}
}

pub(crate) fn print_report(report: &QueryReport, format: OutputFormat) -> Result<()> {
	let mut out = io::stdout().lock();
	match format {
		OutputFormat::Plain => write_plain(&mut out, &mut io::stderr().lock(), report)?,
		OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&report_json(report))?)?,
	}
	out.flush()?;
	Ok(())
}

/// Matched paths, one per line, on `out`. Unavailable searches are reported
/// on `err` instead.
fn write_plain(out: &mut impl Write, err: &mut impl Write, report: &QueryReport) -> Result<()> {
	if let SearchStatus::Unavailable { error, .. } = &report.status {
		writeln!(err, "search unavailable: {error}")?;
		return Ok(());
	}
	for path in report.results.paths() {
		writeln!(out, "{path}")?;
	}
	Ok(())
}

fn report_json(report: &QueryReport) -> Value {
	let (status, error) = match &report.status {
		SearchStatus::Idle => ("idle", Value::Null),
		SearchStatus::Searching { .. } => ("searching", Value::Null),
		SearchStatus::Ready { .. } => ("ready", Value::Null),
		SearchStatus::Unavailable { error, .. } => ("unavailable", json!(error.to_string())),
	};

	let results: Vec<Value> = report
		.results
		.results
		.iter()
		.map(|result| {
			json!({
				"path": result.entry.path,
				"kind": result.entry.kind,
				"icon": result.entry.icon,
				"score": result.score,
				"positions": result.positions,
			})
		})
		.collect();

	json!({
		"query": report.query,
		"pattern": report.results.pattern,
		"status": status,
		"error": error,
		"total_matches": report.results.total_matches,
		"truncated": report.results.is_truncated(),
		"updates": report.updates,
		"results": results,
	})
}
