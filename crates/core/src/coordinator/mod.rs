//! Query lifecycle: debounce, staleness and the single visible result set.
//!
//! The coordinator is owned by the UI loop and advanced through
//! [`QueryCoordinator::poll_at`]. It exclusively owns the latest query
//! identifier and the visible [`ResultSet`]; views only observe them through
//! [`ResultsView`] callbacks.
//!
//! Replies may arrive in any order. A reply is accepted only if it belongs to
//! the most recently dispatched query, so the visible state only ever moves
//! forward.

mod query;
mod view;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use serde_json::{Value, json};

pub use query::Query;
pub use view::{ResultsView, SearchStatus};

use self::query::{Debouncer, truncate_chars};
use crate::bridge::{BridgeClient, CallCompletion, CallOutcome, RequestId};
use crate::error::SearchError;
use crate::protocol::{
	self, CORPUS_CHANGED_TOPIC, SEARCH_CANCEL_TOPIC, SEARCH_COMMAND, SNAPSHOT_COMMAND,
	SearchRequest,
};
use crate::search_pipeline::{
	CorpusEntry, QueryId, ResultSet, SearchScope, matcher, rank_candidates, rank_scoped,
};
use crate::tuning::{RankingPlacement, SearchTuning};

/// Corpus cached on the UI side when ranking locally.
#[derive(Default)]
struct LocalCorpus {
	snapshot: Option<Vec<CorpusEntry>>,
	request: Option<RequestId>,
	narrowing: Option<Narrowing>,
}

/// Matches of the previous local query, reused when the next pattern extends it.
struct Narrowing {
	folded: String,
	scope: SearchScope,
	indices: Vec<usize>,
}

/// Turns keystrokes into at most one live result set.
pub struct QueryCoordinator {
	bridge: BridgeClient,
	tuning: SearchTuning,
	view: Option<Box<dyn ResultsView>>,
	text: String,
	scope: SearchScope,
	debouncer: Debouncer,
	next_query_id: u64,
	latest: Option<Query>,
	in_flight: HashMap<RequestId, QueryId>,
	current: ResultSet,
	status: SearchStatus,
	local: LocalCorpus,
	corpus_changed: Rc<Cell<bool>>,
}

impl QueryCoordinator {
	pub fn new(mut bridge: BridgeClient, tuning: SearchTuning) -> Self {
		let corpus_changed = Rc::new(Cell::new(false));
		let flag = Rc::clone(&corpus_changed);
		bridge.subscribe(CORPUS_CHANGED_TOPIC, move |_| flag.set(true));

		Self {
			debouncer: Debouncer::new(tuning.debounce()),
			bridge,
			tuning,
			view: None,
			text: String::new(),
			scope: SearchScope::All,
			next_query_id: 0,
			latest: None,
			in_flight: HashMap::new(),
			current: ResultSet::empty(),
			status: SearchStatus::Idle,
			local: LocalCorpus::default(),
			corpus_changed,
		}
	}

	#[must_use]
	pub fn with_view(mut self, view: impl ResultsView + 'static) -> Self {
		self.set_view(view);
		self
	}

	pub fn set_view(&mut self, view: impl ResultsView + 'static) {
		self.view = Some(Box::new(view));
	}

	/// Start in `scope` without dispatching anything.
	#[must_use]
	pub fn with_scope(mut self, scope: SearchScope) -> Self {
		self.scope = scope;
		self
	}

	#[must_use]
	pub fn tuning(&self) -> &SearchTuning {
		&self.tuning
	}

	/// The latest submitted text, after truncation.
	#[must_use]
	pub fn text(&self) -> &str {
		&self.text
	}

	#[must_use]
	pub fn scope(&self) -> SearchScope {
		self.scope
	}

	/// The latest accepted result set. Empty until the first query completes.
	#[must_use]
	pub fn current_results(&self) -> &ResultSet {
		&self.current
	}

	#[must_use]
	pub fn status(&self) -> &SearchStatus {
		&self.status
	}

	/// The most recently dispatched query.
	#[must_use]
	pub fn latest_query(&self) -> Option<&Query> {
		self.latest.as_ref()
	}

	/// Whether a keystroke is waiting for the debounce interval to pass.
	#[must_use]
	pub fn has_pending_input(&self) -> bool {
		self.debouncer.is_armed()
	}

	/// No pending input and no query waiting for results.
	#[must_use]
	pub fn is_settled(&self) -> bool {
		!self.has_pending_input() && !self.status.is_searching()
	}

	#[must_use]
	pub fn bridge(&self) -> &BridgeClient {
		&self.bridge
	}

	pub fn bridge_mut(&mut self) -> &mut BridgeClient {
		&mut self.bridge
	}

	/// Record new input text. Never blocks and never fails.
	pub fn submit_text(&mut self, text: &str) {
		self.submit_text_at(text, Instant::now());
	}

	pub fn submit_text_at(&mut self, text: &str, now: Instant) {
		self.text = truncate_chars(text, self.tuning.max_pattern_chars).to_string();
		if self.tuning.debounce_ms == 0 {
			self.debouncer.cancel();
			self.dispatch(now);
		} else {
			self.debouncer.arm(now);
		}
	}

	/// Switch scope and search again with the current text right away.
	pub fn set_scope(&mut self, scope: SearchScope) {
		self.set_scope_at(scope, Instant::now());
	}

	pub fn set_scope_at(&mut self, scope: SearchScope, now: Instant) {
		if self.scope == scope {
			return;
		}
		self.scope = scope;
		self.debouncer.cancel();
		self.dispatch(now);
	}

	/// Dispatch a debounced keystroke without waiting for the quiet interval.
	pub fn flush(&mut self) {
		self.flush_at(Instant::now());
	}

	pub fn flush_at(&mut self, now: Instant) {
		if self.debouncer.cancel() {
			self.dispatch(now);
		}
	}

	/// Advance timers and consume whatever the bridge delivered.
	pub fn poll(&mut self) {
		self.poll_at(Instant::now());
	}

	pub fn poll_at(&mut self, now: Instant) {
		for completion in self.bridge.pump_at(now) {
			self.handle_completion(completion);
		}

		if self.corpus_changed.replace(false) {
			self.handle_corpus_changed(now);
		}

		if self.debouncer.fire(now) {
			self.dispatch(now);
		}
	}

	fn dispatch(&mut self, now: Instant) {
		self.next_query_id += 1;
		let query = Query {
			id: QueryId(self.next_query_id),
			pattern: self.text.clone(),
			scope: self.scope,
			created_at: now,
		};
		self.cancel_in_flight();

		log::debug!("dispatching {} '{}' ({:?})", query.id, query.pattern, query.scope);
		let query_id = query.id;
		self.latest = Some(query);
		self.set_status(SearchStatus::Searching { query_id });

		match self.tuning.placement {
			RankingPlacement::Backend => self.dispatch_to_backend(now),
			RankingPlacement::Local => self.dispatch_locally(now),
		}
	}

	/// Best-effort cancellation of superseded searches.
	fn cancel_in_flight(&mut self) {
		let superseded: Vec<(RequestId, QueryId)> = self.in_flight.drain().collect();
		for (request, query_id) in superseded {
			if !self.bridge.abandon(request) {
				continue;
			}
			log::trace!("cancelling {query_id} (call {request})");
			if let Err(err) = self
				.bridge
				.publish(SEARCH_CANCEL_TOPIC, json!({ "id": request }))
			{
				log::debug!("could not publish cancellation for {request}: {err}");
			}
		}
	}

	fn dispatch_to_backend(&mut self, now: Instant) {
		let Some(query) = self.latest.as_ref() else {
			return;
		};
		let query_id = query.id;
		let request = SearchRequest {
			pattern: query.pattern.clone(),
			scope: query.scope,
			limit: self.tuning.result_cap,
		};

		let sent = serde_json::to_value(&request)
			.map_err(|err| err.to_string())
			.and_then(|payload| {
				self.bridge
					.call_at(SEARCH_COMMAND, payload, now)
					.map_err(|err| err.to_string())
			});
		match sent {
			Ok(call) => {
				self.in_flight.insert(call, query_id);
			}
			Err(message) => self.fail(
				query_id,
				SearchError::BridgeFailure {
					pattern: request.pattern,
					message,
				},
			),
		}
	}

	fn dispatch_locally(&mut self, now: Instant) {
		if self.local.snapshot.is_some() {
			self.rank_locally();
			return;
		}
		if self.local.request.is_some() {
			// The snapshot on its way will be ranked against the latest query.
			return;
		}

		match self.bridge.call_at(SNAPSHOT_COMMAND, Value::Null, now) {
			Ok(call) => self.local.request = Some(call),
			Err(err) => {
				let (query_id, pattern) = self.latest_identity();
				self.fail(
					query_id,
					SearchError::BridgeFailure {
						pattern,
						message: err.to_string(),
					},
				);
			}
		}
	}

	fn rank_locally(&mut self) {
		let Some(query) = self.latest.clone() else {
			return;
		};
		let Some(snapshot) = self.local.snapshot.as_deref() else {
			return;
		};

		let cap = self.tuning.result_cap;
		let folded = matcher::fold_pattern(&query.pattern);
		let mut ranked = match &self.local.narrowing {
			Some(previous) if previous.scope == query.scope && folded.starts_with(&previous.folded) => {
				log::trace!(
					"narrowing {} within {} previous matches",
					query.id,
					previous.indices.len()
				);
				rank_candidates(
					&query.pattern,
					query.scope,
					snapshot,
					previous.indices.iter().copied(),
					cap,
				)
			}
			_ => rank_scoped(&query.pattern, query.scope, snapshot, cap),
		};

		self.local.narrowing = Some(Narrowing {
			folded,
			scope: query.scope,
			indices: std::mem::take(&mut ranked.matched_indices),
		});
		self.accept(ranked.into_result_set(query.id, query.pattern));
	}

	fn handle_completion(&mut self, completion: CallCompletion) {
		if self.local.request == Some(completion.id) {
			self.local.request = None;
			self.handle_snapshot(completion.outcome);
			return;
		}

		let Some(query_id) = self.in_flight.remove(&completion.id) else {
			log::trace!("ignoring completion of untracked call {}", completion.id);
			return;
		};
		if !self.matches_latest(query_id) {
			log::trace!("dropping stale reply for {query_id}");
			return;
		}

		let (_, pattern) = self.latest_identity();
		match completion.outcome {
			CallOutcome::Resolved(value) => match protocol::decode_search_reply(&value) {
				Ok(mut reply) => {
					reply.results.truncate(self.tuning.result_cap);
					self.accept(ResultSet {
						query_id,
						pattern,
						results: reply.results,
						total_matches: reply.total_matches,
					});
				}
				Err(err) => self.fail(query_id, err),
			},
			CallOutcome::Failed(message) => {
				self.fail(query_id, SearchError::BridgeFailure { pattern, message });
			}
			CallOutcome::TimedOut => self.fail(query_id, SearchError::BridgeTimeout { pattern }),
		}
	}

	fn handle_snapshot(&mut self, outcome: CallOutcome) {
		let (query_id, pattern) = self.latest_identity();
		match outcome {
			CallOutcome::Resolved(value) => match protocol::decode_snapshot_reply(&value) {
				Ok(reply) => {
					log::info!("received corpus snapshot of {} entries", reply.entries.len());
					self.local.snapshot = Some(reply.entries);
					self.local.narrowing = None;
					if self.status.is_searching() {
						self.rank_locally();
					}
				}
				Err(err) => self.fail(query_id, err),
			},
			CallOutcome::Failed(message) => {
				self.fail(query_id, SearchError::BridgeFailure { pattern, message });
			}
			CallOutcome::TimedOut => self.fail(query_id, SearchError::BridgeTimeout { pattern }),
		}
	}

	fn handle_corpus_changed(&mut self, now: Instant) {
		log::info!("backend corpus changed");
		self.local.snapshot = None;
		self.local.narrowing = None;
		if let Some(request) = self.local.request.take() {
			self.bridge.abandon(request);
		}

		if self.latest.is_some() && !self.debouncer.is_armed() {
			self.dispatch(now);
		}
	}

	fn matches_latest(&self, query_id: QueryId) -> bool {
		self.latest.as_ref().map(|query| query.id) == Some(query_id)
	}

	fn latest_identity(&self) -> (QueryId, String) {
		self.latest
			.as_ref()
			.map(|query| (query.id, query.pattern.clone()))
			.unwrap_or_default()
	}

	fn accept(&mut self, results: ResultSet) {
		log::debug!(
			"showing {} for '{}': {} of {} matches",
			results.query_id,
			results.pattern,
			results.len(),
			results.total_matches
		);
		let query_id = results.query_id;
		self.current = results;
		if let Some(view) = self.view.as_mut() {
			view.results_changed(&self.current);
		}
		self.set_status(SearchStatus::Ready { query_id });
	}

	fn fail(&mut self, query_id: QueryId, error: SearchError) {
		if !self.matches_latest(query_id) {
			return;
		}
		log::warn!("{query_id}: {error}");
		self.set_status(SearchStatus::Unavailable { query_id, error });
	}

	fn set_status(&mut self, status: SearchStatus) {
		if self.status == status {
			return;
		}
		self.status = status;
		if let Some(view) = self.view.as_mut() {
			view.status_changed(&self.status);
		}
	}
}
