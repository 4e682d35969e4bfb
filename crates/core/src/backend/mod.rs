//! Backend side of the bridge: owns the corpus and answers search commands.

use std::collections::HashSet;
use std::thread;

use serde_json::Value;

use crate::bridge::{BridgeEnvelope, BridgeError, RequestId, Transport};
use crate::protocol::{
	self, CORPUS_CHANGED_TOPIC, CORPUS_REPLACE_TOPIC, CorpusChanged, SEARCH_CANCEL_TOPIC,
	SEARCH_COMMAND, SNAPSHOT_COMMAND, SearchCancel, SearchReply, SearchRequest, SnapshotReply,
};
use crate::search_pipeline::{CorpusEntry, rank_scoped};

/// Upper bound on the `limit` a search request may ask for.
pub const MAX_LIMIT: usize = 10_000;

/// Serves one bridge connection until the peer disconnects.
pub struct BackendService<T> {
	corpus: Vec<CorpusEntry>,
	transport: T,
}

impl<T: Transport> BackendService<T> {
	pub fn new(corpus: Vec<CorpusEntry>, transport: T) -> Self {
		Self { corpus, transport }
	}

	/// Run the service on its own thread.
	pub fn spawn(self) -> thread::JoinHandle<()>
	where
		T: 'static,
	{
		thread::spawn(move || self.serve())
	}

	/// Answer requests until the transport disconnects.
	///
	/// Everything already queued is handled as one batch, so a
	/// `search.cancel` that arrives behind its request still suppresses it.
	pub fn serve(mut self) {
		log::info!("backend serving {} entries", self.corpus.len());

		while let Some(batch) = self.next_batch() {
			if !self.handle_batch(batch) {
				break;
			}
		}

		log::info!("backend stopped");
	}

	fn next_batch(&mut self) -> Option<Vec<BridgeEnvelope>> {
		let first = loop {
			match self.transport.recv() {
				Ok(envelope) => break envelope,
				Err(BridgeError::Disconnected) => return None,
				Err(err) => log::warn!("discarding unreadable message: {err}"),
			}
		};

		let mut batch = vec![first];
		loop {
			match self.transport.try_recv() {
				Ok(Some(envelope)) => batch.push(envelope),
				Ok(None) | Err(BridgeError::Disconnected) => break,
				Err(err) => log::warn!("discarding unreadable message: {err}"),
			}
		}
		Some(batch)
	}

	/// Returns false once replies can no longer be delivered.
	fn handle_batch(&mut self, batch: Vec<BridgeEnvelope>) -> bool {
		let cancelled: HashSet<RequestId> = batch.iter().filter_map(cancelled_request).collect();

		for envelope in batch {
			let outcome = match envelope {
				BridgeEnvelope::Request {
					id,
					command,
					payload,
				} => {
					if cancelled.contains(&id) {
						log::trace!("skipping cancelled request {id}");
						continue;
					}
					let reply = match self.handle_command(&command, payload) {
						Ok(value) => BridgeEnvelope::resolved(id, value),
						Err(message) => {
							log::debug!("request {id} `{command}` failed: {message}");
							BridgeEnvelope::failed(id, message)
						}
					};
					self.transport.send(reply)
				}
				BridgeEnvelope::Event { topic, payload } => self.handle_event(&topic, &payload),
				BridgeEnvelope::Response { id, .. } => {
					log::debug!("ignoring unexpected response {id}");
					Ok(())
				}
			};

			match outcome {
				Ok(()) => {}
				Err(BridgeError::Disconnected) => return false,
				Err(err) => log::warn!("failed to answer peer: {err}"),
			}
		}
		true
	}

	fn handle_command(&self, command: &str, payload: Value) -> Result<Value, String> {
		match command {
			SEARCH_COMMAND => {
				let request: SearchRequest = serde_json::from_value(payload)
					.map_err(|err| format!("invalid search request: {err}"))?;
				let limit = request.limit.min(MAX_LIMIT);
				let ranked = rank_scoped(&request.pattern, request.scope, &self.corpus, limit);
				log::debug!(
					"'{}' matched {} of {} entries",
					request.pattern,
					ranked.total_matches,
					self.corpus.len()
				);
				to_reply(&SearchReply {
					results: ranked.results,
					total_matches: ranked.total_matches,
				})
			}
			SNAPSHOT_COMMAND => to_reply(&SnapshotReply {
				entries: self.corpus.clone(),
			}),
			other => Err(format!("unknown command `{other}`")),
		}
	}

	fn handle_event(&mut self, topic: &str, payload: &Value) -> Result<(), BridgeError> {
		match topic {
			CORPUS_REPLACE_TOPIC => {
				let replace = match protocol::decode_corpus_replace(payload) {
					Ok(replace) => replace,
					Err(err) => {
						log::warn!("ignoring `{topic}`: {err}");
						return Ok(());
					}
				};
				self.corpus = replace.entries;
				log::info!("corpus replaced with {} entries", self.corpus.len());

				let changed = CorpusChanged {
					len: self.corpus.len(),
				};
				let payload = serde_json::to_value(changed).map_err(BridgeError::Encode)?;
				self.transport
					.send(BridgeEnvelope::event(CORPUS_CHANGED_TOPIC, payload))
			}
			// Consumed while batching.
			SEARCH_CANCEL_TOPIC => Ok(()),
			other => {
				log::trace!("ignoring event `{other}`");
				Ok(())
			}
		}
	}
}

fn cancelled_request(envelope: &BridgeEnvelope) -> Option<RequestId> {
	match envelope {
		BridgeEnvelope::Event { topic, payload } if topic == SEARCH_CANCEL_TOPIC => {
			serde_json::from_value::<SearchCancel>(payload.clone())
				.ok()
				.map(|cancel| cancel.id)
		}
		_ => None,
	}
}

fn to_reply(value: &impl serde::Serialize) -> Result<Value, String> {
	serde_json::to_value(value).map_err(|err| format!("failed to encode reply: {err}"))
}
