//! Typed client for the command/event bridge.
//!
//! The bridge offers two primitives across the process boundary: a
//! request/response `call` correlated by [`RequestId`], and publish/subscribe
//! topics. Everything is driven from the owner's loop through
//! [`BridgeClient::pump_at`]; nothing here blocks.
//!
//! Each call moves through `Pending -> {Resolved, Failed, TimedOut}` and every
//! terminal state is final. There are no retries at this layer.

mod envelope;
mod error;
mod transport;
mod wire;

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use serde_json::Value;

pub use envelope::{BridgeEnvelope, Reply, RequestId};
pub use error::BridgeError;
pub use transport::{ChannelTransport, Transport};
pub use wire::LineTransport;

/// How long a call may stay unanswered before it resolves to
/// [`CallOutcome::TimedOut`].
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(3);

type EventHandler = Box<dyn FnMut(&Value)>;

/// Terminal state of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
	Resolved(Value),
	Failed(String),
	TimedOut,
}

/// A call that reached a terminal state during a pump.
#[derive(Debug, Clone, PartialEq)]
pub struct CallCompletion {
	pub id: RequestId,
	pub command: String,
	pub outcome: CallOutcome,
}

/// Handle returned by [`BridgeClient::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
	topic: String,
	id: u64,
}

struct PendingCall {
	command: String,
	deadline: Instant,
}

/// UI-side end of the bridge.
pub struct BridgeClient {
	transport: Box<dyn Transport>,
	call_timeout: Duration,
	next_request_id: u64,
	pending: BTreeMap<RequestId, PendingCall>,
	next_subscription_id: u64,
	subscriptions: HashMap<String, Vec<(u64, EventHandler)>>,
	connected: bool,
}

impl BridgeClient {
	pub fn new(transport: impl Transport + 'static) -> Self {
		Self::with_timeout(transport, DEFAULT_CALL_TIMEOUT)
	}

	pub fn with_timeout(transport: impl Transport + 'static, call_timeout: Duration) -> Self {
		Self {
			transport: Box::new(transport),
			call_timeout,
			next_request_id: 0,
			pending: BTreeMap::new(),
			next_subscription_id: 0,
			subscriptions: HashMap::new(),
			connected: true,
		}
	}

	#[must_use]
	pub fn call_timeout(&self) -> Duration {
		self.call_timeout
	}

	/// Whether the transport is still usable.
	#[must_use]
	pub fn is_connected(&self) -> bool {
		self.connected
	}

	/// Whether `id` is still waiting for a reply.
	#[must_use]
	pub fn is_pending(&self, id: RequestId) -> bool {
		self.pending.contains_key(&id)
	}

	#[must_use]
	pub fn pending_calls(&self) -> usize {
		self.pending.len()
	}

	/// Issue a call. The reply surfaces from a later pump.
	pub fn call(&mut self, command: &str, payload: Value) -> Result<RequestId, BridgeError> {
		self.call_at(command, payload, Instant::now())
	}

	/// Issue a call whose timeout is measured from `now`.
	pub fn call_at(
		&mut self,
		command: &str,
		payload: Value,
		now: Instant,
	) -> Result<RequestId, BridgeError> {
		if !self.connected {
			return Err(BridgeError::Disconnected);
		}

		self.next_request_id = self.next_request_id.saturating_add(1);
		let id = RequestId(self.next_request_id);
		if let Err(err) = self
			.transport
			.send(BridgeEnvelope::request(id, command, payload))
		{
			self.note_send_error(&err);
			return Err(err);
		}

		log::trace!("bridge call {id} `{command}` dispatched");
		self.pending.insert(
			id,
			PendingCall {
				command: command.to_string(),
				deadline: now + self.call_timeout,
			},
		);
		Ok(id)
	}

	/// Stop waiting for `id`. A reply that still arrives is dropped.
	///
	/// Returns whether the call was pending.
	pub fn abandon(&mut self, id: RequestId) -> bool {
		let removed = self.pending.remove(&id).is_some();
		if removed {
			log::trace!("bridge call {id} abandoned");
		}
		removed
	}

	/// Send a fire-and-forget notification.
	pub fn publish(&mut self, topic: &str, payload: Value) -> Result<(), BridgeError> {
		if !self.connected {
			return Err(BridgeError::Disconnected);
		}
		let result = self.transport.send(BridgeEnvelope::event(topic, payload));
		if let Err(err) = &result {
			self.note_send_error(err);
		}
		result
	}

	/// Invoke `handler` for every event published on `topic` from now on, in
	/// the order the peer published them.
	pub fn subscribe(
		&mut self,
		topic: &str,
		handler: impl FnMut(&Value) + 'static,
	) -> Subscription {
		self.next_subscription_id += 1;
		let id = self.next_subscription_id;
		self.subscriptions
			.entry(topic.to_string())
			.or_default()
			.push((id, Box::new(handler)));
		Subscription {
			topic: topic.to_string(),
			id,
		}
	}

	/// Stop delivering events to a subscription. Unsubscribing twice is a
	/// no-op; returns whether the subscription was active.
	pub fn unsubscribe(&mut self, subscription: &Subscription) -> bool {
		let Some(handlers) = self.subscriptions.get_mut(&subscription.topic) else {
			return false;
		};
		let before = handlers.len();
		handlers.retain(|(id, _)| *id != subscription.id);
		let removed = handlers.len() != before;
		if handlers.is_empty() {
			self.subscriptions.remove(&subscription.topic);
		}
		removed
	}

	/// Drain inbound envelopes, run event handlers and expire overdue calls.
	pub fn pump(&mut self) -> Vec<CallCompletion> {
		self.pump_at(Instant::now())
	}

	/// Like [`pump`](Self::pump) with an explicit clock.
	pub fn pump_at(&mut self, now: Instant) -> Vec<CallCompletion> {
		let mut completions = Vec::new();

		while self.connected {
			match self.transport.try_recv() {
				Ok(Some(envelope)) => self.handle_envelope(envelope, &mut completions),
				Ok(None) => break,
				Err(BridgeError::Disconnected) => {
					log::warn!("bridge disconnected with {} call(s) pending", self.pending.len());
					self.connected = false;
					self.fail_all_pending("bridge disconnected", &mut completions);
				}
				Err(err) => log::warn!("discarding unreadable bridge message: {err}"),
			}
		}

		self.expire_overdue(now, &mut completions);
		completions
	}

	fn handle_envelope(&mut self, envelope: BridgeEnvelope, completions: &mut Vec<CallCompletion>) {
		match envelope {
			BridgeEnvelope::Response { id, reply } => {
				let Some(call) = self.pending.remove(&id) else {
					log::trace!("dropping reply for settled or abandoned call {id}");
					return;
				};
				let outcome = match reply {
					Reply::Ok { value } => CallOutcome::Resolved(value),
					Reply::Err { message } => CallOutcome::Failed(message),
				};
				completions.push(CallCompletion {
					id,
					command: call.command,
					outcome,
				});
			}
			BridgeEnvelope::Event { topic, payload } => {
				log::trace!("bridge event `{topic}`");
				if let Some(handlers) = self.subscriptions.get_mut(&topic) {
					for (_, handler) in handlers.iter_mut() {
						handler(&payload);
					}
				}
			}
			BridgeEnvelope::Request { id, command, .. } => {
				log::debug!("ignoring peer request {id} `{command}`: client does not serve commands");
			}
		}
	}

	fn expire_overdue(&mut self, now: Instant, completions: &mut Vec<CallCompletion>) {
		let overdue: Vec<RequestId> = self
			.pending
			.iter()
			.filter(|(_, call)| call.deadline <= now)
			.map(|(id, _)| *id)
			.collect();
		for id in overdue {
			if let Some(call) = self.pending.remove(&id) {
				log::debug!("bridge call {id} `{}` timed out", call.command);
				completions.push(CallCompletion {
					id,
					command: call.command,
					outcome: CallOutcome::TimedOut,
				});
			}
		}
	}

	fn fail_all_pending(&mut self, message: &str, completions: &mut Vec<CallCompletion>) {
		for (id, call) in std::mem::take(&mut self.pending) {
			completions.push(CallCompletion {
				id,
				command: call.command,
				outcome: CallOutcome::Failed(message.to_string()),
			});
		}
	}

	fn note_send_error(&mut self, err: &BridgeError) {
		if matches!(err, BridgeError::Disconnected) {
			self.connected = false;
		}
		log::warn!("bridge send failed: {err}");
	}
}
