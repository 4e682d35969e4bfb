use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Correlation identifier linking a response to the request that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Message crossing the bridge in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEnvelope {
	/// Invoke a named command; answered by exactly one [`BridgeEnvelope::Response`].
	Request {
		id: RequestId,
		command: String,
		#[serde(default)]
		payload: Value,
	},
	/// Answer to an earlier request.
	Response { id: RequestId, reply: Reply },
	/// Fire-and-forget notification on a topic.
	Event {
		topic: String,
		#[serde(default)]
		payload: Value,
	},
}

impl BridgeEnvelope {
	pub fn request(id: RequestId, command: impl Into<String>, payload: Value) -> Self {
		Self::Request {
			id,
			command: command.into(),
			payload,
		}
	}

	pub fn resolved(id: RequestId, value: Value) -> Self {
		Self::Response {
			id,
			reply: Reply::Ok { value },
		}
	}

	pub fn failed(id: RequestId, message: impl Into<String>) -> Self {
		Self::Response {
			id,
			reply: Reply::Err {
				message: message.into(),
			},
		}
	}

	pub fn event(topic: impl Into<String>, payload: Value) -> Self {
		Self::Event {
			topic: topic.into(),
			payload,
		}
	}
}

/// Outcome carried by a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
	Ok {
		#[serde(default)]
		value: Value,
	},
	Err { message: String },
}
