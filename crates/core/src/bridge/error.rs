use thiserror::Error;

/// Errors raised by bridge transports.
#[derive(Debug, Error)]
pub enum BridgeError {
	/// The other side of the bridge went away.
	#[error("bridge transport disconnected")]
	Disconnected,

	#[error("failed to encode bridge envelope: {0}")]
	Encode(#[source] serde_json::Error),

	/// A line received from the peer was not a valid envelope.
	#[error("failed to decode bridge envelope `{line}`: {source}")]
	Decode {
		line: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("bridge i/o failed: {0}")]
	Io(#[from] std::io::Error),
}
