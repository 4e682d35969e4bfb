use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::envelope::BridgeEnvelope;
use super::error::BridgeError;

/// Moves envelopes across the process boundary.
///
/// The encoding is the transport's business; callers only see envelopes.
/// `try_recv` never blocks, which is what the UI side uses. The backend side
/// parks in `recv`.
pub trait Transport: Send {
	/// Queue an envelope for the peer.
	fn send(&mut self, envelope: BridgeEnvelope) -> Result<(), BridgeError>;

	/// Return the next inbound envelope, if one is ready.
	fn try_recv(&mut self) -> Result<Option<BridgeEnvelope>, BridgeError>;

	/// Block until the next inbound envelope arrives.
	fn recv(&mut self) -> Result<BridgeEnvelope, BridgeError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
	fn send(&mut self, envelope: BridgeEnvelope) -> Result<(), BridgeError> {
		(**self).send(envelope)
	}

	fn try_recv(&mut self) -> Result<Option<BridgeEnvelope>, BridgeError> {
		(**self).try_recv()
	}

	fn recv(&mut self) -> Result<BridgeEnvelope, BridgeError> {
		(**self).recv()
	}
}

/// In-process transport backed by a pair of [`mpsc`] channels.
pub struct ChannelTransport {
	tx: Sender<BridgeEnvelope>,
	rx: Receiver<BridgeEnvelope>,
}

impl ChannelTransport {
	/// Create two connected ends: whatever one sends, the other receives.
	#[must_use]
	pub fn pair() -> (Self, Self) {
		let (left_tx, right_rx) = mpsc::channel();
		let (right_tx, left_rx) = mpsc::channel();
		(
			Self {
				tx: left_tx,
				rx: left_rx,
			},
			Self {
				tx: right_tx,
				rx: right_rx,
			},
		)
	}
}

impl Transport for ChannelTransport {
	fn send(&mut self, envelope: BridgeEnvelope) -> Result<(), BridgeError> {
		self.tx
			.send(envelope)
			.map_err(|_| BridgeError::Disconnected)
	}

	fn try_recv(&mut self) -> Result<Option<BridgeEnvelope>, BridgeError> {
		match self.rx.try_recv() {
			Ok(envelope) => Ok(Some(envelope)),
			Err(TryRecvError::Empty) => Ok(None),
			Err(TryRecvError::Disconnected) => Err(BridgeError::Disconnected),
		}
	}

	fn recv(&mut self) -> Result<BridgeEnvelope, BridgeError> {
		self.rx.recv().map_err(|_| BridgeError::Disconnected)
	}
}
