//! Newline-delimited JSON transport for bridges that cross a real process
//! boundary (a child's stdio, a socket, ...).

use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::Child;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use super::envelope::BridgeEnvelope;
use super::error::BridgeError;
use super::transport::Transport;

type Inbound = Result<BridgeEnvelope, BridgeError>;

/// Writes one JSON envelope per line and decodes inbound lines on a reader
/// thread, so `try_recv` never blocks on I/O.
pub struct LineTransport {
	writer: Box<dyn Write + Send>,
	rx: Receiver<Inbound>,
}

impl LineTransport {
	pub fn new<R, W>(reader: R, writer: W) -> Self
	where
		R: Read + Send + 'static,
		W: Write + Send + 'static,
	{
		let (tx, rx) = mpsc::channel();
		thread::spawn(move || read_lines(BufReader::new(reader), tx));
		Self {
			writer: Box::new(writer),
			rx,
		}
	}

	/// Talk to the peer over this process's stdin and stdout.
	#[must_use]
	pub fn stdio() -> Self {
		Self::new(io::stdin(), io::stdout())
	}

	/// Talk to a child process spawned with piped stdin and stdout.
	pub fn from_child(child: &mut Child) -> Result<Self, BridgeError> {
		let stdin = child.stdin.take().ok_or(BridgeError::Disconnected)?;
		let stdout = child.stdout.take().ok_or(BridgeError::Disconnected)?;
		Ok(Self::new(stdout, stdin))
	}
}

/// Forward every inbound line until EOF or a read error. Lines that are not
/// a valid envelope, including invalid UTF-8, are reported and skipped.
fn read_lines(mut reader: impl BufRead, tx: Sender<Inbound>) {
	let mut line = Vec::new();
	loop {
		line.clear();
		match reader.read_until(b'\n', &mut line) {
			Ok(0) => break,
			Ok(_) => {}
			Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
			Err(err) => {
				let _ = tx.send(Err(BridgeError::Io(err)));
				break;
			}
		}
		if line.trim_ascii().is_empty() {
			continue;
		}
		let decoded = serde_json::from_slice::<BridgeEnvelope>(&line).map_err(|source| {
			BridgeError::Decode {
				line: String::from_utf8_lossy(line.trim_ascii_end()).into_owned(),
				source,
			}
		});
		if tx.send(decoded).is_err() {
			break;
		}
	}
}

fn write_error(err: io::Error) -> BridgeError {
	match err.kind() {
		io::ErrorKind::BrokenPipe => BridgeError::Disconnected,
		_ => BridgeError::Io(err),
	}
}

impl Transport for LineTransport {
	fn send(&mut self, envelope: BridgeEnvelope) -> Result<(), BridgeError> {
		serde_json::to_writer(&mut self.writer, &envelope).map_err(|err| {
			if err.is_io() {
				BridgeError::Disconnected
			} else {
				BridgeError::Encode(err)
			}
		})?;
		self.writer.write_all(b"\n").map_err(write_error)?;
		self.writer.flush().map_err(write_error)
	}

	fn try_recv(&mut self) -> Result<Option<BridgeEnvelope>, BridgeError> {
		match self.rx.try_recv() {
			Ok(inbound) => inbound.map(Some),
			Err(TryRecvError::Empty) => Ok(None),
			Err(TryRecvError::Disconnected) => Err(BridgeError::Disconnected),
		}
	}

	fn recv(&mut self) -> Result<BridgeEnvelope, BridgeError> {
		match self.rx.recv() {
			Ok(inbound) => inbound,
			Err(_) => Err(BridgeError::Disconnected),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;
	use std::sync::{Arc, Mutex};

	use serde_json::{Value, json};

	use super::*;
	use crate::bridge::RequestId;

	#[derive(Clone, Default)]
	struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

	impl Write for SharedBuffer {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			self.0.lock().unwrap().extend_from_slice(buf);
			Ok(buf.len())
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn writes_one_envelope_per_line() {
		let buffer = SharedBuffer::default();
		let mut transport = LineTransport::new(Cursor::new(Vec::new()), buffer.clone());
		transport
			.send(BridgeEnvelope::request(RequestId(1), "snapshot", Value::Null))
			.unwrap();
		transport
			.send(BridgeEnvelope::event("search.cancel", json!({ "id": 1 })))
			.unwrap();

		let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
		let lines: Vec<&str> = written.lines().collect();
		assert_eq!(lines.len(), 2);
		let first: BridgeEnvelope = serde_json::from_str(lines[0]).unwrap();
		assert_eq!(
			first,
			BridgeEnvelope::request(RequestId(1), "snapshot", Value::Null)
		);
	}

	#[test]
	fn decodes_lines_and_reports_garbage() {
		let input = concat!(
			"{\"type\":\"event\",\"topic\":\"corpus.changed\",\"payload\":{\"len\":2}}\n",
			"\n",
			"not json\n",
			"{\"type\":\"response\",\"id\":4,\"reply\":{\"status\":\"ok\",\"value\":1}}\n",
		);
		let mut transport = LineTransport::new(Cursor::new(input.as_bytes().to_vec()), io::sink());

		assert_eq!(
			transport.recv().unwrap(),
			BridgeEnvelope::event("corpus.changed", json!({ "len": 2 }))
		);
		assert!(matches!(
			transport.recv(),
			Err(BridgeError::Decode { ref line, .. }) if line == "not json"
		));
		assert_eq!(
			transport.recv().unwrap(),
			BridgeEnvelope::resolved(RequestId(4), json!(1))
		);
		assert!(matches!(transport.recv(), Err(BridgeError::Disconnected)));
	}

	#[test]
	fn invalid_utf8_does_not_end_the_stream() {
		let mut input = b"\xff\xfe garbage\n".to_vec();
		input.extend_from_slice(
			b"{\"type\":\"event\",\"topic\":\"corpus.changed\",\"payload\":{\"len\":1}}\n",
		);
		let mut transport = LineTransport::new(Cursor::new(input), io::sink());

		assert!(matches!(
			transport.recv(),
			Err(BridgeError::Decode { ref line, .. }) if line.ends_with(" garbage")
		));
		assert_eq!(
			transport.recv().unwrap(),
			BridgeEnvelope::event("corpus.changed", json!({ "len": 1 }))
		);
		assert!(matches!(transport.recv(), Err(BridgeError::Disconnected)));
	}
}
