use std::env;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use sift::build_corpus;
use sift_core::{
	BackendService, BridgeClient, ChannelTransport, LineTransport, QueryCoordinator, SearchScope,
	Transport,
};

use crate::cli::{CliArgs, QueryReport, SearchArgs, UpdateCounter};
use crate::settings::ResolvedConfig;

/// How often the host loop polls the coordinator while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(2);
/// Grace period on top of debounce and call timeout before giving up on a
/// query that never settles.
const SETTLE_MARGIN: Duration = Duration::from_secs(1);

/// The backend the coordinator talks to.
enum BackendHandle {
	Thread(JoinHandle<()>),
	Process(Child),
}

impl BackendHandle {
	fn shutdown(self) -> Result<()> {
		match self {
			Self::Thread(handle) => handle
				.join()
				.map_err(|_| anyhow!("backend thread panicked")),
			Self::Process(mut child) => {
				let status = child.wait().context("failed to wait for backend process")?;
				if !status.success() {
					log::warn!("backend process exited with {status}");
				}
				Ok(())
			}
		}
	}
}

/// Drives a [`QueryCoordinator`] the way an editor would: one keystroke at a
/// time, polling in between.
pub(crate) struct SearchWorkflow {
	coordinator: QueryCoordinator,
	counter: UpdateCounter,
	backend: BackendHandle,
	keystroke: Duration,
	settle_limit: Duration,
}

impl SearchWorkflow {
	pub(crate) fn start(cli: &CliArgs, args: &SearchArgs, config: &ResolvedConfig) -> Result<Self> {
		let (transport, backend) = if args.spawn_backend {
			spawn_backend_process(cli, config)?
		} else {
			spawn_backend_thread(config)?
		};

		let tuning = config.tuning.clone();
		let bridge = BridgeClient::with_timeout(transport, tuning.call_timeout());
		let settle_limit = tuning.debounce() + tuning.call_timeout() * 2 + SETTLE_MARGIN;
		let counter = UpdateCounter::default();
		let coordinator = QueryCoordinator::new(bridge, tuning)
			.with_scope(SearchScope::from(args.scope))
			.with_view(counter.clone());

		log::debug!(
			"search workflow started ({} placement)",
			coordinator.tuning().placement.as_str()
		);

		Ok(Self {
			coordinator,
			counter,
			backend,
			keystroke: Duration::from_millis(args.keystroke_ms),
			settle_limit,
		})
	}

	/// Type `query` character by character and wait for the view to settle.
	pub(crate) fn run_query(&mut self, query: &str) -> Result<QueryReport> {
		self.counter.take();

		if query.is_empty() {
			self.coordinator.submit_text("");
		}
		for (index, ch) in query.char_indices() {
			self.coordinator.submit_text(&query[..index + ch.len_utf8()]);
			self.idle(self.keystroke);
		}

		self.settle()?;
		Ok(QueryReport {
			query: query.to_string(),
			results: self.coordinator.current_results().clone(),
			status: self.coordinator.status().clone(),
			updates: self.counter.take(),
		})
	}

	/// Disconnect from the backend and wait for it to stop.
	pub(crate) fn finish(self) -> Result<()> {
		let Self {
			coordinator,
			backend,
			..
		} = self;
		drop(coordinator);
		backend.shutdown()
	}

	fn idle(&mut self, duration: Duration) {
		let until = Instant::now() + duration;
		loop {
			self.coordinator.poll();
			let now = Instant::now();
			if now >= until {
				break;
			}
			thread::sleep(POLL_INTERVAL.min(until - now));
		}
	}

	fn settle(&mut self) -> Result<()> {
		let deadline = Instant::now() + self.settle_limit;
		self.coordinator.poll();
		while !self.coordinator.is_settled() {
			if Instant::now() >= deadline {
				bail!("search did not settle within {:?}", self.settle_limit);
			}
			thread::sleep(POLL_INTERVAL);
			self.coordinator.poll();
		}
		Ok(())
	}
}

fn spawn_backend_thread(config: &ResolvedConfig) -> Result<(Box<dyn Transport>, BackendHandle)> {
	let corpus = build_corpus(&config.root, &config.index)?;
	let (client_end, backend_end) = ChannelTransport::pair();
	let handle = BackendService::new(corpus, backend_end).spawn();
	Ok((Box::new(client_end), BackendHandle::Thread(handle)))
}

/// Start `sift serve` with the resolved index settings and talk to it over
/// its stdio.
fn spawn_backend_process(
	cli: &CliArgs,
	config: &ResolvedConfig,
) -> Result<(Box<dyn Transport>, BackendHandle)> {
	let exe = env::current_exe().context("failed to locate the sift executable")?;
	let mut command = Command::new(exe);
	command
		.arg("serve")
		.arg("--no-config")
		.arg("--root")
		.arg(&config.root)
		.arg("--hidden")
		.arg(config.index.include_hidden.to_string())
		.arg("--follow-symlinks")
		.arg(config.index.follow_symlinks.to_string())
		.arg("--log-level")
		.arg(cli.log_level.as_str());
	if let Some(depth) = config.index.max_depth {
		command.arg("--max-depth").arg(depth.to_string());
	}
	command
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::inherit());

	let mut child = command
		.spawn()
		.context("failed to spawn the backend process")?;
	log::info!("spawned backend process {}", child.id());
	let transport = LineTransport::from_child(&mut child)?;
	Ok((Box::new(transport), BackendHandle::Process(child)))
}
