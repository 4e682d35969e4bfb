//! Core crate for incremental fuzzy search across a command/event bridge.
//!
//! The root module re-exports the types embedders need to wire a view to a
//! backend: the [`QueryCoordinator`] on the UI side, the [`BackendService`]
//! on the other, and the [`BridgeClient`] between them.

pub mod backend;
pub mod bridge;
pub mod coordinator;
pub mod error;
pub mod protocol;
pub mod search_pipeline;
pub mod tuning;

pub use crate::backend::BackendService;
pub use crate::bridge::{BridgeClient, BridgeError, ChannelTransport, LineTransport, Transport};
pub use crate::coordinator::{QueryCoordinator, ResultsView, SearchStatus};
pub use crate::error::SearchError;
pub use crate::search_pipeline::{
	CorpusEntry, EntryKind, MatchResult, QueryId, ResultSet, SearchScope,
};
pub use crate::tuning::{RankingPlacement, SearchTuning};
