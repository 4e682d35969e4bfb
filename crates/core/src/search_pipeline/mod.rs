//! Search pipeline: per-entry matching and result aggregation.
//!
//! Both halves are pure. The matcher scores one entry; the aggregator filters
//! a corpus snapshot through it, orders the survivors deterministically and
//! bounds the list to the render cap. They are kept apart from the query
//! coordinator so ranking can run on either side of the bridge.

pub mod aggregator;
mod entry;
pub mod matcher;
mod results;

pub use aggregator::{RankedMatches, rank, rank_candidates, rank_scoped};
pub use entry::{CorpusEntry, EntryKind, SearchScope};
pub use matcher::{MatchScore, NEUTRAL_SCORE, PatternScorer};
pub use results::{MatchResult, QueryId, ResultSet};

/// Default maximum number of results handed to the view.
pub const MAX_RENDERED_RESULTS: usize = 100;
