use std::cmp::{Ordering as CmpOrdering, Reverse};
use std::collections::BinaryHeap;

use super::entry::{CorpusEntry, SearchScope};
use super::matcher::{NEUTRAL_SCORE, PatternScorer};
use super::results::{MatchResult, QueryId, ResultSet};

/// Output of a ranking pass, before it is tagged with a query identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedMatches {
	/// The best matches in display order, at most `cap` long.
	pub results: Vec<MatchResult>,
	/// Number of entries that matched before truncation.
	pub total_matches: usize,
	/// Corpus indices of every match, in corpus order. A pattern that extends
	/// this one can only match within these.
	pub matched_indices: Vec<usize>,
}

impl RankedMatches {
	/// Tag the matches with the query that produced them.
	#[must_use]
	pub fn into_result_set(self, query_id: QueryId, pattern: impl Into<String>) -> ResultSet {
		ResultSet {
			query_id,
			pattern: pattern.into(),
			results: self.results,
			total_matches: self.total_matches,
		}
	}
}

/// Rank every entry of `corpus` against `pattern`.
#[must_use]
pub fn rank(pattern: &str, corpus: &[CorpusEntry], cap: usize) -> RankedMatches {
	rank_scoped(pattern, SearchScope::All, corpus, cap)
}

/// Rank the entries of `corpus` admitted by `scope`.
#[must_use]
pub fn rank_scoped(
	pattern: &str,
	scope: SearchScope,
	corpus: &[CorpusEntry],
	cap: usize,
) -> RankedMatches {
	rank_candidates(pattern, scope, corpus, 0..corpus.len(), cap)
}

/// Rank only the listed corpus indices.
///
/// `candidates` must be in ascending corpus order for the empty pattern to
/// preserve corpus order. Indices outside the corpus are skipped.
pub fn rank_candidates<I>(
	pattern: &str,
	scope: SearchScope,
	corpus: &[CorpusEntry],
	candidates: I,
	cap: usize,
) -> RankedMatches
where
	I: IntoIterator<Item = usize>,
{
	let admitted = candidates.into_iter().filter(|&index| {
		corpus
			.get(index)
			.is_some_and(|entry| scope.admits(entry.kind))
	});

	if pattern.is_empty() {
		return corpus_order(corpus, admitted, cap);
	}

	let mut scorer = PatternScorer::new(pattern);
	let mut aggregator = ScoreAggregator::new(cap);
	let mut matched_indices = Vec::new();
	for index in admitted {
		let entry = &corpus[index];
		if let Some(matched) = scorer.score(&entry.path) {
			matched_indices.push(index);
			aggregator.push(Ranked {
				score: matched.score,
				path: entry.path.as_str(),
				path_len: entry.path.chars().count(),
				index,
				positions: matched.positions,
			});
		}
	}

	let results = aggregator
		.finish()
		.into_iter()
		.map(|ranked| MatchResult {
			entry: corpus[ranked.index].clone(),
			score: ranked.score,
			positions: ranked.positions,
		})
		.collect();

	RankedMatches {
		results,
		total_matches: matched_indices.len(),
		matched_indices,
	}
}

fn corpus_order(
	corpus: &[CorpusEntry],
	admitted: impl Iterator<Item = usize>,
	cap: usize,
) -> RankedMatches {
	let matched_indices: Vec<usize> = admitted.collect();
	let results = matched_indices
		.iter()
		.take(cap)
		.map(|&index| MatchResult {
			entry: corpus[index].clone(),
			score: NEUTRAL_SCORE,
			positions: Vec::new(),
		})
		.collect();

	RankedMatches {
		results,
		total_matches: matched_indices.len(),
		matched_indices,
	}
}

/// A scored candidate. Ordering is "better is greater": higher score, then
/// shorter path, then lexically smaller path, then earlier corpus index.
struct Ranked<'a> {
	score: i64,
	path: &'a str,
	path_len: usize,
	index: usize,
	positions: Vec<usize>,
}

impl Ord for Ranked<'_> {
	fn cmp(&self, other: &Self) -> CmpOrdering {
		self.score
			.cmp(&other.score)
			.then_with(|| other.path_len.cmp(&self.path_len))
			.then_with(|| other.path.cmp(self.path))
			.then_with(|| other.index.cmp(&self.index))
	}
}

impl PartialOrd for Ranked<'_> {
	fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Ranked<'_> {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == CmpOrdering::Equal
	}
}

impl Eq for Ranked<'_> {}

/// Keeps the `cap` best candidates seen so far.
///
/// The heap is ordered by the same total order used for the final sort, so
/// the survivors are exactly the top `cap` of the full sorted list.
struct ScoreAggregator<'a> {
	cap: usize,
	heap: BinaryHeap<Reverse<Ranked<'a>>>,
}

impl<'a> ScoreAggregator<'a> {
	fn new(cap: usize) -> Self {
		Self {
			cap,
			heap: BinaryHeap::with_capacity(cap.min(4_096)),
		}
	}

	fn push(&mut self, entry: Ranked<'a>) {
		if self.cap == 0 {
			return;
		}
		if self.heap.len() < self.cap {
			self.heap.push(Reverse(entry));
		} else if let Some(mut current_min) = self.heap.peek_mut()
			&& entry > current_min.0
		{
			*current_min = Reverse(entry);
		}
	}

	fn finish(self) -> Vec<Ranked<'a>> {
		let mut ranked: Vec<Ranked<'a>> = self.heap.into_iter().map(|entry| entry.0).collect();
		ranked.sort_unstable_by(|a, b| b.cmp(a));
		ranked
	}
}
