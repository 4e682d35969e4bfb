//! Scores a single corpus entry against a pattern.
//!
//! Matching is a case-insensitive ordered subsequence test run by
//! `nucleo-matcher`. Entries where the pattern occurs as one contiguous run
//! land in a higher tier than scattered matches; inside a tier nucleo's score
//! rewards consecutive characters and segment boundaries and penalises gaps,
//! and long entries lose a little on top of that.

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Score given to every entry by an empty pattern.
pub const NEUTRAL_SCORE: i64 = 0;

const CONTIGUOUS_TIER: i64 = 1_000_000;
const SCATTERED_TIER: i64 = 500_000;
// Keeps tiers disjoint: |in-tier adjustment| never reaches the tier distance.
const TIER_SPAN: i64 = 200_000;

/// Entries lose `PENALTY_LENGTH` for every `LENGTH_BUCKET` chars.
const LENGTH_BUCKET: usize = 8;
const PENALTY_LENGTH: i64 = 1;

/// Outcome of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
	pub score: i64,
	/// Char indices into the entry text, for highlighting.
	pub positions: Vec<usize>,
}

impl MatchScore {
	fn neutral() -> Self {
		Self {
			score: NEUTRAL_SCORE,
			positions: Vec::new(),
		}
	}
}

/// Case-fold a single character.
#[must_use]
pub fn fold_char(c: char) -> char {
	c.to_lowercase().next().unwrap_or(c)
}

/// Case-fold a pattern the same way the matcher does.
#[must_use]
pub fn fold_pattern(pattern: &str) -> String {
	pattern.chars().map(fold_char).collect()
}

/// A pattern compiled once and scored against many entries.
///
/// Holds the nucleo matcher and scratch buffers so a ranking pass allocates
/// only for the positions it returns.
pub struct PatternScorer {
	contiguous: Atom,
	scattered: Atom,
	is_empty: bool,
	matcher: Matcher,
	chars: Vec<char>,
	indices: Vec<u32>,
}

impl PatternScorer {
	#[must_use]
	pub fn new(pattern: &str) -> Self {
		let atom = |kind| Atom::new(pattern, CaseMatching::Ignore, Normalization::Never, kind, false);
		Self {
			contiguous: atom(AtomKind::Substring),
			scattered: atom(AtomKind::Fuzzy),
			is_empty: pattern.is_empty(),
			matcher: Matcher::new(Config::DEFAULT.match_paths()),
			chars: Vec::new(),
			indices: Vec::new(),
		}
	}

	/// Score `text`, returning `None` when the pattern is not a subsequence
	/// of it.
	pub fn score(&mut self, text: &str) -> Option<MatchScore> {
		if self.is_empty {
			return Some(MatchScore::neutral());
		}

		// Build the haystack from plain chars so indices stay char indices.
		let haystack = if text.is_ascii() {
			Utf32Str::Ascii(text.as_bytes())
		} else {
			self.chars.clear();
			self.chars.extend(text.chars());
			Utf32Str::Unicode(&self.chars)
		};

		self.indices.clear();
		let (tier, raw) = if let Some(raw) =
			self.contiguous
				.indices(haystack, &mut self.matcher, &mut self.indices)
		{
			(CONTIGUOUS_TIER, raw)
		} else {
			self.indices.clear();
			let raw = self
				.scattered
				.indices(haystack, &mut self.matcher, &mut self.indices)?;
			(SCATTERED_TIER, raw)
		};

		let mut positions: Vec<usize> = self.indices.iter().map(|&index| index as usize).collect();
		positions.sort_unstable();
		positions.dedup();

		let length_penalty = PENALTY_LENGTH * (haystack.len() / LENGTH_BUCKET) as i64;
		let adjustment = (i64::from(raw) - length_penalty).clamp(-TIER_SPAN, TIER_SPAN);
		Some(MatchScore {
			score: tier + adjustment,
			positions,
		})
	}
}

/// Score `text` against `pattern`, returning `None` when the pattern is not a
/// subsequence of the text. Builds a fresh [`PatternScorer`]; use one directly
/// when scoring many entries.
#[must_use]
pub fn score(pattern: &str, text: &str) -> Option<MatchScore> {
	PatternScorer::new(pattern).score(text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn contiguous_match_outranks_scattered_match() {
		let contiguous = score("abc", "abcfile").unwrap();
		let scattered = score("abc", "a1b2c3").unwrap();
		assert!(contiguous.score > scattered.score);
	}

	#[test]
	fn contiguity_wins_at_equal_entry_length() {
		// nucleo alone prefers the scattered boundary hits here.
		let contiguous = score("abc", "xxabcx").unwrap();
		let scattered = score("abc", "axbxcx").unwrap();
		assert!(contiguous.score > scattered.score);
		assert_eq!(contiguous.positions, vec![2, 3, 4]);
		assert_eq!(scattered.positions, vec![0, 2, 4]);
	}

	#[test]
	fn matching_ignores_case() {
		let result = score("ABC", "src/abc.rs").unwrap();
		assert_eq!(result.positions, vec![4, 5, 6]);
		assert!(score("main", "SRC/MAIN.RS").is_some());
	}

	#[test]
	fn rejects_patterns_that_are_not_subsequences() {
		assert!(score("cba", "abc").is_none());
		assert!(score("abcd", "abc").is_none());
		assert!(score("z", "src/lib.rs").is_none());
	}

	#[test]
	fn whitespace_is_matched_as_typed() {
		assert!(score(" ", "abc").is_none());
		assert_eq!(score(" ", "my file.txt").unwrap().positions, vec![2]);
		assert!(score("a ", "data.rs").is_none());
		assert!(score("a ", "a b.rs").is_some());
	}

	#[test]
	fn scattered_positions_follow_the_text() {
		let result = score("abc", "a1b2c3").unwrap();
		assert_eq!(result.positions, vec![0, 2, 4]);
	}

	#[test]
	fn segment_boundaries_are_rewarded() {
		let boundary = score("lib", "src/lib.rs").unwrap();
		let buried = score("lib", "calibrated").unwrap();
		assert!(boundary.score > buried.score);
	}

	#[test]
	fn shorter_entries_score_higher() {
		let short = score("main", "main.rs").unwrap();
		let long = score("main", "main_window_controller.rs").unwrap();
		assert!(short.score > long.score);
	}

	#[test]
	fn empty_pattern_is_neutral() {
		let result = score("", "anything").unwrap();
		assert_eq!(result.score, NEUTRAL_SCORE);
		assert!(result.positions.is_empty());
	}

	#[test]
	fn positions_are_char_indices() {
		let result = score("äb", "ÄBC").unwrap();
		assert_eq!(result.positions, vec![0, 1]);
		let result = score("rs", "ünïcödé.rs").unwrap();
		assert_eq!(result.positions, vec![8, 9]);
	}

	#[test]
	fn scorer_is_reusable_across_entries() {
		let mut scorer = PatternScorer::new("lib");
		assert!(scorer.score("src/lib.rs").is_some());
		assert!(scorer.score("main.rs").is_none());
		assert_eq!(scorer.score("lib").unwrap().positions, vec![0, 1, 2]);
	}
}
