use sift_core::search_pipeline::{CorpusEntry, SearchScope, matcher, rank, rank_scoped};

fn is_subsequence(pattern: &str, text: &str) -> bool {
	let mut haystack = text.chars().map(matcher::fold_char);
	pattern
		.chars()
		.map(matcher::fold_char)
		.all(|needle| haystack.any(|c| c == needle))
}

fn mixed_corpus() -> Vec<CorpusEntry> {
	[
		"src/main.rs",
		"src/matcher.rs",
		"src/search_pipeline/aggregator.rs",
		"src/search_pipeline/matcher.rs",
		"crates/core/src/lib.rs",
		"docs/Manual.md",
		"docs/User Guide.md",
		"MAINTAINERS",
		"tests/ranking_test.rs",
		"build.rs",
		"a/m/a/i/n.txt",
	]
	.into_iter()
	.map(CorpusEntry::new)
	.collect()
}

#[test]
fn results_are_exactly_the_subsequence_matches() {
	let corpus = mixed_corpus();
	for pattern in ["main", "MAT", "srs", "agg", "zz", "a/i", " ", "r g", "s "] {
		let ranked = rank(pattern, &corpus, 100);
		let shown: Vec<&str> = ranked
			.results
			.iter()
			.map(|result| result.entry.path.as_str())
			.collect();
		for entry in &corpus {
			assert_eq!(
				shown.contains(&entry.path.as_str()),
				is_subsequence(pattern, &entry.path),
				"'{pattern}' vs '{}'",
				entry.path
			);
		}
	}
}

#[test]
fn ranking_is_deterministic_regardless_of_repetition() {
	let corpus = mixed_corpus();
	let first = rank("ma", &corpus, 100);
	for _ in 0..5 {
		assert_eq!(rank("ma", &corpus, 100), first);
	}
	assert!(
		first
			.results
			.windows(2)
			.all(|pair| pair[0].score >= pair[1].score)
	);
}

#[test]
fn contiguous_matches_precede_scattered_ones() {
	let corpus = mixed_corpus();
	let ranked = rank("main", &corpus, 100);
	let paths: Vec<&str> = ranked
		.results
		.iter()
		.map(|result| result.entry.path.as_str())
		.collect();

	let scattered = paths
		.iter()
		.position(|path| *path == "a/m/a/i/n.txt")
		.unwrap();
	for contiguous in ["src/main.rs", "MAINTAINERS"] {
		let index = paths.iter().position(|path| *path == contiguous).unwrap();
		assert!(index < scattered, "{contiguous} should outrank the scattered match");
	}
}

#[test]
fn large_corpus_is_bounded_to_the_cap() {
	let corpus: Vec<CorpusEntry> = (0..200)
		.map(|index| CorpusEntry::new(format!("pkg/module_{index:03}.rs")))
		.collect();

	let ranked = rank("mod", &corpus, 100);
	assert_eq!(ranked.results.len(), 100);
	assert_eq!(ranked.total_matches, 200);

	let full = rank("mod", &corpus, usize::MAX);
	assert_eq!(&full.results[..100], &ranked.results[..]);

	let set = ranked.into_result_set(Default::default(), "mod");
	assert!(set.is_truncated());
}

#[test]
fn equal_scores_fall_back_to_shorter_then_lexical_paths() {
	let corpus: Vec<CorpusEntry> = ["zeta/x.rs", "alpha/x.rs", "x.rs", "beta/x.rs"]
		.into_iter()
		.map(CorpusEntry::new)
		.collect();

	let ranked = rank("x", &corpus, 10);
	let paths: Vec<&str> = ranked
		.results
		.iter()
		.map(|result| result.entry.path.as_str())
		.collect();
	assert_eq!(paths, vec!["x.rs", "beta/x.rs", "zeta/x.rs", "alpha/x.rs"]);
	// The nested paths differ only in length and spelling.
	assert_eq!(ranked.results[1].score, ranked.results[2].score);
	assert_eq!(ranked.results[2].score, ranked.results[3].score);
}

#[test]
fn symbols_scope_ignores_files() {
	let mut corpus = mixed_corpus();
	corpus.push(CorpusEntry::symbol("Matcher::score"));

	let ranked = rank_scoped("mat", SearchScope::Symbols, &corpus, 10);
	assert_eq!(ranked.total_matches, 1);
	assert_eq!(ranked.results[0].entry.path, "Matcher::score");
}
