use super::ResolvedConfig;

/// Written to stderr: under `serve`, stdout carries the bridge.
pub(super) fn print_summary(config: &ResolvedConfig) {
	for line in summary_lines(config) {
		eprintln!("{line}");
	}
}

fn summary_lines(config: &ResolvedConfig) -> Vec<String> {
	let tuning = &config.tuning;
	let index = &config.index;
	vec![
		"Effective configuration:".to_string(),
		format!("  Root: {}", config.root.display()),
		format!("  Include hidden: {}", bool_to_word(index.include_hidden)),
		format!("  Follow symlinks: {}", bool_to_word(index.follow_symlinks)),
		match index.max_depth {
			Some(depth) => format!("  Max depth: {depth}"),
			None => "  Max depth: unlimited".to_string(),
		},
		format!("  Placement: {}", tuning.placement.as_str()),
		format!("  Debounce: {} ms", tuning.debounce_ms),
		format!("  Result cap: {}", tuning.result_cap),
		format!("  Call timeout: {} ms", tuning.timeout_ms),
		format!("  Max pattern length: {} chars", tuning.max_pattern_chars),
	]
}

fn bool_to_word(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}
