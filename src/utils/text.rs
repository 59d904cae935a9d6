// src/utils/text.rs

use std::sync::LazyLock;

use regex::Regex;

/// Word substitutions tried in order by `naive_negation`.
static NEGATIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [(r"\bis\b", "is not"), (r"\bare\b", "are not"), (r"\bhelp\b", "hinder")]
        .into_iter()
        .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
        .collect()
});

/// Produces a "false" version of a statement by swapping the first
/// matching word (`is` -> `is not`, `are` -> `are not`, `help` -> `hinder`).
///
/// Purely lexical, so the output can be ungrammatical or still true
/// ("This is not only..." style sentences). Returns `None` when no rule
/// applies.
pub fn naive_negation(statement: &str) -> Option<String> {
    NEGATIONS.iter().find_map(|(re, replacement)| {
        re.is_match(statement)
            .then(|| re.replacen(statement, 1, *replacement).into_owned())
    })
}

/// Case-insensitive containment check used by curriculum search.
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Cuts `text` to at most `max_chars` characters, appending an ellipsis
/// when something was dropped.
pub fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
