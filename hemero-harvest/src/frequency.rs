//! Word-frequency analysis over translated titles.
//!
//! Pure and deterministic: no I/O, no hidden state. A "word" is a
//! whitespace-delimited, case-folded token; punctuation is kept as part of
//! the token on purpose, so "words" and "words," count separately.

use std::collections::HashMap;

/// A word must appear strictly more often than this across all input
/// strings combined to be reported.
pub const REPEAT_THRESHOLD: usize = 2;

/// Count case-folded tokens across all `titles` and keep the ones seen more
/// than [`REPEAT_THRESHOLD`] times.
///
/// ```
/// use hemero_harvest::repeated_words;
///
/// let titles = vec!["The Cat".to_string(), "the dog".to_string(), "THE bird".to_string()];
/// let repeated = repeated_words(&titles);
///
/// assert_eq!(repeated.get("the"), Some(&3));
/// assert_eq!(repeated.len(), 1);
/// ```
pub fn repeated_words(titles: &[String]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for title in titles {
        for word in title.to_lowercase().split_whitespace() {
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    counts.retain(|_, count| *count > REPEAT_THRESHOLD);
    counts
}
