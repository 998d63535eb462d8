//! Recent-history windowing for summarization input.

use crate::core::models::Entry;

pub use crate::core::config::DEFAULT_HISTORY_LIMIT;

/// Joins entry texts and keeps only the last `limit` lines.
///
/// Authors are dropped, only what was said is summarized.
#[must_use]
pub fn window(entries: &[Entry], limit: usize) -> String {
    let joined = entries
        .iter()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let lines: Vec<&str> = joined.lines().collect();
    let start = lines.len().saturating_sub(limit);
    lines[start..].join("\n")
}

/// [`window`] over a log that may not exist yet.
#[must_use]
pub fn window_log(entries: Option<&[Entry]>, limit: usize) -> Option<String> {
    entries.map(|entries| window(entries, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(texts: &[&str]) -> Vec<Entry> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Entry::new(i.to_string(), "user", *text))
            .collect()
    }

    #[test]
    fn test_keeps_last_lines() {
        assert_eq!(window(&log(&["x", "y", "z"]), 2), "y\nz");
    }

    #[test]
    fn test_shorter_log_is_kept_whole() {
        assert_eq!(window(&log(&["x", "y"]), DEFAULT_HISTORY_LIMIT), "x\ny");
    }

    #[test]
    fn test_counts_lines_not_entries() {
        let entries = log(&["first", "second\nthird", "fourth\r\nfifth"]);
        assert_eq!(window(&entries, 3), "third\nfourth\nfifth");
    }

    #[test]
    fn test_zero_limit_and_empty_log() {
        assert_eq!(window(&log(&["x"]), 0), "");
        assert_eq!(window(&[], 10), "");
    }

    #[test]
    fn test_absent_log_stays_absent() {
        assert_eq!(window_log(None, 10), None);
        let entries = log(&["emeralds"]);
        assert_eq!(window_log(Some(&entries), 10).as_deref(), Some("emeralds"));
    }
}
