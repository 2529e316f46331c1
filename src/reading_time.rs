//! Estimates how many minutes an article takes to read.

use regex::Regex;
use std::sync::LazyLock;

/// CJK ideographs read per minute.
pub const CJK_CHARS_PER_MINUTE: f64 = 400.0;

/// Latin words read per minute.
pub const WORDS_PER_MINUTE: f64 = 200.0;

/// Counts characters in the CJK Unified Ideographs block (U+4E00..=U+9FFF).
pub fn count_cjk_chars(body: &str) -> usize {
    body.chars()
        .filter(|c| ('\u{4e00}'..='\u{9fff}').contains(c))
        .count()
}

/// Counts runs of ASCII letters. Punctuation splits a run, so `don't` counts
/// as two words.
pub fn count_words(body: &str) -> usize {
    static WORD: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[a-zA-Z]+").unwrap());
    WORD.find_iter(body).count()
}

/// Returns the estimated reading time of `body` in whole minutes, never less
/// than one. Halves round to even.
pub fn estimate(body: &str) -> u32 {
    let minutes = count_cjk_chars(body) as f64 / CJK_CHARS_PER_MINUTE
        + count_words(body) as f64 / WORDS_PER_MINUTE;
    (minutes.round_ties_even() as u32).max(1)
}

#[cfg(test)]
mod test {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_estimate_floors_at_one_minute() {
        assert_eq!(estimate(""), 1);
        assert_eq!(estimate("123 456 !!! ---"), 1);
    }

    #[test]
    fn test_estimate_cjk() {
        assert_eq!(estimate(&"字".repeat(800)), 2);
        assert_eq!(estimate(&"字".repeat(2000)), 5);
    }

    #[test]
    fn test_estimate_words() {
        assert_eq!(estimate(&words(600)), 3);
    }

    #[test]
    fn test_estimate_rounds_half_to_even() {
        // 1.5 minutes rounds up, 2.5 minutes rounds down.
        assert_eq!(estimate(&words(300)), 2);
        assert_eq!(estimate(&words(500)), 2);
    }

    #[test]
    fn test_estimate_mixed() {
        let body = format!("{} {}", "字".repeat(400), words(200));
        assert_eq!(estimate(&body), 2);
    }

    #[test]
    fn test_count_words_splits_on_punctuation() {
        assert_eq!(count_words("don't stop-me now2day"), 6);
    }

    #[test]
    fn test_count_cjk_ignores_other_scripts() {
        assert_eq!(count_cjk_chars("日本語 テキスト 한국어 abc"), 3);
    }
}
