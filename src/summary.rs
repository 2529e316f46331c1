//! Derives the short plain-text excerpt shown in article listings.

use regex::Regex;
use std::sync::LazyLock;

/// The maximum summary length, in characters, unless a caller asks for
/// something else.
pub const DEFAULT_MAX_LENGTH: usize = 200;

const HEADING_MARKER: &str = "#";
const CODE_FENCE: &str = "```";

/// Characters stripped from the joined text (emphasis, inline code, and
/// stray heading markers).
const MARKUP_CHARS: &[char] = &['*', '_', '`', '#'];

/// Produces a summary of a markdown `body` at most `max_length` characters
/// long.
///
/// Heading lines, code-fence lines, and blank lines are dropped and the
/// remaining lines are trimmed and joined with single spaces. Inline links
/// are replaced by their text and markup characters are removed. Lines
/// *inside* a fenced code block are kept; only the fence lines themselves
/// are dropped. The result is cut at `max_length` characters without regard
/// for word boundaries.
pub fn summarize(body: &str, max_length: usize) -> String {
    static LINK: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^\)]+\)").unwrap());

    let text = body
        .split('\n')
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with(HEADING_MARKER)
                && !line.starts_with(CODE_FENCE)
        })
        .collect::<Vec<_>>()
        .join(" ");

    LINK.replace_all(&text, "$1")
        .chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .take(max_length)
        .collect()
}
