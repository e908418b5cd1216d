//! Whitespace-bounded keyword search.
//!
//! `setoption` cannot be split on whitespace alone: option names and values
//! are free text and may contain the words `value` or `context`. Only an
//! occurrence surrounded by whitespace (or the edge of the text) counts as a
//! keyword, so `MyContextOption` never matches `context`.

/// Where to look for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    /// Leftmost bounded occurrence.
    First,
    /// Rightmost bounded occurrence starting at or after the given byte offset.
    LastFrom(usize),
}

/// Byte offset of a whitespace-bounded occurrence of `keyword` in `text`.
#[must_use]
pub fn find_bounded_keyword(text: &str, keyword: &str, search: Search) -> Option<usize> {
    if keyword.is_empty() || keyword.len() > text.len() {
        return None;
    }

    match search {
        Search::First => text
            .match_indices(keyword)
            .map(|(pos, _)| pos)
            .find(|&pos| is_bounded(text, pos, keyword.len())),
        Search::LastFrom(min) => text
            .rmatch_indices(keyword)
            .map(|(pos, _)| pos)
            .take_while(|&pos| pos >= min)
            .find(|&pos| is_bounded(text, pos, keyword.len())),
    }
}

fn is_bounded(text: &str, pos: usize, len: usize) -> bool {
    let bytes = text.as_bytes();
    let before = pos == 0 || bytes[pos - 1].is_ascii_whitespace();
    let end = pos + len;
    let after = end == bytes.len() || bytes[end].is_ascii_whitespace();
    before && after
}
