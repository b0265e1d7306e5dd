//! Display width helpers
//!
//! Widths are measured per grapheme cluster: a base character and its combining marks count
//! as one cell, East Asian wide characters as two. Graphemes that would measure zero (control
//! characters, stray joiners) count as one cell, so every non-empty string has a non-zero
//! width and cutting always makes progress.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width of a single grapheme cluster, never less than one cell
pub fn grapheme_width(grapheme: &str) -> usize {
    UnicodeWidthStr::width(grapheme).max(1)
}

/// Number of terminal cells `text` occupies
pub fn display_width(text: &str) -> usize {
    text.graphemes(true).map(grapheme_width).sum()
}

/// Width of the first grapheme of `text`, zero for an empty string
pub fn leading_width(text: &str) -> usize {
    text.graphemes(true).next().map_or(0, grapheme_width)
}

/// Split `text` after as many leading graphemes as fit into `max_width` cells.
///
/// If not even the first grapheme fits, it is taken anyway so callers that loop until the
/// remainder is empty always terminate.
pub fn split_at_width(text: &str, max_width: usize) -> (&str, &str) {
    let mut used = 0;
    let mut split = 0;
    for (offset, grapheme) in text.grapheme_indices(true) {
        let width = grapheme_width(grapheme);
        if used + width > max_width {
            if split == 0 {
                split = offset + grapheme.len();
            }
            break;
        }
        used += width;
        split = offset + grapheme.len();
    }
    text.split_at(split)
}

/// Repeat `pattern` and keep its last `count` characters.
///
/// `fill_pattern("ab", 3)` is `"bab"`: the padding always ends on the pattern's last
/// character.
pub fn fill_pattern(pattern: &str, count: usize) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    if chars.is_empty() || count == 0 {
        return String::new();
    }
    let repeats = count.div_ceil(chars.len());
    let total = repeats * chars.len();
    chars
        .iter()
        .cycle()
        .take(total)
        .skip(total - count)
        .collect()
}
