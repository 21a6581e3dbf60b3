use std::ops::Range;

use crate::shared::constants::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN};

/// One visible character of an annotated string and where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AlignmentSpan {
    pub(crate) bytes: Range<usize>,
    pub(crate) ch: char,
}

/// Wraps the first occurrence of a word in highlight markup.
///
/// Works on both plain and annotated text (`本[ほん] を 読[よ]む`). In
/// annotated text the word's characters may be interrupted by bracketed
/// readings and separator spaces; those are skipped while matching and the
/// wrapped region keeps them, so `読む` highlights `読[よ]む`. When the word
/// cannot be found the text is returned unchanged.
#[derive(Debug, Clone)]
pub struct WordHighlighter {
    open: String,
    close: String,
}

impl Default for WordHighlighter {
    fn default() -> Self {
        Self::new(HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE)
    }
}

impl WordHighlighter {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    pub fn highlight(&self, text: &str, word: &str) -> String {
        match find_word(text, word) {
            Some(range) => self.wrap(text, range),
            None => text.to_string(),
        }
    }

    fn wrap(&self, text: &str, range: Range<usize>) -> String {
        let mut out = String::with_capacity(text.len() + self.open.len() + self.close.len());
        out.push_str(&text[..range.start]);
        out.push_str(&self.open);
        out.push_str(&text[range.clone()]);
        out.push_str(&self.close);
        out.push_str(&text[range.end..]);
        out
    }
}

/// Byte range to highlight, always on character boundaries.
pub(crate) fn find_word(text: &str, word: &str) -> Option<Range<usize>> {
    if word.is_empty() {
        return None;
    }
    if let Some(start) = text.find(word) {
        return Some(start..start + word.len());
    }

    let spans = alignment_spans(text);
    let wanted: Vec<char> = word.chars().collect();
    let first = spans
        .windows(wanted.len())
        .position(|window| window.iter().map(|s| s.ch).eq(wanted.iter().copied()))?;

    let start = spans[first].bytes.start;
    let end = spans[first + wanted.len() - 1].bytes.end;
    Some(start..extend_through_reading(text, end))
}

/// Visible characters of `text`, skipping `[...]` readings and whitespace.
pub(crate) fn alignment_spans(text: &str) -> Vec<AlignmentSpan> {
    let mut spans = Vec::new();
    let mut in_reading = false;
    for (offset, ch) in text.char_indices() {
        if in_reading {
            in_reading = ch != ']';
            continue;
        }
        if ch == '[' {
            in_reading = true;
            continue;
        }
        if ch.is_whitespace() {
            continue;
        }
        spans.push(AlignmentSpan {
            bytes: offset..offset + ch.len_utf8(),
            ch,
        });
    }
    spans
}

/// Moves `end` past the reading of the last matched character, i.e. a
/// `[...]` run starting right at `end`. A later base character's reading is
/// never taken, and a run broken by whitespace leaves `end` unchanged.
fn extend_through_reading(text: &str, end: usize) -> usize {
    let rest = &text[end..];
    if !rest.starts_with('[') {
        return end;
    }
    match rest.find(|c: char| c == ']' || c.is_whitespace()) {
        Some(close) if rest[close..].starts_with(']') => end + close + 1,
        _ => end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn highlight(text: &str, word: &str) -> String {
        WordHighlighter::default().highlight(text, word)
    }

    fn marked(inner: &str) -> String {
        format!("{HIGHLIGHT_OPEN}{inner}{HIGHLIGHT_CLOSE}")
    }

    #[test]
    fn test_annotated_verb_includes_inner_reading() {
        let text = "本[ほん] を 読[よ]む";
        let range = find_word(text, "読む").unwrap();

        assert_eq!(range.start, text.find('読').unwrap());
        assert_eq!(range.end, text.len());
        assert_eq!(&text[range], "読[よ]む");
        assert_eq!(highlight(text, "読む"), format!("本[ほん] を {}", marked("読[よ]む")));
    }

    #[test]
    fn test_direct_match_wins() {
        assert_eq!(
            highlight("本[ほん] を よむ", "よむ"),
            format!("本[ほん] を {}", marked("よむ"))
        );
    }

    #[test]
    fn test_trailing_reading_is_included() {
        assert_eq!(
            highlight("食[た]べ物[もの] です", "食べ物"),
            format!("{} です", marked("食[た]べ物[もの]"))
        );
    }

    #[test]
    fn test_extension_stops_at_whitespace() {
        assert_eq!(
            highlight("素[そ]な 人[ひと]", "素な"),
            format!("{} 人[ひと]", marked("素[そ]な"))
        );
    }

    #[rstest]
    #[case::next_base_has_own_reading("読[よ]み方[かた] を", "読み", "読[よ]み")]
    #[case::last_character_reading("読[よ]み方[かた] を", "読み方", "読[よ]み方[かた]")]
    fn test_extension_only_covers_last_character_reading(
        #[case] text: &str,
        #[case] word: &str,
        #[case] expected: &str,
    ) {
        let range = find_word(text, word).unwrap();
        assert_eq!(&text[range], expected);
    }

    #[test]
    fn test_four_byte_characters() {
        let text = "𠮷[よし]野[の]家[や] へ";
        assert_eq!(highlight(text, "𠮷野"), format!("{}家[や] へ", marked("𠮷[よし]野[の]")));
    }

    #[test]
    fn test_first_occurrence_only() {
        assert_eq!(
            highlight("本[ほん] と 本[ほん]", "本"),
            format!("{}[ほん] と 本[ほん]", marked("本"))
        );
    }

    #[rstest]
    #[case::absent("本[ほん] を 読[よ]む", "書く")]
    #[case::empty_word("本[ほん] を 読[よ]む", "")]
    #[case::empty_text("", "読む")]
    #[case::longer_than_text("本", "本を読む")]
    fn test_no_match_returns_input(#[case] text: &str, #[case] word: &str) {
        assert_eq!(highlight(text, word), text);
    }

    #[rstest]
    #[case("本[ほん] を 読[よ]む", "読む")]
    #[case("漢字[かんじ] の 勉強[べんきょう]", "字の勉")]
    #[case("𠮷[よし]野[の]家[や]", "野家")]
    #[case("ｶﾀｶﾅ と カタカナ", "とカタ")]
    fn test_boundaries_on_char_boundaries(#[case] text: &str, #[case] word: &str) {
        let range = find_word(text, word).unwrap();
        assert!(text.is_char_boundary(range.start));
        assert!(text.is_char_boundary(range.end));
        let stripped = highlight(text, word)
            .replace(HIGHLIGHT_OPEN, "")
            .replace(HIGHLIGHT_CLOSE, "");
        assert_eq!(stripped, text);
    }

    #[test]
    fn test_alignment_spans_skip_readings_and_spaces() {
        let chars: String = alignment_spans("本[ほん] を 読[よ]む").iter().map(|s| s.ch).collect();
        assert_eq!(chars, "本を読む");
    }
}
