//! Character classification helpers for Japanese text.

const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_END: u32 = 0x30F6;
const KANA_OFFSET: u32 = 0x60;

/// Small kana that attach to the preceding kana to form one mora.
const SMALL_KANA: &str = "ゃゅょぁぃぅぇぉゎャュョァィゥェォヮ";

pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{309F}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kana(c: char) -> bool {
    is_hiragana(c) || is_katakana(c)
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
        || c == '々'
}

pub fn contains_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// Converts katakana to hiragana, leaving every other character alone.
pub fn to_hiragana(text: &str) -> String {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if (KATAKANA_START..=KATAKANA_END).contains(&code) {
                char::from_u32(code - KANA_OFFSET).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Splits a kana reading into morae; small kana join the previous mora.
pub fn morae(reading: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for c in reading.chars() {
        match out.last_mut() {
            Some(last) if SMALL_KANA.contains(c) => last.push(c),
            _ => out.push(c.to_string()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ヨム", "よむ")]
    #[case("キョウ", "きょう")]
    #[case("ラーメン", "らーめん")]
    #[case("漢字とカナ", "漢字とかな")]
    fn test_to_hiragana(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_hiragana(input), expected);
    }

    #[rstest]
    #[case("きょう", &["きょ", "う"])]
    #[case("がっこう", &["が", "っ", "こ", "う"])]
    #[case("しゃしん", &["しゃ", "し", "ん"])]
    #[case("", &[])]
    fn test_morae(#[case] reading: &str, #[case] expected: &[&str]) {
        assert_eq!(morae(reading), expected);
    }

    #[test]
    fn test_classification() {
        assert!(is_kanji('読'));
        assert!(is_kanji('々'));
        assert!(!is_kanji('よ'));
        assert!(is_kana('ヨ'));
        assert!(contains_kanji("読む"));
        assert!(!contains_kanji("よむ"));
    }
}
