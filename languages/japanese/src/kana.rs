//! Kana helpers for reading normalization

const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_END: u32 = 0x30F6;
const KANA_OFFSET: u32 = 0x60;

/// Convert katakana to hiragana, leaving every other character untouched.
/// Long-vowel marks and middle dots have no hiragana form and stay as they are.
pub fn katakana_to_hiragana(text: &str) -> String {
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

/// Normalize a list of on'yomi to hiragana, dropping blanks
pub fn normalize_onyomi<S: AsRef<str>>(readings: &[S]) -> Vec<String> {
    readings
        .iter()
        .map(|r| katakana_to_hiragana(r.as_ref().trim()))
        .filter(|r| !r.is_empty())
        .collect()
}

/// Split a comma separated reading string ("か, け") into readings
pub fn split_readings(list: &str) -> Vec<String> {
    list.split([',', '、'])
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// The part of a kun'yomi before its okurigana: `かた.る` → `かた`.
/// Prefix and suffix markers (`-`) are removed as well.
pub fn kun_stem(reading: &str) -> &str {
    let reading = reading.trim().trim_matches('-');
    match reading.split_once('.') {
        Some((stem, _)) => stem,
        None => reading,
    }
}
