//! Script-category helpers and the header patterns shared by matching and
//! segmentation. All patterns are compiled once at first use.

use std::sync::LazyLock;

use regex::Regex;

static KANJI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{4E00}-\x{9FFF}]").unwrap());
static CYRILLIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{0400}-\x{04FF}]").unwrap());
static ROMAJI_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([a-zA-Z:\-]+)\]$").unwrap());

/// True when the text contains a CJK ideograph.
pub fn has_kanji(text: &str) -> bool {
    KANJI_RE.is_match(text)
}

/// True when the text contains Russian (target-language) script.
pub fn has_cyrillic(text: &str) -> bool {
    CYRILLIC_RE.is_match(text)
}

/// Inner content of a bracketed-romanization header line like
/// "[higashiguchi]". Long vowels may be written with ':'.
pub fn bracket_romaji(line: &str) -> Option<&str> {
    ROMAJI_HEADER_RE
        .captures(line.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kanji_detection() {
        assert!(has_kanji("範囲"));
        assert!(has_kanji("反･段"));
        assert!(!has_kanji("はんい"));
        assert!(!has_kanji("チョコレート"));
        assert!(!has_kanji(""));
    }

    #[test]
    fn cyrillic_detection() {
        assert!(has_cyrillic("сфера, область"));
        assert!(has_cyrillic("(англ. ruby)"));
        assert!(!has_cyrillic("範囲"));
        assert!(!has_cyrillic("[higashiguchi]"));
    }

    #[test]
    fn romaji_header_lines() {
        assert_eq!(bracket_romaji("[higashiguchi]"), Some("higashiguchi"));
        assert_eq!(bracket_romaji("[ko:hi:]"), Some("ko:hi:"));
        assert_eq!(bracket_romaji("  [tsuku]  "), Some("tsuku"));
        assert_eq!(bracket_romaji("範囲"), None);
        assert_eq!(bracket_romaji("[higashi guchi]"), None);
        assert_eq!(bracket_romaji("[]"), None);
    }
}
