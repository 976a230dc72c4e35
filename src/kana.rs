use wana_kana::ConvertJapanese;

/// Kana normalization capability. Matching and segmentation need exactly two
/// conversions: katakana readings to hiragana, and bracketed romanization to
/// kana. Behind a trait so tests can substitute fixed tables if needed.
pub trait KanaService {
    fn kata_to_hira(&self, text: &str) -> String;
    fn roman_to_kana(&self, text: &str) -> String;
}

/// Default implementation backed by the wana_kana crate.
pub struct WanaKana;

impl KanaService for WanaKana {
    fn kata_to_hira(&self, text: &str) -> String {
        text.to_hiragana()
    }

    fn roman_to_kana(&self, text: &str) -> String {
        // Some dumps mark long vowels with ':' inside the brackets.
        text.to_hiragana().replace(':', "ー")
    }
}

// ── Tests ──
