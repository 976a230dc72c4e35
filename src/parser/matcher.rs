//! Decides whether a raw article belongs to the queried word. Headers come in
//! two shapes: a kana line optionally followed by a kanji line, or a kanji
//! line followed by a bracketed-romanization line.

use crate::kana::KanaService;
use crate::parser::script::{bracket_romaji, has_kanji};
use crate::parser::variants::expand;

/// True when the article's header matches the query, either by reading
/// (hiragana, katakana, ellipsis-wrapped, or する-stem) or by written form.
pub fn matches(raw: &str, word: &str, kata: &str, kana: &dyn KanaService) -> bool {
    let mut lines = raw.lines();
    let Some(line0) = lines.next() else {
        return false;
    };
    let line1 = lines.next().unwrap_or("");

    let (kana_variants, kanji_variants) = if let Some(romaji) = bracket_romaji(line1) {
        let mut kanji = std::collections::HashSet::new();
        if has_kanji(line0) {
            if let Some(head) = line0.split_whitespace().next() {
                kanji.insert(head.to_string());
            }
        }
        (std::iter::once(kana.roman_to_kana(romaji)).collect(), kanji)
    } else {
        let kanji = if has_kanji(line1) {
            expand(line1)
        } else {
            Default::default()
        };
        (expand(line0), kanji)
    };

    let reading = kana.kata_to_hira(kata);
    let reading_ok = kana_variants.contains(&reading)
        || kana_variants.contains(kata)
        || kana_variants.contains(word)
        || kana_variants.contains(&format!("…{reading}"))
        || kana_variants.contains(&format!("{reading}…"))
        || suru_stem(&reading).is_some_and(|stem| kana_variants.contains(stem));

    reading_ok || kanji_variants.contains(word)
}

/// Dictionary headers list する-verbs by their nominal stem.
fn suru_stem(reading: &str) -> Option<&str> {
    let stem = reading.strip_suffix("する")?;
    (!stem.is_empty()).then_some(stem)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kana::WanaKana;

    fn hit(raw: &str, word: &str, kata: &str) -> bool {
        matches(raw, word, kata, &WanaKana)
    }

    #[test]
    fn kana_plus_kanji_header() {
        let raw = "はんい\n範囲\nсфера, область";
        assert!(hit(raw, "範囲", "ハンイ"));
        assert!(hit(raw, "はんい", "ハンイ"));
        // The written form alone is enough, whatever the reading says.
        assert!(hit(raw, "範囲", "イガイ"));
        assert!(!hit(raw, "意外", "イガイ"));
    }

    #[test]
    fn kanji_variants_split_on_dot() {
        let raw = "ところ\n所I･処\nместо";
        assert!(hit(raw, "所", "トコロ"));
        assert!(!hit(raw, "床", "トコ"));
    }

    #[test]
    fn reading_only_header() {
        let raw = "ぽつり\n1) с плеском\n";
        assert!(hit(raw, "ぽつり", "ポツリ"));
        assert!(!hit(raw, "ごろり", "ゴロリ"));
    }

    #[test]
    fn romanized_header_matches_by_sound() {
        let raw = "東口 【ひがしぐち】\n[higashiguchi]\nвосточный выход";
        assert!(hit(raw, "東口", "ヒガシグチ"));
        assert!(!hit(raw, "西口", "ニシグチ"));
    }

    #[test]
    fn suru_verb_matches_nominal_stem() {
        let raw = "こうちく\n構築\nстроительство";
        assert!(hit(raw, "構築する", "コウチクスル"));
        assert!(hit("あい\n愛\nлюбовь", "愛する", "アイスル"));
        assert!(!hit("こうちく\n構築\nстроительство", "整理する", "セイリスル"));
    }

    #[test]
    fn ellipsis_wrapped_reading() {
        let raw = "…ら\n…等\nсуф. мн. числа";
        assert!(hit(raw, "ら", "ラ"));
    }
}
