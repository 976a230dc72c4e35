//! Splits a raw article into word, reading and body, and filters out
//! cross-reference stubs that only point at another entry.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;
use crate::kana::KanaService;
use crate::parser::script::{bracket_romaji, has_cyrillic};

/// An article split into its header fields and translation body.
#[derive(Debug, PartialEq, Eq)]
pub struct Segmented {
    pub word: String,
    pub reading: String,
    pub body: String,
}

static CROSS_REF_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Bare "см. …" bodies.
        r"^см\.",
        // Register tag, then the pointer.
        r"^(?:уст|кн)\.\s+см\.",
        // Parenthesized usage note, then the pointer, possibly inside a
        // single numbered item.
        r"^\([а-яё]+\.\s[^)]*\)\s+(?:\d+\)\s*)?см\.",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Segment a raw article. Returns Ok(None) when the article is only a
/// cross-reference to another entry.
pub fn segment(raw: &str, kana: &dyn KanaService) -> Result<Option<Segmented>, ExtractError> {
    let raw = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = raw.lines().collect();
    if lines.len() < 2 {
        return Err(ExtractError::TooShort);
    }

    let line0 = lines[0].trim();
    let line1 = lines[1].trim();

    let (word, reading, body_start) = if let Some(romaji) = bracket_romaji(line1) {
        (line0.to_string(), kana.roman_to_kana(romaji), 2)
    } else if !has_cyrillic(line1) {
        (line1.to_string(), line0.to_string(), 2)
    } else {
        // Reading-only entry: the word is written in kana.
        (line0.to_string(), line0.to_string(), 1)
    };

    if word.is_empty() || reading.is_empty() {
        return Err(ExtractError::EmptyHeader);
    }

    let body_lines: Vec<&str> = lines[body_start..]
        .iter()
        .copied()
        .take_while(|l| !l.trim().is_empty())
        .collect();
    let body = body_lines.join("\n").trim().to_string();

    if is_cross_reference(&body) {
        return Ok(None);
    }

    Ok(Some(Segmented { word, reading, body }))
}

fn is_cross_reference(body: &str) -> bool {
    CROSS_REF_RES.iter().any(|re| re.is_match(body))
}

// ── Tests ──
