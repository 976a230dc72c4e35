//! Condenses a translation body into one short gloss: the leading sense of
//! the first numbered item, plus as many sibling senses as fit the budget.

use std::sync::LazyLock;

use regex::Regex;

/// Character budget for appending extra senses after the first.
const SENSE_BUDGET: usize = 25;

/// Japanese-script character class: punctuation and kana (U+3001..U+30FF),
/// CJK ideographs, the fullwidth tilde and halfwidth kana forms.
const JA: &str = r"\x{3001}-\x{30FF}\x{3400}-\x{9FFF}\x{FF5E}\x{FF61}-\x{FF9F}";

static ENUM_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[.)]:?\s+").unwrap());
static STEM_NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"2-я основа от").unwrap());
static REGISTER_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:уст|сущ|ономат)\.").unwrap());
static JA_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\([^()]*[{JA}][^()]*\)")).unwrap());
static JA_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"[\[(…]*[{JA}]+(?:[\s,，、]+[{JA}]+)*[\])]?\s*")).unwrap()
});
static LETTER_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[а-яё]\)\s*").unwrap());

/// Produce the short gloss for a translation body.
pub fn summarize(body: &str) -> String {
    let text = pre_strip(body);
    let fragments = split_fragments(&text);
    let Some(first) = fragments.first() else {
        return String::new();
    };

    let mut result = clean_fragment(first);
    if result.is_empty() {
        // Keep something rather than nothing for the leading sense.
        result = first.trim().to_string();
    }

    for frag in &fragments[1..] {
        let frag = frag.trim();
        if frag.is_empty() {
            break;
        }
        let cleaned = clean_fragment(frag);
        if cleaned.is_empty()
            || result.chars().count() + cleaned.chars().count() > SENSE_BUDGET
        {
            break;
        }
        result.push_str(", ");
        result.push_str(&cleaned);
    }

    // A sense cut mid-parenthesis reads better with the parens dropped.
    if result.matches('(').count() != result.matches(')').count() {
        result = result.replace(['(', ')'], "");
    }
    result
}

/// Drop leading annotation lines that never carry a sense: conjugation
/// pointers ("2-я основа от" plus the two forms it introduces) and bare
/// register tags.
fn pre_strip(body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let Some(line0) = lines.first() else {
        return String::new();
    };
    if STEM_NOTE_RE.is_match(line0) {
        return lines.get(3..).unwrap_or(&[]).join("\n");
    }
    if REGISTER_TAG_RE.is_match(line0.trim()) {
        return lines.get(1..).unwrap_or(&[]).join("\n");
    }
    body.to_string()
}

/// Split the body into sense fragments. Enumerated bodies split on the item
/// markers first (discarding any preamble before the first item), then every
/// piece splits on semicolons.
fn split_fragments(text: &str) -> Vec<String> {
    let mut fragments: Vec<String> = if ENUM_ITEM_RE.is_match(text) {
        ENUM_ITEM_RE
            .split(text)
            .skip(1)
            .flat_map(|item| item.split(';'))
            .map(|f| f.trim().to_string())
            .collect()
    } else {
        text.split(';').map(|f| f.trim().to_string()).collect()
    };
    while fragments.first().is_some_and(|f| f.is_empty()) {
        fragments.remove(0);
    }
    fragments
}

/// Strip a fragment down to its Russian gloss: drop a leading usage label
/// ending in ':', Japanese parenthesized asides, Japanese text runs and
/// letter item markers, then trailing punctuation.
fn clean_fragment(frag: &str) -> String {
    let frag = frag.trim();
    let frag = match frag.split_once(':') {
        Some((_, rest)) if !rest.trim().is_empty() => rest,
        _ => frag,
    };
    let frag = JA_PAREN_RE.replace_all(frag, "");
    let frag = JA_RUN_RE.replace_all(&frag, "");
    let frag = LETTER_ITEM_RE.replace(frag.trim(), "");
    frag.trim().trim_end_matches(['.', ' ']).to_string()
}

// ── Tests ──
