//! Article parsing: header matching, segmentation into word/reading/body,
//! and condensing the body into a short main sense.

pub mod mainsense;
pub mod matcher;
pub mod script;
pub mod segment;
pub mod variants;

use crate::db::Translation;
use crate::error::ExtractError;
use crate::kana::KanaService;

/// Turn one raw article into a translation record. Returns Ok(None) when the
/// article is only a cross-reference stub.
pub fn process_article(
    raw: &str,
    kana: &dyn KanaService,
) -> Result<Option<Translation>, ExtractError> {
    let Some(seg) = segment::segment(raw, kana)? else {
        return Ok(None);
    };
    let main_sense = mainsense::summarize(&seg.body);
    Ok(Some(Translation {
        word: seg.word,
        reading: seg.reading,
        main_sense,
        senses: seg.body,
        source_index: None,
        examples: Vec::new(),
    }))
}

// ── Tests ──
