use std::collections::HashSet;

use crate::db::Translation;
use crate::parser::variants::expand;

/// Tracks (word, reading) pairs already accepted in the current batch, so
/// adjacent articles for the same entry are stored once. Cleared on flush;
/// across batches the database's unique constraint takes over.
#[derive(Default)]
pub struct SeenSet {
    seen: HashSet<(String, String)>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every key a record can collide under: each written variant from the
    /// header, with ellipses stripped from both sides.
    fn keys(t: &Translation) -> impl Iterator<Item = (String, String)> {
        let reading = t.reading.trim_matches('…').to_string();
        expand(&t.word).into_iter().map(move |w| {
            (w.trim_matches('…').to_string(), reading.clone())
        })
    }

    pub fn is_duplicate(&self, t: &Translation) -> bool {
        Self::keys(t).any(|k| self.seen.contains(&k))
    }

    pub fn mark(&mut self, t: &Translation) {
        self.seen.extend(Self::keys(t));
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

// ── Tests ──
