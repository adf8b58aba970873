use revu_core::Amount;
use tracing::{debug, trace};

use crate::config::DEFAULT_MATCH_THRESHOLD;
use crate::normalize::{normalize, normalize_line};
use crate::similarity::similarity_ratio;
use crate::types::{MatchResult, OcrLine};

/// Locates the line of a receipt that names the claimed brand.
#[derive(Debug, Clone)]
pub struct StoreMatcher {
    pub threshold: f32,
}

impl Default for StoreMatcher {
    fn default() -> Self {
        Self { threshold: DEFAULT_MATCH_THRESHOLD }
    }
}

impl StoreMatcher {
    pub fn new(threshold: f32) -> Self {
        Self { threshold: threshold.clamp(0.0, 1.0) }
    }

    /// Score every non-blank line against `brand` and return the best one if
    /// it clears the threshold. Ties go to the earliest line.
    pub fn match_store(&self, lines: &[OcrLine], brand: &str) -> MatchResult {
        let brand = normalize(brand);
        if brand.is_empty() {
            debug!("blank brand name, refusing to match");
            return MatchResult::NoMatch;
        }

        let mut best: Option<(usize, f32)> = None;
        for line in lines.iter().map(normalize_line) {
            if line.text.is_empty() {
                continue;
            }
            let score = brand_score(&line.text, &brand);
            trace!(position = line.position, score, line = %line.text, "scored store candidate");
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((line.position, score));
            }
        }

        match best {
            Some((store_line, confidence)) if confidence >= self.threshold => {
                debug!(store_line, confidence, "store matched");
                MatchResult::Matched { store_line, confidence }
            }
            Some((position, confidence)) => {
                debug!(position, confidence, threshold = self.threshold, "best candidate below threshold");
                MatchResult::NoMatch
            }
            None => MatchResult::NoMatch,
        }
    }
}

/// Similarity of a normalized line to a normalized brand.
///
/// A verbatim occurrence scores 1.0. Otherwise the better of the whole-line
/// ratio and the ratio of the line's leading words, as many as the brand has,
/// so a branch suffix ("brand cafe gangnam") does not dilute the score. Lines
/// carrying a printed amount are item or total lines and only get the
/// whole-line ratio.
pub fn brand_score(line: &str, brand: &str) -> f32 {
    if line.contains(brand) {
        return 1.0;
    }

    let whole = similarity_ratio(line, brand);

    let words: Vec<&str> = line.split(' ').collect();
    let width = brand.split(' ').count();
    if words.len() <= width || words.iter().any(|w| Amount::parse_printed(w).is_some()) {
        return whole;
    }
    let prefix = similarity_ratio(&words[..width].join(" "), brand);

    whole.max(prefix)
}
