use tracing::trace;

use crate::config::EngineConfig;
use crate::normalize::normalize;
use crate::types::OcrLine;

re!(re_phone_separated,
    r"\(?\b\d{2,4}\)?[\-.)]\s*\d{3,4}[\-.]\d{4}\b");
re!(re_date_ymd,
    r"\b\d{4}[\-/.]\d{1,2}[\-/.]\d{1,2}\b");
re!(re_date_dmy,
    r"\b\d{1,2}[\-/.]\d{1,2}[\-/.]\d{2,4}\b");
re!(re_date_korean,
    r"\d{2,4}\s*년\s*\d{1,2}\s*월");

/// Characters that make up ruled separator lines on printed receipts.
const SEPARATORS: &[char] = &['-', '=', '_', '.', '#', '+', ':', '~', '*'];

/// Finds the block of item lines that follows the store line.
#[derive(Debug, Clone)]
pub struct Segmenter {
    keywords: Vec<String>,
    phone_digit_run: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Segmenter {
    pub fn from_config(config: &EngineConfig) -> Self {
        let keywords = config
            .sentinel_keywords
            .iter()
            .map(|k| normalize(k))
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords, phone_digit_run: config.phone_digit_run }
    }

    /// Lines after `store_line` up to (not including) the first sentinel, or
    /// to the end of the receipt. Separator-only lines are skipped.
    ///
    /// # Panics
    ///
    /// Panics if no line in `lines` has position `store_line`; the store line
    /// must come from a match over the same receipt.
    pub fn segment<'a>(&self, lines: &'a [OcrLine], store_line: usize) -> Vec<&'a OcrLine> {
        let start = lines
            .iter()
            .position(|l| l.position == store_line)
            .unwrap_or_else(|| panic!("store line {store_line} is not part of this receipt"));

        let mut block = Vec::new();
        for line in &lines[start + 1..] {
            let norm = normalize(&line.text);
            if is_separator_line(&norm) {
                continue;
            }
            if self.is_sentinel(&norm) {
                trace!(position = line.position, line = %norm, "item block ends at sentinel");
                break;
            }
            block.push(line);
        }
        block
    }

    /// Whether a normalized line marks the end of the item block.
    pub fn is_sentinel(&self, norm: &str) -> bool {
        self.has_keyword(norm) || self.looks_like_phone(norm) || looks_like_date(norm)
    }

    fn has_keyword(&self, norm: &str) -> bool {
        let tokens: Vec<&str> = norm
            .split(' ')
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|t| !t.is_empty())
            .collect();

        self.keywords.iter().any(|kw| {
            if kw.contains(' ') || !kw.chars().all(char::is_alphanumeric) {
                // Multi-word or punctuated keywords anchor at the start of the line.
                norm.starts_with(kw.as_str())
            } else if kw.is_ascii() {
                tokens.iter().any(|t| t == kw)
            } else {
                // Hangul keywords are glued to the following noun ("합계금액").
                tokens.iter().any(|t| t.starts_with(kw.as_str()))
            }
        })
    }

    fn looks_like_phone(&self, norm: &str) -> bool {
        if re_phone_separated().is_match(norm) {
            return true;
        }
        let mut run = 0usize;
        for c in norm.chars() {
            if c.is_ascii_digit() {
                run += 1;
                if run >= self.phone_digit_run {
                    return true;
                }
            } else {
                run = 0;
            }
        }
        false
    }
}

fn looks_like_date(norm: &str) -> bool {
    re_date_ymd().is_match(norm) || re_date_dmy().is_match(norm) || re_date_korean().is_match(norm)
}

fn is_separator_line(norm: &str) -> bool {
    norm.chars().all(|c| c.is_whitespace() || SEPARATORS.contains(&c))
}
