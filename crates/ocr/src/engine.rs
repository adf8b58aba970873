use crate::assemble::{assemble, ItemExtraction, ItemStage};
use crate::config::EngineConfig;
use crate::item::ItemParser;
use crate::matcher::StoreMatcher;
use crate::segment::Segmenter;
use crate::types::{LineItem, MatchResult, OcrLine, ReceiptScan};

/// Receipt extraction & brand-matching engine.
///
/// Stateless apart from its configuration: every call depends only on its
/// arguments, so one engine can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct ReceiptEngine {
    matcher: StoreMatcher,
    stage: ItemStage,
}

impl ReceiptEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            matcher: StoreMatcher::new(config.match_threshold),
            stage: ItemStage {
                segmenter: Segmenter::from_config(config),
                parser: ItemParser::from_config(config),
            },
        }
    }

    /// Verify `lines` against `brand` and extract the purchased items.
    ///
    /// `None` means the receipt could not be confirmed as coming from `brand`.
    pub fn scan(&self, lines: &[OcrLine], brand: &str) -> Option<ReceiptScan> {
        let result = self.match_store(lines, brand);
        assemble(result, lines, &self.stage)
    }

    /// Convenience for raw recognizer output.
    pub fn scan_texts<S: AsRef<str>>(&self, texts: &[S], brand: &str) -> Option<ReceiptScan> {
        let lines = OcrLine::sequence(texts.iter().map(|t| t.as_ref()));
        self.scan(&lines, brand)
    }

    pub fn match_store(&self, lines: &[OcrLine], brand: &str) -> MatchResult {
        self.matcher.match_store(lines, brand)
    }

    pub fn segment<'a>(&self, lines: &'a [OcrLine], store_line: usize) -> Vec<&'a OcrLine> {
        self.stage.segment(lines, store_line)
    }

    pub fn parse_item(&self, line: &OcrLine) -> Option<LineItem> {
        self.stage.parse_item(line)
    }
}
