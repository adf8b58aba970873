use tracing::{debug, trace};

use crate::item::ItemParser;
use crate::segment::Segmenter;
use crate::types::{LineItem, MatchResult, OcrLine, ReceiptScan};

/// The post-match half of the engine: finding item lines and parsing them.
///
/// Only consulted once a store line has been matched.
pub trait ItemExtraction {
    fn segment<'a>(&self, lines: &'a [OcrLine], store_line: usize) -> Vec<&'a OcrLine>;
    fn parse_item(&self, line: &OcrLine) -> Option<LineItem>;
}

#[derive(Debug, Clone, Default)]
pub struct ItemStage {
    pub segmenter: Segmenter,
    pub parser: ItemParser,
}

impl ItemExtraction for ItemStage {
    fn segment<'a>(&self, lines: &'a [OcrLine], store_line: usize) -> Vec<&'a OcrLine> {
        self.segmenter.segment(lines, store_line)
    }

    fn parse_item(&self, line: &OcrLine) -> Option<LineItem> {
        self.parser.parse_item(line)
    }
}

/// Build the scan for a matched receipt. `NoMatch` returns `None` without
/// touching `stage`.
///
/// # Panics
///
/// Panics if a `Matched` store line is not among `lines`.
pub fn assemble<S: ItemExtraction + ?Sized>(
    result: MatchResult,
    lines: &[OcrLine],
    stage: &S,
) -> Option<ReceiptScan> {
    let MatchResult::Matched { store_line, .. } = result else {
        return None;
    };

    let store_name = lines
        .iter()
        .find(|l| l.position == store_line)
        .map(|l| l.text.clone())
        .unwrap_or_else(|| panic!("store line {store_line} is not part of this receipt"));

    let block = stage.segment(lines, store_line);
    let products: Vec<LineItem> = block
        .into_iter()
        .filter_map(|line| {
            let item = stage.parse_item(line);
            if item.is_none() {
                trace!(position = line.position, line = %line.text, "dropped unparseable item line");
            }
            item
        })
        .collect();

    debug!(store = %store_name, items = products.len(), "receipt assembled");
    Some(ReceiptScan { store_name, products })
}
