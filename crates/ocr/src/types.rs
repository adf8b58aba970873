use revu_core::Amount;
use serde::{Deserialize, Serialize};

/// One recognized text line, in the order the recognizer produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrLine {
    pub position: usize,
    pub text: String,
}

impl OcrLine {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self { position, text: text.into() }
    }

    /// Number raw recognizer output in reading order, starting at 0.
    pub fn sequence<I, S>(texts: I) -> Vec<OcrLine>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(position, text)| OcrLine::new(position, text))
            .collect()
    }
}

/// Folded form of an [`OcrLine`], used only for comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    pub position: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    NoMatch,
    Matched {
        /// Position of the store line within the scanned receipt.
        store_line: usize,
        /// Similarity to the claimed brand (0.0–1.0).
        confidence: f32,
    },
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    pub fn confidence(&self) -> f32 {
        match self {
            MatchResult::Matched { confidence, .. } => *confidence,
            MatchResult::NoMatch => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    /// Defaults to 1 when the receipt line carries no explicit quantity.
    pub quantity: u32,
    /// Rightmost amount on the line.
    pub price: Option<Amount>,
    /// Amount printed before an explicit quantity (`name unit qty total`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Amount>,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: u32, price: Option<Amount>) -> Self {
        Self { name: name.into(), quantity, price, unit_price: None }
    }
}

/// A receipt verified against the claimed brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptScan {
    /// The matched line exactly as recognized.
    pub store_name: String,
    pub products: Vec<LineItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_assigns_reading_order() {
        let lines = OcrLine::sequence(["A", "B", "C"]);
        assert_eq!(lines.iter().map(|l| l.position).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(lines[2].text, "C");
    }

    #[test]
    fn match_result_confidence() {
        assert_eq!(MatchResult::NoMatch.confidence(), 0.0);
        let m = MatchResult::Matched { store_line: 3, confidence: 0.9 };
        assert!(m.is_match());
        assert_eq!(m.confidence(), 0.9);
    }

    #[test]
    fn receipt_scan_serializes_camel_case() {
        let scan = ReceiptScan {
            store_name: "BRAND CAFE".into(),
            products: vec![LineItem::new("Americano", 1, Some(Amount::from(3000)))],
        };
        let json = serde_json::to_value(&scan).unwrap();
        assert_eq!(json["storeName"], "BRAND CAFE");
        assert_eq!(json["products"][0]["name"], "Americano");
        assert_eq!(json["products"][0]["quantity"], 1);
        assert_eq!(json["products"][0]["price"], "3000");
        assert!(json["products"][0].get("unitPrice").is_none());
    }
}
