use revu_core::Amount;

use crate::config::EngineConfig;
use crate::normalize::is_noise;
use crate::types::{LineItem, OcrLine};

re!(re_amount,
    r"^[$₩€£¥￦]?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?[$₩€£¥원￦]?$");
re!(re_quantity,
    r"^[xX×]?(\d{1,3})(?:[xX×]|개|ea|EA)?$");

/// Splits a receipt line into name, quantity and price.
#[derive(Debug, Clone)]
pub struct ItemParser {
    pub max_quantity: u32,
    pub min_name_chars: usize,
}

impl Default for ItemParser {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ItemParser {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self { max_quantity: config.max_quantity, min_name_chars: config.min_name_chars }
    }

    /// Parse `name [unit-price] [qty] price [flag]`.
    ///
    /// Returns `None` when what is left for the name is too short or has no
    /// letters: section headers, stray totals and phone numbers.
    pub fn parse_item(&self, line: &OcrLine) -> Option<LineItem> {
        let raw = line.text.as_str();
        let toks = tokens(raw);
        let mut end = toks.len();

        // A one-letter tax/discount flag may trail the price ("4200 T").
        if end >= 2 && is_flag(toks[end - 1].1) && parse_amount(toks[end - 2].1).is_some() {
            end -= 1;
        }

        let mut price = None;
        let mut quantity = None;
        let mut unit_price = None;

        if let Some(p) = end.checked_sub(1).and_then(|i| parse_amount(toks[i].1)) {
            price = Some(p);
            end -= 1;
            if let Some(q) = end.checked_sub(1).and_then(|i| self.parse_quantity(toks[i].1)) {
                quantity = Some(q);
                end -= 1;
                // Only a column that multiplies out to the price is a unit
                // price; otherwise the number belongs to the name ("Evian 500").
                if let Some(u) = end
                    .checked_sub(1)
                    .and_then(|i| parse_amount(toks[i].1))
                    .filter(|u| u.times(q) == Some(p))
                {
                    unit_price = Some(u);
                    end -= 1;
                }
            }
        }

        if end == 0 {
            return None;
        }
        let (first, _) = toks[0];
        let (last_start, last) = toks[end - 1];
        let name = raw[first..last_start + last.len()]
            .trim_matches(|c: char| is_noise(c) || c.is_whitespace());

        if name.chars().count() < self.min_name_chars || !name.chars().any(char::is_alphabetic) {
            return None;
        }

        Some(LineItem {
            name: name.to_string(),
            quantity: quantity.unwrap_or(1),
            price,
            unit_price,
        })
    }

    fn parse_quantity(&self, token: &str) -> Option<u32> {
        let c = re_quantity().captures(token)?;
        let q: u32 = c.get(1)?.as_str().parse().ok()?;
        (1..=self.max_quantity).contains(&q).then_some(q)
    }
}

fn parse_amount(token: &str) -> Option<Amount> {
    if !re_amount().is_match(token) {
        return None;
    }
    Amount::parse_printed(token)
}

fn is_flag(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_ascii_digit())
}

/// Whitespace-separated tokens with their byte offsets into `s`.
fn tokens(s: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(st)) => {
                out.push((st, &s[st..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(st) = start {
        out.push((st, &s[st..]));
    }
    out
}
