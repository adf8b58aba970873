use crate::types::{NormalizedLine, OcrLine};

/// Glyphs that OCR engines commonly hallucinate from table rules, bullets and
/// thermal-printer artifacts.
const NOISE: &[char] = &[
    '|', '¦', '│', '┃', '•', '·', '∙', '◦', '‣', '▪', '▫', '■', '□', '●', '○', '◆', '◇', '*', '`',
    '~',
];

pub fn is_noise(c: char) -> bool {
    NOISE.contains(&c)
}

/// Fold a raw OCR line for comparison: lowercase, noise glyphs and control
/// characters become spaces, whitespace runs collapse to one space, trimmed.
///
/// Total and idempotent.
pub fn normalize(line: &str) -> String {
    let spaced: String = line
        .chars()
        .map(|c| if is_noise(c) || c.is_control() { ' ' } else { c })
        .collect();
    spaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_line(line: &OcrLine) -> NormalizedLine {
    NormalizedLine { position: line.position, text: normalize(&line.text) }
}
