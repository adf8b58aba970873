use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid engine config: {0}")]
    Invalid(String),
}

/// Default acceptance threshold for the store matcher. Tolerates a couple of
/// OCR substitutions in a typical brand name and rejects unrelated stores.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.72;

/// Words that end the item block of a receipt.
pub const DEFAULT_SENTINEL_KEYWORDS: &[&str] = &[
    "total",
    "subtotal",
    "sub-total",
    "tax",
    "vat",
    "card",
    "cash",
    "change",
    "balance",
    "amount due",
    "tel",
    "phone",
    "visa",
    "mastercard",
    "합계",
    "소계",
    "총액",
    "부가세",
    "세액",
    "과세",
    "면세",
    "카드",
    "결제",
    "받을금액",
    "승인",
    "전화",
];

/// Tunable constants of the extraction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum brand similarity (0.0–1.0) for a store line to count as a match.
    pub match_threshold: f32,
    pub sentinel_keywords: Vec<String>,
    /// Length of a bare digit run treated as a phone number.
    pub phone_digit_run: usize,
    /// Largest integer read as a quantity rather than a price.
    pub max_quantity: u32,
    /// Item names shorter than this (in characters) are dropped as noise.
    pub min_name_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            sentinel_keywords: DEFAULT_SENTINEL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            phone_digit_run: 7,
            max_quantity: 99,
            min_name_chars: 2,
        }
    }
}

impl EngineConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(ConfigError::Invalid(format!(
                "match_threshold must be within 0.0..=1.0, got {}",
                self.match_threshold
            )));
        }
        if self.max_quantity == 0 {
            return Err(ConfigError::Invalid("max_quantity must be at least 1".into()));
        }
        if self.phone_digit_run < 3 {
            return Err(ConfigError::Invalid(format!(
                "phone_digit_run must be at least 3, got {}",
                self.phone_digit_run
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = EngineConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.match_threshold, 0.72);
        assert!(c.sentinel_keywords.iter().any(|k| k == "total"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = EngineConfig::from_toml("match_threshold = 0.8\n").unwrap();
        assert_eq!(c.match_threshold, 0.8);
        assert_eq!(c.max_quantity, 99);
        assert_eq!(c.sentinel_keywords, EngineConfig::default().sentinel_keywords);
    }

    #[test]
    fn custom_sentinels_replace_vocabulary() {
        let c = EngineConfig::from_toml(r#"sentinel_keywords = ["gesamt", "summe"]"#).unwrap();
        assert_eq!(c.sentinel_keywords, vec!["gesamt", "summe"]);
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let err = EngineConfig::from_toml("match_threshold = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_quantity_cap() {
        assert!(EngineConfig::from_toml("max_quantity = 0").is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = EngineConfig::from_toml("match_threshold = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "min_name_chars = 3\n").unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap().min_name_chars, 3);
    }
}
