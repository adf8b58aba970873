macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static regex::Regex {
            static R: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            R.get_or_init(|| regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub mod assemble;
pub mod config;
pub mod engine;
pub mod item;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod recognizer;
pub mod segment;
pub mod similarity;
pub mod types;

pub use assemble::{assemble, ItemExtraction, ItemStage};
pub use config::{ConfigError, EngineConfig, DEFAULT_MATCH_THRESHOLD};
pub use engine::ReceiptEngine;
pub use item::ItemParser;
pub use matcher::StoreMatcher;
pub use normalize::normalize;
pub use pipeline::{OcrResult, PipelineError, ReceiptPipeline};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};
pub use segment::Segmenter;
pub use types::{LineItem, MatchResult, NormalizedLine, OcrLine, ReceiptScan};
