use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid service config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageHostConfig {
    /// Upload endpoint, e.g. `https://api.cloudinary.com/v1_1/<cloud>/image/upload`.
    pub endpoint: String,
    pub upload_preset: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewApiConfig {
    pub endpoint: String,
}

/// Endpoints of the services the review flow talks to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    pub image_host: ImageHostConfig,
    pub reviews: ReviewApiConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl ServiceConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP client shared by the adapters.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().timeout(self.timeout()).build()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [("image_host.endpoint", &self.image_host.endpoint), ("reviews.endpoint", &self.reviews.endpoint)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!("{name} must be an http(s) URL, got '{url}'")));
            }
        }
        if self.image_host.upload_preset.trim().is_empty() {
            return Err(ConfigError::Invalid("image_host.upload_preset must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[image_host]
endpoint = "https://api.cloudinary.com/v1_1/demo/image/upload"
upload_preset = "menu_image"

[reviews]
endpoint = "https://api.example.com/api/reviews"
"#;

    #[test]
    fn parses_sample_with_default_timeout() {
        let c = ServiceConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(c.image_host.upload_preset, "menu_image");
        assert_eq!(c.reviews.endpoint, "https://api.example.com/api/reviews");
        assert_eq!(c.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn explicit_timeout() {
        let c = ServiceConfig::from_toml(&format!("timeout_secs = 5\n{SAMPLE}")).unwrap();
        assert_eq!(c.timeout_secs, 5);
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let bad = SAMPLE.replace("https://api.example.com", "ftp://example.com");
        assert!(matches!(ServiceConfig::from_toml(&bad), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_missing_section() {
        let err = ServiceConfig::from_toml("[reviews]\nendpoint = \"https://x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_zero_timeout() {
        let c = ServiceConfig::from_toml(&format!("timeout_secs = 0\n{SAMPLE}"));
        assert!(c.is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        assert!(ServiceConfig::load(&path).is_ok());
    }
}
