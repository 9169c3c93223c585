use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{HttpError, ValidatedUrl};
use crate::model::Language;

pub const DEFAULT_API_BASE_URL: &str = "https://api.carsouq.app";
pub const DEFAULT_LISTINGS_PATH: &str = "/api/cars";
pub const DEFAULT_MAX_IMAGES: usize = 10;
pub const MAX_IMAGES_LIMIT: usize = 30;
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 2000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(String),

    #[error("invalid api base url: {0}")]
    BaseUrl(#[from] HttpError),

    #[error("listings path must start with '/': {0}")]
    ListingsPath(String),

    #[error("{name} must be within 1..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: usize,
        max: usize,
    },
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Runtime settings supplied by the shell. Everything has a usable default.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub listings_path: String,
    pub max_images: usize,
    pub max_image_bytes: usize,
    pub max_description_len: usize,
    pub default_language: Language,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            listings_path: DEFAULT_LISTINGS_PATH.into(),
            max_images: DEFAULT_MAX_IMAGES,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
            default_language: Language::English,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        ValidatedUrl::new(self.api_base_url.as_str())?;

        if !self.listings_path.starts_with('/') {
            return Err(ConfigError::ListingsPath(self.listings_path));
        }

        if self.max_images == 0 || self.max_images > MAX_IMAGES_LIMIT {
            return Err(ConfigError::OutOfRange {
                name: "max_images",
                value: self.max_images,
                max: MAX_IMAGES_LIMIT,
            });
        }

        if self.max_image_bytes == 0 || self.max_image_bytes > crate::capabilities::MAX_REQUEST_BODY_SIZE {
            return Err(ConfigError::OutOfRange {
                name: "max_image_bytes",
                value: self.max_image_bytes,
                max: crate::capabilities::MAX_REQUEST_BODY_SIZE,
            });
        }

        if self.max_description_len == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max_description_len",
                value: 0,
                max: usize::MAX,
            });
        }

        Ok(self)
    }

    /// Absolute URL of the listings endpoint.
    pub fn listings_url(&self) -> Result<ValidatedUrl, HttpError> {
        let base = self.api_base_url.trim_end_matches('/');
        ValidatedUrl::new(format!("{base}{}", self.listings_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(AppConfig::default().validated().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = AppConfig::from_json(r#"{"default_language":"ar","max_images":4}"#).unwrap();
        assert_eq!(config.default_language, Language::Arabic);
        assert_eq!(config.max_images, 4);
        assert_eq!(config.listings_path, DEFAULT_LISTINGS_PATH);
    }

    #[test]
    fn rejects_bad_scheme() {
        let result = AppConfig::from_json(r#"{"api_base_url":"ftp://files.example.com"}"#);
        assert!(matches!(result, Err(ConfigError::BaseUrl(_))));
    }

    #[test]
    fn rejects_relative_path() {
        let result = AppConfig::from_json(r#"{"listings_path":"api/cars"}"#);
        assert!(matches!(result, Err(ConfigError::ListingsPath(_))));
    }

    #[test]
    fn rejects_zero_images() {
        let result = AppConfig::from_json(r#"{"max_images":0}"#);
        assert!(matches!(
            result,
            Err(ConfigError::OutOfRange { name: "max_images", .. })
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(AppConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn listings_url_joins_without_double_slash() {
        let config = AppConfig {
            api_base_url: "https://api.example.com/".into(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.listings_url().unwrap().as_str(),
            "https://api.example.com/api/cars"
        );
    }
}
