//! Configuration for the web boundary, loaded from TOML.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub server: ServerInfo,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Bind address, e.g. "127.0.0.1:3000".
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploaded and encoded images are written.
    pub folder: String,
    /// Lowercase extensions accepted for upload.
    pub allowed_extensions: Vec<String>,
    /// Reject multipart image fields larger than this.
    pub max_upload_bytes: usize,
}

impl WebConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: WebConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

impl UploadConfig {
    /// True when the filename carries one of the allowed extensions.
    pub fn is_allowed(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| self.allowed_extensions.iter().any(|a| a == &ext.to_lowercase()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploads() -> UploadConfig {
        UploadConfig {
            folder: "uploads".to_string(),
            allowed_extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }

    #[test]
    fn test_extension_filter() {
        let config = uploads();
        assert!(config.is_allowed("photo.png"));
        assert!(config.is_allowed("photo.JPG"));
        assert!(config.is_allowed("archive.tar.jpeg"));
        assert!(!config.is_allowed("photo.gif"));
        assert!(!config.is_allowed("no_extension"));
    }

    #[test]
    fn test_config_parses() {
        let config: WebConfig = toml::from_str(
            r#"
            [server]
            address = "127.0.0.1:3000"

            [uploads]
            folder = "uploads"
            allowed_extensions = ["png", "jpg", "jpeg"]
            max_upload_bytes = 10485760
            "#,
        )
        .unwrap();
        assert_eq!(config.server.address, "127.0.0.1:3000");
        assert!(config.uploads.is_allowed("a.jpeg"));
    }
}
