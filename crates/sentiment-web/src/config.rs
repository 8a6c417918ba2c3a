//! Surface configuration

use sentiment_classifiers::{BackendKind, ModelConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Surface configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Model acquired at startup
    #[serde(default)]
    pub model: ModelConfig,

    /// Backend providing the classifier capability
    #[serde(default)]
    pub backend: BackendKind,

    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,
}

/// Overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend: Option<BackendKind>,
    pub model: Option<String>,
    pub device: Option<String>,
    pub address: Option<String>,
    pub port: Option<u16>,
}

impl SurfaceConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: impl AsRef<Path>, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();

        // Try to load from file, or use defaults
        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        config.apply(overrides);
        Ok(config)
    }

    /// Apply CLI overrides
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(model) = &overrides.model {
            self.model.id = model.clone();
        }
        if let Some(device) = &overrides.device {
            self.model.inference.device = device.clone();
        }
        if let Some(address) = &overrides.address {
            self.server.address = address.clone();
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiment_classifiers::DEFAULT_MODEL_ID;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            SurfaceConfig::load("/nonexistent/sentiment.yaml", &ConfigOverrides::default())
                .unwrap();
        assert_eq!(config.model.id, DEFAULT_MODEL_ID);
        assert_eq!(config.backend, BackendKind::Candle);
        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backend: lexicon
model:
  id: "local/sst2"
  inference:
    max_length: 128
server:
  port: 8080
"#
        )
        .unwrap();

        let config = SurfaceConfig::load(file.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.backend, BackendKind::Lexicon);
        assert_eq!(config.model.id, "local/sst2");
        assert_eq!(config.model.inference.max_length, 128);
        assert_eq!(config.model.inference.device, "cpu");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.address, "127.0.0.1");
    }

    #[test]
    fn test_overrides_win() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend: lexicon\nserver:\n  port: 8080").unwrap();

        let overrides = ConfigOverrides {
            backend: Some(BackendKind::Candle),
            model: Some("other/model".to_string()),
            device: Some("cuda".to_string()),
            address: Some("0.0.0.0".to_string()),
            port: Some(9000),
        };
        let config = SurfaceConfig::load(file.path(), &overrides).unwrap();

        assert_eq!(config.backend, BackendKind::Candle);
        assert_eq!(config.model.id, "other/model");
        assert_eq!(config.model.inference.device, "cuda");
        assert_eq!(config.server.address, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "backend: [not, a, backend]").unwrap();

        assert!(SurfaceConfig::load(file.path(), &ConfigOverrides::default()).is_err());
    }
}
