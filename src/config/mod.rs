//! Runtime configuration loading

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Process-level configuration for the API server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Default tracing filter, overridable via `RUST_LOG`
    #[serde(default = "default_log")]
    pub log: String,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_log() -> String {
    "crm=info,tower_http=info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log: default_log(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml_str(&content)?)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
