use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ConcordError, Result};

/// Top-level configuration for the Concord service.
///
/// Loaded from `~/.concord/config.toml` by default. Each section corresponds
/// to one subsystem; every field has a default so a partial (or absent) file
/// still yields a runnable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcordConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

impl Default for ConcordConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            search: SearchConfig::default(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

impl ConcordConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ConcordConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConcordError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path to the corpus text file (one verse per line).
    pub corpus_path: String,
    /// HTTP listen port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            corpus_path: "data/corpus.txt".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

/// Search behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results returned when the request does not specify k.
    pub default_k: usize,
    /// Upper bound applied to requested k.
    pub max_k: usize,
    /// Nearest-neighbor backend: "exact" or "hnsw".
    pub index_backend: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: 5,
            max_k: 50,
            index_backend: "exact".to_string(),
        }
    }
}

/// Embedding model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Directory containing `model.onnx` and `tokenizer.json`. When unset,
    /// the deterministic hash embedder is used instead of a real model.
    pub model_dir: Option<String>,
    /// Embedding dimension.
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            dimension: 384,
        }
    }
}

/// Retrieval strategy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Strategy: "keyword", "dense", or "completion".
    pub strategy: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            strategy: "dense".to_string(),
        }
    }
}

/// Remote completion API settings (used by the "completion" strategy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// API base URL.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Maximum tokens the model may generate.
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 512,
            api_key_env: "CONCORD_API_KEY".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ConcordConfig::default();
        assert_eq!(config.general.corpus_path, "data/corpus.txt");
        assert_eq!(config.general.port, 8000);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.search.default_k, 5);
        assert_eq!(config.search.max_k, 50);
        assert_eq!(config.search.index_backend, "exact");
        assert_eq!(config.embedding.dimension, 384);
        assert!(config.embedding.model_dir.is_none());
        assert_eq!(config.retrieval.strategy, "dense");
        assert_eq!(config.completion.api_key_env, "CONCORD_API_KEY");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
corpus_path = "/srv/corpus/kjv.txt"
port = 9000
log_level = "debug"

[search]
default_k = 10
max_k = 100
index_backend = "hnsw"

[retrieval]
strategy = "keyword"
"#;
        let file = create_temp_config(content);
        let config = ConcordConfig::load(file.path()).unwrap();
        assert_eq!(config.general.corpus_path, "/srv/corpus/kjv.txt");
        assert_eq!(config.general.port, 9000);
        assert_eq!(config.search.default_k, 10);
        assert_eq!(config.search.index_backend, "hnsw");
        assert_eq!(config.retrieval.strategy, "keyword");
        // Unspecified sections use defaults.
        assert_eq!(config.embedding.dimension, 384);
        assert_eq!(config.completion.max_tokens, 512);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "warn"
"#;
        let file = create_temp_config(content);
        let config = ConcordConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.port, 8000);
        assert_eq!(config.search.default_k, 5);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConcordConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.port, 8000);
        assert_eq!(config.retrieval.strategy, "dense");
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "this is {{ not valid TOML";
        let file = create_temp_config(content);
        assert!(ConcordConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = ConcordConfig::load(file.path()).unwrap();
        assert_eq!(config.general.corpus_path, "data/corpus.txt");
        assert_eq!(config.search.max_k, 50);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ConcordConfig::default();
        config.general.port = 8123;
        config.search.index_backend = "hnsw".to_string();
        config.save(&path).unwrap();

        let reloaded = ConcordConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.port, 8123);
        assert_eq!(reloaded.search.index_backend, "hnsw");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dir").join("config.toml");

        ConcordConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = ConcordConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let deserialized: ConcordConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.general.corpus_path, config.general.corpus_path);
        assert_eq!(deserialized.search.default_k, config.search.default_k);
        assert_eq!(deserialized.retrieval.strategy, config.retrieval.strategy);
        assert_eq!(deserialized.completion.base_url, config.completion.base_url);
    }
}
