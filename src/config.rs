use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::generator::Backend;

/// Credentials picked up from the environment (and `.env`).
#[derive(Deserialize, Debug, Default)]
pub struct Environment {
    pub huggingface_api_token: Option<String>,
    pub anthropic_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Config {
    /// Reads the config file. An explicitly requested file must exist; the
    /// default location may be absent, in which case defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match resolve_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Config::default()),
            },
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config TOML from {}", path.display()))
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("HEISENBERG_CONFIG") {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|base| base.join("heisenberg").join("config.toml"))
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_responses_path")]
    pub responses: PathBuf,
    #[serde(default = "default_extra_path")]
    pub extra: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            responses: default_responses_path(),
            extra: default_extra_path(),
        }
    }
}

fn default_responses_path() -> PathBuf {
    PathBuf::from("responses.json")
}

fn default_extra_path() -> PathBuf {
    PathBuf::from("extra_responses.json")
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "default_backend")]
    pub backend: Backend,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model: None,
            endpoint: None,
            max_length: default_max_length(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_backend() -> Backend {
    Backend::Naive
}

fn default_max_length() -> usize {
    50
}

fn default_timeout_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.files.responses, PathBuf::from("responses.json"));
        assert_eq!(config.generation.backend, Backend::Naive);
        assert_eq!(config.generation.max_length, 50);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [files]
            extra = "/srv/heisenberg/extra.json"

            [generation]
            backend = "huggingface"
            model = "gpt2"
            "#,
        )
        .unwrap();

        assert_eq!(config.files.responses, PathBuf::from("responses.json"));
        assert_eq!(config.files.extra, PathBuf::from("/srv/heisenberg/extra.json"));
        assert_eq!(config.generation.backend, Backend::Huggingface);
        assert_eq!(config.generation.model.as_deref(), Some("gpt2"));
        assert_eq!(config.generation.timeout_secs, 60);
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generation]\nmax_length = 80\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.generation.max_length, 80);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(toml::from_str::<Config>("[generation]\nbackend = \"gpt\"\n").is_err());
    }
}
