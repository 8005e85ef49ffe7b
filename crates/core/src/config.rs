use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Default acceptance threshold for the fuzzy locator. A policy constant, not
/// derived from data — override it in `docanchor.toml`.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Knobs for the reconciliation pass. Passed in explicitly — never read from
/// global state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// A candidate fragment is accepted only when its similarity ratio is
    /// strictly greater than this.
    pub similarity_threshold: f64,
    /// Hand matched fields to the generative refinement backend. Refinement
    /// failures fall back to the local match either way.
    pub enable_refinement: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        ReconcileConfig {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            enable_refinement: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeminiConfig {
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig { model: DEFAULT_GEMINI_MODEL.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub reconcile: ReconcileConfig,
    pub gemini: GeminiConfig,
}

impl Config {
    /// Parse a TOML config file. An absent file means defaults; a
    /// present-but-invalid file is an error.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.reconcile.similarity_threshold, 0.5);
        assert!(!config.reconcile.enable_refinement);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn parses_full_file() {
        let config: Config = toml::from_str(
            r#"
            [reconcile]
            similarity_threshold = 0.65
            enable_refinement = true

            [gemini]
            model = "gemini-1.5-pro"
            "#,
        )
        .unwrap();
        assert_eq!(config.reconcile.similarity_threshold, 0.65);
        assert!(config.reconcile.enable_refinement);
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [reconcile]
            similarity_threshold = 0.7
            "#,
        )
        .unwrap();
        assert_eq!(config.reconcile.similarity_threshold, 0.7);
        assert!(!config.reconcile.enable_refinement);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [reconcile]
            similiarity_threshold = 0.7
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/docanchor.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_or_default_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docanchor.toml");
        std::fs::write(&path, "[reconcile]\nenable_refinement = true\n").unwrap();
        let config = Config::load_or_default(&path).unwrap();
        assert!(config.reconcile.enable_refinement);
    }

    #[test]
    fn load_or_default_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docanchor.toml");
        std::fs::write(&path, "[reconcile\n").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }
}
