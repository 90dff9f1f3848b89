use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_max_lines() -> usize {
    1000
}

fn default_max_bytes() -> usize {
    2_000_000
}

fn default_min_text_chars() -> usize {
    30
}

fn default_true() -> bool {
    true
}

/// Limits applied while turning a specification file into lines.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Fewer non-whitespace characters than this means a scanned PDF.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            max_bytes: default_max_bytes(),
            min_text_chars: default_min_text_chars(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub pretty: bool,
    #[serde(default)]
    pub include_projection: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            include_projection: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.log_filter, "info");
        assert_eq!(cfg.extraction.max_lines, 1000);
        assert_eq!(cfg.extraction.max_bytes, 2_000_000);
        assert!(cfg.output.pretty);
        assert!(!cfg.output.include_projection);
    }

    #[test]
    fn test_partial_sections() {
        let cfg: Config = toml::from_str(
            r#"
            log_filter = "debug"

            [extraction]
            max_lines = 50

            [output]
            include_projection = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.log_filter, "debug");
        assert_eq!(cfg.extraction.max_lines, 50);
        assert_eq!(cfg.extraction.min_text_chars, 30);
        assert!(cfg.output.pretty);
        assert!(cfg.output.include_projection);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = Config::load_or_default("does/not/exist.toml").unwrap();
        assert_eq!(cfg.extraction.max_lines, 1000);
        assert!(Config::load("does/not/exist.toml").is_err());
    }
}
