//! Configuration for reference data resources

use crate::error::{ExtractorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the JSON reference resources.
    pub data_dir: PathBuf,
    /// Skill taxonomy file name inside `data_dir`.
    pub taxonomy_file: String,
    /// Country directory file name inside `data_dir`.
    pub countries_file: String,
    /// Maximum n-gram length used by the skill matcher.
    pub max_ngram: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            taxonomy_file: "skill_taxonomy.json".to_string(),
            countries_file: "countries.json".to_string(),
            max_ngram: 3,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ExtractorError::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Load from a TOML file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    pub fn taxonomy_path(&self) -> PathBuf {
        self.data_dir.join(&self.taxonomy_file)
    }

    pub fn countries_path(&self) -> PathBuf {
        self.data_dir.join(&self.countries_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(config.taxonomy_path(), PathBuf::from("data/skill_taxonomy.json"));
        assert_eq!(config.countries_path(), PathBuf::from("data/countries.json"));
        assert_eq!(config.max_ngram, 3);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("does/not/exist.toml"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }
}
