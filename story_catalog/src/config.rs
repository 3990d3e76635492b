//! Browser configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::story::FieldKey;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Sort direction for the primary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Arrow shown next to the active column header.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Locations of the two data resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    pub stories: PathBuf,
    pub wikisource: PathBuf,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            stories: PathBuf::from("annotations/stories.json"),
            wikisource: PathBuf::from("annotations/wikisource_urls.json"),
        }
    }
}

/// Initial and reset values for the filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDefaults {
    pub min_rating: f64,
    pub max_darkness: f64,
    pub sort_key: String,
    pub sort_dir: SortDirection,
}

impl Default for StateDefaults {
    fn default() -> Self {
        Self {
            min_rating: 1.0,
            max_darkness: 5.0,
            sort_key: "rating_story".to_string(),
            sort_dir: SortDirection::Desc,
        }
    }
}

impl StateDefaults {
    /// The configured sort key, parsed.
    pub fn sort_field(&self) -> FieldKey {
        FieldKey::parse(&self.sort_key)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub data: DataSources,
    /// Directory prefix for each story's local artifact link.
    pub artifact_base: String,
    pub defaults: StateDefaults,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            data: DataSources::default(),
            artifact_base: "../src/epub".to_string(),
            defaults: StateDefaults::default(),
        }
    }
}

impl BrowserConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: BrowserConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file. Relative data paths are resolved against the
    /// file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(dir) = path.parent() {
            config.data.stories = resolve(dir, &config.data.stories);
            config.data.wikisource = resolve(dir, &config.data.wikisource);
        }
        tracing::debug!(config = %path.display(), "loaded browser config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.sort_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "defaults.sort_key",
                reason: "must not be empty".to_string(),
            });
        }
        for (field, value) in [
            ("defaults.min_rating", self.defaults.min_rating),
            ("defaults.max_darkness", self.defaults.max_darkness),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is not a finite number"),
                });
            }
        }
        Ok(())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BrowserConfig::from_toml_str("").unwrap();
        assert_eq!(config, BrowserConfig::default());
        assert_eq!(config.defaults.sort_dir, SortDirection::Desc);
        assert_eq!(config.defaults.sort_field(), FieldKey::rating());
    }

    #[test]
    fn test_partial_config() {
        let config = BrowserConfig::from_toml_str(
            r#"
            artifact_base = "/srv/epub"

            [data]
            stories = "data/s.json"

            [defaults]
            max_darkness = 3
            sort_key = "title"
            sort_dir = "asc"
            "#,
        )
        .unwrap();

        assert_eq!(config.artifact_base, "/srv/epub");
        assert_eq!(config.data.stories, PathBuf::from("data/s.json"));
        assert_eq!(config.data.wikisource, DataSources::default().wikisource);
        assert_eq!(config.defaults.max_darkness, 3.0);
        assert_eq!(config.defaults.min_rating, 1.0);
        assert_eq!(config.defaults.sort_dir, SortDirection::Asc);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            BrowserConfig::from_toml_str("[defaults]\nsort_key = \"\""),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            BrowserConfig::from_toml_str("[defaults]\nsort_dir = \"sideways\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.toml");
        std::fs::write(&path, "[data]\nstories = \"s.json\"\nwikisource = \"/abs/w.json\"\n").unwrap();

        let config = BrowserConfig::load(&path).unwrap();
        assert_eq!(config.data.stories, dir.path().join("s.json"));
        assert_eq!(config.data.wikisource, PathBuf::from("/abs/w.json"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            BrowserConfig::load("/definitely/not/here.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_sort_direction_flip() {
        assert_eq!(SortDirection::Asc.flipped(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.flipped(), SortDirection::Asc);
    }
}
