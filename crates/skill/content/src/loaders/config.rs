//! TOML configuration loader.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::loaders::{LoadResult, read_file};

/// Loader for tuning files such as `forge.toml`.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a config value from a TOML file. Keys absent from the file
    /// fall back to whatever `T`'s serde defaults say.
    pub fn load<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse<T: DeserializeOwned>(content: &str, origin: &str) -> LoadResult<T> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", origin, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Tuning {
        attempts: u32,
        ratio: f32,
    }

    #[test]
    fn missing_keys_use_defaults() {
        let tuning: Tuning = ConfigLoader::parse("attempts = 12\n", "inline").unwrap();
        assert_eq!(
            tuning,
            Tuning {
                attempts: 12,
                ratio: 0.0
            }
        );
    }

    #[test]
    fn parse_errors_name_the_origin() {
        let err = ConfigLoader::parse::<Tuning>("attempts = [", "forge.toml").unwrap_err();
        assert!(err.to_string().contains("forge.toml"));
    }
}
