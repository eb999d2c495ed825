//! Environment-driven CLI configuration.
use std::env;
use std::path::PathBuf;

/// Settings read once at startup.
///
/// Command-line flags override these per invocation.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    /// Directory holding `templates.ron`, `synergies.ron`, `couplings.ron`
    /// and an optional `forge.toml`. Embedded content is used when unset.
    pub data_dir: Option<PathBuf>,
    /// Overrides `GeneratorConfig::max_attempts`.
    pub max_attempts: Option<u32>,
    /// Overrides `GeneratorConfig::history_capacity`.
    pub history_capacity: Option<usize>,
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SKILL_DATA_DIR` - content directory (default: embedded content)
    /// - `FORGE_MAX_ATTEMPTS` - generator attempts before fallback (min 1)
    /// - `FORGE_HISTORY` - duplicate-avoidance history length
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("SKILL_DATA_DIR")
            && !dir.trim().is_empty()
        {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(attempts) = read_env::<u32>("FORGE_MAX_ATTEMPTS") {
            config.max_attempts = Some(attempts.max(1));
        }
        if let Some(capacity) = read_env::<usize>("FORGE_HISTORY") {
            config.history_capacity = Some(capacity);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
