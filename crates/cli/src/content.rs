//! Resolves content and generator tuning for a command.

use anyhow::Result;
use forge::GeneratorConfig;
use skill_content::{ContentBundle, ContentFactory};

use crate::config::CliConfig;

/// Loads content from the configured data directory, or the embedded copy,
/// and applies environment overrides to the generator config.
pub fn load(config: &CliConfig) -> Result<(ContentBundle, GeneratorConfig)> {
    let (bundle, mut generator) = match &config.data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "loading content from data directory");
            let factory = ContentFactory::new(dir);
            (factory.load_bundle()?, factory.load_config::<GeneratorConfig>()?)
        }
        None => {
            tracing::debug!("using embedded content");
            (ContentBundle::embedded()?, GeneratorConfig::default())
        }
    };

    if let Some(attempts) = config.max_attempts {
        generator.max_attempts = attempts;
    }
    if let Some(capacity) = config.history_capacity {
        generator.history_capacity = capacity;
    }

    tracing::debug!(
        templates = bundle.templates.len(),
        synergies = bundle.synergies.len(),
        couplings = bundle.couplings.len(),
        "content ready"
    );
    Ok((bundle, generator))
}
