//! Content factory for loading skill content from a data directory.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::loaders::{ConfigLoader, LoadResult, RulesLoader, TemplateRegistry};
use crate::rules::{CouplingTable, SynergyTable};

/// Everything the generator and simulator consume.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub templates: TemplateRegistry,
    pub synergies: SynergyTable,
    pub couplings: CouplingTable,
}

impl ContentBundle {
    /// Content compiled into this crate.
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self {
            templates: TemplateRegistry::load_embedded()?,
            synergies: RulesLoader::embedded_synergies()?,
            couplings: RulesLoader::embedded_couplings()?,
        })
    }
}

/// Content factory that loads skill content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── templates.ron
/// ├── synergies.ron
/// ├── couplings.ron
/// └── forge.toml      (optional)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the template catalog from `templates.ron`.
    pub fn load_templates(&self) -> LoadResult<TemplateRegistry> {
        TemplateRegistry::load(&self.data_dir.join("templates.ron"))
    }

    /// Load the synergy table from `synergies.ron`.
    pub fn load_synergies(&self) -> LoadResult<SynergyTable> {
        RulesLoader::load_synergies(&self.data_dir.join("synergies.ron"))
    }

    /// Load the coupling table from `couplings.ron`.
    pub fn load_couplings(&self) -> LoadResult<CouplingTable> {
        RulesLoader::load_couplings(&self.data_dir.join("couplings.ron"))
    }

    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        Ok(ContentBundle {
            templates: self.load_templates()?,
            synergies: self.load_synergies()?,
            couplings: self.load_couplings()?,
        })
    }

    /// Load generator tuning from `forge.toml`, or `T::default()` when the
    /// file does not exist.
    pub fn load_config<T: DeserializeOwned + Default>(&self) -> LoadResult<T> {
        let path = self.data_dir.join("forge.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no generator config, using defaults");
            return Ok(T::default());
        }
        ConfigLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn embedded_bundle_loads() {
        let bundle = ContentBundle::embedded().unwrap();
        assert!(!bundle.templates.is_empty());
        assert!(!bundle.synergies.is_empty());
        assert!(!bundle.couplings.is_empty());
    }
}
