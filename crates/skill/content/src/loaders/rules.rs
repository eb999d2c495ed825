//! Synergy and coupling table loaders.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::rules::{CouplingRule, CouplingTable, SynergyRule, SynergyTable};

/// Loader for the effect relationship tables.
pub struct RulesLoader;

impl RulesLoader {
    pub fn embedded_synergies() -> LoadResult<SynergyTable> {
        Self::parse_synergies(include_str!("../../data/synergies.ron"), "synergies.ron")
    }

    pub fn embedded_couplings() -> LoadResult<CouplingTable> {
        Self::parse_couplings(include_str!("../../data/couplings.ron"), "couplings.ron")
    }

    pub fn load_synergies(path: &Path) -> LoadResult<SynergyTable> {
        let content = read_file(path)?;
        Self::parse_synergies(&content, &path.display().to_string())
    }

    pub fn load_couplings(path: &Path) -> LoadResult<CouplingTable> {
        let content = read_file(path)?;
        Self::parse_couplings(&content, &path.display().to_string())
    }

    /// Every rule must name at least two distinct tags.
    pub fn parse_synergies(source: &str, origin: &str) -> LoadResult<SynergyTable> {
        let rules: Vec<SynergyRule> = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", origin, e))?;
        for rule in &rules {
            let mut distinct = rule.tags.clone();
            distinct.sort_unstable();
            distinct.dedup();
            anyhow::ensure!(
                distinct.len() >= 2,
                "Synergy {} in {} needs at least two distinct tags",
                rule.name,
                origin
            );
        }
        Ok(SynergyTable::new(rules))
    }

    /// Companion weights must lie in `0.0..=1.0`.
    pub fn parse_couplings(source: &str, origin: &str) -> LoadResult<CouplingTable> {
        let rules: Vec<CouplingRule> = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", origin, e))?;
        for rule in &rules {
            for companion in &rule.companions {
                anyhow::ensure!(
                    (0.0..=1.0).contains(&companion.weight),
                    "Coupling {} -> {} in {} has weight {} outside 0..=1",
                    rule.trigger,
                    companion.tag,
                    origin,
                    companion.weight
                );
            }
        }
        Ok(CouplingTable::new(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_core::EffectTag;

    #[test]
    fn embedded_tables_load() {
        let synergies = RulesLoader::embedded_synergies().unwrap();
        let couplings = RulesLoader::embedded_couplings().unwrap();
        assert!(!synergies.is_empty());
        assert!(!couplings.companions(EffectTag::Counter).is_empty());
    }

    #[test]
    fn single_tag_synergy_is_rejected() {
        let source = r#"[(name: "solo", tags: [Stun, Stun], bonus: {})]"#;
        assert!(RulesLoader::parse_synergies(source, "inline").is_err());
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let source = r#"[(trigger: Mark, companions: [(tag: Payout, priority: 1, weight: 1.5)])]"#;
        assert!(RulesLoader::parse_couplings(source, "inline").is_err());
    }
}
