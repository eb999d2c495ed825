//! Data-driven skill content and loaders.
//!
//! This crate houses the authored skill catalog and the effect relationship
//! tables:
//! - Skill templates (RON)
//! - Synergy table: tag combinations rewarded with extra budget (RON)
//! - Coupling table: advisory companion tags (RON)
//! - Generator tuning (TOML)
//!
//! Everything is embedded at build time and can be overridden from a data
//! directory through [`ContentFactory`].

pub mod loaders;
pub mod rules;

pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, LoadResult, RulesLoader, TemplateRegistry,
};
pub use rules::{
    Companion, CouplingRule, CouplingTable, Suggestion, SynergyGain, SynergyRule, SynergyTable,
};
