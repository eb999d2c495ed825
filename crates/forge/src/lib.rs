//! Procedural skill generation.
//!
//! [`Generator`] searches the template/option space with a seeded RNG and
//! returns budget-legal assemblies that differ from its recent outputs.
//! Synergy bonuses widen the caps of the attempt that earned them; coupling
//! tables only bias option weights and annotate results.

pub mod config;
pub mod error;
pub mod generator;
pub mod history;
pub mod tier;

pub use config::{GeneratorConfig, TierWeights};
pub use error::GenerateError;
pub use generator::{GeneratedSkill, Generator};
pub use history::{Fingerprint, GenerationHistory};
pub use tier::Tier;
