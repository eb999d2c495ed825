//! Effect relationship tables consulted by the generator.

pub mod coupling;
pub mod synergy;

pub use coupling::{Companion, CouplingRule, CouplingTable, Suggestion};
pub use synergy::{SynergyGain, SynergyRule, SynergyTable};
