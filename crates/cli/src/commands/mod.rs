//! Subcommand implementations.
//!
//! Each command owns its CLI args and an `execute` entry point.

mod generate;
mod inspect;
mod simulate;

pub use generate::Generate;
pub use inspect::Inspect;
pub use simulate::Simulate;

use skill_core::Budget;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// Full JSON output
    Json,
}

pub(crate) fn budget_line(budget: &Budget) -> String {
    let parts: Vec<String> = budget
        .iter()
        .filter(|(_, value)| *value > 0)
        .map(|(category, value)| format!("{category}={value}"))
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}
