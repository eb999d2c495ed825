//! Run generated skills through the scripted arena.

use anyhow::Result;
use clap::Parser;
use console::style;
use forge::Generator;

use super::OutputFormat;
use crate::config::CliConfig;
use crate::content;
use crate::simulation::{self, SimulationConfig, SimulationReport};

/// Generate skills and fight the scripted arena with them
#[derive(Parser)]
pub struct Simulate {
    /// Seed for generation and proc rolls
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Number of skills to equip
    #[arg(short = 'n', long, default_value_t = 4)]
    count: u32,

    /// Simulated duration in milliseconds
    #[arg(short, long, default_value_t = 6_000)]
    duration: u64,

    /// Tick length in milliseconds
    #[arg(long, default_value_t = 50)]
    tick: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Simulate {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let (bundle, tuning) = content::load(config)?;
        let mut generator = Generator::from_bundle(tuning, &bundle);
        let templates = bundle.templates.templates();

        let mut skills = Vec::with_capacity(self.count as usize);
        for offset in 0..u64::from(self.count) {
            skills.push(generator.generate(templates, self.seed.wrapping_add(offset))?);
        }

        let sim = SimulationConfig {
            duration_ms: self.duration,
            tick_ms: self.tick,
            seed: self.seed,
        };
        tracing::info!(
            skills = skills.len(),
            duration_ms = sim.duration_ms,
            "starting simulation"
        );
        let report = simulation::run(&skills, &sim);

        match self.format {
            OutputFormat::Summary => print_summary(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        Ok(())
    }
}

fn print_summary(report: &SimulationReport) {
    println!("{}", style("=== Simulation ===").bold().green());
    println!("  Ended at:  {} ms", report.ended_at);
    println!("  Hero HP:   {}", report.hero_hp);
    println!("  Kills:     {}", report.kills.len());
    println!("  Tasks run: {}", report.tasks_run);
    println!();

    println!("{}", style("Skills:").bold().yellow());
    for stats in &report.skills {
        println!("  {} (on {})", style(&stats.signature).cyan(), stats.event);
        println!(
            "    triggers {}  throttled {}  completed {}  fizzled {}  suspended {}  actions {}",
            stats.triggers,
            stats.throttled,
            stats.completed,
            stats.fizzled,
            stats.suspended,
            stats.actions
        );
    }

    if !report.survivors.is_empty() {
        println!();
        println!("{}", style("Survivors:").bold().yellow());
        for survivor in &report.survivors {
            println!(
                "  {} {}: {}/{}",
                survivor.kind, survivor.id, survivor.hp, survivor.max_hp
            );
        }
    }
}
