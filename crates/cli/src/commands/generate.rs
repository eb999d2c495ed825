//! Generate skills and print them.

use anyhow::Result;
use clap::Parser;
use console::style;
use forge::{GeneratedSkill, Generator};

use super::{OutputFormat, budget_line};
use crate::config::CliConfig;
use crate::content;

/// Generate budget-legal skills from the template catalog
#[derive(Parser)]
pub struct Generate {
    /// Seed of the first skill; each further skill uses the next seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Number of skills to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Generate {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let (bundle, tuning) = content::load(config)?;
        let mut generator = Generator::from_bundle(tuning, &bundle);
        let templates = bundle.templates.templates();

        let mut skills = Vec::with_capacity(self.count as usize);
        for offset in 0..u64::from(self.count) {
            skills.push(generator.generate(templates, self.seed.wrapping_add(offset))?);
        }

        match self.format {
            OutputFormat::Summary => skills.iter().for_each(print_summary),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&skills)?),
        }
        Ok(())
    }
}

fn print_summary(skill: &GeneratedSkill) {
    let assembly = &skill.assembly;
    println!("{} {}", style("Skill:").bold().cyan(), skill.signature);
    println!("  Template: {} (on {})", skill.template_id, assembly.event);
    println!("  Budget:   {}", budget_line(&assembly.budget));
    if let Some(icd) = assembly.guards.icd_ms {
        println!("  ICD:      {icd} ms");
    }
    if let Some(cap) = assembly.guards.cap_per_second {
        println!("  Cap:      {cap}/s");
    }

    println!("  {}", style("Ops:").bold().yellow());
    for (index, op) in assembly.ops.iter().enumerate() {
        println!("    {index}. [{}] {} = {}", op.kind, op.slot_id, op.option_id);
    }

    if !skill.synergies.is_empty() {
        println!(
            "  {} {}",
            style("Synergies:").bold().green(),
            skill.synergies.join(", ")
        );
    }
    if !skill.suggestions.is_empty() {
        let hints: Vec<String> = skill
            .suggestions
            .iter()
            .map(|s| format!("{} (via {})", s.tag, s.trigger))
            .collect();
        println!("  {} {}", style("Try adding:").dim(), hints.join(", "));
    }
    if skill.fallback {
        println!("  {}", style("produced by fallback pass").red());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use forge::{Generator, GeneratorConfig};
    use skill_content::ContentBundle;

    #[test]
    fn json_carries_every_skill_field() {
        let bundle = ContentBundle::embedded().unwrap();
        let mut generator = Generator::from_bundle(GeneratorConfig::default(), &bundle);
        let skill = generator.generate(bundle.templates.templates(), 3).unwrap();

        let value = serde_json::to_value(&skill).unwrap();
        assert_eq!(value["signature"], skill.signature.as_str());
        assert_eq!(value["template_id"], skill.template_id.as_str());
        assert_eq!(value["order"].as_array().unwrap().len(), skill.order.len());
        assert_eq!(value["assembly"]["ops"].as_array().unwrap().len(), skill.order.len());
        assert_eq!(value["assembly"]["signature"], skill.signature.as_str());
        assert!(value["assembly"]["budget"].is_object());
        assert_eq!(value["fallback"], skill.fallback);
    }
}
