//! List the template catalog or compile one template's defaults.

use anyhow::{Result, anyhow};
use clap::Parser;
use console::style;
use forge::Tier;
use serde::Serialize;
use skill_content::{ContentBundle, SynergyRule};
use skill_core::{Assembly, Budget, Template, compile_defaults};

use super::{OutputFormat, budget_line};
use crate::config::CliConfig;
use crate::content;

/// Inspect templates and rule tables
#[derive(Parser)]
pub struct Inspect {
    /// Template id to compile with default picks (lists the catalog if omitted)
    #[arg(short, long, value_name = "ID")]
    template: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

/// One catalog row.
#[derive(Serialize)]
struct CatalogEntry<'a> {
    id: &'a str,
    event: &'a str,
    tier: Tier,
    slots: usize,
    budget_cap: &'a Budget,
}

impl<'a> From<&'a Template> for CatalogEntry<'a> {
    fn from(template: &'a Template) -> Self {
        Self {
            id: &template.id,
            event: &template.event,
            tier: Tier::of(template),
            slots: template.slots.len(),
            budget_cap: &template.budget_cap,
        }
    }
}

#[derive(Serialize)]
struct Catalog<'a> {
    templates: Vec<CatalogEntry<'a>>,
    synergies: &'a [SynergyRule],
}

/// A template next to its default-pick compilation.
#[derive(Serialize)]
struct TemplateReport<'a> {
    tier: Tier,
    template: &'a Template,
    defaults: &'a Assembly,
}

impl Inspect {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let (bundle, _) = content::load(config)?;

        match self.template {
            Some(id) => {
                let template = bundle
                    .templates
                    .get(&id)
                    .ok_or_else(|| anyhow!("Unknown template: {id}"))?;
                show_template(template, self.format)
            }
            None => list_catalog(&bundle, self.format),
        }
    }
}

fn catalog(bundle: &ContentBundle) -> Catalog<'_> {
    Catalog {
        templates: bundle.templates.iter().map(CatalogEntry::from).collect(),
        synergies: bundle.synergies.rules(),
    }
}

fn list_catalog(bundle: &ContentBundle, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog(bundle))?),
        OutputFormat::Summary => {
            println!("{}", style("=== Templates ===").bold().green());
            for template in bundle.templates.iter() {
                println!(
                    "  {:<22} {:<8} {:>2} slots  on {:<14} cap {}",
                    style(&template.id).cyan(),
                    Tier::of(template).to_string(),
                    template.slots.len(),
                    template.event,
                    budget_line(&template.budget_cap)
                );
            }
            println!();
            println!("{}", style("=== Synergies ===").bold().green());
            for rule in bundle.synergies.rules() {
                let tags: Vec<String> = rule.tags.iter().map(|t| t.to_string()).collect();
                println!(
                    "  {:<18} [{}] +{}",
                    style(&rule.name).cyan(),
                    tags.join(" + "),
                    budget_line(&rule.bonus)
                );
            }
        }
    }
    Ok(())
}

fn show_template(template: &Template, format: OutputFormat) -> Result<()> {
    let assembly = compile_defaults(template)?;

    match format {
        OutputFormat::Json => {
            let report = TemplateReport {
                tier: Tier::of(template),
                template,
                defaults: &assembly,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Summary => {
            println!("{} {}", style("Template:").bold().cyan(), template.id);
            println!("  Event:     {}", template.event);
            println!("  Tier:      {}", Tier::of(template));
            println!("  Cap:       {}", budget_line(&template.budget_cap));
            println!("  Defaults:  {}", budget_line(&assembly.budget));
            println!("  Signature: {}", assembly.signature);
            println!("  {}", style("Slots:").bold().yellow());
            for slot in &template.slots {
                let options: Vec<&str> = slot.options.iter().map(|o| o.id.as_str()).collect();
                println!(
                    "    {:<10} {:<10} {} (default {})",
                    slot.id,
                    slot.kind.to_string(),
                    options.join(" | "),
                    slot.default_option
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_json_lists_every_template_with_its_tier() {
        let bundle = ContentBundle::embedded().unwrap();
        let value = serde_json::to_value(catalog(&bundle)).unwrap();

        let templates = value["templates"].as_array().unwrap();
        assert_eq!(templates.len(), bundle.templates.len());
        let ranged = templates
            .iter()
            .find(|t| t["id"] == "tpl_ranged_proj_v1")
            .unwrap();
        assert_eq!(ranged["tier"], "normal");
        assert_eq!(ranged["slots"], 5);
        assert_eq!(
            value["synergies"].as_array().unwrap().len(),
            bundle.synergies.len()
        );
    }
}
