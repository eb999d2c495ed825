use std::collections::BTreeSet;
use std::fs;

use serde::Deserialize;
use skill_content::{ContentBundle, ContentFactory, TemplateRegistry};
use skill_core::{
    BudgetCategory, CompileError, EffectTag, SlotSelections, compile, compile_defaults,
};

fn registry() -> TemplateRegistry {
    TemplateRegistry::load_embedded().expect("embedded templates")
}

#[test]
fn ranged_projectile_compiles_with_defaults() {
    let registry = registry();
    let template = registry.get("tpl_ranged_proj_v1").unwrap();

    let assembly = compile(template, &template.default_order(), &SlotSelections::new()).unwrap();
    assert!(assembly.signature.contains("tpl_ranged_proj_v1"));
    assert_eq!(assembly.ops.len(), template.slots.len());
    assert_eq!(assembly.event, "on_cast");
}

#[test]
fn every_template_default_fits_its_caps() {
    for template in registry().iter() {
        let assembly = compile_defaults(template)
            .unwrap_or_else(|e| panic!("{} defaults do not compile: {e}", template.id));
        for (category, spent) in assembly.budget.iter() {
            assert!(
                spent <= template.budget_cap.get(category),
                "{} overspends {category}",
                template.id
            );
        }
    }
}

#[test]
fn catalog_covers_every_tier() {
    let counts: Vec<usize> = registry().iter().map(|t| t.slots.len()).collect();
    assert!(counts.iter().any(|&n| n <= 3));
    assert!(counts.iter().any(|&n| (4..=5).contains(&n)));
    assert!(counts.iter().any(|&n| n >= 6));
}

#[test]
fn dropping_a_slot_from_the_order_fails() {
    let registry = registry();
    let template = registry.get("tpl_ranged_proj_v1").unwrap();
    let mut order = template.default_order();
    order.pop();

    assert!(matches!(
        compile(template, &order, &SlotSelections::new()),
        Err(CompileError::OrderLengthMismatch { .. })
    ));
}

#[test]
fn expensive_picks_exceed_the_cap() {
    let registry = registry();
    let template = registry.get("tpl_blink_strike").unwrap();
    let mut picks = SlotSelections::new();
    picks.insert("strike".into(), "bash".into());
    picks.insert("after".into(), "shove".into());

    let err = compile(template, &template.default_order(), &picks).unwrap_err();
    assert_eq!(
        err,
        CompileError::BudgetExceeded {
            category: BudgetCategory::CrowdControl,
            total: 2,
            cap: 1,
        }
    );
}

#[test]
fn marks_and_payouts_form_a_synergy() {
    let bundle = ContentBundle::embedded().unwrap();
    let template = bundle.templates.get("tpl_hunter_mark_v1").unwrap();
    let tags: BTreeSet<EffectTag> = template
        .slots
        .iter()
        .filter_map(|slot| slot.find_option(&slot.default_option))
        .flat_map(|option| option.effect_tags())
        .collect();

    let names: Vec<&str> = bundle
        .synergies
        .matches(&tags)
        .into_iter()
        .map(|rule| rule.name.as_str())
        .collect();
    assert!(names.contains(&"execution"));
    assert!(
        bundle
            .couplings
            .suggest(&tags)
            .iter()
            .all(|s| !tags.contains(&s.tag))
    );
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Tuning {
    max_attempts: u32,
    coupling_bias: bool,
}

#[test]
fn factory_loads_a_data_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("templates.ron"),
        include_str!("../data/templates.ron"),
    )
    .unwrap();
    fs::write(
        dir.path().join("synergies.ron"),
        include_str!("../data/synergies.ron"),
    )
    .unwrap();
    fs::write(
        dir.path().join("couplings.ron"),
        include_str!("../data/couplings.ron"),
    )
    .unwrap();

    let factory = ContentFactory::new(dir.path());
    let bundle = factory.load_bundle().unwrap();
    assert_eq!(bundle.templates.len(), registry().len());

    let defaults: Tuning = factory.load_config().unwrap();
    assert_eq!(defaults.max_attempts, 0);

    fs::write(
        dir.path().join("forge.toml"),
        "max_attempts = 7\ncoupling_bias = true\n",
    )
    .unwrap();
    let tuned: Tuning = factory.load_config().unwrap();
    assert_eq!(tuned.max_attempts, 7);
    assert!(tuned.coupling_bias);
}

#[test]
fn factory_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = ContentFactory::new(dir.path()).load_templates().unwrap_err();
    assert!(err.to_string().contains("templates.ron"));
}
