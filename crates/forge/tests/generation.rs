use std::collections::HashSet;

use forge::{GenerateError, GeneratorConfig, Generator};
use skill_content::{ContentBundle, CouplingTable, SynergyTable};
use skill_core::{ActionSpec, BudgetCategory, OptionDef, Slot, SlotKind, Template, budget};

fn bundle() -> ContentBundle {
    ContentBundle::embedded().expect("embedded content")
}

fn generator(bundle: &ContentBundle) -> Generator {
    Generator::from_bundle(GeneratorConfig::default(), bundle)
}

#[test]
fn same_seed_reproduces_after_reset() {
    let bundle = bundle();
    let templates = bundle.templates.templates();
    let mut generator = generator(&bundle);

    let first = generator.generate(templates, 42).unwrap();
    generator.reset_history();
    let second = generator.generate(templates, 42).unwrap();

    assert_eq!(first.signature, second.signature);
    assert_eq!(first.order, second.order);
    assert_eq!(first.slot_options, second.slot_options);
    assert_eq!(first.assembly.budget, second.assembly.budget);
}

#[test]
fn independent_generators_do_not_share_history() {
    let bundle = bundle();
    let templates = bundle.templates.templates();
    let mut a = generator(&bundle);
    let mut b = generator(&bundle);

    a.generate(templates, 7).unwrap();
    a.generate(templates, 8).unwrap();
    let from_fresh = b.generate(templates, 7).unwrap();
    assert_eq!(b.history().len(), 1);

    let mut c = generator(&bundle);
    assert_eq!(c.generate(templates, 7).unwrap().signature, from_fresh.signature);
}

#[test]
fn generated_skills_fit_their_allowance() {
    let bundle = bundle();
    let templates = bundle.templates.templates();
    let mut generator = generator(&bundle);

    for seed in 0..40 {
        let skill = generator.generate(templates, seed).unwrap();
        let template = bundle.templates.get(&skill.template_id).unwrap();
        let allowance = budget::add(&template.budget_cap, &bundle.synergies.bonus_for(&skill.tags));
        assert!(
            budget::assert_within_caps(&skill.assembly.budget, &allowance).is_ok(),
            "{} overspends",
            skill.signature
        );
        assert!(skill.signature.starts_with(&skill.template_id));
        assert_eq!(skill.order.len(), template.slots.len());
    }
}

#[test]
fn consecutive_outputs_are_not_repeated() {
    let bundle = bundle();
    let templates = bundle.templates.templates();
    let mut generator = generator(&bundle);

    let mut previous: Option<String> = None;
    for seed in 100..120 {
        let skill = generator.generate(templates, seed).unwrap();
        if !skill.fallback {
            assert_ne!(previous.as_deref(), Some(skill.signature.as_str()));
        }
        previous = Some(skill.signature);
    }
}

#[test]
fn generation_explores_orders_and_templates() {
    let bundle = bundle();
    let templates = bundle.templates.templates();
    let mut generator = generator(&bundle);

    let mut signatures = HashSet::new();
    let mut template_ids = HashSet::new();
    for seed in 0..30 {
        let skill = generator.generate(templates, seed).unwrap();
        template_ids.insert(skill.template_id.clone());
        signatures.insert(skill.signature);
    }
    assert!(signatures.len() > 15);
    assert!(template_ids.len() > 1);
}

#[test]
fn suggestions_never_name_a_chosen_tag() {
    let bundle = bundle();
    let templates = bundle.templates.templates();
    let mut generator = generator(&bundle);

    for seed in 0..20 {
        let skill = generator.generate(templates, seed).unwrap();
        for suggestion in &skill.suggestions {
            assert!(!skill.tags.contains(&suggestion.tag));
            assert!(skill.tags.contains(&suggestion.trigger));
        }
    }
}

#[test]
fn empty_template_list_is_an_error() {
    let bundle = bundle();
    let err = generator(&bundle).generate(&[], 1).unwrap_err();
    assert_eq!(err, GenerateError::NoTemplates);
}

#[test]
fn fallback_propagates_budget_failure() {
    // Every option overspends, so no attempt can succeed.
    let template = Template::builder("tpl_impossible")
        .event("on_cast")
        .cap(BudgetCategory::Damage, 1)
        .slot(
            Slot::new("hit", SlotKind::Action, "nuke").option(
                OptionDef::action("nuke", ActionSpec::Damage { amount: 999 })
                    .costing(BudgetCategory::Damage, 5),
            ),
        )
        .build()
        .unwrap();

    let mut generator = Generator::new(
        GeneratorConfig::default().with_max_attempts(3),
        SynergyTable::default(),
        CouplingTable::default(),
    );
    let err = generator.generate(&[template], 9).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Compile(skill_core::CompileError::BudgetExceeded { .. })
    ));
}

#[test]
fn low_entropy_template_still_generates() {
    let template = Template::builder("tpl_fixed")
        .event("on_cast")
        .slot(Slot::new("only", SlotKind::Action, "poke").option(OptionDef::action(
            "poke",
            ActionSpec::Damage { amount: 1 },
        )))
        .build()
        .unwrap();

    let mut generator = Generator::new(
        GeneratorConfig::default(),
        SynergyTable::default(),
        CouplingTable::default(),
    );
    for seed in 0..5 {
        let skill = generator.generate(std::slice::from_ref(&template), seed).unwrap();
        assert_eq!(skill.signature, "tpl_fixed|only=poke");
    }
}
