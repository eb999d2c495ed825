//! Rejection-sampled search for novel, budget-legal assemblies.
//!
//! One attempt:
//!
//! 1. roll a tier, then a template (away from the last pick and from
//!    low-diversity templates)
//! 2. shuffle the slot order
//! 3. pick one option per slot in that order, boosting options that
//!    complete or advance a synergy and, optionally, coupling companions
//! 4. raise the caps by every matched synergy bonus and compile
//! 5. reject near duplicates of recent outputs
//!
//! `BudgetExceeded` and duplicates retry; any other compile error means the
//! template itself is broken and propagates. After `max_attempts` a single
//! unbiased pass runs and its compile error, if any, is returned.
//!
//! Every random decision draws from one `StdRng` seeded with the caller's
//! seed, so identical (templates, seed, history) inputs give identical output.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};
use skill_content::{ContentBundle, CouplingTable, Suggestion, SynergyGain, SynergyTable};
use skill_core::{
    Assembly, Budget, EffectTag, OptionDef, SkillError, Slot, SlotSelections, Template, compile,
};

use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::history::{Fingerprint, GenerationHistory};
use crate::tier::{self, is_low_diversity};

/// One generated skill.
#[derive(Clone, Debug, Serialize)]
pub struct GeneratedSkill {
    pub template_id: String,
    /// Execution order of slot ids.
    pub order: Vec<String>,
    pub slot_options: SlotSelections,
    #[serde(serialize_with = "serialize_shared")]
    pub assembly: Arc<Assembly>,
    pub signature: String,
    /// Names of the synergies whose bonus was granted.
    pub synergies: Vec<String>,
    /// Normalized effect tags of every picked option.
    pub tags: BTreeSet<EffectTag>,
    /// Advisory companions for the chosen tags.
    pub suggestions: Vec<Suggestion>,
    /// Attempts spent, including the fallback pass.
    pub attempts: u32,
    /// True if produced by the unbiased fallback pass.
    pub fallback: bool,
}

/// Candidate produced by one attempt, before duplicate screening.
struct Draft<'a> {
    template: &'a Template,
    order: Vec<String>,
    picks: SlotSelections,
    tags: BTreeSet<EffectTag>,
}

/// Stateful generator. Owns its duplicate-avoidance history, so separate
/// instances never influence each other.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    synergies: SynergyTable,
    couplings: CouplingTable,
    history: GenerationHistory,
    last_template: Option<String>,
}

impl Generator {
    pub fn new(config: GeneratorConfig, synergies: SynergyTable, couplings: CouplingTable) -> Self {
        let history = GenerationHistory::new(config.history_capacity);
        Self {
            config,
            synergies,
            couplings,
            history,
            last_template: None,
        }
    }

    /// Generator using the rule tables of a loaded content bundle.
    pub fn from_bundle(config: GeneratorConfig, bundle: &ContentBundle) -> Self {
        Self::new(config, bundle.synergies.clone(), bundle.couplings.clone())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    /// Forgets previous outputs and the last template pick.
    pub fn reset_history(&mut self) {
        self.history.clear();
        self.last_template = None;
    }

    pub fn generate(
        &mut self,
        templates: &[Template],
        seed: u64,
    ) -> Result<GeneratedSkill, GenerateError> {
        if templates.is_empty() {
            return Err(GenerateError::NoTemplates);
        }
        ensure_catalogs(templates)?;

        let mut rng = StdRng::seed_from_u64(seed);

        for attempt in 1..=self.config.max_attempts {
            let Some(template) = tier::pick_template(
                &mut rng,
                templates,
                &self.config,
                self.last_template.as_deref(),
            ) else {
                return Err(GenerateError::NoTemplates);
            };

            let draft = self.draft(&mut rng, template, true);
            let (bonus, matched) = self.synergy_bonus(&draft.tags);
            let effective = cap_with_bonus(template, &bonus);

            let assembly = match compile(&effective, &draft.order, &draft.picks) {
                Ok(assembly) => assembly,
                Err(err) if err.severity().is_recoverable() => {
                    tracing::debug!(attempt, template = %template.id, %err, "attempt rejected");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let fingerprint = Fingerprint::new(&template.id, &draft.order, &draft.picks);
            let window = is_low_diversity(template).then_some(self.config.low_entropy_window);
            if self
                .history
                .is_near_duplicate(&fingerprint, self.config.near_duplicate_ratio, window)
            {
                tracing::debug!(
                    attempt,
                    signature = %assembly.signature,
                    "near duplicate rejected"
                );
                continue;
            }

            return Ok(self.accept(draft, assembly, matched, fingerprint, attempt, false));
        }

        tracing::warn!(
            attempts = self.config.max_attempts,
            "generator exhausted attempts, running fallback pass"
        );
        self.fallback(&mut rng, templates)
    }

    /// Unbiased last resort: uniform template, shuffled order, base option
    /// weights only. No duplicate screening; compile errors propagate.
    fn fallback(
        &mut self,
        rng: &mut StdRng,
        templates: &[Template],
    ) -> Result<GeneratedSkill, GenerateError> {
        let template = templates.choose(rng).ok_or(GenerateError::NoTemplates)?;
        let draft = self.draft(rng, template, false);
        let (bonus, matched) = self.synergy_bonus(&draft.tags);
        let effective = cap_with_bonus(template, &bonus);
        let assembly = compile(&effective, &draft.order, &draft.picks)?;
        let fingerprint = Fingerprint::new(&template.id, &draft.order, &draft.picks);
        let attempts = self.config.max_attempts + 1;
        Ok(self.accept(draft, assembly, matched, fingerprint, attempts, true))
    }

    fn accept(
        &mut self,
        draft: Draft<'_>,
        assembly: Assembly,
        synergies: Vec<String>,
        fingerprint: Fingerprint,
        attempts: u32,
        fallback: bool,
    ) -> GeneratedSkill {
        self.history.record(fingerprint);
        self.last_template = Some(draft.template.id.clone());

        let suggestions = self.couplings.suggest(&draft.tags);
        tracing::debug!(
            signature = %assembly.signature,
            attempts,
            fallback,
            synergies = synergies.len(),
            "skill generated"
        );

        GeneratedSkill {
            template_id: draft.template.id.clone(),
            signature: assembly.signature.clone(),
            order: draft.order,
            slot_options: draft.picks,
            assembly: assembly.into_shared(),
            synergies,
            tags: draft.tags,
            suggestions,
            attempts,
            fallback,
        }
    }

    /// Shuffles the order and picks an option per slot in that order.
    fn draft<'a, R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        template: &'a Template,
        biased: bool,
    ) -> Draft<'a> {
        let mut order = template.default_order();
        order.shuffle(rng);

        let mut picks = SlotSelections::new();
        let mut tags = BTreeSet::new();
        for slot_id in &order {
            let Some(slot) = template.slot(slot_id) else {
                continue;
            };
            let Some(option_id) = self.pick_option(rng, slot, &tags, biased) else {
                continue;
            };
            if let Some(option) = slot.find_option(&option_id) {
                tags.extend(option.effect_tags());
            }
            picks.insert(slot.id.clone(), option_id);
        }

        Draft {
            template,
            order,
            picks,
            tags,
        }
    }

    fn pick_option<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        slot: &Slot,
        present: &BTreeSet<EffectTag>,
        biased: bool,
    ) -> Option<String> {
        let weight = |option: &OptionDef| {
            let mut w = option.weight.max(0.0);
            if biased {
                let tags = option.effect_tags();
                w *= match self.synergies.gain(present, &tags) {
                    SynergyGain::Complete => self.config.synergy_complete_boost,
                    SynergyGain::Partial => self.config.synergy_partial_boost,
                    SynergyGain::None => 1.0,
                };
                if self.config.coupling_bias {
                    w *= self.couplings.bias(present, &tags);
                }
            }
            w
        };

        let chosen = match slot.options.choose_weighted(rng, weight) {
            Ok(option) => Some(option),
            // All weights zero.
            Err(_) => slot.options.choose(rng),
        };
        chosen.map(|option| option.id.clone())
    }

    fn synergy_bonus(&self, tags: &BTreeSet<EffectTag>) -> (Budget, Vec<String>) {
        let matched = self
            .synergies
            .matches(tags)
            .into_iter()
            .map(|rule| rule.name.clone())
            .collect();
        (self.synergies.bonus_for(tags), matched)
    }
}

fn serialize_shared<S>(assembly: &Arc<Assembly>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    assembly.as_ref().serialize(serializer)
}

fn ensure_catalogs(templates: &[Template]) -> Result<(), GenerateError> {
    for template in templates {
        if let Some(slot) = template.slots.iter().find(|s| s.options.is_empty()) {
            return Err(GenerateError::EmptyCatalog {
                template: template.id.clone(),
                slot: slot.id.clone(),
            });
        }
    }
    Ok(())
}

fn cap_with_bonus(template: &Template, bonus: &Budget) -> Template {
    if bonus.is_zero() {
        template.clone()
    } else {
        template.with_cap_bonus(bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skill_core::{ActionSpec, BudgetCategory, CompileError, SlotKind};

    fn generator() -> Generator {
        Generator::new(
            GeneratorConfig::default(),
            SynergyTable::default(),
            CouplingTable::default(),
        )
    }

    /// Two slots, three options each; "big" costs more than the cap allows.
    fn template() -> Template {
        let slot = |id: &str| {
            Slot::new(id, SlotKind::Action, "small")
                .option(
                    OptionDef::action("small", ActionSpec::Damage { amount: 1 })
                        .costing(BudgetCategory::Damage, 1),
                )
                .option(
                    OptionDef::action("medium", ActionSpec::Damage { amount: 2 })
                        .costing(BudgetCategory::Damage, 2),
                )
                .option(
                    OptionDef::action("big", ActionSpec::Damage { amount: 9 })
                        .costing(BudgetCategory::Damage, 9),
                )
        };
        Template::builder("tpl_pair")
            .event("on_cast")
            .cap(BudgetCategory::Damage, 4)
            .slot(slot("left"))
            .slot(slot("right"))
            .build()
            .unwrap()
    }

    #[test]
    fn biased_attempts_never_exceed_caps() {
        let templates = vec![template()];
        let mut generator = generator();
        for seed in 0..30 {
            match generator.generate(&templates, seed) {
                Ok(skill) => assert!(skill.assembly.budget.get(BudgetCategory::Damage) <= 4),
                // Only the unbiased fallback may surface a budget failure.
                Err(err) => assert!(matches!(
                    err,
                    GenerateError::Compile(CompileError::BudgetExceeded { .. })
                )),
            }
        }
    }

    #[test]
    fn history_is_bounded() {
        let templates = vec![template()];
        let mut generator = Generator::new(
            GeneratorConfig::default().with_history_capacity(3),
            SynergyTable::default(),
            CouplingTable::default(),
        );
        for seed in 0..10 {
            let _ = generator.generate(&templates, seed);
        }
        assert!(generator.history().len() <= 3);
    }

    #[test]
    fn empty_slot_catalog_is_reported() {
        let mut broken = template();
        broken.slots[1].options.clear();
        let err = generator().generate(&[broken], 1).unwrap_err();
        assert!(matches!(err, GenerateError::EmptyCatalog { .. }));
    }

    #[test]
    fn reset_clears_history() {
        let templates = vec![template()];
        let mut generator = generator();
        generator.generate(&templates, 5).unwrap();
        assert_eq!(generator.history().len(), 1);
        generator.reset_history();
        assert!(generator.history().is_empty());
    }
}
