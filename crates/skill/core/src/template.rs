//! Skill templates - ordered slots, each with a catalog of interchangeable options.
//!
//! Templates are static configuration. They are authored as data (RON via
//! `skill-content`) or assembled with [`Template::builder`], validated once,
//! and never mutated afterwards. Derived variants (such as a temporary budget
//! allowance) are new values built by pure transforms.

use crate::budget::{self, Budget, BudgetCategory};
use crate::effect::{ActionSpec, ConditionSpec, EffectTag, TargetSpec, normalize_tags};
use crate::engine::GuardSpec;
use crate::error::TemplateError;

// ============================================================================
// Slot Kind & Option Payload
// ============================================================================

/// What kind of op a slot compiles to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SlotKind {
    Condition,
    Target,
    Timeline,
    Action,
}

/// Kind-specific data carried by an option.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionPayload {
    Condition(ConditionSpec),
    Target(TargetSpec),
    Timeline { delay_ms: u64 },
    Action(ActionSpec),
}

impl OptionPayload {
    pub fn kind(&self) -> SlotKind {
        match self {
            Self::Condition(_) => SlotKind::Condition,
            Self::Target(_) => SlotKind::Target,
            Self::Timeline { .. } => SlotKind::Timeline,
            Self::Action(_) => SlotKind::Action,
        }
    }

    fn payload_tags(&self) -> Vec<EffectTag> {
        match self {
            Self::Condition(spec) => spec.effect_tags(),
            Self::Target(spec) => spec.effect_tags(),
            Self::Timeline { delay_ms } if *delay_ms > 0 => vec![EffectTag::Delay],
            Self::Timeline { .. } => Vec::new(),
            Self::Action(spec) => spec.effect_tags(),
        }
    }
}

// ============================================================================
// Option
// ============================================================================

/// Presentation hints; ignored by compiler and engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresentationHints {
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

fn default_weight() -> f32 {
    1.0
}

/// One choice for a slot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionDef {
    pub id: String,
    pub label: String,
    pub payload: OptionPayload,
    #[cfg_attr(feature = "serde", serde(default))]
    pub budget: Option<Budget>,
    /// Explicit tags on top of the ones derived from the payload.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<EffectTag>,
    /// Relative pick weight for procedural generation.
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hints: Option<PresentationHints>,
}

impl OptionDef {
    pub fn new(id: impl Into<String>, label: impl Into<String>, payload: OptionPayload) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            payload,
            budget: None,
            tags: Vec::new(),
            weight: default_weight(),
            hints: None,
        }
    }

    pub fn condition(id: impl Into<String>, spec: ConditionSpec) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, OptionPayload::Condition(spec))
    }

    pub fn target(id: impl Into<String>, spec: TargetSpec) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, OptionPayload::Target(spec))
    }

    pub fn timeline(id: impl Into<String>, delay_ms: u64) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, OptionPayload::Timeline { delay_ms })
    }

    pub fn action(id: impl Into<String>, spec: ActionSpec) -> Self {
        let id = id.into();
        Self::new(id.clone(), id, OptionPayload::Action(spec))
    }

    /// Builder: attach a budget delta.
    #[must_use]
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Builder: single-category budget delta.
    #[must_use]
    pub fn costing(self, category: BudgetCategory, value: u32) -> Self {
        let budget = self.budget.clone().unwrap_or_default().with(category, value);
        self.with_budget(budget)
    }

    /// Builder: add explicit tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = EffectTag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Builder: set the generator pick weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Payload-derived and explicit tags, sorted and deduplicated.
    pub fn effect_tags(&self) -> Vec<EffectTag> {
        let mut tags = self.payload.payload_tags();
        tags.extend(self.tags.iter().copied());
        normalize_tags(tags)
    }
}

// ============================================================================
// Slot
// ============================================================================

/// A named position in a template, filled by exactly one option.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub id: String,
    pub kind: SlotKind,
    pub default_option: String,
    pub options: Vec<OptionDef>,
}

impl Slot {
    pub fn new(id: impl Into<String>, kind: SlotKind, default_option: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            default_option: default_option.into(),
            options: Vec::new(),
        }
    }

    /// Builder: append an option to the catalog.
    #[must_use]
    pub fn option(mut self, option: OptionDef) -> Self {
        self.options.push(option);
        self
    }

    pub fn find_option(&self, id: &str) -> Option<&OptionDef> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Returns true when the catalog offers no real choice.
    pub fn is_fixed(&self) -> bool {
        self.options.len() <= 1
    }
}

// ============================================================================
// Template
// ============================================================================

/// Declarative skill blueprint.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Template {
    pub id: String,
    /// Event name that triggers compiled assemblies.
    pub event: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub guards: GuardSpec,
    pub budget_cap: Budget,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_budget: Budget,
    pub slots: Vec<Slot>,
}

impl Template {
    pub fn builder(id: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder::new(id)
    }

    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Slot ids in declaration order.
    pub fn default_order(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.id.clone()).collect()
    }

    /// Share of slots (0.0-1.0) whose catalog has a single option.
    pub fn fixed_slot_ratio(&self) -> f32 {
        if self.slots.is_empty() {
            return 1.0;
        }
        let fixed = self.slots.iter().filter(|s| s.is_fixed()).count();
        fixed as f32 / self.slots.len() as f32
    }

    /// Returns a copy whose caps are raised by `bonus`.
    #[must_use]
    pub fn with_cap_bonus(&self, bonus: &Budget) -> Template {
        Template {
            budget_cap: budget::add(&self.budget_cap, bonus),
            ..self.clone()
        }
    }

    /// Checks the schema invariants the compiler relies on.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.slots.is_empty() {
            return Err(TemplateError::NoSlots {
                template: self.id.clone(),
            });
        }

        for (index, slot) in self.slots.iter().enumerate() {
            if self.slots[..index].iter().any(|s| s.id == slot.id) {
                return Err(TemplateError::DuplicateSlot {
                    template: self.id.clone(),
                    slot: slot.id.clone(),
                });
            }
            if slot.options.is_empty() {
                return Err(TemplateError::EmptyCatalog {
                    slot: slot.id.clone(),
                });
            }
            for (i, option) in slot.options.iter().enumerate() {
                if slot.options[..i].iter().any(|o| o.id == option.id) {
                    return Err(TemplateError::DuplicateOption {
                        slot: slot.id.clone(),
                        option: option.id.clone(),
                    });
                }
                let found = option.payload.kind();
                if found != slot.kind {
                    return Err(TemplateError::KindMismatch {
                        slot: slot.id.clone(),
                        option: option.id.clone(),
                        expected: slot.kind,
                        found,
                    });
                }
            }
            if slot.find_option(&slot.default_option).is_none() {
                return Err(TemplateError::MissingDefault {
                    slot: slot.id.clone(),
                    option: slot.default_option.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Fluent constructor for templates defined in code.
#[derive(Debug)]
pub struct TemplateBuilder {
    template: Template,
}

impl TemplateBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            template: Template {
                id: id.into(),
                event: String::new(),
                guards: GuardSpec::default(),
                budget_cap: Budget::zero(),
                base_budget: Budget::zero(),
                slots: Vec::new(),
            },
        }
    }

    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.template.event = event.into();
        self
    }

    pub fn guards(mut self, guards: GuardSpec) -> Self {
        self.template.guards = guards;
        self
    }

    pub fn cap(mut self, category: BudgetCategory, value: u32) -> Self {
        self.template.budget_cap.set(category, value);
        self
    }

    pub fn base(mut self, category: BudgetCategory, value: u32) -> Self {
        self.template.base_budget.set(category, value);
        self
    }

    pub fn slot(mut self, slot: Slot) -> Self {
        self.template.slots.push(slot);
        self
    }

    /// Validates and returns the template.
    pub fn build(self) -> Result<Template, TemplateError> {
        self.template.validate()?;
        Ok(self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike_slot() -> Slot {
        Slot::new("strike", SlotKind::Action, "hit").option(
            OptionDef::action("hit", ActionSpec::Damage { amount: 5 })
                .costing(BudgetCategory::Damage, 1),
        )
    }

    #[test]
    fn builder_validates() {
        let template = Template::builder("tpl")
            .event("on_cast")
            .cap(BudgetCategory::Damage, 2)
            .slot(strike_slot())
            .build()
            .unwrap();
        assert_eq!(template.default_order(), vec!["strike".to_string()]);
        assert_eq!(template.fixed_slot_ratio(), 1.0);
    }

    #[test]
    fn missing_default_is_rejected() {
        let err = Template::builder("tpl")
            .slot(Slot::new("strike", SlotKind::Action, "nope").option(OptionDef::action(
                "hit",
                ActionSpec::Damage { amount: 1 },
            )))
            .build()
            .unwrap_err();
        assert!(matches!(err, TemplateError::MissingDefault { .. }));
    }

    #[test]
    fn payload_kind_must_match_slot() {
        let err = Template::builder("tpl")
            .slot(Slot::new("wait", SlotKind::Timeline, "hit").option(OptionDef::action(
                "hit",
                ActionSpec::Damage { amount: 1 },
            )))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            TemplateError::KindMismatch {
                expected: SlotKind::Timeline,
                found: SlotKind::Action,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_slots_are_rejected() {
        let err = Template::builder("tpl")
            .slot(strike_slot())
            .slot(strike_slot())
            .build()
            .unwrap_err();
        assert!(matches!(err, TemplateError::DuplicateSlot { .. }));
    }

    #[test]
    fn cap_bonus_is_a_new_value() {
        let template = Template::builder("tpl")
            .cap(BudgetCategory::Damage, 2)
            .slot(strike_slot())
            .build()
            .unwrap();
        let boosted = template.with_cap_bonus(&Budget::zero().with(BudgetCategory::Damage, 3));
        assert_eq!(boosted.budget_cap.get(BudgetCategory::Damage), 5);
        assert_eq!(template.budget_cap.get(BudgetCategory::Damage), 2);
    }

    #[test]
    fn option_tags_merge_payload_and_explicit() {
        let option = OptionDef::action("heal", ActionSpec::Heal { amount: 4 })
            .with_tags([EffectTag::Counter, EffectTag::Sustain]);
        assert_eq!(option.effect_tags(), vec![EffectTag::Sustain, EffectTag::Counter]);
    }
}
