//! Op compiler - turns a template plus per-slot choices into an [`Assembly`].
//!
//! Ops are emitted in the caller's order, not the template's declaration
//! order. Execution order is part of a skill's behavior: a condition placed
//! after an action no longer gates that action.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::budget::{self, Budget};
use crate::effect::{ActionSpec, ConditionSpec, FailReason, TargetSpec};
use crate::engine::GuardSpec;
use crate::error::CompileError;
use crate::template::{OptionPayload, SlotKind, Template};

/// Separator between signature segments.
pub const SIGNATURE_SEPARATOR: char = '|';

/// Slot id -> chosen option id. Absent slots use their default option.
pub type SlotSelections = BTreeMap<String, String>;

// ============================================================================
// Op
// ============================================================================

/// Executable behavior of one compiled op.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OpBehavior {
    Condition {
        check: ConditionSpec,
        fail_reason: FailReason,
    },
    Target(TargetSpec),
    Timeline {
        delay_ms: u64,
    },
    Action(ActionSpec),
}

/// One compiled (slot, option) pair.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Op {
    pub slot_id: String,
    pub option_id: String,
    pub kind: SlotKind,
    pub budget: Option<Budget>,
    pub behavior: OpBehavior,
}

impl Op {
    fn from_payload(
        slot_id: &str,
        option_id: &str,
        budget: Option<Budget>,
        payload: &OptionPayload,
    ) -> Self {
        let behavior = match payload {
            OptionPayload::Condition(check) => OpBehavior::Condition {
                fail_reason: check.fail_reason(),
                check: check.clone(),
            },
            OptionPayload::Target(spec) => OpBehavior::Target(spec.clone()),
            OptionPayload::Timeline { delay_ms } => OpBehavior::Timeline {
                delay_ms: *delay_ms,
            },
            OptionPayload::Action(spec) => OpBehavior::Action(spec.clone()),
        };
        Self {
            slot_id: slot_id.to_string(),
            option_id: option_id.to_string(),
            kind: payload.kind(),
            budget,
            behavior,
        }
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Compiled, immutable skill program.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Assembly {
    pub template_id: String,
    pub event: String,
    /// Slot ids in execution order.
    pub order: Vec<String>,
    /// One op per order entry, in the same order.
    pub ops: Vec<Op>,
    pub guards: GuardSpec,
    pub budget: Budget,
    pub signature: String,
}

impl Assembly {
    /// Option chosen for each slot.
    pub fn selections(&self) -> SlotSelections {
        self.ops
            .iter()
            .map(|op| (op.slot_id.clone(), op.option_id.clone()))
            .collect()
    }

    /// Wraps the assembly for sharing with the event bus and task queue.
    pub fn into_shared(self) -> Arc<Assembly> {
        Arc::new(self)
    }
}

/// Builds the dedup signature: template id, then `slot=option` per op in
/// execution order.
pub fn signature(template_id: &str, ops: &[Op]) -> String {
    let mut out = String::from(template_id);
    for op in ops {
        out.push(SIGNATURE_SEPARATOR);
        out.push_str(&op.slot_id);
        out.push('=');
        out.push_str(&op.option_id);
    }
    out
}

// ============================================================================
// Compile
// ============================================================================

/// Compiles `template` with the given execution order and slot choices.
///
/// Fails without producing a partial assembly if the order is not a
/// permutation of the template's slots, a chosen option is not in its slot's
/// catalog, or the summed budget exceeds any cap.
pub fn compile(
    template: &Template,
    order: &[String],
    slot_options: &SlotSelections,
) -> Result<Assembly, CompileError> {
    if order.len() != template.slots.len() {
        return Err(CompileError::OrderLengthMismatch {
            template: template.id.clone(),
            expected: template.slots.len(),
            actual: order.len(),
        });
    }

    let mut ops = Vec::with_capacity(order.len());
    for (index, slot_id) in order.iter().enumerate() {
        let slot = template
            .slot(slot_id)
            .ok_or_else(|| CompileError::UnknownSlot {
                template: template.id.clone(),
                slot: slot_id.clone(),
            })?;
        if order[..index].contains(slot_id) {
            return Err(CompileError::DuplicateSlot {
                template: template.id.clone(),
                slot: slot_id.clone(),
            });
        }

        let option_id = slot_options
            .get(slot_id)
            .map(String::as_str)
            .unwrap_or(slot.default_option.as_str());
        let option = slot
            .find_option(option_id)
            .ok_or_else(|| CompileError::InvalidOption {
                slot: slot_id.clone(),
                option: option_id.to_string(),
            })?;

        ops.push(Op::from_payload(
            &slot.id,
            &option.id,
            option.budget.clone(),
            &option.payload,
        ));
    }

    let total = budget::sum(ops.iter().map(|op| op.budget.as_ref()), &template.base_budget);
    budget::assert_within_caps(&total, &template.budget_cap)?;

    let signature = signature(&template.id, &ops);
    tracing::debug!(template = %template.id, %signature, "compiled assembly");

    Ok(Assembly {
        template_id: template.id.clone(),
        event: template.event.clone(),
        order: order.to_vec(),
        ops,
        guards: template.guards,
        budget: total,
        signature,
    })
}

/// Compiles with the template's declared order and every default option.
pub fn compile_defaults(template: &Template) -> Result<Assembly, CompileError> {
    compile(template, &template.default_order(), &SlotSelections::new())
}
