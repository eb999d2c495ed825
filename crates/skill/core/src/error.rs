//! Error types for template validation and assembly compilation.
//!
//! Only configuration mistakes surface as errors. The execution path has no
//! error type: a failed condition or a throttled trigger is a normal outcome
//! (see [`crate::engine::WalkOutcome`]).

use crate::budget::BudgetCategory;
use crate::template::SlotKind;

/// Severity level of an error, used to decide whether a caller may retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Different choices over the same template may succeed.
    ///
    /// Examples: budget cap exceeded
    Recoverable,

    /// The input itself is malformed; retrying with other random choices
    /// cannot fix it.
    ///
    /// Examples: unknown slot id, option missing from catalog
    Validation,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all skill-core errors.
pub trait SkillError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

// ============================================================================
// Compile Errors
// ============================================================================

/// Errors produced by [`crate::compile`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("order has {actual} entries but template '{template}' declares {expected} slots")]
    OrderLengthMismatch {
        template: String,
        expected: usize,
        actual: usize,
    },

    #[error("order references unknown slot '{slot}' in template '{template}'")]
    UnknownSlot { template: String, slot: String },

    #[error("order lists slot '{slot}' more than once in template '{template}'")]
    DuplicateSlot { template: String, slot: String },

    #[error("option '{option}' is not in the catalog of slot '{slot}'")]
    InvalidOption { slot: String, option: String },

    #[error("budget category {category} totals {total}, cap is {cap}")]
    BudgetExceeded {
        category: BudgetCategory,
        total: u32,
        cap: u32,
    },
}

impl SkillError for CompileError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BudgetExceeded { .. } => ErrorSeverity::Recoverable,
            Self::OrderLengthMismatch { .. }
            | Self::UnknownSlot { .. }
            | Self::DuplicateSlot { .. }
            | Self::InvalidOption { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OrderLengthMismatch { .. } => "order_length_mismatch",
            Self::UnknownSlot { .. } => "unknown_slot",
            Self::DuplicateSlot { .. } => "duplicate_slot",
            Self::InvalidOption { .. } => "invalid_option",
            Self::BudgetExceeded { .. } => "budget_exceeded",
        }
    }
}

// ============================================================================
// Template Errors
// ============================================================================

/// Schema problems found by [`crate::Template::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template '{template}' declares no slots")]
    NoSlots { template: String },

    #[error("template '{template}' declares slot '{slot}' twice")]
    DuplicateSlot { template: String, slot: String },

    #[error("slot '{slot}' has an empty option catalog")]
    EmptyCatalog { slot: String },

    #[error("slot '{slot}' lists option '{option}' twice")]
    DuplicateOption { slot: String, option: String },

    #[error("default option '{option}' of slot '{slot}' is not in its catalog")]
    MissingDefault { slot: String, option: String },

    #[error("option '{option}' carries a {found} payload but slot '{slot}' is {expected}")]
    KindMismatch {
        slot: String,
        option: String,
        expected: SlotKind,
        found: SlotKind,
    },
}

impl SkillError for TemplateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoSlots { .. } => "no_slots",
            Self::DuplicateSlot { .. } => "duplicate_slot",
            Self::EmptyCatalog { .. } => "empty_catalog",
            Self::DuplicateOption { .. } => "duplicate_option",
            Self::MissingDefault { .. } => "missing_default",
            Self::KindMismatch { .. } => "kind_mismatch",
        }
    }
}
