use skill_core::{CompileError, ErrorSeverity, SkillError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("no templates to generate from")]
    NoTemplates,

    #[error("slot {slot} of template {template} has no options")]
    EmptyCatalog { template: String, slot: String },

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl SkillError for GenerateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Compile(inner) => inner.severity(),
            Self::NoTemplates | Self::EmptyCatalog { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoTemplates => "no_templates",
            Self::EmptyCatalog { .. } => "empty_catalog",
            Self::Compile(inner) => inner.error_code(),
        }
    }
}
