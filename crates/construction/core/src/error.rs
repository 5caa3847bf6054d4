//! Common error infrastructure for construction-core.
//!
//! The engine distinguishes three kinds of failure:
//!
//! - **Programmer errors** (ordering cycles, stages that cannot exist for a
//!   sequence) indicate a defect in a domain catalog. They are classified as
//!   [`ErrorSeverity::Fatal`] and abort the regenerate pass.
//! - **Data errors** (unknown component types, malformed documents) surface at
//!   the serialization boundary as [`SerialisationError`] and are recoverable.
//! - **Incompleteness** (a mandatory stage with nothing in it, a cost sequence
//!   without an absolute modifier) is never an error. It is reported through
//!   [`crate::RegenerateReport`] and [`crate::Calculated`].

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The caller may retry or substitute a default.
    ///
    /// Examples: unknown component type in a saved document
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: option value out of range, component placed in the wrong stage
    Validation,

    /// Unexpected state inconsistency inside a component implementation.
    Internal,

    /// Defect in the component registry or stage catalog.
    ///
    /// Examples: `order_after` cycle, requesting a stage that cannot exist
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a defect rather than bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all construction-core errors.
pub trait ConstructionFailure: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

/// Errors raised when an option value is rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum OptionError {
    #[error("option '{option}' expects a {expected} value, got {found}")]
    TypeMismatch {
        option: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("option '{option}' value {value} is outside {min}..={max}")]
    OutOfRange {
        option: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("option '{option}' has no choice named '{choice}'")]
    UnknownChoice { option: String, choice: String },

    #[error("component has no option '{option}'")]
    UnknownOption { option: String },

    #[error("option '{option}' is not available")]
    Disabled { option: String },

    #[error("option '{option}' value {value} is not a finite number")]
    NotFinite { option: String, value: String },
}

impl ConstructionFailure for OptionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "option_type_mismatch",
            Self::OutOfRange { .. } => "option_out_of_range",
            Self::UnknownChoice { .. } => "option_unknown_choice",
            Self::UnknownOption { .. } => "option_unknown",
            Self::Disabled { .. } => "option_disabled",
            Self::NotFinite { .. } => "option_not_finite",
        }
    }
}

/// Errors surfaced by the construction engine.
///
/// Any error returned while a regenerate pass is running aborts the whole
/// pass; the context keeps its previous configuration and derived state.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConstructionError {
    #[error("ordering cycle between components in phase {phase}: {}", .components.join(", "))]
    OrderingCycle {
        phase: String,
        components: Vec<String>,
    },

    #[error("no stage '{stage}' exists for {}", scope_label(.sequence))]
    StageNotFound {
        sequence: Option<usize>,
        stage: String,
    },

    #[error("sequence {index} does not exist (construction has {count})")]
    SequenceNotFound { index: usize, count: usize },

    #[error("component '{component}' cannot occupy stage '{stage}'")]
    ComponentNotAllowed { component: String, stage: String },

    #[error("stage '{stage}' has no component at index {index}")]
    ComponentIndexOutOfRange { stage: String, index: usize },

    #[error("invalid option on '{component}': {source}")]
    InvalidOption {
        component: String,
        #[source]
        source: OptionError,
    },

    #[error("tech level {tech_level} is outside {min}..={max}")]
    TechLevelOutOfRange { tech_level: u32, min: u32, max: u32 },

    #[error("attribute '{attribute}' holds a {found} value and cannot take {modifier}")]
    AttributeTypeMismatch {
        attribute: String,
        found: &'static str,
        modifier: String,
    },

    #[error("component '{component}' failed: {reason}")]
    ComponentFailed { component: String, reason: String },
}

impl ConstructionError {
    /// Convenience constructor for failures raised inside `create_steps`.
    pub fn component_failed(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ComponentFailed {
            component: component.into(),
            reason: reason.into(),
        }
    }
}

impl ConstructionFailure for ConstructionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OrderingCycle { .. }
            | Self::StageNotFound { .. }
            | Self::SequenceNotFound { .. } => ErrorSeverity::Fatal,
            Self::ComponentNotAllowed { .. }
            | Self::ComponentIndexOutOfRange { .. }
            | Self::InvalidOption { .. }
            | Self::TechLevelOutOfRange { .. } => ErrorSeverity::Validation,
            Self::AttributeTypeMismatch { .. } | Self::ComponentFailed { .. } => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OrderingCycle { .. } => "ordering_cycle",
            Self::StageNotFound { .. } => "stage_not_found",
            Self::SequenceNotFound { .. } => "sequence_not_found",
            Self::ComponentNotAllowed { .. } => "component_not_allowed",
            Self::ComponentIndexOutOfRange { .. } => "component_index_out_of_range",
            Self::InvalidOption { .. } => "invalid_option",
            Self::TechLevelOutOfRange { .. } => "tech_level_out_of_range",
            Self::AttributeTypeMismatch { .. } => "attribute_type_mismatch",
            Self::ComponentFailed { .. } => "component_failed",
        }
    }
}

/// Errors raised while loading a serialized construction.
///
/// Every variant names the element or field that could not be read so the
/// caller can decide whether to abort the load or substitute a default.
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum SerialisationError {
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown component type '{type_name}'")]
    UnknownComponentType { type_name: String },

    #[error("unknown sequence type '{type_name}'")]
    UnknownSequenceType { type_name: String },

    #[error("component '{component}' has no option '{option}'")]
    UnknownOption { component: String, option: String },

    #[error("invalid value for option '{option}' of '{component}': {reason}")]
    InvalidOptionValue {
        component: String,
        option: String,
        reason: String,
    },

    #[error("no stage accepts component '{component}' in {scope}")]
    NoStageForComponent { component: String, scope: String },

    #[error("unknown rule '{rule}'")]
    UnknownRule { rule: String },

    #[error("expected a {expected} document, found a {found} document")]
    WrongDomain { expected: &'static str, found: String },

    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

#[cfg(feature = "serde")]
impl ConstructionFailure for SerialisationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Construction(error) => error.severity(),
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed_document",
            Self::UnknownComponentType { .. } => "unknown_component_type",
            Self::UnknownSequenceType { .. } => "unknown_sequence_type",
            Self::UnknownOption { .. } => "unknown_option",
            Self::InvalidOptionValue { .. } => "invalid_option_value",
            Self::NoStageForComponent { .. } => "no_stage_for_component",
            Self::UnknownRule { .. } => "unknown_rule",
            Self::WrongDomain { .. } => "wrong_domain",
            Self::Construction(error) => error.error_code(),
        }
    }
}

/// Describes a stage scope for messages: a sequence index or the shared stages.
pub(crate) fn scope_label(sequence: &Option<usize>) -> String {
    match sequence {
        Some(index) => format!("sequence {index}"),
        None => "common stages".to_string(),
    }
}
