//! Rule-evaluation engine for incrementally built, explainable constructions.
//!
//! `construction-core` builds a composite artifact (a weapon, a robot) out of
//! pluggable components placed in stages. Each component emits steps that
//! change costs and attributes; the engine re-derives every total from the
//! declared configuration on each regenerate pass, so the attribute store and
//! the [`Manifest`] always reflect exactly the current component choices.
//!
//! The engine is generic over a [`Domain`], which supplies the closed
//! enumerations (phases, costs, attributes, options, component kinds) and the
//! stage layout. Concrete domains live in `construction-content`.
pub mod attributes;
pub mod component;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod factor;
pub mod manifest;
pub mod modifier;
pub mod option;
pub mod registry;
#[cfg(feature = "serde")]
pub mod serialise;
pub mod scalar;
pub mod skills;
pub mod stage;
pub mod step;

pub use attributes::{AttributeValue, AttributesGroup};
pub use component::Component;
pub use config::ConstructionConfig;
pub use context::{
    Configuration, ConstructionContext, ContextView, DerivedState, IncompleteStage, LedgerEntry,
    PrunedComponent, RegenerateReport, StepContext,
};
pub use domain::{Domain, Key, NamedKey, Phase};
pub use error::{ConstructionError, ConstructionFailure, ErrorSeverity, OptionError};
#[cfg(feature = "serde")]
pub use error::SerialisationError;
pub use factor::Factor;
pub use manifest::{Manifest, ManifestEntry, ManifestSection};
pub use modifier::{
    Calculated, ModifierSequence, NumericModifier, ScalarModifier,
    calculate_numeric_modifier_sequence, resolve_numeric_modifier_sequence,
};
pub use option::{ComponentOption, OptionConstraint, OptionValue};
pub use registry::ComponentRegistry;
#[cfg(feature = "serde")]
pub use serialise::{
    SerialisedComponent, SerialisedComponents, SerialisedOption, SerialisedSequence,
    deserialise_component, deserialise_component_list, serialise_component,
    serialise_component_list,
};
pub use scalar::{DiceRoll, Operation, ScalarValue, format_number, format_signed};
pub use skills::{SkillGroup, TrainedSkill};
pub use stage::{ConstructionStage, RequirementLevel, StageDefinition};
pub use step::{ConstructionStep, StepBuilder};
