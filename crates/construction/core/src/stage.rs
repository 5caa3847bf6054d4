//! Stages: cardinality-constrained slots holding selected components.

use crate::component::Component;
use crate::domain::{Domain, Phase};
use crate::error::ConstructionError;

/// How strongly a stage asks to be filled.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum RequirementLevel {
    /// An empty mandatory stage makes the construction incomplete.
    Mandatory,
    /// Advisory only; the engine treats it like `Optional`.
    Desirable,
    #[default]
    Optional,
}

/// Declaration of a stage, supplied by [`Domain::stages`].
#[derive(Clone, Debug)]
pub struct StageDefinition<D: Domain> {
    name: &'static str,
    phase: D::Phase,
    base: D::Base,
    requirement: RequirementLevel,
    singular: bool,
    default_component: Option<D::Kind>,
}

impl<D: Domain> StageDefinition<D> {
    /// An optional, multi-component stage.
    pub fn new(name: &'static str, phase: D::Phase, base: D::Base) -> Self {
        Self {
            name,
            phase,
            base,
            requirement: RequirementLevel::Optional,
            singular: false,
            default_component: None,
        }
    }

    #[must_use]
    pub fn mandatory(mut self) -> Self {
        self.requirement = RequirementLevel::Mandatory;
        self
    }

    #[must_use]
    pub fn desirable(mut self) -> Self {
        self.requirement = RequirementLevel::Desirable;
        self
    }

    /// The stage holds at most one component.
    #[must_use]
    pub fn singular(mut self) -> Self {
        self.singular = true;
        self
    }

    /// Component inserted when the stage is found empty during regenerate.
    #[must_use]
    pub fn with_default(mut self, kind: D::Kind) -> Self {
        self.default_component = Some(kind);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> D::Phase {
        self.phase
    }
}

/// A live stage for one sequence (or the shared stages when `sequence` is `None`).
#[derive(Clone, Debug)]
pub struct ConstructionStage<D: Domain> {
    name: String,
    sequence: Option<usize>,
    phase: D::Phase,
    base: D::Base,
    requirement: RequirementLevel,
    singular: bool,
    default_component: Option<D::Kind>,
    components: Vec<D::Component>,
    /// Set once the stage has held a component; an optional stage is not
    /// refilled with its default after that.
    seeded: bool,
}

impl<D: Domain> ConstructionStage<D> {
    pub fn from_definition(definition: &StageDefinition<D>, sequence: Option<usize>) -> Self {
        Self {
            name: definition.name.to_string(),
            sequence,
            phase: definition.phase,
            base: definition.base,
            requirement: definition.requirement,
            singular: definition.singular,
            default_component: definition.default_component,
            components: Vec::new(),
            seeded: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> Option<usize> {
        self.sequence
    }

    pub(crate) fn set_sequence(&mut self, sequence: Option<usize>) {
        self.sequence = sequence;
    }

    pub fn phase(&self) -> D::Phase {
        self.phase
    }

    pub fn base(&self) -> D::Base {
        self.base
    }

    pub fn requirement(&self) -> RequirementLevel {
        self.requirement
    }

    pub fn is_singular(&self) -> bool {
        self.singular
    }

    pub fn default_component(&self) -> Option<D::Kind> {
        self.default_component
    }

    pub fn components(&self) -> &[D::Component] {
        &self.components
    }

    pub(crate) fn components_mut(&mut self) -> &mut Vec<D::Component> {
        &mut self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub(crate) fn mark_seeded(&mut self) {
        self.seeded = true;
    }

    /// Whether the default component goes back in when the stage is empty.
    ///
    /// Mandatory stages and internal phases are always refilled. Other
    /// stages only get their default before they have first held a component.
    pub fn accepts_default(&self) -> bool {
        self.default_component.is_some()
            && self.is_empty()
            && (self.requirement == RequirementLevel::Mandatory
                || self.phase.is_internal()
                || !self.seeded)
    }

    pub fn contains_kind(&self, kind: D::Kind) -> bool {
        self.components.iter().any(|component| component.kind() == kind)
    }

    fn check_base(&self, component: &D::Component) -> Result<(), ConstructionError> {
        if component.base() == self.base {
            Ok(())
        } else {
            Err(ConstructionError::ComponentNotAllowed {
                component: component.component_string(),
                stage: self.name.clone(),
            })
        }
    }

    fn check_index(&self, index: usize, len: usize) -> Result<(), ConstructionError> {
        if index < len {
            Ok(())
        } else {
            Err(ConstructionError::ComponentIndexOutOfRange {
                stage: self.name.clone(),
                index,
            })
        }
    }

    /// Appends `component`; on a singular stage it replaces the current one.
    pub fn add_component(&mut self, component: D::Component) -> Result<(), ConstructionError> {
        self.check_base(&component)?;
        if self.singular {
            self.components.clear();
        }
        self.components.push(component);
        Ok(())
    }

    /// Inserts `component` at `index` (`index == len` appends). On a singular
    /// stage it replaces the current component regardless of `index`.
    pub fn insert_component(
        &mut self,
        index: usize,
        component: D::Component,
    ) -> Result<(), ConstructionError> {
        self.check_base(&component)?;
        if self.singular {
            self.components.clear();
            self.components.push(component);
            return Ok(());
        }
        self.check_index(index, self.components.len() + 1)?;
        self.components.insert(index, component);
        Ok(())
    }

    pub fn replace_component(
        &mut self,
        index: usize,
        component: D::Component,
    ) -> Result<D::Component, ConstructionError> {
        self.check_base(&component)?;
        self.check_index(index, self.components.len())?;
        Ok(std::mem::replace(&mut self.components[index], component))
    }

    pub fn remove_component(&mut self, index: usize) -> Result<D::Component, ConstructionError> {
        self.check_index(index, self.components.len())?;
        Ok(self.components.remove(index))
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }
}
