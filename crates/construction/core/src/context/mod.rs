//! The construction context: declared configuration, derived state and the
//! regenerate driver.
//!
//! # Architecture
//!
//! ```text
//! ConstructionContext<D>
//!   ├── Configuration<D>   (declared: sequences, stages, components, options,
//!   │                        tech level, rules; this is what gets serialized)
//!   ├── DerivedState<D>    (attributes per sequence + step ledger; rebuilt by
//!   │                        every regenerate pass, never edited directly)
//!   └── RegenerateReport   (pruned components, incomplete mandatory stages)
//! ```
//!
//! Every mutation works on a copy of the configuration, runs a full pass over
//! the copy, and commits configuration, derived state and report together.
//! A pass that fails leaves the context exactly as it was.
//!
//! Components see the context through two handles: [`ContextView`] for
//! read-only queries (compatibility, option updates) and [`StepContext`],
//! which additionally lets `create_steps` commit steps.

mod ordering;
mod regenerate;
mod report;

pub use report::{IncompleteStage, PrunedComponent, RegenerateReport};

pub(crate) use regenerate::{PassMode, evaluate};

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::attributes::{AttributeValue, AttributesGroup};
use crate::component::Component;
use crate::config::ConstructionConfig;
use crate::domain::Domain;
use crate::error::{ConstructionError, ConstructionFailure};
use crate::manifest::Manifest;
use crate::modifier::calculate_numeric_modifier_sequence;
use crate::option::OptionValue;
use crate::registry::ComponentRegistry;
use crate::scalar::ScalarValue;
use crate::stage::ConstructionStage;
use crate::step::ConstructionStep;

/// The declared, serializable half of a construction.
#[derive(Clone, Debug)]
pub struct Configuration<D: Domain> {
    pub(crate) tech_level: u32,
    pub(crate) rules: BTreeSet<D::Rule>,
    pub(crate) sequences: Vec<D::SequenceKind>,
    /// Sorted by phase, then sequence index, with shared stages last.
    pub(crate) stages: Vec<ConstructionStage<D>>,
}

impl<D: Domain> Configuration<D> {
    fn new(tech_level: u32) -> Self {
        let mut config = Self {
            tech_level,
            rules: BTreeSet::new(),
            sequences: Vec::new(),
            stages: D::stages(None)
                .iter()
                .map(|definition| ConstructionStage::from_definition(definition, None))
                .collect(),
        };
        config.sort_stages();
        config
    }

    fn sort_stages(&mut self) {
        self.stages
            .sort_by_key(|stage| (stage.phase(), stage.sequence().unwrap_or(usize::MAX)));
    }

    pub fn tech_level(&self) -> u32 {
        self.tech_level
    }

    pub fn rules(&self) -> &BTreeSet<D::Rule> {
        &self.rules
    }

    pub fn sequences(&self) -> &[D::SequenceKind] {
        &self.sequences
    }

    pub fn stages(&self) -> &[ConstructionStage<D>] {
        &self.stages
    }

    pub(crate) fn add_sequence(&mut self, kind: D::SequenceKind) -> usize {
        let index = self.sequences.len();
        self.sequences.push(kind);
        self.stages.extend(
            D::stages(Some(kind))
                .iter()
                .map(|definition| ConstructionStage::from_definition(definition, Some(index))),
        );
        self.sort_stages();
        index
    }

    pub(crate) fn remove_sequence(&mut self, index: usize) -> Result<(), ConstructionError> {
        self.check_sequence(Some(index))?;
        self.sequences.remove(index);
        self.stages.retain(|stage| stage.sequence() != Some(index));
        for stage in &mut self.stages {
            if let Some(other) = stage.sequence().filter(|other| *other > index) {
                stage.set_sequence(Some(other - 1));
            }
        }
        self.sort_stages();
        Ok(())
    }

    pub(crate) fn check_sequence(&self, sequence: Option<usize>) -> Result<(), ConstructionError> {
        match sequence {
            Some(index) if index >= self.sequences.len() => Err(ConstructionError::SequenceNotFound {
                index,
                count: self.sequences.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Index of the stage named `name` in `sequence` (`None` for shared stages).
    pub fn stage_index(&self, sequence: Option<usize>, name: &str) -> Result<usize, ConstructionError> {
        self.check_sequence(sequence)?;
        self.stages
            .iter()
            .position(|stage| stage.sequence() == sequence && stage.name() == name)
            .ok_or_else(|| ConstructionError::StageNotFound {
                sequence,
                stage: name.to_string(),
            })
    }

    pub(crate) fn stage_mut(
        &mut self,
        sequence: Option<usize>,
        name: &str,
    ) -> Result<&mut ConstructionStage<D>, ConstructionError> {
        let index = self.stage_index(sequence, name)?;
        Ok(&mut self.stages[index])
    }

    /// Stages visible from `sequence`: its own plus the shared ones. `None`
    /// sees every stage.
    pub(crate) fn stages_in_scope(
        &self,
        sequence: Option<usize>,
    ) -> impl Iterator<Item = &ConstructionStage<D>> + '_ {
        self.stages.iter().filter(move |stage| {
            sequence.is_none() || stage.sequence().is_none() || stage.sequence() == sequence
        })
    }
}

/// A step committed during the current pass, with where it came from.
#[derive(Clone, Debug)]
pub struct LedgerEntry<D: Domain> {
    sequence: Option<usize>,
    phase: D::Phase,
    stage: usize,
    step: ConstructionStep<D>,
}

impl<D: Domain> LedgerEntry<D> {
    /// Sequence the step was applied to; `None` means every sequence.
    pub fn sequence(&self) -> Option<usize> {
        self.sequence
    }

    pub fn phase(&self) -> D::Phase {
        self.phase
    }

    /// Index of the owning stage in [`Configuration::stages`].
    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn step(&self) -> &ConstructionStep<D> {
        &self.step
    }

    fn visible_from(&self, sequence: Option<usize>) -> bool {
        sequence.is_none() || self.sequence.is_none() || self.sequence == sequence
    }
}

/// Everything a regenerate pass derives from a configuration.
#[derive(Clone, Debug)]
pub struct DerivedState<D: Domain> {
    attributes: Vec<AttributesGroup<D::Attribute>>,
    ledger: Vec<LedgerEntry<D>>,
}

impl<D: Domain> DerivedState<D> {
    pub(crate) fn new(sequences: usize) -> Self {
        Self {
            attributes: (0..sequences).map(|_| AttributesGroup::new()).collect(),
            ledger: Vec::new(),
        }
    }

    pub fn attributes(&self, sequence: usize) -> Option<&AttributesGroup<D::Attribute>> {
        self.attributes.get(sequence)
    }

    pub fn ledger(&self) -> &[LedgerEntry<D>] {
        &self.ledger
    }
}

/// Read-only queries over the committed state of the pass in progress.
pub struct ContextView<'a, D: Domain> {
    config: &'a Configuration<D>,
    derived: &'a DerivedState<D>,
    registry: &'a ComponentRegistry<D>,
}

impl<D: Domain> Clone for ContextView<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Domain> Copy for ContextView<'_, D> {}

impl<'a, D: Domain> ContextView<'a, D> {
    pub(crate) fn new(
        config: &'a Configuration<D>,
        derived: &'a DerivedState<D>,
        registry: &'a ComponentRegistry<D>,
    ) -> Self {
        Self {
            config,
            derived,
            registry,
        }
    }

    pub fn tech_level(&self) -> u32 {
        self.config.tech_level
    }

    pub fn has_rule(&self, rule: D::Rule) -> bool {
        self.config.rules.contains(&rule)
    }

    pub fn rules(&self) -> &'a BTreeSet<D::Rule> {
        &self.config.rules
    }

    pub fn sequence_count(&self) -> usize {
        self.config.sequences.len()
    }

    pub fn sequence_kind(&self, sequence: usize) -> Option<D::SequenceKind> {
        self.config.sequences.get(sequence).copied()
    }

    /// The first sequence is the primary one.
    pub fn is_primary(&self, sequence: Option<usize>) -> bool {
        sequence == Some(0)
    }

    pub fn registry(&self) -> &'a ComponentRegistry<D> {
        self.registry
    }

    pub fn stage(&self, sequence: Option<usize>, name: &str) -> Option<&'a ConstructionStage<D>> {
        let index = self.config.stage_index(sequence, name).ok()?;
        self.config.stages.get(index)
    }

    /// True if a component of `kind` occupies any stage visible from `sequence`.
    pub fn has_component(&self, sequence: Option<usize>, kind: D::Kind) -> bool {
        self.find_first_component(sequence, kind).is_some()
    }

    pub fn find_first_component(
        &self,
        sequence: Option<usize>,
        kind: D::Kind,
    ) -> Option<&'a D::Component> {
        self.config
            .stages_in_scope(sequence)
            .flat_map(|stage| stage.components())
            .find(|component| component.kind() == kind)
    }

    pub fn attributes(&self, sequence: usize) -> Option<&'a AttributesGroup<D::Attribute>> {
        self.derived.attributes(sequence)
    }

    pub fn attribute(&self, sequence: usize, attribute: D::Attribute) -> Option<&'a AttributeValue> {
        self.attributes(sequence)?.get(attribute)
    }

    /// Steps committed so far in this pass that are visible from `sequence`.
    pub fn steps(
        &self,
        sequence: Option<usize>,
    ) -> impl Iterator<Item = &'a ConstructionStep<D>> + 'a {
        self.derived
            .ledger
            .iter()
            .filter(move |entry| entry.visible_from(sequence))
            .map(LedgerEntry::step)
    }

    /// Folds the `cost` modifiers of this pass's steps in `phase` that are
    /// visible from `sequence`.
    pub fn phase_cost(&self, sequence: Option<usize>, phase: D::Phase, cost: D::Cost) -> ScalarValue {
        let modifiers: Vec<_> = self
            .derived
            .ledger
            .iter()
            .filter(|entry| entry.phase == phase && entry.visible_from(sequence))
            .filter_map(|entry| entry.step.cost(cost).cloned())
            .collect();
        calculate_numeric_modifier_sequence(&modifiers, Some(format!("{phase} {cost}").as_str()))
    }

    /// Like [`Self::phase_cost`], across every phase.
    pub fn total_cost(&self, sequence: Option<usize>, cost: D::Cost) -> ScalarValue {
        let modifiers: Vec<_> = self
            .derived
            .ledger
            .iter()
            .filter(|entry| entry.visible_from(sequence))
            .filter_map(|entry| entry.step.cost(cost).cloned())
            .collect();
        calculate_numeric_modifier_sequence(&modifiers, Some(format!("Total {cost}").as_str()))
    }
}

/// Handle passed to [`Component::create_steps`].
pub struct StepContext<'a, D: Domain> {
    config: &'a Configuration<D>,
    derived: &'a mut DerivedState<D>,
    registry: &'a ComponentRegistry<D>,
    phase: D::Phase,
    stage: usize,
}

impl<'a, D: Domain> StepContext<'a, D> {
    pub(crate) fn new(
        config: &'a Configuration<D>,
        derived: &'a mut DerivedState<D>,
        registry: &'a ComponentRegistry<D>,
        phase: D::Phase,
        stage: usize,
    ) -> Self {
        Self {
            config,
            derived,
            registry,
            phase,
            stage,
        }
    }

    /// Read-only queries, including steps committed so far in this pass.
    pub fn view(&self) -> ContextView<'_, D> {
        ContextView::new(self.config, self.derived, self.registry)
    }

    pub fn phase(&self) -> D::Phase {
        self.phase
    }

    /// Commits `step` to the ledger and applies its attribute factors.
    ///
    /// `sequence = None` applies the factors to every sequence.
    pub fn apply_step(
        &mut self,
        sequence: Option<usize>,
        step: ConstructionStep<D>,
    ) -> Result<(), ConstructionError> {
        self.config.check_sequence(sequence)?;
        for factor in step.factors() {
            match sequence {
                Some(index) => factor.apply(&mut self.derived.attributes[index])?,
                None => {
                    for group in &mut self.derived.attributes {
                        factor.apply(group)?;
                    }
                }
            }
        }
        self.derived.ledger.push(LedgerEntry {
            sequence,
            phase: self.phase,
            stage: self.stage,
            step,
        });
        Ok(())
    }
}

/// An incrementally edited construction of domain `D`.
pub struct ConstructionContext<D: Domain> {
    registry: Arc<ComponentRegistry<D>>,
    settings: ConstructionConfig,
    config: Configuration<D>,
    derived: DerivedState<D>,
    report: RegenerateReport,
}

impl<D: Domain> ConstructionContext<D> {
    /// Creates an empty construction at the configured default tech level.
    pub fn new(
        registry: Arc<ComponentRegistry<D>>,
        settings: &ConstructionConfig,
    ) -> Result<Self, ConstructionError> {
        check_tech_level(settings, settings.default_tech_level)?;
        let mut context = Self {
            registry,
            settings: settings.clone(),
            config: Configuration::new(settings.default_tech_level),
            derived: DerivedState::new(0),
            report: RegenerateReport::default(),
        };
        context.regenerate()?;
        Ok(context)
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry<D>> {
        &self.registry
    }

    pub fn settings(&self) -> &ConstructionConfig {
        &self.settings
    }

    pub fn configuration(&self) -> &Configuration<D> {
        &self.config
    }

    pub fn derived(&self) -> &DerivedState<D> {
        &self.derived
    }

    /// Outcome of the last committed pass.
    pub fn report(&self) -> &RegenerateReport {
        &self.report
    }

    pub fn view(&self) -> ContextView<'_, D> {
        ContextView::new(&self.config, &self.derived, &self.registry)
    }

    pub fn tech_level(&self) -> u32 {
        self.config.tech_level
    }

    pub fn set_tech_level(&mut self, tech_level: u32) -> Result<(), ConstructionError> {
        check_tech_level(&self.settings, tech_level)?;
        self.transact(|config| {
            config.tech_level = tech_level;
            Ok(())
        })
    }

    pub fn rules(&self) -> &BTreeSet<D::Rule> {
        &self.config.rules
    }

    pub fn set_rule(&mut self, rule: D::Rule, enabled: bool) -> Result<(), ConstructionError> {
        self.transact(|config| {
            if enabled {
                config.rules.insert(rule);
            } else {
                config.rules.remove(&rule);
            }
            Ok(())
        })
    }

    pub fn set_rules(&mut self, rules: BTreeSet<D::Rule>) -> Result<(), ConstructionError> {
        self.transact(|config| {
            config.rules = rules;
            Ok(())
        })
    }

    pub fn sequences(&self) -> &[D::SequenceKind] {
        &self.config.sequences
    }

    pub fn sequence_count(&self) -> usize {
        self.config.sequences.len()
    }

    /// Adds a build sequence with its stages; returns its index.
    pub fn add_sequence(&mut self, kind: D::SequenceKind) -> Result<usize, ConstructionError> {
        self.transact(|config| Ok(config.add_sequence(kind)))
    }

    /// Removes a sequence; later sequences shift down by one.
    pub fn remove_sequence(&mut self, index: usize) -> Result<(), ConstructionError> {
        self.transact(|config| config.remove_sequence(index))
    }

    pub fn clear_sequences(&mut self) -> Result<(), ConstructionError> {
        self.transact(|config| {
            config.sequences.clear();
            config.stages.retain(|stage| stage.sequence().is_none());
            Ok(())
        })
    }

    pub fn stages(&self) -> &[ConstructionStage<D>] {
        &self.config.stages
    }

    pub fn stage(
        &self,
        sequence: Option<usize>,
        name: &str,
    ) -> Result<&ConstructionStage<D>, ConstructionError> {
        let index = self.config.stage_index(sequence, name)?;
        Ok(&self.config.stages[index])
    }

    /// Fresh instances of every registered kind the stage accepts that are
    /// compatible with the committed state.
    pub fn candidates(
        &self,
        sequence: Option<usize>,
        stage: &str,
    ) -> Result<Vec<D::Component>, ConstructionError> {
        let base = self.stage(sequence, stage)?.base();
        let view = self.view();
        Ok(self
            .registry
            .kinds_for(base)
            .filter_map(|kind| self.registry.create(kind))
            .filter(|component| component.is_compatible(sequence, &view))
            .collect())
    }

    pub fn add_component(
        &mut self,
        sequence: Option<usize>,
        stage: &str,
        component: D::Component,
    ) -> Result<(), ConstructionError> {
        self.transact(|config| config.stage_mut(sequence, stage)?.add_component(component))
    }

    pub fn insert_component(
        &mut self,
        sequence: Option<usize>,
        stage: &str,
        index: usize,
        component: D::Component,
    ) -> Result<(), ConstructionError> {
        self.transact(|config| {
            config
                .stage_mut(sequence, stage)?
                .insert_component(index, component)
        })
    }

    /// Replaces the component at `index`, returning the old one.
    pub fn replace_component(
        &mut self,
        sequence: Option<usize>,
        stage: &str,
        index: usize,
        component: D::Component,
    ) -> Result<D::Component, ConstructionError> {
        self.transact(|config| {
            config
                .stage_mut(sequence, stage)?
                .replace_component(index, component)
        })
    }

    pub fn remove_component(
        &mut self,
        sequence: Option<usize>,
        stage: &str,
        index: usize,
    ) -> Result<D::Component, ConstructionError> {
        self.transact(|config| config.stage_mut(sequence, stage)?.remove_component(index))
    }

    pub fn clear_stage(&mut self, sequence: Option<usize>, stage: &str) -> Result<(), ConstructionError> {
        self.transact(|config| {
            config.stage_mut(sequence, stage)?.clear();
            Ok(())
        })
    }

    /// Sets an option on the component at `index` of a stage.
    pub fn set_option(
        &mut self,
        sequence: Option<usize>,
        stage: &str,
        index: usize,
        option: D::OptionId,
        value: OptionValue,
    ) -> Result<(), ConstructionError> {
        self.transact(|config| {
            let stage = config.stage_mut(sequence, stage)?;
            let stage_name = stage.name().to_string();
            let component = stage
                .components_mut()
                .get_mut(index)
                .ok_or(ConstructionError::ComponentIndexOutOfRange {
                    stage: stage_name,
                    index,
                })?;
            component
                .set_option(option, value)
                .map_err(|source| ConstructionError::InvalidOption {
                    component: component.component_string(),
                    source,
                })
        })
    }

    /// Re-derives attributes, ledger and report from the configuration.
    pub fn regenerate(&mut self) -> Result<&RegenerateReport, ConstructionError> {
        self.transact(|_| Ok(()))?;
        Ok(&self.report)
    }

    pub fn attributes(&self, sequence: usize) -> Option<&AttributesGroup<D::Attribute>> {
        self.derived.attributes(sequence)
    }

    /// Sectioned projection of the committed steps.
    pub fn manifest(&self) -> Manifest<D> {
        Manifest::build(&self.config, &self.derived)
    }

    /// Applies `edit` to a copy of the configuration, runs a full pass and
    /// commits only if both succeed.
    pub(crate) fn transact<T>(
        &mut self,
        edit: impl FnOnce(&mut Configuration<D>) -> Result<T, ConstructionError>,
    ) -> Result<T, ConstructionError> {
        let mut candidate = self.config.clone();
        let outcome = edit(&mut candidate).and_then(|value| {
            evaluate(&self.registry, &mut candidate, PassMode::FULL)
                .map(|(derived, report)| (value, derived, report))
        });
        match outcome {
            Ok((value, derived, report)) => {
                self.config = candidate;
                self.derived = derived;
                self.report = report;
                Ok(value)
            }
            Err(error) => {
                tracing::warn!(
                    "{} construction change rejected ({}, {}): {}",
                    D::NAME,
                    error.error_code(),
                    error.severity().as_str(),
                    error
                );
                Err(error)
            }
        }
    }

    /// Commits an externally evaluated configuration.
    pub(crate) fn commit(
        &mut self,
        config: Configuration<D>,
        derived: DerivedState<D>,
        report: RegenerateReport,
    ) {
        self.config = config;
        self.derived = derived;
        self.report = report;
    }
}

impl<D: Domain> Clone for ConstructionContext<D> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            settings: self.settings.clone(),
            config: self.config.clone(),
            derived: self.derived.clone(),
            report: self.report.clone(),
        }
    }
}

impl<D: Domain> std::fmt::Debug for ConstructionContext<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructionContext")
            .field("domain", &D::NAME)
            .field("config", &self.config)
            .field("report", &self.report)
            .finish()
    }
}

fn check_tech_level(settings: &ConstructionConfig, tech_level: u32) -> Result<(), ConstructionError> {
    if settings.contains_tech_level(tech_level) {
        Ok(())
    } else {
        Err(ConstructionError::TechLevelOutOfRange {
            tech_level,
            min: settings.min_tech_level,
            max: settings.max_tech_level,
        })
    }
}
