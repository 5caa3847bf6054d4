//! The regenerate pass.

use strum::IntoEnumIterator;

use super::ordering::dependency_order;
use super::{Configuration, ContextView, DerivedState, IncompleteStage, PrunedComponent, RegenerateReport, StepContext};
use crate::component::Component;
use crate::domain::Domain;
use crate::error::ConstructionError;
use crate::registry::ComponentRegistry;
use crate::stage::RequirementLevel;

/// Knobs for one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PassMode {
    /// Remove components that are no longer compatible.
    pub prune: bool,
}

impl PassMode {
    pub const FULL: Self = Self { prune: true };
    /// Used while a document is being loaded and option values are not yet applied.
    pub const SKELETON: Self = Self { prune: false };
}

/// Runs a full pass over `config`.
///
/// Phases run in declared order. Within a phase every stage is pruned and
/// topped up with defaults, each sequence's stages in sequence order and then
/// the shared stages. The components of the whole phase are then ordered by
/// `order_after`, ties keeping that stage order, and evaluated one by one in
/// the scope of their own stage. `config` is updated in place with pruning,
/// defaults and option updates; callers pass a copy they may discard.
pub(crate) fn evaluate<D: Domain>(
    registry: &ComponentRegistry<D>,
    config: &mut Configuration<D>,
    mode: PassMode,
) -> Result<(DerivedState<D>, RegenerateReport), ConstructionError> {
    let mut derived = DerivedState::new(config.sequences.len());
    let mut report = RegenerateReport::default();

    tracing::debug!(
        "{} regenerate pass started: {} sequence(s), {} stage(s)",
        D::NAME,
        config.sequences.len(),
        config.stages.len()
    );

    let scopes: Vec<Option<usize>> = (0..config.sequences.len())
        .map(Some)
        .chain(std::iter::once(None))
        .collect();

    for phase in D::Phase::iter() {
        let group: Vec<usize> = scopes
            .iter()
            .flat_map(|&scope| {
                config
                    .stages
                    .iter()
                    .enumerate()
                    .filter(move |(_, stage)| stage.phase() == phase && stage.sequence() == scope)
                    .map(|(index, _)| index)
            })
            .collect();
        if group.is_empty() {
            continue;
        }

        for &stage in &group {
            if mode.prune {
                prune_stage(registry, config, &derived, stage, &mut report);
            }
            fill_default(registry, config, &derived, stage)?;
            if !config.stages[stage].is_empty() {
                config.stages[stage].mark_seeded();
            }
            check_requirement(registry, config, &derived, stage, &mut report);
        }

        run_phase(registry, config, &mut derived, phase, &group)?;
    }

    report.steps = derived.ledger.len();
    tracing::debug!(
        "{} regenerate pass finished: {} step(s), {} pruned, {} incomplete stage(s)",
        D::NAME,
        report.steps,
        report.pruned.len(),
        report.incomplete.len()
    );
    Ok((derived, report))
}

fn prune_stage<D: Domain>(
    registry: &ComponentRegistry<D>,
    config: &mut Configuration<D>,
    derived: &DerivedState<D>,
    stage: usize,
    report: &mut RegenerateReport,
) {
    let sequence = config.stages[stage].sequence();
    let view = ContextView::new(config, derived, registry);
    let incompatible: Vec<usize> = config.stages[stage]
        .components()
        .iter()
        .enumerate()
        .filter(|(_, component)| !component.is_compatible(sequence, &view))
        .map(|(index, _)| index)
        .collect();

    let stage = &mut config.stages[stage];
    for index in incompatible.into_iter().rev() {
        let component = stage.components_mut().remove(index);
        tracing::debug!(
            "pruned incompatible {} from stage {}",
            component.component_string(),
            stage.name()
        );
        report.pruned.push(PrunedComponent {
            sequence,
            stage: stage.name().to_string(),
            component: component.component_string(),
        });
    }
}

fn fill_default<D: Domain>(
    registry: &ComponentRegistry<D>,
    config: &mut Configuration<D>,
    derived: &DerivedState<D>,
    stage: usize,
) -> Result<(), ConstructionError> {
    let target = &config.stages[stage];
    let (sequence, kind) = match target.default_component() {
        Some(kind) if target.accepts_default() => (target.sequence(), kind),
        _ => return Ok(()),
    };

    let component = registry.create(kind).ok_or_else(|| {
        ConstructionError::component_failed(kind.to_string(), "default component is not registered")
    })?;
    if !component.is_compatible(sequence, &ContextView::new(config, derived, registry)) {
        return Ok(());
    }

    tracing::debug!(
        "inserted default {} into stage {}",
        component.component_string(),
        config.stages[stage].name()
    );
    config.stages[stage].add_component(component)
}

fn check_requirement<D: Domain>(
    registry: &ComponentRegistry<D>,
    config: &Configuration<D>,
    derived: &DerivedState<D>,
    stage: usize,
    report: &mut RegenerateReport,
) {
    let target = &config.stages[stage];
    if target.requirement() != RequirementLevel::Mandatory || !target.is_empty() {
        return;
    }

    let view = ContextView::new(config, derived, registry);
    let has_candidates = registry
        .kinds_for(target.base())
        .filter_map(|kind| registry.create(kind))
        .any(|component| component.is_compatible(target.sequence(), &view));

    tracing::debug!(
        "mandatory stage {} is empty (candidates available: {})",
        target.name(),
        has_candidates
    );
    report.incomplete.push(IncompleteStage {
        sequence: target.sequence(),
        stage: target.name().to_string(),
        has_candidates,
    });
}

fn run_phase<D: Domain>(
    registry: &ComponentRegistry<D>,
    config: &mut Configuration<D>,
    derived: &mut DerivedState<D>,
    phase: D::Phase,
    group: &[usize],
) -> Result<(), ConstructionError> {
    let slots: Vec<(usize, usize)> = group
        .iter()
        .flat_map(|&stage| (0..config.stages[stage].components().len()).map(move |index| (stage, index)))
        .collect();
    let nodes: Vec<(D::Kind, &[D::Kind])> = slots
        .iter()
        .map(|&(stage, index)| {
            let component = &config.stages[stage].components()[index];
            (component.kind(), component.order_after())
        })
        .collect();
    let order = dependency_order(&phase, &nodes)?;

    for slot in order {
        let (stage, index) = slots[slot];
        let scope = config.stages[stage].sequence();

        let mut updated = config.stages[stage].components()[index].clone();
        updated.update_options(scope, &ContextView::new(config, derived, registry));
        config.stages[stage].components_mut()[index] = updated;

        let component = &config.stages[stage].components()[index];
        let mut context = StepContext::new(config, derived, registry, phase, stage);
        component.create_steps(scope, &mut context)?;
    }
    Ok(())
}
