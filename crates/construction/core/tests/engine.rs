mod common;

use std::sync::Arc;

use common::{
    Gadget, GadgetAttribute, GadgetCost, GadgetOption, GadgetRule, GadgetSequence, Part, PartKind,
};
use construction_core::{
    Calculated, Component, ComponentRegistry, ConstructionConfig, ConstructionContext,
    ConstructionError, ConstructionFailure, ErrorSeverity, IncompleteStage, OptionValue,
};

fn priced_context() -> ConstructionContext<Gadget> {
    let mut context = common::context();
    context
        .add_component(Some(0), "Receiver", Part::new(PartKind::Fixed))
        .unwrap();
    context
        .add_component(Some(0), "Accessories", Part::new(PartKind::Markup))
        .unwrap();
    context
}

#[test]
fn percentage_section_composes_against_earlier_sections() {
    let context = priced_context();
    let manifest = context.manifest();

    let names: Vec<&str> = manifest.sections().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["Receiver", "Accessories"]);
    assert_eq!(manifest.total_cost(GadgetCost::Credits).value(), 55.0);

    // The accessories section alone has no base value.
    let accessories = manifest.section("Accessories").unwrap();
    assert_eq!(accessories.total_cost(GadgetCost::Credits).value(), 0.0);
    assert_eq!(
        accessories.resolve_total(GadgetCost::Credits),
        Calculated::CouldNotCalculate
    );

    let range = context
        .attributes(0)
        .unwrap()
        .scalar(GadgetAttribute::Range)
        .unwrap();
    assert_eq!(range.value(), 110.0);
}

#[test]
fn internal_phases_stay_out_of_the_manifest() {
    let context = priced_context();
    let manifest = context.manifest();

    assert!(manifest.section("Ledger").is_none());
    assert_eq!(manifest.total_cost(GadgetCost::Weight).value(), 2.0);
    // The ledger's weight is still part of the derived totals.
    assert_eq!(
        context.view().total_cost(Some(0), GadgetCost::Weight).value(),
        3.0
    );
}

#[test]
fn prerequisites_run_before_dependants() {
    let mut context = common::context();
    context
        .add_component(Some(0), "Accessories", Part::new(PartKind::Reader))
        .unwrap();
    context
        .add_component(Some(0), "Accessories", Part::new(PartKind::Charger))
        .unwrap();

    let attributes = context.attributes(0).unwrap();
    assert_eq!(
        attributes.scalar(GadgetAttribute::Observed).unwrap().value(),
        0.0
    );
    assert_eq!(
        attributes.scalar(GadgetAttribute::Quality).unwrap().value(),
        20.0
    );

    let order: Vec<&str> = context
        .derived()
        .ledger()
        .iter()
        .map(|entry| entry.step().name())
        .collect();
    assert_eq!(order, vec!["Charger", "Reader", "Ledger"]);
}

#[test]
fn prerequisites_in_shared_stages_run_first() {
    let mut context = common::context();
    context
        .add_component(Some(0), "Accessories", Part::new(PartKind::Reader))
        .unwrap();
    context
        .add_component(None, "Fittings", Part::new(PartKind::Charger))
        .unwrap();

    let order: Vec<&str> = context
        .derived()
        .ledger()
        .iter()
        .map(|entry| entry.step().name())
        .collect();
    assert_eq!(order, vec!["Charger", "Reader", "Ledger"]);
    // The shared charger's cost is visible to the sequence's reader.
    assert_eq!(
        context
            .attributes(0)
            .unwrap()
            .scalar(GadgetAttribute::Quality)
            .unwrap()
            .value(),
        20.0
    );
}

#[test]
fn internal_defaults_are_refilled() {
    let mut context = common::context();
    assert_eq!(context.stage(None, "Ledger").unwrap().components().len(), 1);

    context.clear_stage(None, "Ledger").unwrap();
    assert_eq!(context.stage(None, "Ledger").unwrap().components().len(), 1);
}

#[test]
fn regenerate_is_idempotent() {
    let mut context = priced_context();
    let attributes = context.attributes(0).cloned();
    let manifest = context.manifest();

    context.regenerate().unwrap();
    context.regenerate().unwrap();

    assert_eq!(context.attributes(0).cloned(), attributes);
    assert_eq!(context.manifest(), manifest);
}

#[test]
fn singular_stage_never_holds_more_than_one() {
    let mut context = common::context();
    for price in [10, 20, 30] {
        let mut part = Part::new(PartKind::Fixed);
        part.set_option(GadgetOption::Price, OptionValue::Integer(price))
            .unwrap();
        context.add_component(Some(0), "Receiver", part).unwrap();
        assert_eq!(context.stage(Some(0), "Receiver").unwrap().components().len(), 1);
    }
    context
        .insert_component(Some(0), "Receiver", 4, Part::new(PartKind::Fixed))
        .unwrap();
    assert_eq!(context.stage(Some(0), "Receiver").unwrap().components().len(), 1);
    assert_eq!(
        context.manifest().total_cost(GadgetCost::Credits).value(),
        50.0
    );
}

#[test]
fn empty_mandatory_stage_is_reported_not_raised() {
    let mut context = common::context();
    assert_eq!(
        context.report().incomplete,
        vec![IncompleteStage {
            sequence: Some(0),
            stage: "Receiver".into(),
            has_candidates: true,
        }]
    );

    context
        .add_component(Some(0), "Receiver", Part::new(PartKind::Fixed))
        .unwrap();
    assert!(context.report().is_complete());
}

#[test]
fn stage_without_candidates_is_flagged() {
    let registry = Arc::new(ComponentRegistry::<Gadget>::new().with(|| Part::new(PartKind::Ledger)));
    let mut context = ConstructionContext::new(registry, &ConstructionConfig::default()).unwrap();
    context.add_sequence(GadgetSequence::Standard).unwrap();

    let incomplete = &context.report().incomplete;
    assert_eq!(incomplete.len(), 1);
    assert!(!incomplete[0].has_candidates);
    assert!(context.candidates(Some(0), "Receiver").unwrap().is_empty());
}

#[test]
fn incompatible_components_are_pruned() {
    let mut context = common::context();
    context
        .add_component(Some(0), "Accessories", Part::new(PartKind::Fragile))
        .unwrap();
    assert!(context.report().pruned.is_empty());

    context.set_tech_level(8).unwrap();
    assert!(context.stage(Some(0), "Accessories").unwrap().is_empty());
    assert_eq!(context.report().pruned.len(), 1);
    assert_eq!(context.report().pruned[0].component, "Fragile");

    let candidates: Vec<PartKind> = context
        .candidates(Some(0), "Accessories")
        .unwrap()
        .iter()
        .map(|part| part.kind())
        .collect();
    assert!(!candidates.contains(&PartKind::Fragile));
    assert!(candidates.contains(&PartKind::Markup));
}

#[test]
fn failed_pass_leaves_context_unchanged() {
    let mut context = priced_context();
    context
        .add_component(Some(0), "Accessories", Part::new(PartKind::Failing))
        .unwrap();
    let manifest = context.manifest();

    let error = context.set_rule(GadgetRule::Strict, true).unwrap_err();
    assert!(matches!(error, ConstructionError::ComponentFailed { .. }));
    assert_eq!(error.severity(), ErrorSeverity::Internal);

    assert!(context.rules().is_empty());
    assert_eq!(context.manifest(), manifest);
}

#[test]
fn ordering_cycle_is_fatal() {
    let mut context = common::context();
    context
        .add_component(Some(0), "Accessories", Part::new(PartKind::CycleA))
        .unwrap();

    let error = context
        .add_component(Some(0), "Accessories", Part::new(PartKind::CycleB))
        .unwrap_err();
    assert!(matches!(error, ConstructionError::OrderingCycle { .. }));
    assert_eq!(error.severity(), ErrorSeverity::Fatal);
    assert_eq!(context.stage(Some(0), "Accessories").unwrap().components().len(), 1);
}

#[test]
fn option_changes_are_validated() {
    let mut context = priced_context();

    let error = context
        .set_option(Some(0), "Receiver", 0, GadgetOption::Price, OptionValue::Integer(5000))
        .unwrap_err();
    assert!(matches!(error, ConstructionError::InvalidOption { .. }));
    assert_eq!(context.manifest().total_cost(GadgetCost::Credits).value(), 55.0);

    context
        .set_option(Some(0), "Receiver", 0, GadgetOption::Price, OptionValue::Integer(80))
        .unwrap();
    assert_eq!(context.manifest().total_cost(GadgetCost::Credits).value(), 88.0);
}

#[test]
fn lookups_report_missing_targets() {
    let mut context = common::context();

    assert!(matches!(
        context.stage(Some(3), "Receiver").unwrap_err(),
        ConstructionError::SequenceNotFound { index: 3, count: 1 }
    ));
    assert!(matches!(
        context.stage(Some(0), "Barrel").unwrap_err(),
        ConstructionError::StageNotFound { .. }
    ));
    assert!(matches!(
        context
            .add_component(Some(0), "Receiver", Part::new(PartKind::Markup))
            .unwrap_err(),
        ConstructionError::ComponentNotAllowed { .. }
    ));
    assert!(matches!(
        context.set_tech_level(30).unwrap_err(),
        ConstructionError::TechLevelOutOfRange { tech_level: 30, .. }
    ));
}

#[test]
fn secondary_sequences_get_their_own_sections() {
    let mut context = priced_context();
    let secondary = context.add_sequence(GadgetSequence::Standard).unwrap();
    let mut part = Part::new(PartKind::Fixed);
    part.set_option(GadgetOption::Price, OptionValue::Integer(30))
        .unwrap();
    context
        .add_component(Some(secondary), "Receiver", part)
        .unwrap();

    let manifest = context.manifest();
    let names: Vec<&str> = manifest.sections().iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        vec!["Primary Receiver", "Secondary Receiver", "Primary Accessories"]
    );
    // 50 seeds, the secondary receiver adds 30, accessories add 10%.
    assert_eq!(manifest.total_cost(GadgetCost::Credits).value(), 88.0);

    context.remove_sequence(0).unwrap();
    assert_eq!(context.sequence_count(), 1);
    assert_eq!(
        context.manifest().total_cost(GadgetCost::Credits).value(),
        30.0
    );
}
