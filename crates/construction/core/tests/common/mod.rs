//! A small gadget domain exercising every engine hook.
#![allow(dead_code)]

use std::sync::Arc;

use construction_core::{
    AttributeValue, Component, ComponentOption, ComponentRegistry, ConstructionConfig,
    ConstructionContext, ConstructionError, ConstructionStep, Domain, Factor, NumericModifier,
    Phase, StageDefinition, StepContext,
};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum GadgetPhase {
    Setup,
    Receiver,
    Accessory,
    Wrapup,
}

impl Phase for GadgetPhase {
    fn is_internal(&self) -> bool {
        matches!(self, Self::Setup | Self::Wrapup)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum GadgetCost {
    Credits,
    Weight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum GadgetAttribute {
    Range,
    Quality,
    Observed,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
pub enum GadgetOption {
    Price,
    Percent,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
pub enum GadgetRule {
    Strict,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
pub enum GadgetSequence {
    Standard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum GadgetBase {
    Core,
    Extra,
    Bookkeeping,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
pub enum PartKind {
    Fixed,
    Markup,
    Charger,
    Reader,
    Fragile,
    Failing,
    CycleA,
    CycleB,
    Ledger,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gadget;

impl Domain for Gadget {
    const NAME: &'static str = "gadget";

    type Phase = GadgetPhase;
    type Cost = GadgetCost;
    type Attribute = GadgetAttribute;
    type OptionId = GadgetOption;
    type Rule = GadgetRule;
    type SequenceKind = GadgetSequence;
    type Base = GadgetBase;
    type Kind = PartKind;
    type Component = Part;

    fn stages(kind: Option<GadgetSequence>) -> Vec<StageDefinition<Self>> {
        match kind {
            Some(GadgetSequence::Standard) => vec![
                StageDefinition::new("Receiver", GadgetPhase::Receiver, GadgetBase::Core)
                    .mandatory()
                    .singular(),
                StageDefinition::new("Accessories", GadgetPhase::Accessory, GadgetBase::Extra),
            ],
            None => vec![
                StageDefinition::new("Fittings", GadgetPhase::Accessory, GadgetBase::Extra),
                StageDefinition::new("Ledger", GadgetPhase::Wrapup, GadgetBase::Bookkeeping)
                    .singular()
                    .with_default(PartKind::Ledger),
            ],
        }
    }
}

#[derive(Clone, Debug)]
pub struct Part {
    kind: PartKind,
    options: Vec<ComponentOption<GadgetOption>>,
}

impl Part {
    pub fn new(kind: PartKind) -> Self {
        let options = match kind {
            PartKind::Fixed => vec![ComponentOption::integer(
                GadgetOption::Price,
                "Price",
                50,
                0,
                1000,
            )],
            PartKind::Markup => vec![ComponentOption::integer(
                GadgetOption::Percent,
                "Percent",
                10,
                -50,
                100,
            )],
            _ => Vec::new(),
        };
        Self { kind, options }
    }

    fn integer(&self, id: GadgetOption) -> i64 {
        self.option(id)
            .and_then(ComponentOption::as_integer)
            .unwrap_or_default()
    }
}

impl Component<Gadget> for Part {
    fn kind(&self) -> PartKind {
        self.kind
    }

    fn base(&self) -> GadgetBase {
        match self.kind {
            PartKind::Fixed => GadgetBase::Core,
            PartKind::Ledger => GadgetBase::Bookkeeping,
            _ => GadgetBase::Extra,
        }
    }

    fn component_string(&self) -> String {
        self.kind.to_string()
    }

    fn is_compatible(
        &self,
        _sequence: Option<usize>,
        context: &construction_core::ContextView<'_, Gadget>,
    ) -> bool {
        match self.kind {
            PartKind::Fragile => context.tech_level() >= 10,
            _ => true,
        }
    }

    fn order_after(&self) -> &'static [PartKind] {
        match self.kind {
            PartKind::Reader => &[PartKind::Charger],
            PartKind::CycleA => &[PartKind::CycleB],
            PartKind::CycleB => &[PartKind::CycleA],
            _ => &[],
        }
    }

    fn options(&self) -> &[ComponentOption<GadgetOption>] {
        &self.options
    }

    fn options_mut(&mut self) -> &mut [ComponentOption<GadgetOption>] {
        &mut self.options
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, Gadget>,
    ) -> Result<(), ConstructionError> {
        let step = ConstructionStep::<Gadget>::builder("Part", self.kind.to_string());
        let step = match self.kind {
            PartKind::Fixed => step
                .cost(
                    GadgetCost::Credits,
                    NumericModifier::constant(self.integer(GadgetOption::Price) as f64),
                )
                .cost(GadgetCost::Weight, NumericModifier::constant(2.0))
                .factor(Factor::set(GadgetAttribute::Range, AttributeValue::scalar(100.0))),
            PartKind::Markup => step
                .cost(
                    GadgetCost::Credits,
                    NumericModifier::percentage(self.integer(GadgetOption::Percent) as f64),
                )
                .factor(Factor::modify(
                    GadgetAttribute::Range,
                    NumericModifier::percentage(10.0),
                )),
            PartKind::Charger => {
                let observed = context
                    .view()
                    .phase_cost(sequence, GadgetPhase::Accessory, GadgetCost::Credits);
                step.cost(GadgetCost::Credits, NumericModifier::constant(20.0))
                    .factor(Factor::set(GadgetAttribute::Observed, AttributeValue::from(observed)))
            }
            PartKind::Reader => {
                let observed = context
                    .view()
                    .phase_cost(sequence, GadgetPhase::Accessory, GadgetCost::Credits);
                step.factor(Factor::set(GadgetAttribute::Quality, AttributeValue::from(observed)))
            }
            PartKind::Fragile => step.note("Handle with care"),
            PartKind::Failing => {
                if context.view().has_rule(GadgetRule::Strict) {
                    return Err(ConstructionError::component_failed(
                        "Failing",
                        "rejected under strict rules",
                    ));
                }
                step
            }
            PartKind::CycleA | PartKind::CycleB => step,
            PartKind::Ledger => step.cost(GadgetCost::Weight, NumericModifier::constant(1.0)),
        };
        context.apply_step(sequence, step.build())
    }
}

pub fn registry() -> Arc<ComponentRegistry<Gadget>> {
    Arc::new(
        ComponentRegistry::new()
            .with(|| Part::new(PartKind::Fixed))
            .with(|| Part::new(PartKind::Markup))
            .with(|| Part::new(PartKind::Charger))
            .with(|| Part::new(PartKind::Reader))
            .with(|| Part::new(PartKind::Fragile))
            .with(|| Part::new(PartKind::Failing))
            .with(|| Part::new(PartKind::CycleA))
            .with(|| Part::new(PartKind::CycleB))
            .with(|| Part::new(PartKind::Ledger)),
    )
}

/// A context with one standard sequence.
pub fn context() -> ConstructionContext<Gadget> {
    let mut context =
        ConstructionContext::new(registry(), &ConstructionConfig::default()).unwrap();
    context.add_sequence(GadgetSequence::Standard).unwrap();
    context
}
