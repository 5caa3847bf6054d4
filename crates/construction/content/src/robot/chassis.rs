use construction_core::{
    AttributeValue, Component, ComponentOption, ConstructionError, ConstructionStep, ContextView,
    Factor, NumericModifier, StepContext,
};
use strum::IntoEnumIterator;

use super::{RobotAttribute, RobotBase, RobotCost, RobotDomain, RobotKind, RobotOption};

pub const MIN_SIZE: i64 = 1;
pub const MAX_SIZE: i64 = 8;
const DEFAULT_SIZE: i64 = 5;

/// Body cost, hits and slot capacity by size.
const SIZES: [(f64, f64, f64); 8] = [
    (100.0, 1.0, 2.0),
    (200.0, 4.0, 4.0),
    (400.0, 8.0, 8.0),
    (800.0, 12.0, 12.0),
    (1000.0, 20.0, 16.0),
    (2000.0, 32.0, 32.0),
    (4000.0, 50.0, 48.0),
    (8000.0, 72.0, 64.0),
];

fn size_row(size: i64) -> (f64, f64, f64) {
    let index = size.clamp(MIN_SIZE, MAX_SIZE) - MIN_SIZE;
    SIZES[index as usize]
}

/// Cost of the bare body of a chassis of `size`.
pub(crate) fn body_cost(size: i64) -> f64 {
    size_row(size).0
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum BrainType {
    Primitive,
    #[default]
    Basic,
    Advanced,
    #[strum(serialize = "Very Advanced")]
    VeryAdvanced,
}

impl BrainType {
    pub fn bandwidth(self) -> i64 {
        match self {
            Self::Primitive => 0,
            Self::Basic => 1,
            Self::Advanced => 2,
            Self::VeryAdvanced => 3,
        }
    }

    pub fn min_tech_level(self) -> u32 {
        match self {
            Self::Primitive => 0,
            Self::Basic => 10,
            Self::Advanced => 11,
            Self::VeryAdvanced => 12,
        }
    }

    fn credits(self) -> f64 {
        match self {
            Self::Primitive => 1000.0,
            Self::Basic => 4000.0,
            Self::Advanced => 10000.0,
            Self::VeryAdvanced => 20000.0,
        }
    }
}

/// Body and brain. Sets size, hits, slot capacity and bandwidth.
#[derive(Clone, Debug)]
pub struct Chassis {
    options: Vec<ComponentOption<RobotOption>>,
}

impl Chassis {
    pub fn new() -> Self {
        Self {
            options: vec![
                ComponentOption::integer(RobotOption::Size, "Size", DEFAULT_SIZE, MIN_SIZE, MAX_SIZE),
                ComponentOption::enum_of(RobotOption::Brain, "Brain", BrainType::default()),
            ],
        }
    }

    pub fn size(&self) -> i64 {
        self.option(RobotOption::Size)
            .and_then(ComponentOption::as_integer)
            .unwrap_or(DEFAULT_SIZE)
    }

    pub fn brain(&self) -> BrainType {
        self.option(RobotOption::Brain)
            .and_then(|option| option.as_enum())
            .unwrap_or_default()
    }
}

impl Default for Chassis {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<RobotDomain> for Chassis {
    fn kind(&self) -> RobotKind {
        RobotKind::Chassis
    }

    fn base(&self) -> RobotBase {
        RobotBase::Chassis
    }

    fn component_string(&self) -> String {
        "Chassis".to_string()
    }

    fn instance_string(&self) -> String {
        format!("Size {} Chassis", self.size())
    }

    fn options(&self) -> &[ComponentOption<RobotOption>] {
        &self.options
    }

    fn options_mut(&mut self) -> &mut [ComponentOption<RobotOption>] {
        &mut self.options
    }

    fn update_options(&mut self, _sequence: Option<usize>, context: &ContextView<'_, RobotDomain>) {
        let tech_level = context.tech_level();
        let available: Vec<String> = BrainType::iter()
            .filter(|brain| brain.min_tech_level() <= tech_level)
            .map(|brain| brain.to_string())
            .collect();
        for option in &mut self.options {
            if option.id() == RobotOption::Brain {
                option.set_choices(available.clone());
            }
        }
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, RobotDomain>,
    ) -> Result<(), ConstructionError> {
        let size = self.size();
        let (cost, hits, slots) = size_row(size);
        let body = ConstructionStep::<RobotDomain>::builder("Chassis", self.instance_string())
            .cost(RobotCost::Credits, NumericModifier::constant(cost))
            .factor(Factor::set(RobotAttribute::Size, AttributeValue::scalar(size as f64)))
            .factor(Factor::set(RobotAttribute::Hits, AttributeValue::scalar(hits)))
            .factor(Factor::set(
                RobotAttribute::SlotCapacity,
                AttributeValue::scalar(slots),
            ))
            .build();
        context.apply_step(sequence, body)?;

        let brain = self.brain();
        let brain_step = ConstructionStep::<RobotDomain>::builder("Brain", format!("{brain} Brain"))
            .cost(RobotCost::Credits, NumericModifier::constant(brain.credits()))
            .factor(Factor::set(RobotAttribute::Brain, AttributeValue::choice(brain)))
            .factor(Factor::set(
                RobotAttribute::Bandwidth,
                AttributeValue::scalar(brain.bandwidth() as f64),
            ))
            .build();
        context.apply_step(sequence, brain_step)
    }
}
