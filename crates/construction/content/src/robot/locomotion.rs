use construction_core::{
    AttributeValue, Component, ConstructionError, ConstructionStep, ContextView, Factor,
    NumericModifier, ScalarValue, StepContext,
};

use super::chassis::{MIN_SIZE, body_cost};
use super::{RobotAttribute, RobotBase, RobotCost, RobotDomain, RobotKind, scalar_attribute};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum LocomotionType {
    Wheels,
    Tracks,
    Walker,
    Grav,
}

impl LocomotionType {
    /// Cost as a multiple of the chassis body cost.
    fn cost_multiplier(self) -> f64 {
        match self {
            Self::Wheels => 0.5,
            Self::Tracks => 1.0,
            Self::Walker => 2.0,
            Self::Grav => 4.0,
        }
    }

    fn speed(self) -> f64 {
        match self {
            Self::Wheels => 9.0,
            Self::Tracks => 6.0,
            Self::Walker => 6.0,
            Self::Grav => 18.0,
        }
    }

    fn min_tech_level(self) -> u32 {
        match self {
            Self::Grav => 12,
            Self::Walker => 8,
            Self::Wheels | Self::Tracks => 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Locomotion {
    locomotion: LocomotionType,
}

impl Locomotion {
    pub fn new(locomotion: LocomotionType) -> Self {
        Self { locomotion }
    }

    pub fn locomotion(&self) -> LocomotionType {
        self.locomotion
    }
}

impl Component<RobotDomain> for Locomotion {
    fn kind(&self) -> RobotKind {
        match self.locomotion {
            LocomotionType::Wheels => RobotKind::Wheels,
            LocomotionType::Tracks => RobotKind::Tracks,
            LocomotionType::Walker => RobotKind::Walker,
            LocomotionType::Grav => RobotKind::Grav,
        }
    }

    fn base(&self) -> RobotBase {
        RobotBase::Locomotion
    }

    fn component_string(&self) -> String {
        self.locomotion.to_string()
    }

    fn is_compatible(&self, _sequence: Option<usize>, context: &ContextView<'_, RobotDomain>) -> bool {
        context.tech_level() >= self.locomotion.min_tech_level()
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, RobotDomain>,
    ) -> Result<(), ConstructionError> {
        let size = scalar_attribute(
            &context.view(),
            sequence,
            RobotAttribute::Size,
            MIN_SIZE as f64,
        ) as i64;
        let credits = ScalarValue::named(body_cost(size), "Body Cost").multiply(
            &ScalarValue::named(self.locomotion.cost_multiplier(), "Locomotion Multiplier"),
        );

        let step = ConstructionStep::<RobotDomain>::builder("Locomotion", self.component_string())
            .cost(RobotCost::Credits, NumericModifier::constant(credits))
            .factor(Factor::set(
                RobotAttribute::Locomotion,
                AttributeValue::choice(self.locomotion),
            ))
            .factor(Factor::set(
                RobotAttribute::Speed,
                AttributeValue::scalar(self.locomotion.speed()),
            ))
            .build();
        context.apply_step(sequence, step)
    }
}
