use construction_core::{
    Component, ConstructionError, ConstructionStep, Factor, NumericModifier, ScalarValue,
    StepContext,
};

use super::{WeaponAttribute, WeaponBase, WeaponCost, WeaponDomain, WeaponKind, WeaponPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum BarrelLength {
    Minimal,
    Short,
    Standard,
    Long,
}

impl BarrelLength {
    /// Cost as a percentage of the receiver's cost.
    fn cost_percent(self) -> f64 {
        match self {
            Self::Minimal => 0.0,
            Self::Short => 10.0,
            Self::Standard => 20.0,
            Self::Long => 50.0,
        }
    }

    /// Weight as a percentage of the receiver's weight.
    fn weight_percent(self) -> f64 {
        match self {
            Self::Minimal => 0.0,
            Self::Short => 10.0,
            Self::Standard => 20.0,
            Self::Long => 40.0,
        }
    }

    fn range_multiplier(self) -> f64 {
        match self {
            Self::Minimal => 0.25,
            Self::Short => 0.5,
            Self::Standard => 1.0,
            Self::Long => 1.5,
        }
    }

    fn accuracy(self) -> f64 {
        match self {
            Self::Minimal => -2.0,
            Self::Short => -1.0,
            Self::Standard => 0.0,
            Self::Long => 1.0,
        }
    }
}

/// Barrel priced and weighted relative to the receiver.
#[derive(Clone, Debug)]
pub struct Barrel {
    length: BarrelLength,
}

impl Barrel {
    pub fn new(length: BarrelLength) -> Self {
        Self { length }
    }

    pub fn length(&self) -> BarrelLength {
        self.length
    }
}

impl Component<WeaponDomain> for Barrel {
    fn kind(&self) -> WeaponKind {
        match self.length {
            BarrelLength::Minimal => WeaponKind::MinimalBarrel,
            BarrelLength::Short => WeaponKind::ShortBarrel,
            BarrelLength::Standard => WeaponKind::StandardBarrel,
            BarrelLength::Long => WeaponKind::LongBarrel,
        }
    }

    fn base(&self) -> WeaponBase {
        WeaponBase::Barrel
    }

    fn component_string(&self) -> String {
        format!("{} Barrel", self.length)
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, WeaponDomain>,
    ) -> Result<(), ConstructionError> {
        let (credits, weight) = {
            let view = context.view();
            let receiver = |cost| view.phase_cost(sequence, WeaponPhase::Receiver, cost);
            (
                receiver(WeaponCost::Credits)
                    .percentage(&ScalarValue::named(self.length.cost_percent(), "Barrel Cost %")),
                receiver(WeaponCost::Weight)
                    .percentage(&ScalarValue::named(self.length.weight_percent(), "Barrel Weight %")),
            )
        };

        let mut step = ConstructionStep::<WeaponDomain>::builder("Barrel", self.component_string())
            .cost(WeaponCost::Credits, NumericModifier::constant(credits))
            .cost(WeaponCost::Weight, NumericModifier::constant(weight));
        let multiplier = self.length.range_multiplier();
        if multiplier != 1.0 {
            step = step.factor(Factor::modify(
                WeaponAttribute::Range,
                NumericModifier::multiplier(multiplier),
            ));
        }
        let accuracy = self.length.accuracy();
        if accuracy != 0.0 {
            step = step.factor(Factor::modify(
                WeaponAttribute::Accuracy,
                NumericModifier::constant(accuracy),
            ));
        }
        if self.length == BarrelLength::Minimal {
            step = step.note("Easily concealed");
        }
        context.apply_step(sequence, step.build())
    }
}
