//! Shared bookkeeping in the internal phases.

use construction_core::{
    AttributeValue, Component, ConstructionError, ConstructionStep, Factor, StepContext,
};

use super::{BULKY_WEIGHT, WeaponAttribute, WeaponBase, WeaponCost, WeaponDomain, WeaponKind};

/// Records the tech level on every sequence.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeaponInitialisation;

impl Component<WeaponDomain> for WeaponInitialisation {
    fn kind(&self) -> WeaponKind {
        WeaponKind::WeaponInitialisation
    }

    fn base(&self) -> WeaponBase {
        WeaponBase::Initialisation
    }

    fn component_string(&self) -> String {
        "Weapon Initialisation".to_string()
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, WeaponDomain>,
    ) -> Result<(), ConstructionError> {
        let tech_level = f64::from(context.view().tech_level());
        let step = ConstructionStep::<WeaponDomain>::builder("Initialisation", "Initialisation")
            .factor(Factor::set(
                WeaponAttribute::TechLevel,
                AttributeValue::scalar(tech_level),
            ))
            .build();
        context.apply_step(sequence, step)
    }
}

/// Totals each sequence's weight and flags bulky weapons.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeaponFinalisation;

impl Component<WeaponDomain> for WeaponFinalisation {
    fn kind(&self) -> WeaponKind {
        WeaponKind::WeaponFinalisation
    }

    fn base(&self) -> WeaponBase {
        WeaponBase::Finalisation
    }

    fn component_string(&self) -> String {
        "Weapon Finalisation".to_string()
    }

    fn create_steps(
        &self,
        _sequence: Option<usize>,
        context: &mut StepContext<'_, WeaponDomain>,
    ) -> Result<(), ConstructionError> {
        let weights: Vec<_> = {
            let view = context.view();
            (0..view.sequence_count())
                .map(|index| view.total_cost(Some(index), WeaponCost::Weight))
                .collect()
        };

        for (index, weight) in weights.into_iter().enumerate() {
            let bulky = weight.value() > BULKY_WEIGHT;
            let mut step = ConstructionStep::<WeaponDomain>::builder("Finalisation", "Finalisation")
                .factor(Factor::set(WeaponAttribute::TotalWeight, weight));
            if bulky {
                step = step
                    .factor(Factor::set(WeaponAttribute::Bulky, AttributeValue::choice("Bulky")))
                    .note(format!("Weighs more than {BULKY_WEIGHT}kg"));
            }
            context.apply_step(Some(index), step.build())?;
        }
        Ok(())
    }
}
