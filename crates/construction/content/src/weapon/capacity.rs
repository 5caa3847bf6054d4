use construction_core::{
    Component, ComponentOption, ConstructionError, ConstructionStep, ContextView, Factor,
    NumericModifier, StepContext,
};

use super::{
    WeaponAttribute, WeaponBase, WeaponCost, WeaponDomain, WeaponKind, WeaponOption, WeaponRule,
};

const MIN_PERCENT: i64 = 10;
const MAX_PERCENT: i64 = 100;
const HANDGUN_MAX_PERCENT: i64 = 50;

/// Enlarged magazine, priced as a percentage of everything before it.
#[derive(Clone, Debug)]
pub struct IncreasedCapacity {
    options: Vec<ComponentOption<WeaponOption>>,
}

impl IncreasedCapacity {
    pub fn new() -> Self {
        Self {
            options: vec![
                ComponentOption::integer(
                    WeaponOption::Percent,
                    "Increase %",
                    MIN_PERCENT,
                    MIN_PERCENT,
                    MAX_PERCENT,
                )
                .with_description("Magazine size increase"),
            ],
        }
    }

    pub fn percent(&self) -> i64 {
        self.option(WeaponOption::Percent)
            .and_then(ComponentOption::as_integer)
            .unwrap_or(MIN_PERCENT)
    }
}

impl Default for IncreasedCapacity {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<WeaponDomain> for IncreasedCapacity {
    fn kind(&self) -> WeaponKind {
        WeaponKind::IncreasedCapacity
    }

    fn base(&self) -> WeaponBase {
        WeaponBase::Capacity
    }

    fn component_string(&self) -> String {
        "Increased Capacity".to_string()
    }

    fn instance_string(&self) -> String {
        format!("Increased Capacity (+{}%)", self.percent())
    }

    fn options(&self) -> &[ComponentOption<WeaponOption>] {
        &self.options
    }

    fn options_mut(&mut self) -> &mut [ComponentOption<WeaponOption>] {
        &mut self.options
    }

    // Handgun frames only take half the increase.
    fn update_options(&mut self, sequence: Option<usize>, context: &ContextView<'_, WeaponDomain>) {
        let max = if context.has_component(sequence, WeaponKind::HandgunReceiver) {
            HANDGUN_MAX_PERCENT
        } else {
            MAX_PERCENT
        };
        for option in &mut self.options {
            option.set_integer_range(MIN_PERCENT, max);
        }
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, WeaponDomain>,
    ) -> Result<(), ConstructionError> {
        let percent = self.percent() as f64;
        let mut step =
            ConstructionStep::<WeaponDomain>::builder("Capacity", self.instance_string())
                .cost(WeaponCost::Credits, NumericModifier::percentage(percent))
                .factor(Factor::modify(
                    WeaponAttribute::Magazine,
                    NumericModifier::percentage_rounded_down(percent),
                ));
        if context.view().has_rule(WeaponRule::AmmunitionWeight) {
            step = step.cost(WeaponCost::Weight, NumericModifier::percentage(percent / 4.0));
        }
        context.apply_step(sequence, step.build())
    }
}
