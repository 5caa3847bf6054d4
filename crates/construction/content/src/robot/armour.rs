use construction_core::{
    AttributeValue, Component, ComponentOption, ConstructionError, ConstructionStep, ContextView,
    Factor, NumericModifier, ScalarValue, StepContext,
};

use super::chassis::{MIN_SIZE, body_cost};
use super::{
    RobotAttribute, RobotBase, RobotCost, RobotDomain, RobotKind, RobotOption, RobotRule,
    scalar_attribute,
};

const DEFAULT_PROTECTION: i64 = 2;
const MILITARY_GRADE_BONUS: i64 = 4;

/// Highest protection buildable at `tech_level`.
pub(crate) fn max_protection(tech_level: u32, military_grade: bool) -> i64 {
    let base = match tech_level {
        0..=8 => 2,
        9..=11 => 3,
        12..=14 => 4,
        _ => 6,
    };
    if military_grade {
        base + MILITARY_GRADE_BONUS
    } else {
        base
    }
}

/// Protection whose range follows the tech level.
#[derive(Clone, Debug)]
pub struct Armour {
    options: Vec<ComponentOption<RobotOption>>,
}

impl Armour {
    pub fn new() -> Self {
        Self {
            options: vec![ComponentOption::integer(
                RobotOption::Protection,
                "Protection",
                DEFAULT_PROTECTION,
                0,
                max_protection(0, false),
            )],
        }
    }

    pub fn protection(&self) -> i64 {
        self.option(RobotOption::Protection)
            .and_then(ComponentOption::as_integer)
            .unwrap_or_default()
    }
}

impl Default for Armour {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<RobotDomain> for Armour {
    fn kind(&self) -> RobotKind {
        RobotKind::Armour
    }

    fn base(&self) -> RobotBase {
        RobotBase::Armour
    }

    fn component_string(&self) -> String {
        "Armour".to_string()
    }

    fn instance_string(&self) -> String {
        format!("Armour (Protection {})", self.protection())
    }

    fn options(&self) -> &[ComponentOption<RobotOption>] {
        &self.options
    }

    fn options_mut(&mut self) -> &mut [ComponentOption<RobotOption>] {
        &mut self.options
    }

    fn update_options(&mut self, _sequence: Option<usize>, context: &ContextView<'_, RobotDomain>) {
        let max = max_protection(
            context.tech_level(),
            context.has_rule(RobotRule::MilitaryGrade),
        );
        for option in &mut self.options {
            option.set_integer_range(0, max);
        }
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, RobotDomain>,
    ) -> Result<(), ConstructionError> {
        let protection = self.protection() as f64;
        let (size, military_grade) = {
            let view = context.view();
            (
                scalar_attribute(&view, sequence, RobotAttribute::Size, MIN_SIZE as f64) as i64,
                view.has_rule(RobotRule::MilitaryGrade),
            )
        };

        // 10% of the body cost per point of protection.
        let mut credits = ScalarValue::named(body_cost(size), "Body Cost")
            .percentage(&ScalarValue::named(protection * 10.0, "Armour %"));
        if military_grade {
            credits = credits.multiply(&ScalarValue::named(2.0, "Military Grade"));
        }
        let slots = ScalarValue::named(protection / 2.0, "Armour Slots").ceil();

        let step = ConstructionStep::<RobotDomain>::builder("Armour", self.instance_string())
            .cost(RobotCost::Credits, NumericModifier::constant(credits))
            .cost(RobotCost::Slots, NumericModifier::constant(slots))
            .factor(Factor::set(
                RobotAttribute::Protection,
                AttributeValue::scalar(protection),
            ))
            .build();
        context.apply_step(sequence, step)
    }
}
