use construction_core::{
    Component, ComponentOption, ConstructionError, ConstructionStep, ContextView, Factor,
    NumericModifier, StepContext,
};

use super::{
    RobotAttribute, RobotBase, RobotCost, RobotDomain, RobotKind, RobotOption, scalar_attribute,
};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum RobotSkill {
    Athletics,
    Electronics,
    Engineer,
    Explosives,
    #[strum(serialize = "Gun Combat")]
    GunCombat,
    #[default]
    Mechanic,
    Medic,
    Navigation,
    Recon,
    Steward,
    #[strum(serialize = "Jack-of-all-Trades")]
    JackOfAllTrades,
}

/// One skill at a level no higher than the brain's bandwidth.
#[derive(Clone, Debug)]
pub struct SkillPackage {
    options: Vec<ComponentOption<RobotOption>>,
}

impl SkillPackage {
    pub fn new() -> Self {
        Self {
            options: vec![
                ComponentOption::enum_of(RobotOption::Skill, "Skill", RobotSkill::default()),
                ComponentOption::integer(RobotOption::Level, "Level", 0, 0, 0)
                    .with_description("Limited by brain bandwidth"),
            ],
        }
    }

    pub fn skill(&self) -> RobotSkill {
        self.option(RobotOption::Skill)
            .and_then(|option| option.as_enum())
            .unwrap_or_default()
    }

    pub fn level(&self) -> i64 {
        self.option(RobotOption::Level)
            .and_then(ComponentOption::as_integer)
            .unwrap_or_default()
    }

    /// [`Self::level`] saturated into the skill table's range.
    pub fn skill_level(&self) -> i32 {
        let level = self.level();
        i32::try_from(level).unwrap_or(if level < 0 { i32::MIN } else { i32::MAX })
    }
}

impl Default for SkillPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl Component<RobotDomain> for SkillPackage {
    fn kind(&self) -> RobotKind {
        RobotKind::SkillPackage
    }

    fn base(&self) -> RobotBase {
        RobotBase::Skill
    }

    fn component_string(&self) -> String {
        "Skill Package".to_string()
    }

    fn instance_string(&self) -> String {
        format!("Skill Package ({}-{})", self.skill(), self.level())
    }

    fn options(&self) -> &[ComponentOption<RobotOption>] {
        &self.options
    }

    fn options_mut(&mut self) -> &mut [ComponentOption<RobotOption>] {
        &mut self.options
    }

    fn update_options(&mut self, sequence: Option<usize>, context: &ContextView<'_, RobotDomain>) {
        let bandwidth = scalar_attribute(context, sequence, RobotAttribute::Bandwidth, 0.0) as i64;
        for option in &mut self.options {
            if option.id() == RobotOption::Level {
                option.set_integer_range(0, bandwidth.max(0));
            }
        }
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, RobotDomain>,
    ) -> Result<(), ConstructionError> {
        let level = self.level();
        let credits = 100.0 * 10f64.powi(self.skill_level());
        let step = ConstructionStep::<RobotDomain>::builder("Skill", self.instance_string())
            .cost(RobotCost::Credits, NumericModifier::constant(credits))
            .factor(Factor::text(format!("{}-{level}", self.skill())))
            .factor(Factor::modify(
                RobotAttribute::BandwidthUsed,
                NumericModifier::constant(level as f64),
            ))
            .build();
        context.apply_step(sequence, step)
    }
}

#[cfg(test)]
mod tests {
    use construction_core::OptionValue;

    use super::*;

    fn package(level: i64) -> SkillPackage {
        let mut package = SkillPackage::new();
        for option in Component::<RobotDomain>::options_mut(&mut package) {
            if option.id() == RobotOption::Level {
                option.set_integer_range(i64::MIN, i64::MAX);
            }
        }
        Component::<RobotDomain>::set_option(&mut package, RobotOption::Level, OptionValue::Integer(level))
            .unwrap();
        package
    }

    #[test]
    fn skill_level_saturates() {
        assert_eq!(package(3).skill_level(), 3);
        assert_eq!(package(i64::from(i32::MAX) + 1).skill_level(), i32::MAX);
        assert_eq!(package(i64::MAX).skill_level(), i32::MAX);
        assert_eq!(package(i64::MIN).skill_level(), i32::MIN);
    }
}
