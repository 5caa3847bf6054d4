//! Robots.
//!
//! A robot is a single sequence: a chassis (size and brain), locomotion,
//! armour, skill packages and slot options. Slot usage is a cost kind, so the
//! manifest reports slots consumed alongside credits; the internal
//! finalisation phase compares usage with the chassis capacity.

mod armour;
mod chassis;
mod finalisation;
mod locomotion;
mod skill_package;
mod slot_option;

use std::sync::Arc;

use construction_core::{
    ComponentRegistry, ConstructionConfig, ConstructionError, ContextView, Domain, Phase,
    SkillGroup, StageDefinition,
};

use crate::artifact::Artifact;

pub use armour::Armour;
pub use chassis::{BrainType, Chassis};
pub use finalisation::RobotFinalisation;
pub use locomotion::{Locomotion, LocomotionType};
pub use skill_package::{RobotSkill, SkillPackage};
pub use slot_option::{SlotOption, SlotOptionType};

/// Stage names used by the robot layout.
pub mod stages {
    pub const CHASSIS: &str = "Chassis";
    pub const LOCOMOTION: &str = "Locomotion";
    pub const ARMOUR: &str = "Armour";
    pub const SKILLS: &str = "Skills";
    pub const SLOT_OPTIONS: &str = "Slot Options";
    pub const FINALISATION: &str = "Finalisation";
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
pub enum RobotPhase {
    Chassis,
    Locomotion,
    Armour,
    Skills,
    #[strum(serialize = "Slot Options")]
    SlotOptions,
    Finalisation,
}

impl Phase for RobotPhase {
    fn is_internal(&self) -> bool {
        *self == Self::Finalisation
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
pub enum RobotCost {
    Credits,
    Slots,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum RobotAttribute {
    Size,
    Hits,
    Brain,
    Bandwidth,
    #[strum(serialize = "Bandwidth Used")]
    BandwidthUsed,
    Locomotion,
    Speed,
    Protection,
    #[strum(serialize = "Slot Capacity")]
    SlotCapacity,
    #[strum(serialize = "Slots Remaining")]
    SlotsRemaining,
    Voice,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
pub enum RobotOption {
    Size,
    Brain,
    Protection,
    Skill,
    Level,
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
pub enum RobotRule {
    /// Heavier armour at double the price.
    MilitaryGrade,
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
pub enum RobotSequence {
    Robot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum RobotBase {
    Chassis,
    Locomotion,
    Armour,
    Skill,
    SlotOption,
    Finalisation,
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
pub enum RobotKind {
    Chassis,
    Wheels,
    Tracks,
    Walker,
    Grav,
    Armour,
    SkillPackage,
    StorageCompartment,
    VoderSpeaker,
    DroneInterface,
    RobotFinalisation,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RobotDomain;

impl Domain for RobotDomain {
    const NAME: &'static str = "robot";

    type Phase = RobotPhase;
    type Cost = RobotCost;
    type Attribute = RobotAttribute;
    type OptionId = RobotOption;
    type Rule = RobotRule;
    type SequenceKind = RobotSequence;
    type Base = RobotBase;
    type Kind = RobotKind;
    type Component = RobotComponent;

    fn stages(kind: Option<RobotSequence>) -> Vec<StageDefinition<Self>> {
        match kind {
            Some(RobotSequence::Robot) => vec![
                StageDefinition::new(stages::CHASSIS, RobotPhase::Chassis, RobotBase::Chassis)
                    .mandatory()
                    .singular()
                    .with_default(RobotKind::Chassis),
                StageDefinition::new(
                    stages::LOCOMOTION,
                    RobotPhase::Locomotion,
                    RobotBase::Locomotion,
                )
                .mandatory()
                .singular()
                .with_default(RobotKind::Wheels),
                StageDefinition::new(stages::ARMOUR, RobotPhase::Armour, RobotBase::Armour)
                    .singular()
                    .with_default(RobotKind::Armour),
                StageDefinition::new(stages::SKILLS, RobotPhase::Skills, RobotBase::Skill)
                    .desirable(),
                StageDefinition::new(
                    stages::SLOT_OPTIONS,
                    RobotPhase::SlotOptions,
                    RobotBase::SlotOption,
                ),
            ],
            None => vec![
                StageDefinition::new(
                    stages::FINALISATION,
                    RobotPhase::Finalisation,
                    RobotBase::Finalisation,
                )
                .singular()
                .with_default(RobotKind::RobotFinalisation),
            ],
        }
    }
}

component_enum! {
    /// Every robot component.
    pub enum RobotComponent for RobotDomain {
        Chassis(Chassis),
        Locomotion(Locomotion),
        Armour(Armour),
        Skill(SkillPackage),
        SlotOption(SlotOption),
        Finalisation(RobotFinalisation),
    }
}

/// The robot component catalog.
pub fn registry() -> Arc<ComponentRegistry<RobotDomain>> {
    Arc::new(
        ComponentRegistry::<RobotDomain>::new()
            .with(|| Chassis::new().into())
            .with(|| Locomotion::new(LocomotionType::Wheels).into())
            .with(|| Locomotion::new(LocomotionType::Tracks).into())
            .with(|| Locomotion::new(LocomotionType::Walker).into())
            .with(|| Locomotion::new(LocomotionType::Grav).into())
            .with(|| Armour::new().into())
            .with(|| SkillPackage::new().into())
            .with(|| SlotOption::new(SlotOptionType::StorageCompartment).into())
            .with(|| SlotOption::new(SlotOptionType::VoderSpeaker).into())
            .with(|| SlotOption::new(SlotOptionType::DroneInterface).into())
            .with(|| RobotFinalisation.into()),
    )
}

/// A named robot.
pub type Robot = Artifact<RobotDomain>;

/// Creates a robot with its single sequence and default components.
pub fn new_robot(
    name: impl Into<String>,
    settings: &ConstructionConfig,
) -> Result<Robot, ConstructionError> {
    let mut robot = Robot::new(name, registry(), settings)?;
    robot.context_mut().add_sequence(RobotSequence::Robot)?;
    Ok(robot)
}

#[cfg(feature = "serde")]
pub fn serialise_robot(robot: &Robot) -> Result<String, construction_core::SerialisationError> {
    robot.to_json()
}

#[cfg(feature = "serde")]
pub fn deserialise_robot(
    json: &str,
    settings: &ConstructionConfig,
) -> Result<Robot, construction_core::SerialisationError> {
    Robot::from_json(json, registry(), settings)
}

impl Artifact<RobotDomain> {
    /// Skill levels granted by the installed skill packages.
    ///
    /// Untrained skills fall back to the configured untrained level, offset
    /// by any Jack-of-all-Trades package.
    pub fn skills(&self) -> SkillGroup<RobotSkill> {
        let context = self.context();
        let mut skills = SkillGroup::new(context.settings().untrained_skill_level)
            .with_jack_of_all_trades(RobotSkill::JackOfAllTrades);
        let packages = context
            .stages()
            .iter()
            .flat_map(|stage| stage.components())
            .filter_map(|component| match component {
                RobotComponent::Skill(package) => Some(package),
                _ => None,
            });
        for package in packages {
            skills.set_level(package.skill(), package.skill_level(), true);
        }
        skills
    }
}

/// Scalar attribute of `sequence`, or `default` when unset.
pub(crate) fn scalar_attribute(
    context: &ContextView<'_, RobotDomain>,
    sequence: Option<usize>,
    attribute: RobotAttribute,
    default: f64,
) -> f64 {
    sequence
        .and_then(|index| context.attributes(index))
        .and_then(|attributes| attributes.scalar(attribute))
        .map_or(default, |value| value.value())
}

#[cfg(test)]
mod tests {
    use construction_core::Component;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_kind_is_registered_once() {
        let registry = registry();
        assert_eq!(registry.len(), RobotKind::iter().count());
        for kind in RobotKind::iter() {
            assert_eq!(registry.create(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn only_finalisation_is_internal() {
        let internal: Vec<_> = RobotPhase::iter().filter(Phase::is_internal).collect();
        assert_eq!(internal, vec![RobotPhase::Finalisation]);
    }
}
