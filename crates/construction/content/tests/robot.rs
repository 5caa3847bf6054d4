use construction_content::robot::{
    self, Locomotion, LocomotionType, RobotAttribute, RobotCost, RobotKind, RobotOption,
    RobotRule, RobotSkill, SkillPackage, SlotOption, SlotOptionType, stages,
};
use construction_content::{Robot, RobotDomain};
use construction_core::{
    Component, ConstructionConfig, ConstructionContext, ConstructionError, OptionValue,
};

fn robot() -> Robot {
    robot::new_robot("Servitor", &ConstructionConfig::default()).unwrap()
}

fn credits(context: &ConstructionContext<RobotDomain>) -> f64 {
    context.manifest().total_cost(RobotCost::Credits).value()
}

fn scalar(context: &ConstructionContext<RobotDomain>, attribute: RobotAttribute) -> f64 {
    context
        .attributes(0)
        .unwrap()
        .scalar(attribute)
        .unwrap()
        .value()
}

fn add_skill(robot: &mut Robot, skill: RobotSkill, level: i64) -> Result<(), ConstructionError> {
    let context = robot.context_mut();
    context.add_component(Some(0), stages::SKILLS, SkillPackage::new().into())?;
    let index = context.stage(Some(0), stages::SKILLS)?.components().len() - 1;
    context.set_option(
        Some(0),
        stages::SKILLS,
        index,
        RobotOption::Skill,
        OptionValue::Enum(skill.to_string()),
    )?;
    context.set_option(
        Some(0),
        stages::SKILLS,
        index,
        RobotOption::Level,
        OptionValue::Integer(level),
    )
}

#[test]
fn default_robot_is_complete() {
    let robot = robot();
    let context = robot.context();
    assert!(context.report().is_complete());

    // Size 5 body, basic brain, wheels at half the body cost, protection 2.
    assert_eq!(credits(context), 1000.0 + 4000.0 + 500.0 + 200.0);
    let slots = context.manifest().resolve_total(RobotCost::Slots);
    assert_eq!(slots.value().map(|slots| slots.value()), Some(1.0));
    assert_eq!(scalar(context, RobotAttribute::Hits), 20.0);
    assert_eq!(scalar(context, RobotAttribute::Bandwidth), 1.0);
    assert_eq!(scalar(context, RobotAttribute::SlotsRemaining), 15.0);
}

#[test]
fn slot_options_consume_capacity() {
    let mut robot = robot();
    let context = robot.context_mut();
    for slot_option in [
        SlotOptionType::StorageCompartment,
        SlotOptionType::VoderSpeaker,
        SlotOptionType::DroneInterface,
    ] {
        context
            .add_component(Some(0), stages::SLOT_OPTIONS, SlotOption::new(slot_option).into())
            .unwrap();
    }

    assert_eq!(scalar(context, RobotAttribute::SlotsRemaining), 12.0);
    assert_eq!(
        context.attributes(0).unwrap().choice(RobotAttribute::Voice),
        Some("Voder")
    );
    assert_eq!(credits(context), 5700.0 + 250.0);
}

#[test]
fn skill_level_is_limited_by_bandwidth() {
    let mut robot = robot();
    add_skill(&mut robot, RobotSkill::Electronics, 1).unwrap();

    let error = robot
        .context_mut()
        .set_option(Some(0), stages::SKILLS, 0, RobotOption::Level, OptionValue::Integer(2))
        .unwrap_err();
    assert!(matches!(error, ConstructionError::InvalidOption { .. }));

    robot
        .context_mut()
        .set_option(
            Some(0),
            stages::CHASSIS,
            0,
            RobotOption::Brain,
            OptionValue::Enum("Advanced".into()),
        )
        .unwrap();
    robot
        .context_mut()
        .set_option(Some(0), stages::SKILLS, 0, RobotOption::Level, OptionValue::Integer(2))
        .unwrap();

    let skills = robot.skills();
    assert_eq!(skills.level(RobotSkill::Electronics), 2);
    assert_eq!(scalar(robot.context(), RobotAttribute::BandwidthUsed), 2.0);
}

#[test]
fn jack_of_all_trades_offsets_untrained_skills() {
    let mut robot = robot();
    add_skill(&mut robot, RobotSkill::Mechanic, 1).unwrap();
    assert_eq!(robot.skills().level(RobotSkill::Medic), -3);

    robot
        .context_mut()
        .set_option(
            Some(0),
            stages::CHASSIS,
            0,
            RobotOption::Brain,
            OptionValue::Enum("Very Advanced".into()),
        )
        .unwrap();
    add_skill(&mut robot, RobotSkill::JackOfAllTrades, 2).unwrap();

    let skills = robot.skills();
    assert_eq!(skills.level(RobotSkill::Mechanic), 1);
    assert_eq!(skills.level(RobotSkill::Medic), -1);
    assert_eq!(skills.len(), 2);
}

#[test]
fn lower_tech_level_narrows_choices() {
    let mut robot = robot();
    let context = robot.context_mut();
    context
        .replace_component(Some(0), stages::LOCOMOTION, 0, Locomotion::new(LocomotionType::Grav).into())
        .unwrap();
    assert_eq!(scalar(context, RobotAttribute::Speed), 18.0);
    context
        .set_option(Some(0), stages::ARMOUR, 0, RobotOption::Protection, OptionValue::Integer(4))
        .unwrap();

    context.set_tech_level(9).unwrap();

    // Grav is pruned and the wheeled default takes its place.
    let locomotion = context.stage(Some(0), stages::LOCOMOTION).unwrap();
    assert_eq!(locomotion.components()[0].kind(), RobotKind::Wheels);
    assert_eq!(context.report().pruned[0].component, "Grav");

    // Armour and brain are re-ranged to what TL9 allows.
    assert_eq!(scalar(context, RobotAttribute::Protection), 3.0);
    assert_eq!(
        context.attributes(0).unwrap().choice(RobotAttribute::Brain),
        Some("Primitive")
    );
    assert_eq!(scalar(context, RobotAttribute::Bandwidth), 0.0);
}

#[test]
fn removed_armour_stays_removed() {
    let mut robot = robot();
    let context = robot.context_mut();
    context.remove_component(Some(0), stages::ARMOUR, 0).unwrap();

    assert!(context.stage(Some(0), stages::ARMOUR).unwrap().is_empty());
    assert_eq!(credits(context), 5500.0);
    assert!(context.report().is_complete());

    context.set_tech_level(14).unwrap();
    assert!(context.stage(Some(0), stages::ARMOUR).unwrap().is_empty());

    #[cfg(feature = "serde")]
    {
        let json = robot::serialise_robot(&robot).unwrap();
        let restored = robot::deserialise_robot(&json, &ConstructionConfig::default()).unwrap();
        assert!(restored.context().stage(Some(0), stages::ARMOUR).unwrap().is_empty());
    }
}

#[test]
fn removed_locomotion_is_replaced() {
    let mut robot = robot();
    let context = robot.context_mut();
    context.clear_stage(Some(0), stages::LOCOMOTION).unwrap();

    let locomotion = context.stage(Some(0), stages::LOCOMOTION).unwrap();
    assert_eq!(locomotion.components()[0].kind(), RobotKind::Wheels);
}

#[test]
fn military_grade_extends_armour() {
    let mut robot = robot();
    let context = robot.context_mut();
    let armour = |context: &ConstructionContext<RobotDomain>| {
        context.stage(Some(0), stages::ARMOUR).unwrap().components()[0]
            .option(RobotOption::Protection)
            .unwrap()
            .integer_range()
    };
    assert_eq!(armour(context), Some((0, 4)));

    context.set_rule(RobotRule::MilitaryGrade, true).unwrap();
    assert_eq!(armour(context), Some((0, 8)));
    // Protection 2 on a 1000 credit body, doubled.
    assert_eq!(credits(context), 5000.0 + 500.0 + 400.0);
}

#[test]
fn overfull_chassis_is_noted() {
    let mut robot = robot();
    let context = robot.context_mut();
    context
        .set_option(Some(0), stages::CHASSIS, 0, RobotOption::Size, OptionValue::Integer(1))
        .unwrap();
    for _ in 0..2 {
        context
            .add_component(
                Some(0),
                stages::SLOT_OPTIONS,
                SlotOption::new(SlotOptionType::StorageCompartment).into(),
            )
            .unwrap();
    }

    assert_eq!(scalar(context, RobotAttribute::SlotsRemaining), -1.0);
    let notes: Vec<&String> = context
        .derived()
        .ledger()
        .iter()
        .flat_map(|entry| entry.step().notes())
        .collect();
    assert_eq!(notes, vec!["Slot capacity exceeded by 1"]);
}
