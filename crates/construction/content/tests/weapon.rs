use construction_content::weapon::{
    self, Accessory, AccessoryType, Barrel, BarrelLength, IncreasedCapacity, Receiver,
    ReceiverType, WeaponAttribute, WeaponComponent, WeaponCost, WeaponKind, WeaponOption,
    WeaponSequence, stages,
};
use construction_content::{Weapon, WeaponDomain};
use construction_core::{
    Component, ConstructionConfig, ConstructionContext, ConstructionError, DiceRoll, OptionError,
    OptionValue, ScalarModifier,
};

fn pistol() -> Weapon {
    let mut weapon =
        weapon::new_weapon("Service Pistol", WeaponSequence::Conventional, &ConstructionConfig::default())
            .unwrap();
    weapon
        .context_mut()
        .add_component(Some(0), stages::RECEIVER, Receiver::new(ReceiverType::Handgun).into())
        .unwrap();
    weapon
}

fn credits(context: &ConstructionContext<WeaponDomain>) -> f64 {
    context.manifest().total_cost(WeaponCost::Credits).value()
}

fn accessory(accessory: AccessoryType) -> WeaponComponent {
    Accessory::new(accessory).into()
}

#[test]
fn receiver_is_mandatory_and_barrel_defaults() {
    let weapon =
        weapon::new_weapon("Blank", WeaponSequence::Conventional, &ConstructionConfig::default())
            .unwrap();
    let context = weapon.context();

    let incomplete = &context.report().incomplete;
    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].stage, stages::RECEIVER);
    assert!(incomplete[0].has_candidates);

    let barrel = context.stage(Some(0), stages::BARREL).unwrap();
    assert_eq!(barrel.components().len(), 1);
    assert_eq!(barrel.components()[0].kind(), WeaponKind::StandardBarrel);
}

#[test]
fn handgun_with_standard_barrel() {
    let weapon = pistol();
    let context = weapon.context();
    assert!(context.report().is_complete());

    // 175 for the receiver plus a barrel at 20% of it.
    assert_eq!(credits(context), 210.0);
    let weight = context.manifest().total_cost(WeaponCost::Weight).value();
    assert!((weight - 1.2).abs() < 1e-9);

    let attributes = context.attributes(0).unwrap();
    assert_eq!(attributes.dice(WeaponAttribute::Damage), Some(DiceRoll::new(3, -3)));
    assert_eq!(attributes.choice(WeaponAttribute::Calibre), Some("Medium"));
    assert_eq!(attributes.scalar(WeaponAttribute::Magazine).unwrap().value(), 12.0);
    assert_eq!(attributes.scalar(WeaponAttribute::TechLevel).unwrap().value(), 12.0);
    assert!(!attributes.has_attribute(WeaponAttribute::Bulky));

    let manifest = context.manifest();
    let names: Vec<&str> = manifest
        .sections()
        .iter()
        .map(|section| section.name())
        .collect();
    assert_eq!(names, vec![stages::RECEIVER, stages::BARREL]);
}

#[test]
fn barrel_follows_receiver_calibre() {
    let mut weapon = pistol();
    weapon
        .context_mut()
        .set_option(
            Some(0),
            stages::RECEIVER,
            0,
            WeaponOption::Calibre,
            OptionValue::Enum("Heavy".into()),
        )
        .unwrap();
    weapon
        .context_mut()
        .replace_component(Some(0), stages::BARREL, 0, Barrel::new(BarrelLength::Long).into())
        .unwrap();

    let context = weapon.context();
    // 300 receiver, long barrel at 50%.
    assert_eq!(credits(context), 450.0);
    let attributes = context.attributes(0).unwrap();
    assert_eq!(attributes.scalar(WeaponAttribute::Range).unwrap().value(), 22.5);
    assert_eq!(attributes.scalar(WeaponAttribute::Accuracy).unwrap().value(), 1.0);
}

#[test]
fn capacity_is_percentage_of_earlier_sections() {
    let mut weapon = pistol();
    let context = weapon.context_mut();
    context
        .add_component(Some(0), stages::CAPACITY, IncreasedCapacity::new().into())
        .unwrap();
    context
        .set_option(Some(0), stages::CAPACITY, 0, WeaponOption::Percent, OptionValue::Integer(50))
        .unwrap();

    assert_eq!(credits(context), 315.0);
    let magazine = context
        .attributes(0)
        .unwrap()
        .scalar(WeaponAttribute::Magazine)
        .unwrap()
        .value();
    assert_eq!(magazine, 18.0);

    // Handgun frames cap the increase at 50%.
    let error = context
        .set_option(Some(0), stages::CAPACITY, 0, WeaponOption::Percent, OptionValue::Integer(80))
        .unwrap_err();
    assert!(matches!(error, ConstructionError::InvalidOption { .. }));
    assert_eq!(credits(context), 315.0);
}

#[test]
fn capacity_range_widens_for_long_guns() {
    let mut weapon = pistol();
    let context = weapon.context_mut();
    context
        .add_component(Some(0), stages::CAPACITY, IncreasedCapacity::new().into())
        .unwrap();
    let range = |context: &ConstructionContext<WeaponDomain>| {
        context.stage(Some(0), stages::CAPACITY).unwrap().components()[0]
            .option(WeaponOption::Percent)
            .unwrap()
            .integer_range()
    };
    assert_eq!(range(context), Some((10, 50)));

    context
        .replace_component(Some(0), stages::RECEIVER, 0, Receiver::new(ReceiverType::LongGun).into())
        .unwrap();
    assert_eq!(range(context), Some((10, 100)));
}

#[test]
fn secure_weapon_is_priced_after_other_accessories() {
    let mut weapon = pistol();
    let context = weapon.context_mut();
    for kind in [
        AccessoryType::SecureWeapon,
        AccessoryType::Gyrostabiliser,
        AccessoryType::Suppressor,
    ] {
        context
            .add_component(Some(0), stages::ACCESSORIES, accessory(kind))
            .unwrap();
    }

    let manifest = context.manifest();
    let section = manifest.section(stages::ACCESSORIES).unwrap();
    let order: Vec<&str> = section.entries().iter().map(|entry| entry.description()).collect();
    assert_eq!(
        order,
        vec![
            "Accessory: Gyrostabiliser",
            "Accessory: Suppressor",
            "Accessory: Secure Weapon"
        ]
    );
    // A quarter of the 750 spent on the other accessories.
    let secure = section.entries()[2].cost(WeaponCost::Credits).unwrap();
    assert_eq!(secure.absolute_value().value(), 187.5);
    assert_eq!(credits(context), 210.0 + 750.0 + 187.5);

    let attributes = context.attributes(0).unwrap();
    assert_eq!(attributes.choice(WeaponAttribute::Signature), Some("Quiet"));
    assert_eq!(attributes.scalar(WeaponAttribute::Accuracy).unwrap().value(), 1.0);
}

#[test]
fn bipod_excludes_gyrostabiliser() {
    let mut weapon = pistol();
    let context = weapon.context_mut();
    context
        .add_component(Some(0), stages::ACCESSORIES, accessory(AccessoryType::Gyrostabiliser))
        .unwrap();
    context
        .add_component(Some(0), stages::ACCESSORIES, accessory(AccessoryType::Bipod))
        .unwrap();

    let remaining: Vec<WeaponKind> = context
        .stage(Some(0), stages::ACCESSORIES)
        .unwrap()
        .components()
        .iter()
        .map(|component| component.kind())
        .collect();
    assert_eq!(remaining, vec![WeaponKind::Bipod]);
    assert_eq!(context.report().pruned.len(), 1);
    assert_eq!(context.report().pruned[0].component, "Gyrostabiliser");

    let candidates: Vec<WeaponKind> = context
        .candidates(Some(0), stages::ACCESSORIES)
        .unwrap()
        .iter()
        .map(|component| component.kind())
        .collect();
    assert!(!candidates.contains(&WeaponKind::Gyrostabiliser));
    assert!(candidates.contains(&WeaponKind::Scope));
}

#[test]
fn low_light_scope_needs_tech_level_nine() {
    let mut weapon = pistol();
    let context = weapon.context_mut();
    context
        .add_component(Some(0), stages::ACCESSORIES, accessory(AccessoryType::Scope))
        .unwrap();
    context
        .set_option(Some(0), stages::ACCESSORIES, 0, WeaponOption::LowLight, OptionValue::Boolean(true))
        .unwrap();
    assert_eq!(credits(context), 210.0 + 50.0 + 200.0);

    context.set_tech_level(8).unwrap();
    let scope = &context.stage(Some(0), stages::ACCESSORIES).unwrap().components()[0];
    let low_light = scope.option(WeaponOption::LowLight).unwrap();
    assert!(!low_light.is_enabled());
    assert_eq!(low_light.as_bool(), Some(false));
    assert_eq!(credits(context), 260.0);

    let error = context
        .set_option(Some(0), stages::ACCESSORIES, 0, WeaponOption::LowLight, OptionValue::Boolean(true))
        .unwrap_err();
    assert!(matches!(
        error,
        ConstructionError::InvalidOption { source: OptionError::Disabled { .. }, .. }
    ));

    context.set_tech_level(9).unwrap();
    let scope = &context.stage(Some(0), stages::ACCESSORIES).unwrap().components()[0];
    assert!(scope.option(WeaponOption::LowLight).unwrap().is_enabled());
}

#[test]
fn heavy_long_gun_is_bulky() {
    let mut weapon =
        weapon::new_weapon("Rifle", WeaponSequence::Conventional, &ConstructionConfig::default())
            .unwrap();
    let context = weapon.context_mut();
    let mut receiver = Receiver::new(ReceiverType::LongGun);
    Component::<WeaponDomain>::set_option(
        &mut receiver,
        WeaponOption::Calibre,
        OptionValue::Enum("Heavy".into()),
    )
    .unwrap();
    context
        .add_component(Some(0), stages::RECEIVER, receiver.into())
        .unwrap();

    let attributes = context.attributes(0).unwrap();
    assert_eq!(attributes.choice(WeaponAttribute::Bulky), Some("Bulky"));
    let total = attributes.scalar(WeaponAttribute::TotalWeight).unwrap().value();
    assert!((total - 5.4).abs() < 1e-9);
    // Bookkeeping phases stay out of the manifest.
    assert!(context.manifest().section(stages::FINALISATION).is_none());
}

#[test]
fn launcher_sequences_use_their_own_layout() {
    let weapon =
        weapon::new_weapon("Launcher", WeaponSequence::Launcher, &ConstructionConfig::default())
            .unwrap();
    let context = weapon.context();

    assert!(context.report().is_complete());
    assert_eq!(credits(context), 1000.0);
    assert!(context.stage(Some(0), stages::BARREL).is_err());

    let candidates: Vec<WeaponKind> = context
        .candidates(Some(0), stages::ACCESSORIES)
        .unwrap()
        .iter()
        .map(|component| component.kind())
        .collect();
    assert!(!candidates.contains(&WeaponKind::Suppressor));
}

#[test]
fn secondary_launcher_gets_prefixed_sections() {
    let mut weapon = pistol();
    let secondary = weapon
        .context_mut()
        .add_sequence(WeaponSequence::Launcher)
        .unwrap();
    assert_eq!(secondary, 1);

    let context = weapon.context();
    let manifest = context.manifest();
    let names: Vec<&str> = manifest.sections().iter().map(|section| section.name()).collect();
    assert_eq!(
        names,
        vec!["Primary Receiver", "Secondary Receiver", "Primary Barrel"]
    );
    assert_eq!(credits(context), 1210.0);
    assert_eq!(
        context
            .attributes(1)
            .unwrap()
            .scalar(WeaponAttribute::Magazine)
            .unwrap()
            .value(),
        1.0
    );
}
