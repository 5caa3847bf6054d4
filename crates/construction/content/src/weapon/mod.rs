//! Conventional firearms and launchers.
//!
//! A weapon has one or more sequences (a primary weapon plus any secondary
//! weapons sharing the same frame). Each sequence picks a receiver, a barrel,
//! an optional capacity increase and any number of accessories. Shared
//! bookkeeping runs in the internal initialisation and finalisation phases.

mod accessory;
mod barrel;
mod bookkeeping;
mod capacity;
mod receiver;

use std::sync::Arc;

use construction_core::{
    ComponentRegistry, ConstructionConfig, ConstructionError, Domain, Phase, StageDefinition,
};

use crate::artifact::Artifact;

pub use accessory::{Accessory, AccessoryType, Magnification};
pub use barrel::{Barrel, BarrelLength};
pub use bookkeeping::{WeaponFinalisation, WeaponInitialisation};
pub use capacity::IncreasedCapacity;
pub use receiver::{Calibre, Receiver, ReceiverType};

/// Stage names used by the weapon layout.
pub mod stages {
    pub const INITIALISATION: &str = "Initialisation";
    pub const RECEIVER: &str = "Receiver";
    pub const BARREL: &str = "Barrel";
    pub const CAPACITY: &str = "Capacity";
    pub const ACCESSORIES: &str = "Accessories";
    pub const FINALISATION: &str = "Finalisation";
}

/// Weight above which a weapon counts as bulky.
pub const BULKY_WEIGHT: f64 = 5.0;

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
pub enum WeaponPhase {
    Initialisation,
    Receiver,
    Barrel,
    Capacity,
    Accessories,
    Finalisation,
}

impl Phase for WeaponPhase {
    fn is_internal(&self) -> bool {
        matches!(self, Self::Initialisation | Self::Finalisation)
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
pub enum WeaponCost {
    Credits,
    Weight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum WeaponAttribute {
    #[strum(serialize = "Tech Level")]
    TechLevel,
    Calibre,
    Damage,
    Range,
    Magazine,
    #[strum(serialize = "Quick Draw")]
    QuickDraw,
    Accuracy,
    Signature,
    Scope,
    Secure,
    #[strum(serialize = "Total Weight")]
    TotalWeight,
    Bulky,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
pub enum WeaponOption {
    Calibre,
    Percent,
    Magnification,
    LowLight,
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
pub enum WeaponRule {
    /// Extra ammunition adds weight as well as cost.
    AmmunitionWeight,
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
pub enum WeaponSequence {
    Conventional,
    Launcher,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
pub enum WeaponBase {
    Initialisation,
    Receiver,
    Barrel,
    Capacity,
    Accessory,
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
pub enum WeaponKind {
    WeaponInitialisation,
    HandgunReceiver,
    LongGunReceiver,
    LauncherReceiver,
    MinimalBarrel,
    ShortBarrel,
    StandardBarrel,
    LongBarrel,
    IncreasedCapacity,
    Bipod,
    Suppressor,
    Scope,
    Gyrostabiliser,
    SecureWeapon,
    WeaponFinalisation,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeaponDomain;

impl Domain for WeaponDomain {
    const NAME: &'static str = "weapon";

    type Phase = WeaponPhase;
    type Cost = WeaponCost;
    type Attribute = WeaponAttribute;
    type OptionId = WeaponOption;
    type Rule = WeaponRule;
    type SequenceKind = WeaponSequence;
    type Base = WeaponBase;
    type Kind = WeaponKind;
    type Component = WeaponComponent;

    fn stages(kind: Option<WeaponSequence>) -> Vec<StageDefinition<Self>> {
        match kind {
            Some(WeaponSequence::Conventional) => vec![
                StageDefinition::new(stages::RECEIVER, WeaponPhase::Receiver, WeaponBase::Receiver)
                    .mandatory()
                    .singular(),
                StageDefinition::new(stages::BARREL, WeaponPhase::Barrel, WeaponBase::Barrel)
                    .mandatory()
                    .singular()
                    .with_default(WeaponKind::StandardBarrel),
                StageDefinition::new(stages::CAPACITY, WeaponPhase::Capacity, WeaponBase::Capacity)
                    .singular(),
                StageDefinition::new(
                    stages::ACCESSORIES,
                    WeaponPhase::Accessories,
                    WeaponBase::Accessory,
                )
                .desirable(),
            ],
            Some(WeaponSequence::Launcher) => vec![
                StageDefinition::new(stages::RECEIVER, WeaponPhase::Receiver, WeaponBase::Receiver)
                    .mandatory()
                    .singular()
                    .with_default(WeaponKind::LauncherReceiver),
                StageDefinition::new(
                    stages::ACCESSORIES,
                    WeaponPhase::Accessories,
                    WeaponBase::Accessory,
                ),
            ],
            None => vec![
                StageDefinition::new(
                    stages::INITIALISATION,
                    WeaponPhase::Initialisation,
                    WeaponBase::Initialisation,
                )
                .singular()
                .with_default(WeaponKind::WeaponInitialisation),
                StageDefinition::new(
                    stages::FINALISATION,
                    WeaponPhase::Finalisation,
                    WeaponBase::Finalisation,
                )
                .singular()
                .with_default(WeaponKind::WeaponFinalisation),
            ],
        }
    }
}

component_enum! {
    /// Every weapon component.
    pub enum WeaponComponent for WeaponDomain {
        Initialisation(WeaponInitialisation),
        Receiver(Receiver),
        Barrel(Barrel),
        Capacity(IncreasedCapacity),
        Accessory(Accessory),
        Finalisation(WeaponFinalisation),
    }
}

/// The weapon component catalog.
pub fn registry() -> Arc<ComponentRegistry<WeaponDomain>> {
    Arc::new(
        ComponentRegistry::<WeaponDomain>::new()
            .with(|| WeaponInitialisation.into())
            .with(|| Receiver::new(ReceiverType::Handgun).into())
            .with(|| Receiver::new(ReceiverType::LongGun).into())
            .with(|| Receiver::new(ReceiverType::Launcher).into())
            .with(|| Barrel::new(BarrelLength::Minimal).into())
            .with(|| Barrel::new(BarrelLength::Short).into())
            .with(|| Barrel::new(BarrelLength::Standard).into())
            .with(|| Barrel::new(BarrelLength::Long).into())
            .with(|| IncreasedCapacity::new().into())
            .with(|| Accessory::new(AccessoryType::Bipod).into())
            .with(|| Accessory::new(AccessoryType::Suppressor).into())
            .with(|| Accessory::new(AccessoryType::Scope).into())
            .with(|| Accessory::new(AccessoryType::Gyrostabiliser).into())
            .with(|| Accessory::new(AccessoryType::SecureWeapon).into())
            .with(|| WeaponFinalisation.into()),
    )
}

/// A named weapon.
pub type Weapon = Artifact<WeaponDomain>;

/// Creates a weapon with a single sequence of `kind`.
pub fn new_weapon(
    name: impl Into<String>,
    kind: WeaponSequence,
    settings: &ConstructionConfig,
) -> Result<Weapon, ConstructionError> {
    let mut weapon = Weapon::new(name, registry(), settings)?;
    weapon.context_mut().add_sequence(kind)?;
    Ok(weapon)
}

#[cfg(feature = "serde")]
pub fn serialise_weapon(weapon: &Weapon) -> Result<String, construction_core::SerialisationError> {
    weapon.to_json()
}

#[cfg(feature = "serde")]
pub fn deserialise_weapon(
    json: &str,
    settings: &ConstructionConfig,
) -> Result<Weapon, construction_core::SerialisationError> {
    Weapon::from_json(json, registry(), settings)
}

/// Whether `sequence` is a sequence of `kind`.
pub(crate) fn sequence_is(
    context: &construction_core::ContextView<'_, WeaponDomain>,
    sequence: Option<usize>,
    kind: WeaponSequence,
) -> bool {
    sequence.and_then(|index| context.sequence_kind(index)) == Some(kind)
}

#[cfg(test)]
mod tests {
    use construction_core::Component;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_kind_is_registered_once() {
        let registry = registry();
        assert_eq!(registry.len(), WeaponKind::iter().count());
        for kind in WeaponKind::iter() {
            let component = registry.create(kind).unwrap();
            assert_eq!(component.kind(), kind);
            assert_eq!(registry.parse_kind(&component.type_string()), Some(kind));
        }
    }

    #[test]
    fn internal_phases() {
        let internal: Vec<_> = WeaponPhase::iter().filter(Phase::is_internal).collect();
        assert_eq!(
            internal,
            vec![WeaponPhase::Initialisation, WeaponPhase::Finalisation]
        );
    }

    #[test]
    fn stage_bases_are_registered() {
        let registry = registry();
        let sequences = WeaponSequence::iter().map(Some).chain(std::iter::once(None));
        for kind in sequences {
            for stage in WeaponDomain::stages(kind) {
                let stage = construction_core::ConstructionStage::from_definition(&stage, None);
                assert!(registry.kinds_for(stage.base()).next().is_some());
            }
        }
    }
}
