use construction_core::{
    AttributeValue, Component, ComponentOption, ConstructionError, ConstructionStep, ContextView,
    DiceRoll, Factor, NumericModifier, StepContext,
};

use super::{
    WeaponAttribute, WeaponBase, WeaponCost, WeaponDomain, WeaponKind, WeaponOption,
    WeaponSequence, sequence_is,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum ReceiverType {
    Handgun,
    #[strum(serialize = "Long Gun")]
    LongGun,
    Launcher,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Calibre {
    Light,
    #[default]
    Medium,
    Heavy,
}

/// Base statistics of a receiver and calibre.
struct Profile {
    credits: f64,
    weight: f64,
    damage: DiceRoll,
    range: f64,
    magazine: f64,
}

fn profile(receiver: ReceiverType, calibre: Calibre) -> Profile {
    let (credits, weight, damage, range, magazine) = match (receiver, calibre) {
        (ReceiverType::Handgun, Calibre::Light) => (150.0, 0.8, DiceRoll::new(2, -3), 10.0, 15.0),
        (ReceiverType::Handgun, Calibre::Medium) => (175.0, 1.0, DiceRoll::new(3, -3), 10.0, 12.0),
        (ReceiverType::Handgun, Calibre::Heavy) => (300.0, 1.3, DiceRoll::new(3, -1), 15.0, 8.0),
        (ReceiverType::LongGun, Calibre::Light) => (200.0, 2.5, DiceRoll::new(2, 0), 150.0, 30.0),
        (ReceiverType::LongGun, Calibre::Medium) => (300.0, 3.5, DiceRoll::new(3, 0), 250.0, 20.0),
        (ReceiverType::LongGun, Calibre::Heavy) => (500.0, 4.5, DiceRoll::new(4, 0), 300.0, 10.0),
        (ReceiverType::Launcher, _) => (1000.0, 6.0, DiceRoll::new(4, 0), 250.0, 1.0),
    };
    Profile {
        credits,
        weight,
        damage,
        range,
        magazine,
    }
}

/// The core of a weapon: sets calibre, damage, range and magazine.
#[derive(Clone, Debug)]
pub struct Receiver {
    receiver: ReceiverType,
    options: Vec<ComponentOption<WeaponOption>>,
}

impl Receiver {
    pub fn new(receiver: ReceiverType) -> Self {
        let options = match receiver {
            ReceiverType::Launcher => Vec::new(),
            _ => vec![
                ComponentOption::enum_of(WeaponOption::Calibre, "Calibre", Calibre::default())
                    .with_description("Ammunition size class"),
            ],
        };
        Self { receiver, options }
    }

    pub fn receiver(&self) -> ReceiverType {
        self.receiver
    }

    /// Selected calibre; launchers have none.
    pub fn calibre(&self) -> Option<Calibre> {
        self.option(WeaponOption::Calibre)?.as_enum()
    }
}

impl Component<WeaponDomain> for Receiver {
    fn kind(&self) -> WeaponKind {
        match self.receiver {
            ReceiverType::Handgun => WeaponKind::HandgunReceiver,
            ReceiverType::LongGun => WeaponKind::LongGunReceiver,
            ReceiverType::Launcher => WeaponKind::LauncherReceiver,
        }
    }

    fn base(&self) -> WeaponBase {
        WeaponBase::Receiver
    }

    fn component_string(&self) -> String {
        format!("{} Receiver", self.receiver)
    }

    fn instance_string(&self) -> String {
        match self.calibre() {
            Some(calibre) => format!("{calibre} {} Receiver", self.receiver),
            None => self.component_string(),
        }
    }

    fn is_compatible(&self, sequence: Option<usize>, context: &ContextView<'_, WeaponDomain>) -> bool {
        let required = match self.receiver {
            ReceiverType::Launcher => WeaponSequence::Launcher,
            _ => WeaponSequence::Conventional,
        };
        sequence_is(context, sequence, required)
    }

    fn options(&self) -> &[ComponentOption<WeaponOption>] {
        &self.options
    }

    fn options_mut(&mut self) -> &mut [ComponentOption<WeaponOption>] {
        &mut self.options
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, WeaponDomain>,
    ) -> Result<(), ConstructionError> {
        let calibre = self.calibre();
        let stats = profile(self.receiver, calibre.unwrap_or_default());

        let mut step = ConstructionStep::<WeaponDomain>::builder("Receiver", self.instance_string())
            .cost(WeaponCost::Credits, NumericModifier::constant(stats.credits))
            .cost(WeaponCost::Weight, NumericModifier::constant(stats.weight))
            .factor(Factor::set(WeaponAttribute::Damage, stats.damage))
            .factor(Factor::set(
                WeaponAttribute::Range,
                AttributeValue::scalar(stats.range),
            ))
            .factor(Factor::set(
                WeaponAttribute::Magazine,
                AttributeValue::scalar(stats.magazine),
            ));
        if let Some(calibre) = calibre {
            step = step.factor(Factor::set(
                WeaponAttribute::Calibre,
                AttributeValue::choice(calibre),
            ));
        }
        if self.receiver == ReceiverType::Handgun {
            step = step.factor(Factor::set(
                WeaponAttribute::QuickDraw,
                AttributeValue::scalar(2.0),
            ));
        }
        context.apply_step(sequence, step.build())
    }
}
