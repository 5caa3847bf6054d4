use construction_core::{
    AttributeValue, Component, ComponentOption, ConstructionError, ConstructionStep, ContextView,
    Factor, NumericModifier, ScalarValue, StepContext,
};

use super::{
    WeaponAttribute, WeaponBase, WeaponCost, WeaponDomain, WeaponKind, WeaponOption, WeaponPhase,
    WeaponSequence, sequence_is,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum AccessoryType {
    Bipod,
    Suppressor,
    Scope,
    Gyrostabiliser,
    #[strum(serialize = "Secure Weapon")]
    SecureWeapon,
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
pub enum Magnification {
    #[default]
    Low,
    Medium,
    High,
}

impl Magnification {
    fn credits(self) -> f64 {
        match self {
            Self::Low => 50.0,
            Self::Medium => 200.0,
            Self::High => 500.0,
        }
    }

    fn weight(self) -> f64 {
        match self {
            Self::Low => 0.2,
            Self::Medium => 0.4,
            Self::High => 0.6,
        }
    }
}

const LOW_LIGHT_TECH_LEVEL: u32 = 9;
const LOW_LIGHT_CREDITS: f64 = 200.0;
const GYROSTABILISER_TECH_LEVEL: u32 = 8;
const SECURE_WEAPON_TECH_LEVEL: u32 = 10;
const SECURE_WEAPON_PERCENT: f64 = 25.0;
const SECURE_WEAPON_MINIMUM: f64 = 100.0;

/// Kinds whose prices feed into the secure weapon price.
const SECURE_WEAPON_AFTER: &[WeaponKind] = &[
    WeaponKind::Bipod,
    WeaponKind::Suppressor,
    WeaponKind::Scope,
    WeaponKind::Gyrostabiliser,
];

#[derive(Clone, Debug)]
pub struct Accessory {
    accessory: AccessoryType,
    options: Vec<ComponentOption<WeaponOption>>,
}

impl Accessory {
    pub fn new(accessory: AccessoryType) -> Self {
        let options = match accessory {
            AccessoryType::Scope => vec![
                ComponentOption::enum_of(
                    WeaponOption::Magnification,
                    "Magnification",
                    Magnification::default(),
                ),
                ComponentOption::boolean(WeaponOption::LowLight, "Low-Light", false)
                    .with_description("Image intensifier, TL9+"),
            ],
            _ => Vec::new(),
        };
        Self { accessory, options }
    }

    pub fn accessory(&self) -> AccessoryType {
        self.accessory
    }

    pub fn magnification(&self) -> Option<Magnification> {
        self.option(WeaponOption::Magnification)?.as_enum()
    }

    pub fn low_light(&self) -> bool {
        self.option(WeaponOption::LowLight)
            .filter(|option| option.is_enabled())
            .and_then(ComponentOption::as_bool)
            .unwrap_or(false)
    }

    /// Credits and weight, for accessories with a list price.
    fn fixed_costs(&self) -> Option<(f64, f64)> {
        match self.accessory {
            AccessoryType::Bipod => Some((50.0, 0.5)),
            AccessoryType::Suppressor => Some((250.0, 0.5)),
            AccessoryType::Scope => {
                let magnification = self.magnification().unwrap_or_default();
                let low_light = if self.low_light() { LOW_LIGHT_CREDITS } else { 0.0 };
                Some((magnification.credits() + low_light, magnification.weight()))
            }
            AccessoryType::Gyrostabiliser => Some((500.0, 1.0)),
            AccessoryType::SecureWeapon => None,
        }
    }
}

impl Component<WeaponDomain> for Accessory {
    fn kind(&self) -> WeaponKind {
        match self.accessory {
            AccessoryType::Bipod => WeaponKind::Bipod,
            AccessoryType::Suppressor => WeaponKind::Suppressor,
            AccessoryType::Scope => WeaponKind::Scope,
            AccessoryType::Gyrostabiliser => WeaponKind::Gyrostabiliser,
            AccessoryType::SecureWeapon => WeaponKind::SecureWeapon,
        }
    }

    fn base(&self) -> WeaponBase {
        WeaponBase::Accessory
    }

    fn component_string(&self) -> String {
        self.accessory.to_string()
    }

    fn instance_string(&self) -> String {
        match self.magnification() {
            Some(magnification) if self.low_light() => {
                format!("{} ({magnification}, Low-Light)", self.accessory)
            }
            Some(magnification) => format!("{} ({magnification})", self.accessory),
            None => self.component_string(),
        }
    }

    fn is_compatible(&self, sequence: Option<usize>, context: &ContextView<'_, WeaponDomain>) -> bool {
        match self.accessory {
            AccessoryType::Suppressor => sequence_is(context, sequence, WeaponSequence::Conventional),
            AccessoryType::Gyrostabiliser => {
                context.tech_level() >= GYROSTABILISER_TECH_LEVEL
                    && !context.has_component(sequence, WeaponKind::Bipod)
            }
            AccessoryType::SecureWeapon => context.tech_level() >= SECURE_WEAPON_TECH_LEVEL,
            AccessoryType::Bipod | AccessoryType::Scope => true,
        }
    }

    fn order_after(&self) -> &'static [WeaponKind] {
        match self.accessory {
            AccessoryType::SecureWeapon => SECURE_WEAPON_AFTER,
            _ => &[],
        }
    }

    fn options(&self) -> &[ComponentOption<WeaponOption>] {
        &self.options
    }

    fn options_mut(&mut self) -> &mut [ComponentOption<WeaponOption>] {
        &mut self.options
    }

    fn update_options(&mut self, _sequence: Option<usize>, context: &ContextView<'_, WeaponDomain>) {
        let available = context.tech_level() >= LOW_LIGHT_TECH_LEVEL;
        for option in &mut self.options {
            if option.id() == WeaponOption::LowLight {
                if !available {
                    option.reset();
                }
                option.set_enabled(available);
            }
        }
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, WeaponDomain>,
    ) -> Result<(), ConstructionError> {
        let step = ConstructionStep::<WeaponDomain>::builder("Accessory", self.instance_string());
        let step = match self.accessory {
            AccessoryType::Bipod => step.factor(Factor::non_modifying(
                Factor::modify(WeaponAttribute::Accuracy, NumericModifier::constant(1.0)),
                Some("When deployed:"),
            )),
            AccessoryType::Suppressor => step.factor(Factor::set(
                WeaponAttribute::Signature,
                AttributeValue::choice("Quiet"),
            )),
            AccessoryType::Scope => {
                let step = step
                    .factor(Factor::set(
                        WeaponAttribute::Scope,
                        AttributeValue::choice(self.magnification().unwrap_or_default()),
                    ))
                    .factor(Factor::non_modifying(
                        Factor::modify(WeaponAttribute::Accuracy, NumericModifier::constant(1.0)),
                        Some("Aimed shots beyond 100m:"),
                    ));
                if self.low_light() {
                    step.note("Ignores darkness penalties")
                } else {
                    step
                }
            }
            AccessoryType::Gyrostabiliser => step.factor(Factor::modify(
                WeaponAttribute::Accuracy,
                NumericModifier::constant(1.0),
            )),
            AccessoryType::SecureWeapon => step.factor(Factor::set(
                WeaponAttribute::Secure,
                AttributeValue::choice("Biometric Lock"),
            )),
        };

        let step = match self.fixed_costs() {
            Some((credits, weight)) => step
                .cost(WeaponCost::Credits, NumericModifier::constant(credits))
                .cost(WeaponCost::Weight, NumericModifier::constant(weight)),
            None => {
                // Priced from the accessories that ran before it.
                let accessories = context.view().phase_cost(
                    sequence,
                    WeaponPhase::Accessories,
                    WeaponCost::Credits,
                );
                let price = accessories
                    .percentage(&ScalarValue::named(SECURE_WEAPON_PERCENT, "Secure Weapon %"))
                    .max(&ScalarValue::named(SECURE_WEAPON_MINIMUM, "Minimum Price"));
                step.cost(WeaponCost::Credits, NumericModifier::constant(price))
            }
        };
        context.apply_step(sequence, step.build())
    }
}
