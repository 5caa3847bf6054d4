use construction_core::{
    AttributeValue, Component, ConstructionError, ConstructionStep, ContextView, Factor,
    NumericModifier, StepContext,
};

use super::{RobotAttribute, RobotBase, RobotCost, RobotDomain, RobotKind};

const DRONE_INTERFACE_TECH_LEVEL: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum SlotOptionType {
    #[strum(serialize = "Storage Compartment")]
    StorageCompartment,
    #[strum(serialize = "Voder Speaker")]
    VoderSpeaker,
    #[strum(serialize = "Drone Interface")]
    DroneInterface,
}

/// Equipment that occupies chassis slots.
#[derive(Clone, Debug)]
pub struct SlotOption {
    slot_option: SlotOptionType,
}

impl SlotOption {
    pub fn new(slot_option: SlotOptionType) -> Self {
        Self { slot_option }
    }

    pub fn slot_option(&self) -> SlotOptionType {
        self.slot_option
    }
}

impl Component<RobotDomain> for SlotOption {
    fn kind(&self) -> RobotKind {
        match self.slot_option {
            SlotOptionType::StorageCompartment => RobotKind::StorageCompartment,
            SlotOptionType::VoderSpeaker => RobotKind::VoderSpeaker,
            SlotOptionType::DroneInterface => RobotKind::DroneInterface,
        }
    }

    fn base(&self) -> RobotBase {
        RobotBase::SlotOption
    }

    fn component_string(&self) -> String {
        self.slot_option.to_string()
    }

    fn is_compatible(&self, _sequence: Option<usize>, context: &ContextView<'_, RobotDomain>) -> bool {
        match self.slot_option {
            SlotOptionType::DroneInterface => context.tech_level() >= DRONE_INTERFACE_TECH_LEVEL,
            _ => true,
        }
    }

    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, RobotDomain>,
    ) -> Result<(), ConstructionError> {
        let step = ConstructionStep::<RobotDomain>::builder("Slot Option", self.component_string())
            .cost(RobotCost::Slots, NumericModifier::constant(1.0));
        let step = match self.slot_option {
            SlotOptionType::StorageCompartment => step
                .cost(RobotCost::Credits, NumericModifier::constant(50.0))
                .factor(Factor::text("Holds one slot of cargo")),
            SlotOptionType::VoderSpeaker => step
                .cost(RobotCost::Credits, NumericModifier::constant(100.0))
                .factor(Factor::set(RobotAttribute::Voice, AttributeValue::choice("Voder"))),
            SlotOptionType::DroneInterface => step
                .cost(RobotCost::Credits, NumericModifier::constant(100.0))
                .factor(Factor::text("Can direct drones")),
        };
        context.apply_step(sequence, step.build())
    }
}
