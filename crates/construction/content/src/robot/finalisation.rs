use construction_core::{
    Component, ConstructionError, ConstructionStep, Factor, ScalarValue, StepContext, format_number,
};

use super::{RobotAttribute, RobotBase, RobotCost, RobotDomain, RobotKind};

/// Slot and bandwidth bookkeeping for every sequence.
#[derive(Clone, Copy, Debug, Default)]
pub struct RobotFinalisation;

impl Component<RobotDomain> for RobotFinalisation {
    fn kind(&self) -> RobotKind {
        RobotKind::RobotFinalisation
    }

    fn base(&self) -> RobotBase {
        RobotBase::Finalisation
    }

    fn component_string(&self) -> String {
        "Robot Finalisation".to_string()
    }

    fn create_steps(
        &self,
        _sequence: Option<usize>,
        context: &mut StepContext<'_, RobotDomain>,
    ) -> Result<(), ConstructionError> {
        let mut steps = Vec::new();
        {
            let view = context.view();
            for index in 0..view.sequence_count() {
                let scalar = |attribute| {
                    view.attributes(index)
                        .map_or_else(ScalarValue::zero, |group| group.scalar_or(attribute, 0.0))
                };
                let capacity = scalar(RobotAttribute::SlotCapacity);
                let used = view.total_cost(Some(index), RobotCost::Slots);
                let remaining = capacity.subtract(&used);

                let mut step =
                    ConstructionStep::<RobotDomain>::builder("Finalisation", "Finalisation")
                        .factor(Factor::set(RobotAttribute::SlotsRemaining, remaining.clone()));
                if remaining.value() < 0.0 {
                    step = step.note(format!(
                        "Slot capacity exceeded by {}",
                        format_number(-remaining.value())
                    ));
                }
                let bandwidth = scalar(RobotAttribute::Bandwidth).value();
                let bandwidth_used = scalar(RobotAttribute::BandwidthUsed).value();
                if bandwidth_used > bandwidth {
                    step = step.note(format!(
                        "Skill packages need bandwidth {} but the brain provides {}",
                        format_number(bandwidth_used),
                        format_number(bandwidth)
                    ));
                }
                steps.push((index, step.build()));
            }
        }

        for (index, step) in steps {
            context.apply_step(Some(index), step)?;
        }
        Ok(())
    }
}
