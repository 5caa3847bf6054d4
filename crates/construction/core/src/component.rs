//! The component capability contract.

use core::fmt::Debug;

use crate::context::{ContextView, StepContext};
use crate::domain::Domain;
use crate::error::{ConstructionError, OptionError};
use crate::option::{ComponentOption, OptionValue};

/// A swappable build choice occupying a stage.
///
/// A domain implements this for each concrete component and for the closed
/// enum (`Domain::Component`) that dispatches to them. A component's identity
/// for ordering and compatibility is its [`Component::kind`], not the instance.
pub trait Component<D: Domain>: Clone + Debug + Send + Sync + 'static {
    fn kind(&self) -> D::Kind;

    /// Base type, matched against the stage the component is placed in.
    fn base(&self) -> D::Base;

    /// Short display name, e.g. `Long Barrel`.
    fn component_string(&self) -> String;

    /// Display name including the instance's option choices.
    fn instance_string(&self) -> String {
        self.component_string()
    }

    /// Symbolic type name used in serialized documents.
    fn type_string(&self) -> String {
        self.kind().to_string()
    }

    /// Whether the component may occupy its stage given the committed state.
    fn is_compatible(&self, _sequence: Option<usize>, _context: &ContextView<'_, D>) -> bool {
        true
    }

    /// Component kinds that must run before this one when present in the same phase.
    fn order_after(&self) -> &'static [D::Kind] {
        &[]
    }

    fn options(&self) -> &[ComponentOption<D::OptionId>] {
        &[]
    }

    fn options_mut(&mut self) -> &mut [ComponentOption<D::OptionId>] {
        &mut []
    }

    fn option(&self, id: D::OptionId) -> Option<&ComponentOption<D::OptionId>> {
        self.options().iter().find(|option| option.id() == id)
    }

    /// Validates and stores an option value.
    fn set_option(&mut self, id: D::OptionId, value: OptionValue) -> Result<(), OptionError> {
        match self.options_mut().iter_mut().find(|option| option.id() == id) {
            Some(option) => option.set_value(value),
            None => Err(OptionError::UnknownOption {
                option: id.to_string(),
            }),
        }
    }

    /// Enables, disables or re-ranges options against the committed state.
    fn update_options(&mut self, _sequence: Option<usize>, _context: &ContextView<'_, D>) {}

    /// Emits this component's steps through [`StepContext::apply_step`].
    fn create_steps(
        &self,
        sequence: Option<usize>,
        context: &mut StepContext<'_, D>,
    ) -> Result<(), ConstructionError>;
}
