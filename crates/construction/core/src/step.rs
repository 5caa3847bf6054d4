//! Construction steps.

use std::collections::BTreeMap;

use crate::domain::Domain;
use crate::factor::Factor;
use crate::modifier::NumericModifier;

/// Immutable record of one component's effects in one regenerate pass.
///
/// Built with [`ConstructionStep::builder`]. The engine aggregates steps into
/// the ledger and attribute store but never edits one.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructionStep<D: Domain> {
    name: String,
    type_tag: String,
    costs: BTreeMap<D::Cost, NumericModifier>,
    factors: Vec<Factor<D::Attribute>>,
    notes: Vec<String>,
}

impl<D: Domain> ConstructionStep<D> {
    pub fn builder(type_tag: impl Into<String>, name: impl Into<String>) -> StepBuilder<D> {
        StepBuilder {
            step: Self {
                name: name.into(),
                type_tag: type_tag.into(),
                costs: BTreeMap::new(),
                factors: Vec::new(),
                notes: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn cost(&self, cost: D::Cost) -> Option<&NumericModifier> {
        self.costs.get(&cost)
    }

    pub fn costs(&self) -> impl Iterator<Item = (D::Cost, &NumericModifier)> + '_ {
        self.costs.iter().map(|(cost, modifier)| (*cost, modifier))
    }

    pub fn factors(&self) -> &[Factor<D::Attribute>] {
        &self.factors
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// `"{type}: {name}"`, or just the name when the step has no type tag.
    pub fn display_string(&self) -> String {
        if self.type_tag.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.type_tag, self.name)
        }
    }
}

pub struct StepBuilder<D: Domain> {
    step: ConstructionStep<D>,
}

impl<D: Domain> StepBuilder<D> {
    /// Sets the modifier for `cost`, replacing any earlier one.
    #[must_use]
    pub fn cost(mut self, cost: D::Cost, modifier: NumericModifier) -> Self {
        self.step.costs.insert(cost, modifier);
        self
    }

    #[must_use]
    pub fn factor(mut self, factor: Factor<D::Attribute>) -> Self {
        self.step.factors.push(factor);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.step.notes.push(note.into());
        self
    }

    pub fn build(self) -> ConstructionStep<D> {
        self.step
    }
}
