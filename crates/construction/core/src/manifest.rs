//! Manifest: the sectioned, totalled projection of committed steps.
//!
//! A manifest is rebuilt from the ledger on demand and never edited. Sections
//! follow stage order (phase, then sequence, then shared stages) and skip
//! internal phases. Totals are modifier sequences over modifier sequences:
//! each section folds its entries, and the manifest folds the section totals
//! with the same seeding rule.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::context::{Configuration, DerivedState};
use crate::domain::{Domain, Phase};
use crate::modifier::{
    Calculated, ModifierSequence, NumericModifier, ScalarModifier,
    calculate_numeric_modifier_sequence, resolve_numeric_modifier_sequence,
};
use crate::scalar::ScalarValue;

/// One committed step as displayed.
#[derive(Clone, Debug, PartialEq)]
pub struct ManifestEntry<D: Domain> {
    description: String,
    costs: BTreeMap<D::Cost, NumericModifier>,
    factors: Vec<String>,
    notes: Vec<String>,
}

impl<D: Domain> ManifestEntry<D> {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cost(&self, cost: D::Cost) -> Option<&NumericModifier> {
        self.costs.get(&cost)
    }

    /// Display form of the modifier for `cost`, empty when the step has none.
    pub fn cost_string(&self, cost: D::Cost) -> String {
        self.cost(cost)
            .map(ScalarModifier::display_string)
            .unwrap_or_default()
    }

    /// Factor display strings, sorted.
    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

/// Entries grouped under one stage name.
#[derive(Clone, Debug, PartialEq)]
pub struct ManifestSection<D: Domain> {
    name: String,
    entries: Vec<ManifestEntry<D>>,
}

impl<D: Domain> ManifestSection<D> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[ManifestEntry<D>] {
        &self.entries
    }

    /// The section's `cost` modifiers in entry order, named after the section.
    pub fn cost_sequence(&self, cost: D::Cost) -> ModifierSequence {
        self.entries
            .iter()
            .filter_map(|entry| entry.cost(cost).cloned())
            .collect::<ModifierSequence>()
            .named(self.name.clone())
    }

    pub fn total_cost(&self, cost: D::Cost) -> ScalarValue {
        self.cost_sequence(cost).value()
    }

    pub fn resolve_total(&self, cost: D::Cost) -> Calculated {
        self.cost_sequence(cost).resolve()
    }
}

/// Read-only projection of a construction's committed steps.
#[derive(Clone, Debug, PartialEq)]
pub struct Manifest<D: Domain> {
    sections: Vec<ManifestSection<D>>,
}

impl<D: Domain> Manifest<D> {
    pub(crate) fn build(config: &Configuration<D>, derived: &DerivedState<D>) -> Self {
        let multiple = config.sequences().len() > 1;
        let mut sections: Vec<ManifestSection<D>> = Vec::new();

        for (index, stage) in config.stages().iter().enumerate() {
            if stage.phase().is_internal() {
                continue;
            }
            let entries: Vec<ManifestEntry<D>> = derived
                .ledger()
                .iter()
                .filter(|entry| entry.stage() == index)
                .map(|entry| {
                    let step = entry.step();
                    let mut factors: Vec<String> =
                        step.factors().iter().map(|factor| factor.display_string()).collect();
                    factors.sort();
                    ManifestEntry {
                        description: step.display_string(),
                        costs: step
                            .costs()
                            .map(|(cost, modifier)| (cost, modifier.clone()))
                            .collect(),
                        factors,
                        notes: step.notes().to_vec(),
                    }
                })
                .collect();
            if entries.is_empty() {
                continue;
            }

            let name = match stage.sequence() {
                Some(sequence) if multiple => {
                    format!("{} {}", sequence_label(sequence), stage.name())
                }
                _ => stage.name().to_string(),
            };
            match sections.iter_mut().find(|section| section.name == name) {
                Some(section) => section.entries.extend(entries),
                None => sections.push(ManifestSection { name, entries }),
            }
        }

        Self { sections }
    }

    pub fn sections(&self) -> &[ManifestSection<D>] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&ManifestSection<D>> {
        self.sections.iter().find(|section| section.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn section_sequences(&self, cost: D::Cost) -> Vec<ModifierSequence> {
        self.sections
            .iter()
            .map(|section| section.cost_sequence(cost))
            .filter(|sequence| !sequence.is_empty())
            .collect()
    }

    /// Folds the section totals for `cost`.
    pub fn total_cost(&self, cost: D::Cost) -> ScalarValue {
        let name = cost.to_string();
        calculate_numeric_modifier_sequence(&self.section_sequences(cost), Some(name.as_str()))
    }

    /// Like [`Self::total_cost`], but reports when no section supplies a base value.
    pub fn resolve_total(&self, cost: D::Cost) -> Calculated {
        let name = cost.to_string();
        resolve_numeric_modifier_sequence(&self.section_sequences(cost), Some(name.as_str()))
    }

    /// Totals for every cost kind of the domain.
    pub fn totals(&self) -> Vec<(D::Cost, Calculated)> {
        D::Cost::iter()
            .map(|cost| (cost, self.resolve_total(cost)))
            .collect()
    }
}

fn sequence_label(sequence: usize) -> String {
    match sequence {
        0 => "Primary".to_string(),
        1 => "Secondary".to_string(),
        other => format!("Secondary {other}"),
    }
}
