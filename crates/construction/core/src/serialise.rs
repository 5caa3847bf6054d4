//! Reversible `(type, options)` encoding of a construction's components.
//!
//! Components are written as their symbolic type name plus a list of
//! `{id, value}` option pairs; enum options are written by choice name.
//! Nothing here depends on the concrete component types: the registry turns
//! names back into instances.
//!
//! Loading is two-phase. First the stage/component skeleton is rebuilt for
//! every sequence and evaluated without pruning, so every component exists
//! and option ranges reflect the wired-up graph. Then recorded option values
//! are applied stage by stage in phase order, re-evaluating after each
//! component so later ranges see earlier choices. A final full pass commits
//! the result.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::Component;
use crate::context::{Configuration, ConstructionContext, PassMode, evaluate};
use crate::domain::Domain;
use crate::error::{ConstructionError, SerialisationError, scope_label};
use crate::option::OptionValue;
use crate::registry::ComponentRegistry;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerialisedOption {
    pub id: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerialisedComponent {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub options: Vec<SerialisedOption>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerialisedSequence {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub components: Vec<SerialisedComponent>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SerialisedComponents {
    #[serde(default)]
    pub sequences: Vec<SerialisedSequence>,
    #[serde(default)]
    pub common: Vec<SerialisedComponent>,
}

pub fn option_value_to_json(value: &OptionValue) -> Value {
    match value {
        OptionValue::Boolean(value) => Value::Bool(*value),
        OptionValue::String(value) | OptionValue::Enum(value) => Value::String(value.clone()),
        OptionValue::Integer(value) => Value::from(*value),
        OptionValue::Float(value) => serde_json::Number::from_f64(*value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        OptionValue::MultiSelect(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
    }
}

/// Reads `json` as a value of the same variant as `template`.
pub fn option_value_from_json(template: &OptionValue, json: &Value) -> Result<OptionValue, String> {
    let value = match template {
        OptionValue::Boolean(_) => json.as_bool().map(OptionValue::Boolean),
        OptionValue::String(_) => json.as_str().map(|s| OptionValue::String(s.to_string())),
        OptionValue::Enum(_) => json.as_str().map(|s| OptionValue::Enum(s.to_string())),
        OptionValue::Integer(_) => json
            .as_i64()
            .or_else(|| json.as_f64().and_then(whole_number))
            .map(OptionValue::Integer),
        OptionValue::Float(_) => json.as_f64().map(OptionValue::Float),
        OptionValue::MultiSelect(_) => json.as_array().and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(OptionValue::MultiSelect)
        }),
    };
    value.ok_or_else(|| format!("expected a {} value, found {json}", template.kind_name()))
}

/// `value` as an `i64` when it is a whole number inside the `i64` range.
fn whole_number(value: f64) -> Option<i64> {
    // 2^63, exactly representable.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value)).then(|| value as i64)
}

pub fn serialise_component<D: Domain>(component: &D::Component) -> SerialisedComponent {
    SerialisedComponent {
        type_name: component.type_string(),
        options: component
            .options()
            .iter()
            .map(|option| SerialisedOption {
                id: option.id().to_string(),
                value: option_value_to_json(option.value()),
            })
            .collect(),
    }
}

pub fn serialise_component_list<'a, D: Domain>(
    components: impl IntoIterator<Item = &'a D::Component>,
) -> Vec<SerialisedComponent> {
    components
        .into_iter()
        .map(serialise_component::<D>)
        .collect()
}

/// Recreates one component and applies its recorded options directly.
///
/// Option ranges are those of a freshly created instance; use
/// [`ConstructionContext::load_components`] when ranges depend on the rest of
/// the construction.
pub fn deserialise_component<D: Domain>(
    registry: &ComponentRegistry<D>,
    serialised: &SerialisedComponent,
) -> Result<D::Component, SerialisationError> {
    let mut component = create_component(registry, &serialised.type_name)?;
    apply_options::<D>(&mut component, serialised)?;
    Ok(component)
}

pub fn deserialise_component_list<D: Domain>(
    registry: &ComponentRegistry<D>,
    list: &[SerialisedComponent],
) -> Result<Vec<D::Component>, SerialisationError> {
    list.iter()
        .map(|serialised| deserialise_component(registry, serialised))
        .collect()
}

/// Parses rule names, rejecting unknown ones.
pub fn parse_rules<D: Domain>(names: &[String]) -> Result<BTreeSet<D::Rule>, SerialisationError> {
    names
        .iter()
        .map(|name| {
            name.parse::<D::Rule>()
                .map_err(|_| SerialisationError::UnknownRule { rule: name.clone() })
        })
        .collect()
}

pub fn rule_names<D: Domain>(rules: &BTreeSet<D::Rule>) -> Vec<String> {
    rules.iter().map(ToString::to_string).collect()
}

fn create_component<D: Domain>(
    registry: &ComponentRegistry<D>,
    type_name: &str,
) -> Result<D::Component, SerialisationError> {
    registry
        .parse_kind(type_name)
        .and_then(|kind| registry.create(kind))
        .ok_or_else(|| SerialisationError::UnknownComponentType {
            type_name: type_name.to_string(),
        })
}

fn apply_options<D: Domain>(
    component: &mut D::Component,
    serialised: &SerialisedComponent,
) -> Result<(), SerialisationError> {
    for option in &serialised.options {
        let unknown = || SerialisationError::UnknownOption {
            component: serialised.type_name.clone(),
            option: option.id.clone(),
        };
        let id: D::OptionId = option.id.parse().map_err(|_| unknown())?;
        let current = component.option(id).ok_or_else(unknown)?;
        if !current.is_enabled() {
            tracing::debug!(
                "skipped disabled option {} on {}",
                option.id,
                serialised.type_name
            );
            continue;
        }
        let template = current.value().clone();
        let invalid = |reason: String| SerialisationError::InvalidOptionValue {
            component: serialised.type_name.clone(),
            option: option.id.clone(),
            reason,
        };
        let value = option_value_from_json(&template, &option.value).map_err(invalid)?;
        component
            .set_option(id, value)
            .map_err(|error| invalid(error.to_string()))?;
    }
    Ok(())
}

/// A component placed during the skeleton phase whose options are still pending.
struct Pending<'a> {
    sequence: Option<usize>,
    stage: String,
    index: usize,
    serialised: &'a SerialisedComponent,
}

fn place<'a, D: Domain>(
    registry: &ComponentRegistry<D>,
    config: &mut Configuration<D>,
    sequence: Option<usize>,
    serialised: &'a SerialisedComponent,
    pending: &mut Vec<Pending<'a>>,
) -> Result<(), SerialisationError> {
    let component = create_component(registry, &serialised.type_name)?;
    let accepts = |stage: &crate::stage::ConstructionStage<D>| {
        stage.sequence() == sequence && stage.base() == component.base()
    };
    let position = config
        .stages
        .iter()
        .position(|stage| accepts(stage) && !(stage.is_singular() && !stage.is_empty()))
        .or_else(|| config.stages.iter().position(accepts))
        .ok_or_else(|| SerialisationError::NoStageForComponent {
            component: serialised.type_name.clone(),
            scope: scope_label(&sequence),
        })?;

    let stage = &mut config.stages[position];
    let name = stage.name().to_string();
    if stage.is_singular() {
        pending.retain(|entry| !(entry.sequence == sequence && entry.stage == name));
    }
    stage.add_component(component)?;
    pending.push(Pending {
        sequence,
        stage: name,
        index: stage.components().len() - 1,
        serialised,
    });
    Ok(())
}

impl<D: Domain> ConstructionContext<D> {
    /// Encodes every sequence's components and the shared components.
    pub fn serialise_components(&self) -> SerialisedComponents {
        let config = self.configuration();
        let components_of = |sequence: Option<usize>| {
            serialise_component_list::<D>(
                config
                    .stages()
                    .iter()
                    .filter(|stage| stage.sequence() == sequence)
                    .flat_map(|stage| stage.components()),
            )
        };
        SerialisedComponents {
            sequences: config
                .sequences()
                .iter()
                .enumerate()
                .map(|(index, kind)| SerialisedSequence {
                    type_name: kind.to_string(),
                    components: components_of(Some(index)),
                })
                .collect(),
            common: components_of(None),
        }
    }

    /// Replaces sequences and components with those in `document`.
    ///
    /// Tech level and rules are kept. On error the context is unchanged.
    pub fn load_components(&mut self, document: &SerialisedComponents) -> Result<(), SerialisationError> {
        let shared = std::sync::Arc::clone(self.registry());
        let registry: &ComponentRegistry<D> = &shared;
        let mut config = self.configuration().clone();
        config.sequences.clear();
        config.stages.retain(|stage| stage.sequence().is_none());
        for stage in &mut config.stages {
            stage.clear();
        }

        let mut pending = Vec::new();
        for sequence in &document.sequences {
            let kind = sequence.type_name.parse::<D::SequenceKind>().map_err(|_| {
                SerialisationError::UnknownSequenceType {
                    type_name: sequence.type_name.clone(),
                }
            })?;
            let index = config.add_sequence(kind);
            for component in &sequence.components {
                place(registry, &mut config, Some(index), component, &mut pending)?;
            }
        }
        for component in &document.common {
            place(registry, &mut config, None, component, &mut pending)?;
        }
        // An optional stage the document leaves empty stays empty.
        for stage in &mut config.stages {
            stage.mark_seeded();
        }

        evaluate(registry, &mut config, PassMode::SKELETON)?;

        pending.sort_by_key(|entry| {
            config
                .stage_index(entry.sequence, &entry.stage)
                .unwrap_or(usize::MAX)
        });
        for entry in &pending {
            if entry.serialised.options.is_empty() {
                continue;
            }
            let stage = config.stage_index(entry.sequence, &entry.stage)?;
            let component = config.stages[stage]
                .components_mut()
                .get_mut(entry.index)
                .ok_or_else(|| ConstructionError::ComponentIndexOutOfRange {
                    stage: entry.stage.clone(),
                    index: entry.index,
                })?;
            apply_options::<D>(component, entry.serialised)?;
            evaluate(registry, &mut config, PassMode::SKELETON)?;
        }

        let (derived, report) = evaluate(registry, &mut config, PassMode::FULL)?;
        tracing::debug!(
            "loaded {} {} sequence(s) with {} component(s)",
            config.sequences().len(),
            D::NAME,
            pending.len()
        );
        self.commit(config, derived, report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reload(value: OptionValue) -> OptionValue {
        option_value_from_json(&value, &option_value_to_json(&value)).unwrap()
    }

    #[test]
    fn every_value_kind_survives_json() {
        for value in [
            OptionValue::Boolean(true),
            OptionValue::String("Mk II".into()),
            OptionValue::Integer(-12),
            OptionValue::Float(2.5),
            OptionValue::Enum("Heavy".into()),
            OptionValue::MultiSelect(vec!["Bipod".into(), "Scope".into()]),
            OptionValue::MultiSelect(Vec::new()),
        ] {
            assert_eq!(reload(value.clone()), value);
        }
    }

    #[test]
    fn enums_and_selections_are_written_by_name() {
        assert_eq!(option_value_to_json(&OptionValue::Enum("High".into())), json!("High"));
        assert_eq!(
            option_value_to_json(&OptionValue::MultiSelect(vec!["A".into(), "B".into()])),
            json!(["A", "B"])
        );
        assert_eq!(option_value_to_json(&OptionValue::Boolean(false)), json!(false));
    }

    #[test]
    fn whole_floats_read_as_integers() {
        let template = OptionValue::Integer(0);
        assert_eq!(option_value_from_json(&template, &json!(4.0)), Ok(OptionValue::Integer(4)));
        assert_eq!(
            option_value_from_json(&OptionValue::Float(0.0), &json!(3)),
            Ok(OptionValue::Float(3.0))
        );
    }

    #[test]
    fn mismatched_values_are_rejected() {
        let integer = OptionValue::Integer(0);
        assert!(option_value_from_json(&integer, &json!(1.5)).is_err());
        assert!(option_value_from_json(&integer, &json!(1e20)).is_err());
        assert!(option_value_from_json(&integer, &json!(-1e19)).is_err());
        assert!(option_value_from_json(&integer, &json!("4")).is_err());

        assert!(option_value_from_json(&OptionValue::Boolean(false), &json!(1)).is_err());
        assert!(option_value_from_json(&OptionValue::String(String::new()), &json!(null)).is_err());
        assert!(option_value_from_json(&OptionValue::Float(0.0), &json!("2.5")).is_err());
        assert!(
            option_value_from_json(&OptionValue::MultiSelect(Vec::new()), &json!(["A", 2])).is_err()
        );

        let error = option_value_from_json(&integer, &json!(1e20)).unwrap_err();
        assert!(error.contains("integer"), "{error}");
    }
}
