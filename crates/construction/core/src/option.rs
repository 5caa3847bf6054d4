//! Component options.
//!
//! An option is a typed, validated setting on a component instance. Values
//! are one of the [`OptionValue`] variants; each option carries the
//! [`OptionConstraint`] its value is checked against, and an `enabled` flag
//! that `update_options` may toggle as the rest of the construction changes.

use core::fmt::{self, Display};
use core::str::FromStr;

use strum::IntoEnumIterator;

use crate::error::OptionError;
use crate::scalar::format_number;

/// Current value of an option.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    Boolean(bool),
    String(String),
    Integer(i64),
    Float(f64),
    /// Symbolic name of the selected choice.
    Enum(String),
    /// Symbolic names of the selected choices.
    MultiSelect(Vec<String>),
}

impl OptionValue {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Enum(_) => "enum",
            Self::MultiSelect(_) => "multi-select",
        }
    }
}

impl Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(f, "{}", if *value { "Yes" } else { "No" }),
            Self::String(value) | Self::Enum(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&format_number(*value)),
            Self::MultiSelect(values) => f.write_str(&values.join(", ")),
        }
    }
}

/// Constraint a value must satisfy.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionConstraint {
    Unconstrained,
    IntegerRange { min: i64, max: i64 },
    FloatRange { min: f64, max: f64 },
    /// Allowed symbolic names for enum and multi-select options.
    Choices(Vec<String>),
}

/// A named, typed setting on a component.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentOption<Id> {
    id: Id,
    name: String,
    description: Option<String>,
    value: OptionValue,
    default: OptionValue,
    constraint: OptionConstraint,
    enabled: bool,
}

impl<Id> ComponentOption<Id>
where
    Id: Copy + PartialEq + Display,
{
    fn build(id: Id, name: &str, value: OptionValue, constraint: OptionConstraint) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: None,
            default: value.clone(),
            value,
            constraint,
            enabled: true,
        }
    }

    pub fn boolean(id: Id, name: &str, value: bool) -> Self {
        Self::build(
            id,
            name,
            OptionValue::Boolean(value),
            OptionConstraint::Unconstrained,
        )
    }

    pub fn string(id: Id, name: &str, value: &str) -> Self {
        Self::build(
            id,
            name,
            OptionValue::String(value.to_string()),
            OptionConstraint::Unconstrained,
        )
    }

    /// Integer option; `value` is clamped into `min..=max`.
    pub fn integer(id: Id, name: &str, value: i64, min: i64, max: i64) -> Self {
        Self::build(
            id,
            name,
            OptionValue::Integer(value.clamp(min, max.max(min))),
            OptionConstraint::IntegerRange {
                min,
                max: max.max(min),
            },
        )
    }

    /// Float option; `value` is clamped into `min..=max`.
    pub fn float(id: Id, name: &str, value: f64, min: f64, max: f64) -> Self {
        let max = max.max(min);
        Self::build(
            id,
            name,
            OptionValue::Float(value.clamp(min, max)),
            OptionConstraint::FloatRange { min, max },
        )
    }

    /// Enum option over every variant of `E`, selecting `value`.
    pub fn enum_of<E>(id: Id, name: &str, value: E) -> Self
    where
        E: IntoEnumIterator + Display,
    {
        let choices = E::iter().map(|choice| choice.to_string()).collect();
        Self::build(
            id,
            name,
            OptionValue::Enum(value.to_string()),
            OptionConstraint::Choices(choices),
        )
    }

    pub fn multi_select<E>(id: Id, name: &str, selected: &[E]) -> Self
    where
        E: IntoEnumIterator + Display,
    {
        let choices = E::iter().map(|choice| choice.to_string()).collect();
        Self::build(
            id,
            name,
            OptionValue::MultiSelect(selected.iter().map(ToString::to_string).collect()),
            OptionConstraint::Choices(choices),
        )
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value(&self) -> &OptionValue {
        &self.value
    }

    /// The value the option was created with.
    pub fn default_value(&self) -> &OptionValue {
        &self.default
    }

    pub fn constraint(&self) -> &OptionConstraint {
        &self.constraint
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabled options keep their value but refuse new ones.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Puts back the value the option was created with, clamped into the
    /// current range.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
        match (&self.constraint, &mut self.value) {
            (OptionConstraint::IntegerRange { min, max }, OptionValue::Integer(value)) => {
                *value = (*value).clamp(*min, *max);
            }
            (OptionConstraint::FloatRange { min, max }, OptionValue::Float(value)) => {
                *value = value.clamp(*min, *max);
            }
            _ => {}
        }
    }

    /// Validates `value` against the option's type and constraint, then stores it.
    ///
    /// Integer values are accepted by float options. Floats must be finite.
    pub fn set_value(&mut self, value: OptionValue) -> Result<(), OptionError> {
        if !self.enabled {
            return Err(OptionError::Disabled {
                option: self.id.to_string(),
            });
        }
        let value = match (&self.value, value) {
            (OptionValue::Float(_), OptionValue::Integer(integer)) => {
                OptionValue::Float(integer as f64)
            }
            (current, value)
                if std::mem::discriminant(current) != std::mem::discriminant(&value) =>
            {
                return Err(OptionError::TypeMismatch {
                    option: self.id.to_string(),
                    expected: current.kind_name(),
                    found: value.kind_name(),
                });
            }
            (_, value) => value,
        };

        if let OptionValue::Float(float) = &value {
            if !float.is_finite() {
                return Err(OptionError::NotFinite {
                    option: self.id.to_string(),
                    value: float.to_string(),
                });
            }
        }

        match (&self.constraint, &value) {
            (OptionConstraint::IntegerRange { min, max }, OptionValue::Integer(integer))
                if integer < min || integer > max =>
            {
                return Err(self.out_of_range(integer.to_string(), min, max));
            }
            (OptionConstraint::FloatRange { min, max }, OptionValue::Float(float))
                if float < min || float > max =>
            {
                return Err(OptionError::OutOfRange {
                    option: self.id.to_string(),
                    value: format_number(*float),
                    min: format_number(*min),
                    max: format_number(*max),
                });
            }
            (OptionConstraint::Choices(choices), OptionValue::Enum(choice)) => {
                self.check_choice(choices, choice)?;
            }
            (OptionConstraint::Choices(choices), OptionValue::MultiSelect(selected)) => {
                for choice in selected {
                    self.check_choice(choices, choice)?;
                }
            }
            _ => {}
        }

        self.value = value;
        Ok(())
    }

    fn out_of_range(&self, value: String, min: &i64, max: &i64) -> OptionError {
        OptionError::OutOfRange {
            option: self.id.to_string(),
            value,
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    fn check_choice(&self, choices: &[String], choice: &str) -> Result<(), OptionError> {
        if choices.iter().any(|allowed| allowed == choice) {
            Ok(())
        } else {
            Err(OptionError::UnknownChoice {
                option: self.id.to_string(),
                choice: choice.to_string(),
            })
        }
    }

    /// Re-ranges an integer option, clamping the current value into the new range.
    pub fn set_integer_range(&mut self, min: i64, max: i64) {
        let max = max.max(min);
        self.constraint = OptionConstraint::IntegerRange { min, max };
        if let OptionValue::Integer(value) = &mut self.value {
            *value = (*value).clamp(min, max);
        }
    }

    /// Re-ranges a float option, clamping the current value into the new range.
    pub fn set_float_range(&mut self, min: f64, max: f64) {
        let max = max.max(min);
        self.constraint = OptionConstraint::FloatRange { min, max };
        if let OptionValue::Float(value) = &mut self.value {
            *value = value.clamp(min, max);
        }
    }

    /// Replaces the allowed choices. A selection no longer allowed falls back
    /// to the first choice (enum) or is dropped (multi-select).
    pub fn set_choices(&mut self, choices: Vec<String>) {
        match &mut self.value {
            OptionValue::Enum(current) if !choices.contains(current) => {
                if let Some(first) = choices.first() {
                    *current = first.clone();
                }
            }
            OptionValue::MultiSelect(selected) => selected.retain(|choice| choices.contains(choice)),
            _ => {}
        }
        self.constraint = OptionConstraint::Choices(choices);
    }

    pub fn integer_range(&self) -> Option<(i64, i64)> {
        match self.constraint {
            OptionConstraint::IntegerRange { min, max } => Some((min, max)),
            _ => None,
        }
    }

    pub fn choices(&self) -> &[String] {
        match &self.constraint {
            OptionConstraint::Choices(choices) => choices,
            _ => &[],
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            OptionValue::Boolean(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            OptionValue::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            OptionValue::Float(value) => Some(value),
            OptionValue::Integer(value) => Some(value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            OptionValue::String(value) | OptionValue::Enum(value) => Some(value),
            _ => None,
        }
    }

    /// Parses the selected enum choice.
    pub fn as_enum<E: FromStr>(&self) -> Option<E> {
        match &self.value {
            OptionValue::Enum(choice) => choice.parse().ok(),
            _ => None,
        }
    }

    pub fn as_multi(&self) -> Option<&[String]> {
        match &self.value {
            OptionValue::MultiSelect(selected) => Some(selected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
    enum Id {
        Level,
        Zoom,
        Sealed,
        Features,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
    enum Magnification {
        Basic,
        Improved,
        Enhanced,
    }

    #[test]
    fn integer_range_is_enforced() {
        let mut option = ComponentOption::integer(Id::Level, "Level", 1, 0, 3);
        assert!(option.set_value(OptionValue::Integer(3)).is_ok());
        let error = option.set_value(OptionValue::Integer(4)).unwrap_err();
        assert!(matches!(error, OptionError::OutOfRange { .. }));
        assert_eq!(option.as_integer(), Some(3));
    }

    #[test]
    fn rerange_clamps_current_value() {
        let mut option = ComponentOption::integer(Id::Level, "Level", 5, 0, 10);
        option.set_integer_range(0, 2);
        assert_eq!(option.as_integer(), Some(2));
        assert_eq!(option.integer_range(), Some((0, 2)));
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let mut option = ComponentOption::boolean(Id::Sealed, "Sealed", false);
        let error = option.set_value(OptionValue::Integer(1)).unwrap_err();
        assert_eq!(
            error,
            OptionError::TypeMismatch {
                option: "Sealed".into(),
                expected: "boolean",
                found: "integer",
            }
        );
    }

    #[test]
    fn enum_choices_round_trip_by_name() {
        let mut option = ComponentOption::enum_of(Id::Zoom, "Zoom", Magnification::Basic);
        assert_eq!(option.choices().len(), 3);
        option
            .set_value(OptionValue::Enum("Enhanced".into()))
            .unwrap();
        assert_eq!(option.as_enum::<Magnification>(), Some(Magnification::Enhanced));

        let error = option.set_value(OptionValue::Enum("Telescopic".into())).unwrap_err();
        assert!(matches!(error, OptionError::UnknownChoice { .. }));
    }

    #[test]
    fn set_choices_falls_back_to_first() {
        let mut option = ComponentOption::enum_of(Id::Zoom, "Zoom", Magnification::Enhanced);
        option.set_choices(vec!["Basic".into(), "Improved".into()]);
        assert_eq!(option.as_str(), Some("Basic"));

        let mut multi =
            ComponentOption::multi_select(Id::Features, "Features", &[Magnification::Basic, Magnification::Enhanced]);
        multi.set_choices(vec!["Basic".into()]);
        assert_eq!(multi.as_multi(), Some(&["Basic".to_string()][..]));
    }

    #[test]
    fn float_accepts_integer_values() {
        let mut option = ComponentOption::float(Id::Level, "Ratio", 1.0, 0.5, 4.0);
        option.set_value(OptionValue::Integer(2)).unwrap();
        assert_eq!(option.as_float(), Some(2.0));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let mut option = ComponentOption::float(Id::Level, "Ratio", 1.0, f64::MIN, f64::MAX);
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let error = option.set_value(OptionValue::Float(value)).unwrap_err();
            assert!(matches!(error, OptionError::NotFinite { .. }));
        }
        assert_eq!(option.as_float(), Some(1.0));

        let mut unbounded = ComponentOption::string(Id::Features, "Label", "");
        assert!(unbounded.set_value(OptionValue::String("Mk II".into())).is_ok());
    }

    #[test]
    fn disabled_option_refuses_values() {
        let mut option = ComponentOption::boolean(Id::Sealed, "Sealed", false);
        option.set_value(OptionValue::Boolean(true)).unwrap();
        option.set_enabled(false);

        let error = option.set_value(OptionValue::Boolean(false)).unwrap_err();
        assert_eq!(error, OptionError::Disabled { option: "Sealed".into() });
        assert_eq!(option.as_bool(), Some(true));

        option.reset();
        assert_eq!(option.as_bool(), Some(false));
        option.set_enabled(true);
        assert!(option.set_value(OptionValue::Boolean(true)).is_ok());
    }

    #[test]
    fn reset_respects_current_range() {
        let mut option = ComponentOption::integer(Id::Level, "Level", 3, 0, 5);
        option.set_value(OptionValue::Integer(5)).unwrap();
        option.set_integer_range(0, 2);
        option.reset();
        assert_eq!(option.as_integer(), Some(2));
        assert_eq!(option.default_value(), &OptionValue::Integer(3));
    }
}
