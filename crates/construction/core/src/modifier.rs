//! Numeric modifiers and modifier sequencing.
//!
//! A [`NumericModifier`] is a typed change to a scalar: a constant, a
//! percentage, a multiplier or a dice-roll delta. Modifiers are either
//! *absolute* (they define a base value) or *relative* (they adjust an
//! existing base).
//!
//! [`calculate_numeric_modifier_sequence`] folds a list of modifiers into one
//! [`ScalarValue`]:
//!
//! 1. The first absolute modifier seeds the accumulator with its own value.
//!    With no absolute modifier the accumulator seeds at zero.
//! 2. Every other modifier, in list order, is applied to the accumulator.
//!    Later absolute modifiers are applied as ordinary transformations
//!    (a constant adds), never as re-seeds.
//! 3. An empty list is a literal zero.
//!
//! ```
//! # use construction_core::{calculate_numeric_modifier_sequence, NumericModifier};
//! let relative_only = [NumericModifier::percentage(10.0)];
//! assert_eq!(calculate_numeric_modifier_sequence(&relative_only, None).value(), 0.0);
//!
//! let priced = [NumericModifier::constant(100.0), NumericModifier::percentage(10.0)];
//! assert_eq!(calculate_numeric_modifier_sequence(&priced, None).value(), 110.0);
//! ```

use core::fmt;

use crate::scalar::{DiceRoll, ScalarValue, format_number, format_signed};

/// Common behaviour of anything that can take part in a modifier sequence.
pub trait ScalarModifier {
    /// True if this modifier defines a new base value rather than adjusting one.
    fn is_absolute(&self) -> bool;

    /// Value used when this modifier seeds a sequence.
    fn absolute_value(&self) -> ScalarValue;

    /// Applies this modifier to an existing value.
    fn apply_to(&self, base: &ScalarValue) -> ScalarValue;

    /// Human-readable form, e.g. `+50`, `+10%`, `x1.5`.
    fn display_string(&self) -> String;
}

/// A typed modification to a scalar value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericModifier {
    /// Fixed amount. Absolute: seeds a sequence; adds when applied.
    Constant(ScalarValue),

    /// Relative change in percent (10 = +10%).
    Percentage { value: ScalarValue, round_down: bool },

    /// Relative scale factor (1.5 = x1.5).
    Multiplier { value: ScalarValue, round_down: bool },

    /// Change to a dice expression. On plain scalars only the constant applies.
    DiceRollDelta { count: i32, constant: i32 },
}

impl NumericModifier {
    pub fn constant(value: impl Into<ScalarValue>) -> Self {
        Self::Constant(value.into())
    }

    pub fn percentage(value: impl Into<ScalarValue>) -> Self {
        Self::Percentage {
            value: value.into(),
            round_down: false,
        }
    }

    pub fn percentage_rounded_down(value: impl Into<ScalarValue>) -> Self {
        Self::Percentage {
            value: value.into(),
            round_down: true,
        }
    }

    pub fn multiplier(value: impl Into<ScalarValue>) -> Self {
        Self::Multiplier {
            value: value.into(),
            round_down: false,
        }
    }

    pub fn multiplier_rounded_down(value: impl Into<ScalarValue>) -> Self {
        Self::Multiplier {
            value: value.into(),
            round_down: true,
        }
    }

    pub fn dice_delta(count: i32, constant: i32) -> Self {
        Self::DiceRollDelta { count, constant }
    }

    /// Applies this modifier to a dice expression.
    ///
    /// Constants shift the roll's constant; percentages and multipliers scale
    /// both the dice count and the constant (rounding to nearest, or down when
    /// `round_down` is set); dice deltas add dice and constant.
    pub fn apply_to_dice(&self, dice: &DiceRoll) -> DiceRoll {
        let scale = |factor: f64, round_down: bool| {
            let round = |value: f64| {
                if round_down {
                    value.floor() as i32
                } else {
                    value.round() as i32
                }
            };
            DiceRoll::new(
                round(f64::from(dice.count()) * factor),
                round(f64::from(dice.constant()) * factor),
            )
        };
        match self {
            Self::Constant(value) => dice.adjusted(0, value.value().round() as i32),
            Self::Percentage { value, round_down } => {
                scale(1.0 + value.value() / 100.0, *round_down)
            }
            Self::Multiplier { value, round_down } => scale(value.value(), *round_down),
            Self::DiceRollDelta { count, constant } => dice.adjusted(*count, *constant),
        }
    }
}

impl ScalarModifier for NumericModifier {
    fn is_absolute(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    fn absolute_value(&self) -> ScalarValue {
        match self {
            Self::Constant(value) => value.clone(),
            Self::Percentage { value, .. } | Self::Multiplier { value, .. } => value.clone(),
            Self::DiceRollDelta { constant, .. } => ScalarValue::from(*constant),
        }
    }

    fn apply_to(&self, base: &ScalarValue) -> ScalarValue {
        match self {
            Self::Constant(value) => base.add(value),
            Self::Percentage { value, round_down } => {
                let result = base.add(&base.percentage(value));
                if *round_down { result.floor() } else { result }
            }
            Self::Multiplier { value, round_down } => {
                let result = base.multiply(value);
                if *round_down { result.floor() } else { result }
            }
            Self::DiceRollDelta { constant, .. } => base.add(&ScalarValue::from(*constant)),
        }
    }

    fn display_string(&self) -> String {
        match self {
            Self::Constant(value) => format_signed(value.value()),
            Self::Percentage { value, .. } => format!("{}%", format_signed(value.value())),
            Self::Multiplier { value, .. } => format!("x{}", format_number(value.value())),
            Self::DiceRollDelta { count, constant } => {
                let dice = DiceRoll::new(*count, *constant).to_string();
                if *count < 0 || (*count == 0 && *constant < 0) {
                    dice
                } else {
                    format!("+{dice}")
                }
            }
        }
    }
}

impl fmt::Display for NumericModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

/// An ordered list of modifiers that itself behaves as a modifier.
///
/// A sequence is absolute if any member is absolute; its own value is the
/// fold of its members. Applying it to a value applies each member in order.
/// Manifest section totals are sequences, so a manifest total is a sequence
/// of sequences.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifierSequence {
    name: Option<String>,
    modifiers: Vec<NumericModifier>,
}

impl ModifierSequence {
    pub fn new(modifiers: Vec<NumericModifier>) -> Self {
        Self {
            name: None,
            modifiers,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn push(&mut self, modifier: NumericModifier) {
        self.modifiers.push(modifier);
    }

    pub fn modifiers(&self) -> &[NumericModifier] {
        &self.modifiers
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Folds the sequence using the seeding rule.
    pub fn value(&self) -> ScalarValue {
        calculate_numeric_modifier_sequence(&self.modifiers, self.name.as_deref())
    }

    /// Like [`Self::value`], but reports [`Calculated::CouldNotCalculate`]
    /// when the sequence has members and none of them is absolute.
    pub fn resolve(&self) -> Calculated {
        resolve_numeric_modifier_sequence(&self.modifiers, self.name.as_deref())
    }
}

impl ScalarModifier for ModifierSequence {
    fn is_absolute(&self) -> bool {
        self.modifiers.iter().any(ScalarModifier::is_absolute)
    }

    fn absolute_value(&self) -> ScalarValue {
        self.value()
    }

    fn apply_to(&self, base: &ScalarValue) -> ScalarValue {
        let result = self
            .modifiers
            .iter()
            .fold(base.clone(), |acc, modifier| modifier.apply_to(&acc));
        match &self.name {
            Some(name) if !self.modifiers.is_empty() => result.renamed(name.clone()),
            _ => result,
        }
    }

    fn display_string(&self) -> String {
        if self.is_absolute() {
            return format_number(self.value().value());
        }
        self.modifiers
            .iter()
            .map(ScalarModifier::display_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromIterator<NumericModifier> for ModifierSequence {
    fn from_iter<I: IntoIterator<Item = NumericModifier>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Folds `modifiers` into one value using the seeding rule described in the
/// module documentation. The result is renamed to `name` when given.
pub fn calculate_numeric_modifier_sequence<M: ScalarModifier>(
    modifiers: &[M],
    name: Option<&str>,
) -> ScalarValue {
    let seed_index = modifiers.iter().position(ScalarModifier::is_absolute);
    let mut total = match seed_index {
        Some(index) => modifiers[index].absolute_value(),
        None => ScalarValue::zero(),
    };
    for (index, modifier) in modifiers.iter().enumerate() {
        if Some(index) == seed_index {
            continue;
        }
        total = modifier.apply_to(&total);
    }
    match name {
        Some(name) => total.renamed(name),
        None => total,
    }
}

/// Result of a calculation that callers require to resolve to a concrete figure.
#[derive(Clone, Debug, PartialEq)]
pub enum Calculated {
    Value(ScalarValue),
    /// The sequence only holds relative modifiers, so there is no base to adjust.
    CouldNotCalculate,
}

impl Calculated {
    pub fn value(&self) -> Option<&ScalarValue> {
        match self {
            Self::Value(value) => Some(value),
            Self::CouldNotCalculate => None,
        }
    }

    pub fn is_calculated(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl fmt::Display for Calculated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::CouldNotCalculate => f.write_str("could not calculate"),
        }
    }
}

/// Folds `modifiers` like [`calculate_numeric_modifier_sequence`], but
/// reports [`Calculated::CouldNotCalculate`] for a non-empty sequence without
/// any absolute modifier.
pub fn resolve_numeric_modifier_sequence<M: ScalarModifier>(
    modifiers: &[M],
    name: Option<&str>,
) -> Calculated {
    if !modifiers.is_empty() && !modifiers.iter().any(ScalarModifier::is_absolute) {
        return Calculated::CouldNotCalculate;
    }
    Calculated::Value(calculate_numeric_modifier_sequence(modifiers, name))
}
