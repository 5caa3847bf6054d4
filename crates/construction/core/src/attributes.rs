//! Attribute store.
//!
//! An [`AttributesGroup`] maps attribute identifiers to values for one build
//! sequence. It is derived state: the engine clears and rebuilds it on every
//! regenerate pass, and it is only mutated through set, modify and delete.
//! An absent attribute reads as whatever default the caller supplies, never
//! as an error.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConstructionError;
use crate::modifier::{NumericModifier, ScalarModifier};
use crate::scalar::{DiceRoll, ScalarValue};

/// Value held by an attribute.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    Scalar(ScalarValue),
    Dice(DiceRoll),
    /// Symbolic name of an enumerated choice.
    Choice(String),
}

impl AttributeValue {
    pub fn scalar(value: impl Into<ScalarValue>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn choice(name: impl ToString) -> Self {
        Self::Choice(name.to_string())
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Dice(_) => "dice",
            Self::Choice(_) => "choice",
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_dice(&self) -> Option<DiceRoll> {
        match self {
            Self::Dice(dice) => Some(*dice),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Dice(dice) => write!(f, "{dice}"),
            Self::Choice(name) => f.write_str(name),
        }
    }
}

impl From<DiceRoll> for AttributeValue {
    fn from(dice: DiceRoll) -> Self {
        Self::Dice(dice)
    }
}

impl From<ScalarValue> for AttributeValue {
    fn from(value: ScalarValue) -> Self {
        Self::Scalar(value)
    }
}

/// Mapping from attribute identifier to value for one sequence.
///
/// Iteration order is the identifier's `Ord` order, so two groups built from
/// the same configuration compare and render identically.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributesGroup<A: Ord> {
    values: BTreeMap<A, AttributeValue>,
}

impl<A: Ord> Default for AttributesGroup<A> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<A> AttributesGroup<A>
where
    A: Copy + Ord + fmt::Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: A) -> Option<&AttributeValue> {
        self.values.get(&attribute)
    }

    pub fn has_attribute(&self, attribute: A) -> bool {
        self.values.contains_key(&attribute)
    }

    pub fn scalar(&self, attribute: A) -> Option<&ScalarValue> {
        self.get(attribute).and_then(AttributeValue::as_scalar)
    }

    /// Scalar value of `attribute`, or `default` when absent or not a scalar.
    pub fn scalar_or(&self, attribute: A, default: f64) -> ScalarValue {
        self.scalar(attribute)
            .cloned()
            .unwrap_or_else(|| ScalarValue::literal(default))
    }

    pub fn dice(&self, attribute: A) -> Option<DiceRoll> {
        self.get(attribute).and_then(AttributeValue::as_dice)
    }

    pub fn choice(&self, attribute: A) -> Option<&str> {
        self.get(attribute).and_then(AttributeValue::as_choice)
    }

    /// Overwrites `attribute`.
    pub fn set_attribute(&mut self, attribute: A, value: AttributeValue) {
        self.values.insert(attribute, value);
    }

    /// Applies `modifier` to the current value of `attribute`.
    ///
    /// An absent attribute is created at an implicit zero (an empty dice
    /// expression for dice-roll deltas) before the modifier is applied.
    /// Choice attributes cannot be modified numerically.
    pub fn modify_attribute(
        &mut self,
        attribute: A,
        modifier: &NumericModifier,
    ) -> Result<(), ConstructionError> {
        let current = self.values.remove(&attribute).unwrap_or_else(|| match modifier {
            NumericModifier::DiceRollDelta { .. } => AttributeValue::Dice(DiceRoll::default()),
            _ => AttributeValue::Scalar(ScalarValue::zero()),
        });

        let updated = match current {
            AttributeValue::Scalar(value) => AttributeValue::Scalar(
                modifier.apply_to(&value).renamed(attribute.to_string()),
            ),
            AttributeValue::Dice(dice) => AttributeValue::Dice(modifier.apply_to_dice(&dice)),
            AttributeValue::Choice(name) => {
                let found = "choice";
                self.values.insert(attribute, AttributeValue::Choice(name));
                return Err(ConstructionError::AttributeTypeMismatch {
                    attribute: attribute.to_string(),
                    found,
                    modifier: modifier.display_string(),
                });
            }
        };
        self.values.insert(attribute, updated);
        Ok(())
    }

    /// Removes `attribute`, returning its previous value.
    pub fn delete_attribute(&mut self, attribute: A) -> Option<AttributeValue> {
        self.values.remove(&attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (A, &AttributeValue)> + '_ {
        self.values.iter().map(|(id, value)| (*id, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
    enum Attr {
        Range,
        Damage,
        Calibre,
    }

    #[test]
    fn absent_attribute_reads_default() {
        let group = AttributesGroup::<Attr>::new();
        assert!(group.get(Attr::Range).is_none());
        assert_eq!(group.scalar_or(Attr::Range, 10.0).value(), 10.0);
    }

    #[test]
    fn modify_creates_at_zero() {
        let mut group = AttributesGroup::new();
        group
            .modify_attribute(Attr::Range, &NumericModifier::constant(5.0))
            .unwrap();
        assert_eq!(group.scalar(Attr::Range).unwrap().value(), 5.0);
        assert_eq!(group.scalar(Attr::Range).unwrap().name(), Some("Range"));

        group
            .modify_attribute(Attr::Damage, &NumericModifier::dice_delta(2, 1))
            .unwrap();
        assert_eq!(group.dice(Attr::Damage), Some(DiceRoll::new(2, 1)));
    }

    #[test]
    fn modify_composes_with_existing_value() {
        let mut group = AttributesGroup::new();
        group.set_attribute(Attr::Range, AttributeValue::scalar(100.0));
        group
            .modify_attribute(Attr::Range, &NumericModifier::multiplier(1.5))
            .unwrap();
        group
            .modify_attribute(Attr::Range, &NumericModifier::percentage(-10.0))
            .unwrap();
        assert_eq!(group.scalar(Attr::Range).unwrap().value(), 135.0);
    }

    #[test]
    fn choice_attributes_reject_numeric_modifiers() {
        let mut group = AttributesGroup::new();
        group.set_attribute(Attr::Calibre, AttributeValue::choice("Heavy"));
        let error = group
            .modify_attribute(Attr::Calibre, &NumericModifier::constant(1.0))
            .unwrap_err();
        assert!(matches!(error, ConstructionError::AttributeTypeMismatch { .. }));
        assert_eq!(group.choice(Attr::Calibre), Some("Heavy"));
    }

    #[test]
    fn delete_removes_value() {
        let mut group = AttributesGroup::new();
        group.set_attribute(Attr::Damage, DiceRoll::new(3, 0).into());
        assert!(group.delete_attribute(Attr::Damage).is_some());
        assert!(!group.has_attribute(Attr::Damage));
        assert!(group.delete_attribute(Attr::Damage).is_none());
    }
}
