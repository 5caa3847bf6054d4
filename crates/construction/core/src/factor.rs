//! Display-oriented descriptions of what a step does to attributes.
//!
//! Only [`Factor::SetAttribute`], [`Factor::ModifyAttribute`] and
//! [`Factor::DeleteAttribute`] change an [`AttributesGroup`]. A factor wrapped
//! in [`Factor::NonModifying`] is shown in the manifest but never applied.

use core::fmt;

use crate::attributes::{AttributeValue, AttributesGroup};
use crate::error::ConstructionError;
use crate::modifier::{NumericModifier, ScalarModifier};

#[derive(Clone, Debug, PartialEq)]
pub enum Factor<A> {
    /// Free text shown alongside the step.
    Text(String),

    /// Displays the wrapped factor, optionally prefixed, without applying it.
    NonModifying {
        factor: Box<Factor<A>>,
        prefix: Option<String>,
    },

    SetAttribute {
        attribute: A,
        value: AttributeValue,
    },

    ModifyAttribute {
        attribute: A,
        modifier: NumericModifier,
    },

    DeleteAttribute {
        attribute: A,
    },
}

impl<A> Factor<A>
where
    A: Copy + Ord + fmt::Display,
{
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn set(attribute: A, value: impl Into<AttributeValue>) -> Self {
        Self::SetAttribute {
            attribute,
            value: value.into(),
        }
    }

    pub fn modify(attribute: A, modifier: NumericModifier) -> Self {
        Self::ModifyAttribute {
            attribute,
            modifier,
        }
    }

    pub fn delete(attribute: A) -> Self {
        Self::DeleteAttribute { attribute }
    }

    /// Wraps `factor` so it is displayed but not applied.
    pub fn non_modifying(factor: Factor<A>, prefix: Option<&str>) -> Self {
        Self::NonModifying {
            factor: Box::new(factor),
            prefix: prefix.map(str::to_string),
        }
    }

    /// True if applying this factor changes an attribute store.
    pub fn is_modifying(&self) -> bool {
        matches!(
            self,
            Self::SetAttribute { .. } | Self::ModifyAttribute { .. } | Self::DeleteAttribute { .. }
        )
    }

    pub fn display_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::NonModifying { factor, prefix } => match prefix {
                Some(prefix) => format!("{prefix} {}", factor.display_string()),
                None => factor.display_string(),
            },
            Self::SetAttribute { attribute, value } => format!("{attribute} = {value}"),
            Self::ModifyAttribute {
                attribute,
                modifier,
            } => format!("{attribute} {}", modifier.display_string()),
            Self::DeleteAttribute { attribute } => format!("No {attribute}"),
        }
    }

    /// Applies this factor to `attributes`. Non-modifying factors are no-ops.
    pub fn apply(&self, attributes: &mut AttributesGroup<A>) -> Result<(), ConstructionError> {
        match self {
            Self::Text(_) | Self::NonModifying { .. } => Ok(()),
            Self::SetAttribute { attribute, value } => {
                attributes.set_attribute(*attribute, value.clone());
                Ok(())
            }
            Self::ModifyAttribute {
                attribute,
                modifier,
            } => attributes.modify_attribute(*attribute, modifier),
            Self::DeleteAttribute { attribute } => {
                attributes.delete_attribute(*attribute);
                Ok(())
            }
        }
    }
}

impl<A> fmt::Display for Factor<A>
where
    A: Copy + Ord + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}
