//! Domain binding.
//!
//! A construction domain (weapons, robots, ...) supplies the closed
//! enumerations the engine is generic over, plus the stage layout of each
//! build sequence. The engine itself never names a concrete phase, cost or
//! component.

use core::fmt::{Debug, Display};
use core::hash::Hash;
use core::str::FromStr;

use strum::IntoEnumIterator;

use crate::component::Component;
use crate::stage::StageDefinition;

/// Bounds shared by every identifier a domain supplies.
pub trait Key: Copy + Ord + Hash + Debug + Display + Send + Sync + 'static {}

impl<T> Key for T where T: Copy + Ord + Hash + Debug + Display + Send + Sync + 'static {}

/// Identifier that round-trips through its symbolic name.
pub trait NamedKey: Key + FromStr {}

impl<T> NamedKey for T where T: Key + FromStr {}

/// A construction phase.
///
/// Phases are evaluated in `Ord` order, which must match `IntoEnumIterator`
/// order (derive both on a fieldless enum).
pub trait Phase: Key + IntoEnumIterator {
    /// Internal phases carry engine bookkeeping and never appear in a manifest.
    fn is_internal(&self) -> bool {
        false
    }
}

/// The set of types describing one kind of constructible artifact.
pub trait Domain: Copy + Debug + Default + Eq + Send + Sync + 'static {
    /// Short name used in logs and documents.
    const NAME: &'static str;

    type Phase: Phase;
    type Cost: NamedKey + IntoEnumIterator;
    type Attribute: Key;
    type OptionId: NamedKey;
    type Rule: NamedKey;
    type SequenceKind: NamedKey;
    type Base: Key;
    type Kind: NamedKey;
    type Component: Component<Self>;

    /// Stage layout for a sequence of `kind`, or the shared stages for `None`.
    fn stages(kind: Option<Self::SequenceKind>) -> Vec<StageDefinition<Self>>;
}
