//! Concrete construction domains.
//!
//! This crate binds the construction engine to two Traveller artifact types:
//! - [`weapon`]: conventional firearms and launchers
//! - [`robot`]: robots with chassis, locomotion, armour, skills and slot options
//!
//! Each domain owns its closed enumerations, its component catalog and the
//! registry that maps component type names back to instances. Whole artifacts
//! are wrapped in [`Artifact`], which adds a name and notes to the context and
//! (with the `serde` feature) converts to and from JSON documents.
//!
//! The `loaders` feature adds [`ConfigLoader`] for TOML engine settings.

#[macro_use]
mod macros;

pub mod artifact;
pub mod robot;
pub mod weapon;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use artifact::Artifact;
#[cfg(feature = "serde")]
pub use artifact::ArtifactDocument;
pub use robot::{Robot, RobotDomain};
pub use weapon::{Weapon, WeaponDomain};

#[cfg(feature = "loaders")]
pub use loaders::ConfigLoader;
