//! Component registry.

use core::fmt;

use crate::component::Component;
use crate::domain::Domain;

struct RegistryEntry<D: Domain> {
    kind: D::Kind,
    base: D::Base,
    factory: fn() -> D::Component,
}

/// The set of component kinds a domain offers, with their constructors.
///
/// A registry is built once by the domain, then shared read-only (usually
/// behind an `Arc`) by every construction of that domain. Kinds are kept in
/// registration order, which is the order candidates are offered in.
pub struct ComponentRegistry<D: Domain> {
    entries: Vec<RegistryEntry<D>>,
}

impl<D: Domain> ComponentRegistry<D> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a constructor. Kind and base are read from a prototype
    /// instance; registering a kind twice replaces the earlier constructor.
    pub fn register(&mut self, factory: fn() -> D::Component) -> &mut Self {
        let prototype = factory();
        let entry = RegistryEntry {
            kind: prototype.kind(),
            base: prototype.base(),
            factory,
        };
        match self.entries.iter_mut().find(|e| e.kind == entry.kind) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Builder form of [`Self::register`].
    #[must_use]
    pub fn with(mut self, factory: fn() -> D::Component) -> Self {
        self.register(factory);
        self
    }

    /// Creates a default-configured instance of `kind`.
    pub fn create(&self, kind: D::Kind) -> Option<D::Component> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| (entry.factory)())
    }

    pub fn base_of(&self, kind: D::Kind) -> Option<D::Base> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.base)
    }

    pub fn contains(&self, kind: D::Kind) -> bool {
        self.entries.iter().any(|entry| entry.kind == kind)
    }

    /// Registered kinds accepted by stages of `base`.
    pub fn kinds_for(&self, base: D::Base) -> impl Iterator<Item = D::Kind> + '_ {
        self.entries
            .iter()
            .filter(move |entry| entry.base == base)
            .map(|entry| entry.kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = D::Kind> + '_ {
        self.entries.iter().map(|entry| entry.kind)
    }

    /// Resolves a symbolic type name to a registered kind.
    pub fn parse_kind(&self, name: &str) -> Option<D::Kind> {
        name.parse::<D::Kind>()
            .ok()
            .filter(|kind| self.contains(*kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D: Domain> Default for ComponentRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Domain> fmt::Debug for ComponentRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}
