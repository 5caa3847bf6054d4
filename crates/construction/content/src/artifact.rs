//! A named, annotated construction.

use std::sync::Arc;

use construction_core::{
    ComponentRegistry, ConstructionConfig, ConstructionContext, ConstructionError, Domain,
};

/// A construction context plus the user-facing name and notes.
#[derive(Clone, Debug)]
pub struct Artifact<D: Domain> {
    name: String,
    notes: String,
    context: ConstructionContext<D>,
}

impl<D: Domain> Artifact<D> {
    /// Creates an empty artifact with no sequences.
    pub fn new(
        name: impl Into<String>,
        registry: Arc<ComponentRegistry<D>>,
        settings: &ConstructionConfig,
    ) -> Result<Self, ConstructionError> {
        Ok(Self {
            name: name.into(),
            notes: String::new(),
            context: ConstructionContext::new(registry, settings)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn context(&self) -> &ConstructionContext<D> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ConstructionContext<D> {
        &mut self.context
    }
}

#[cfg(feature = "serde")]
mod document {
    use std::sync::Arc;

    use construction_core::serialise::{parse_rules, rule_names};
    use construction_core::{
        ComponentRegistry, ConstructionConfig, Domain, SerialisationError, SerialisedComponents,
    };
    use serde::{Deserialize, Serialize};

    use super::Artifact;

    /// JSON form of a whole artifact.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ArtifactDocument {
        /// [`Domain::NAME`] of the writer; empty in untagged documents.
        #[serde(default)]
        pub domain: String,
        pub name: String,
        pub tech_level: u32,
        #[serde(default)]
        pub rules: Vec<String>,
        #[serde(default)]
        pub components: SerialisedComponents,
        #[serde(default)]
        pub notes: String,
    }

    impl<D: Domain> Artifact<D> {
        pub fn to_document(&self) -> ArtifactDocument {
            ArtifactDocument {
                domain: D::NAME.to_string(),
                name: self.name.clone(),
                tech_level: self.context.tech_level(),
                rules: rule_names::<D>(self.context.rules()),
                components: self.context.serialise_components(),
                notes: self.notes.clone(),
            }
        }

        /// Rebuilds an artifact: tech level and rules first, then components.
        ///
        /// A document tagged with another domain is rejected; an untagged one
        /// is accepted if its contents fit.
        pub fn from_document(
            document: &ArtifactDocument,
            registry: Arc<ComponentRegistry<D>>,
            settings: &ConstructionConfig,
        ) -> Result<Self, SerialisationError> {
            if !document.domain.is_empty() && document.domain != D::NAME {
                return Err(SerialisationError::WrongDomain {
                    expected: D::NAME,
                    found: document.domain.clone(),
                });
            }
            let mut artifact = Self::new(document.name.clone(), registry, settings)?;
            artifact.context.set_tech_level(document.tech_level)?;
            artifact
                .context
                .set_rules(parse_rules::<D>(&document.rules)?)?;
            artifact.context.load_components(&document.components)?;
            artifact.notes = document.notes.clone();

            tracing::debug!(
                "loaded {} '{}' at TL{}",
                D::NAME,
                artifact.name,
                artifact.context.tech_level()
            );
            Ok(artifact)
        }

        pub fn to_json(&self) -> Result<String, SerialisationError> {
            Ok(serde_json::to_string_pretty(&self.to_document())?)
        }

        pub fn from_json(
            json: &str,
            registry: Arc<ComponentRegistry<D>>,
            settings: &ConstructionConfig,
        ) -> Result<Self, SerialisationError> {
            let document: ArtifactDocument = serde_json::from_str(json)?;
            Self::from_document(&document, registry, settings)
        }
    }
}

#[cfg(feature = "serde")]
pub use document::ArtifactDocument;
