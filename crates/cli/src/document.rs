//! Loading documents of either domain.

use std::path::Path;

use anyhow::{Context, Result};
use construction_content::loaders::DocumentLoader;
use construction_content::{ArtifactDocument, Robot, RobotDomain, Weapon, WeaponDomain, robot, weapon};
use construction_core::{ConstructionConfig, Domain};

/// Which domain a document belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ArtifactKind {
    Weapon,
    Robot,
}

/// A document rebuilt into its domain's artifact.
pub enum LoadedArtifact {
    Weapon(Weapon),
    Robot(Robot),
}

impl ArtifactKind {
    /// The kind named by a document's domain tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag == WeaponDomain::NAME {
            Some(Self::Weapon)
        } else if tag == RobotDomain::NAME {
            Some(Self::Robot)
        } else {
            None
        }
    }
}

impl LoadedArtifact {
    /// Reads `path` and rebuilds it.
    ///
    /// Without an explicit `kind` the document's domain tag decides. Untagged
    /// documents are tried as a weapon first, then as a robot.
    pub fn load(
        path: &Path,
        kind: Option<ArtifactKind>,
        settings: &ConstructionConfig,
    ) -> Result<Self> {
        let document = DocumentLoader::load(path)?;
        let context = || format!("failed to rebuild {}", path.display());
        let kind = match kind {
            Some(kind) => Some(kind),
            None if document.domain.is_empty() => None,
            None => Some(ArtifactKind::from_tag(&document.domain).with_context(|| {
                format!("{} has unknown domain '{}'", path.display(), document.domain)
            })?),
        };
        match kind {
            Some(ArtifactKind::Weapon) => Ok(Self::Weapon(
                as_weapon(&document, settings).with_context(context)?,
            )),
            Some(ArtifactKind::Robot) => Ok(Self::Robot(
                as_robot(&document, settings).with_context(context)?,
            )),
            None => match as_weapon(&document, settings) {
                Ok(weapon) => Ok(Self::Weapon(weapon)),
                Err(weapon_error) => {
                    tracing::debug!("not a weapon document: {weapon_error}");
                    as_robot(&document, settings)
                        .map(Self::Robot)
                        .with_context(|| {
                            format!("{} is neither a weapon nor a robot", path.display())
                        })
                }
            },
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Weapon(_) => ArtifactKind::Weapon,
            Self::Robot(_) => ArtifactKind::Robot,
        }
    }
}

fn as_weapon(document: &ArtifactDocument, settings: &ConstructionConfig) -> Result<Weapon> {
    Ok(Weapon::from_document(document, weapon::registry(), settings)?)
}

fn as_robot(document: &ArtifactDocument, settings: &ConstructionConfig) -> Result<Robot> {
    Ok(Robot::from_document(document, robot::registry(), settings)?)
}
