/// Engine-wide tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConstructionConfig {
    /// Tech level a new construction starts at.
    pub default_tech_level: u32,
    pub min_tech_level: u32,
    pub max_tech_level: u32,
    /// Skill level used for skills with no training at all.
    pub untrained_skill_level: i32,
}

impl ConstructionConfig {
    pub const DEFAULT_TECH_LEVEL: u32 = 12;
    pub const MIN_TECH_LEVEL: u32 = 0;
    pub const MAX_TECH_LEVEL: u32 = 25;
    pub const UNTRAINED_SKILL_LEVEL: i32 = -3;

    pub fn new() -> Self {
        Self {
            default_tech_level: Self::DEFAULT_TECH_LEVEL,
            min_tech_level: Self::MIN_TECH_LEVEL,
            max_tech_level: Self::MAX_TECH_LEVEL,
            untrained_skill_level: Self::UNTRAINED_SKILL_LEVEL,
        }
    }

    pub fn contains_tech_level(&self, tech_level: u32) -> bool {
        (self.min_tech_level..=self.max_tech_level).contains(&tech_level)
    }
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self::new()
    }
}
