//! Skill levels for constructed crew (robots, operators).
//!
//! A [`TrainedSkill`] holds a base level plus speciality levels; a
//! [`SkillGroup`] answers level queries for any skill, falling back to an
//! untrained baseline raised by Jack-of-all-Trades.

use std::collections::BTreeMap;
use std::fmt;

/// A skill with a base level and speciality levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainedSkill<S> {
    skill: S,
    level: i32,
    specialities: BTreeMap<String, i32>,
}

impl<S: Copy> TrainedSkill<S> {
    pub fn new(skill: S, level: i32) -> Self {
        Self {
            skill,
            level,
            specialities: BTreeMap::new(),
        }
    }

    pub fn skill(&self) -> S {
        self.skill
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Sets the base level. With `keep_greatest`, a level that is not
    /// strictly higher than the current one is ignored.
    pub fn set_level(&mut self, level: i32, keep_greatest: bool) {
        if keep_greatest && level <= self.level {
            return;
        }
        self.level = level;
    }

    /// Sets a speciality level. Levels below 1 mean "not trained" and remove
    /// the speciality.
    pub fn set_speciality_level(&mut self, speciality: &str, level: i32, keep_greatest: bool) {
        if keep_greatest && self.speciality_level(speciality).is_some_and(|current| level <= current) {
            return;
        }
        if level < 1 {
            self.specialities.remove(speciality);
        } else {
            self.specialities.insert(speciality.to_string(), level);
        }
    }

    pub fn speciality_level(&self, speciality: &str) -> Option<i32> {
        self.specialities.get(speciality).copied()
    }

    pub fn has_speciality(&self, speciality: &str) -> bool {
        self.specialities.contains_key(speciality)
    }

    pub fn specialities(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.specialities
            .iter()
            .map(|(name, level)| (name.as_str(), *level))
    }
}

impl<S: fmt::Display> fmt::Display for TrainedSkill<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.skill, self.level)?;
        for (name, level) in &self.specialities {
            write!(f, ", {} ({name}) {level}", self.skill)?;
        }
        Ok(())
    }
}

/// All trained skills of one character or robot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillGroup<S: Ord> {
    skills: BTreeMap<S, TrainedSkill<S>>,
    jack_of_all_trades: Option<S>,
    untrained_level: i32,
}

impl<S: Copy + Ord> SkillGroup<S> {
    pub fn new(untrained_level: i32) -> Self {
        Self {
            skills: BTreeMap::new(),
            jack_of_all_trades: None,
            untrained_level,
        }
    }

    /// Designates the skill whose level offsets the untrained penalty.
    #[must_use]
    pub fn with_jack_of_all_trades(mut self, skill: S) -> Self {
        self.jack_of_all_trades = Some(skill);
        self
    }

    pub fn set_level(&mut self, skill: S, level: i32, keep_greatest: bool) {
        match self.skills.get_mut(&skill) {
            Some(trained) => trained.set_level(level, keep_greatest),
            None => {
                self.skills.insert(skill, TrainedSkill::new(skill, level));
            }
        }
    }

    pub fn set_speciality_level(
        &mut self,
        skill: S,
        speciality: &str,
        level: i32,
        keep_greatest: bool,
    ) {
        self.skills
            .entry(skill)
            .or_insert_with(|| TrainedSkill::new(skill, 0))
            .set_speciality_level(speciality, level, keep_greatest);
    }

    pub fn trained(&self, skill: S) -> Option<&TrainedSkill<S>> {
        self.skills.get(&skill)
    }

    pub fn has_skill(&self, skill: S) -> bool {
        self.skills.contains_key(&skill)
    }

    /// Effective level of `skill`.
    ///
    /// Untrained skills use the untrained baseline plus the
    /// Jack-of-all-Trades level, never exceeding 0.
    pub fn level(&self, skill: S) -> i32 {
        if let Some(trained) = self.skills.get(&skill) {
            return trained.level();
        }
        let jack = self
            .jack_of_all_trades
            .and_then(|jack| self.skills.get(&jack))
            .map_or(0, TrainedSkill::level);
        (self.untrained_level + jack).min(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainedSkill<S>> + '_ {
        self.skills.values()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    enum Skill {
        Gun,
        Recon,
        Jack,
    }

    #[test]
    fn keep_greatest() {
        let mut skill = TrainedSkill::new(Skill::Gun, 0);
        skill.set_level(3, false);
        skill.set_level(2, true);
        assert_eq!(skill.level(), 3);
        skill.set_level(2, false);
        assert_eq!(skill.level(), 2);
    }

    #[test]
    fn zero_speciality_is_removed() {
        let mut skill = TrainedSkill::new(Skill::Gun, 1);
        skill.set_speciality_level("Slug", 2, false);
        assert!(skill.has_speciality("Slug"));
        skill.set_speciality_level("Slug", 0, false);
        assert!(!skill.has_speciality("Slug"));
        assert_eq!(skill.speciality_level("Slug"), None);
    }

    #[test]
    fn untrained_level_uses_jack_of_all_trades() {
        let mut group = SkillGroup::new(-3).with_jack_of_all_trades(Skill::Jack);
        assert_eq!(group.level(Skill::Recon), -3);

        group.set_level(Skill::Jack, 1, false);
        assert_eq!(group.level(Skill::Recon), -2);

        group.set_level(Skill::Jack, 5, false);
        assert_eq!(group.level(Skill::Recon), 0);

        group.set_level(Skill::Recon, 2, true);
        assert_eq!(group.level(Skill::Recon), 2);
    }

    #[test]
    fn group_keep_greatest() {
        let mut group = SkillGroup::new(-3);
        group.set_level(Skill::Gun, 2, true);
        group.set_level(Skill::Gun, 1, true);
        assert_eq!(group.level(Skill::Gun), 2);
    }
}
