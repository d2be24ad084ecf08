//! Skill table loader.

use std::path::Path;

use combat_core::{Skill, SkillTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<Skill>,
}

/// Loader for skills from RON files.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<SkillTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses a skill catalog. Skills without a name are named after their id.
    pub fn parse(content: &str) -> LoadResult<SkillTable> {
        let catalog: SkillCatalog = parse_ron(content, "skill catalog")?;

        let mut table = SkillTable::new();
        for mut skill in catalog.skills {
            if skill.name.is_empty() {
                skill.name = skill.id.clone();
            }
            if let Some(cost) = skill.cost
                && cost < 0
            {
                anyhow::bail!("skill '{}' has negative cost {}", skill.id, cost);
            }
            table.insert(skill);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::SkillOracle;
    use combat_core::env::{ForcedAction, TargetKind};

    #[test]
    fn parses_locks_and_self_targets() {
        let table = SkillLoader::parse(
            r#"(skills: [
                (id: "brace", target: self, locks_actor: Some((label: "bracing", turns: 2, forced_action: Some(defend)))),
                (id: "jab", damage: Some((formula: flat(amount: 3))), hit_chance: 0.75),
            ])"#,
        )
        .unwrap();

        let brace = table.skill("brace").unwrap();
        assert_eq!(brace.name, "brace");
        assert_eq!(brace.target, TargetKind::Caster);
        let lock = brace.locks_actor.as_ref().unwrap();
        assert_eq!((lock.turns, lock.forced_action), (2, Some(ForcedAction::Defend)));

        let jab = table.skill("jab").unwrap();
        assert_eq!(jab.target, TargetKind::Enemy);
        assert_eq!(jab.hit_chance, 0.75);
        assert!(jab.requires_target_alive);
    }

    #[test]
    fn negative_cost_is_rejected() {
        let err = SkillLoader::parse(r#"(skills: [(id: "refund", cost: Some(-5))])"#).unwrap_err();
        assert!(err.to_string().contains("refund"));
    }
}
