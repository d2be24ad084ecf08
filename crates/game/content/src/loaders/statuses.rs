//! Status registry loader.

use std::path::Path;

use combat_core::{StatusRule, StatusTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Status catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalog {
    pub statuses: Vec<StatusRule>,
}

/// Loader for the status registry from RON files.
pub struct StatusLoader;

impl StatusLoader {
    pub fn load(path: &Path) -> LoadResult<StatusTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses and validates a status catalog. Duplicate ids are rejected.
    pub fn parse(content: &str) -> LoadResult<StatusTable> {
        let catalog: StatusCatalog = parse_ron(content, "status catalog")?;

        let mut table = StatusTable::new();
        for rule in catalog.statuses {
            if table.contains(&rule.id) {
                anyhow::bail!("duplicate status '{}'", rule.id);
            }
            table.insert(rule)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::StatusOracle;
    use combat_core::env::{StackPolicy, TickRule};

    #[test]
    fn parses_rules_with_defaults() {
        let table = StatusLoader::parse(
            r#"(statuses: [
                (id: "poison", stacking: stack, max_stacks: Some(4), on_tick: Some(damage(scale: 1.0))),
                (id: "stun", prevents_action: true),
            ])"#,
        )
        .unwrap();

        let poison = table.rule("poison").unwrap();
        assert_eq!(poison.stacking, StackPolicy::Stack);
        assert_eq!(poison.stack_cap(), 4);
        assert_eq!(poison.on_tick, Some(TickRule::Damage { scale: 1.0 }));
        assert_eq!(poison.default_duration, StatusRule::DEFAULT_DURATION);

        let stun = table.rule("stun").unwrap();
        assert!(stun.prevents_action);
        assert_eq!(stun.default_chance, 1.0);
    }

    #[test]
    fn stack_without_cap_is_rejected() {
        let err = StatusLoader::parse(r#"(statuses: [(id: "bleed", stacking: stack)])"#).unwrap_err();
        assert!(err.to_string().contains("bleed"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = StatusLoader::parse(r#"(statuses: [(id: "stun"), (id: "stun")])"#).unwrap_err();
        assert!(err.to_string().contains("duplicate status 'stun'"));
    }
}
