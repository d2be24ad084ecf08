//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(0.0..=1.0).contains(&config.crit_threshold) {
            anyhow::bail!("crit_threshold {} outside [0, 1]", config.crit_threshold);
        }
        if config.flee.min > config.flee.max {
            anyhow::bail!(
                "flee.min {} is greater than flee.max {}",
                config.flee.min,
                config.flee.max
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("max_rounds = 12\n[regen]\non_defend = 20\n").unwrap();
        assert_eq!(config.max_rounds, Some(12));
        assert_eq!(config.regen.on_defend, 20);
        assert_eq!(config.regen.on_attack, 5);
        assert_eq!(config.crit_multiplier, 2);
        assert_eq!(config.defend_status, "defending");
    }

    #[test]
    fn rejects_inverted_flee_bounds() {
        let err = ConfigLoader::parse("[flee]\nmin = 0.9\nmax = 0.1\n").unwrap_err();
        assert!(err.to_string().contains("flee.min"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = ConfigLoader::parse("crit_threshold = \"high\"").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config TOML"));
    }
}
