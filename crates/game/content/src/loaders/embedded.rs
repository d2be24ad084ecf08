//! Default content compiled into the crate.

use crate::loaders::{
    ConfigLoader, EnemyLoader, GameContent, ItemLoader, LoadResult, PlayerLoader, SkillLoader,
    StatusLoader,
};
use crate::spawn::EnemyFactory;
use combat_core::Registries;

pub const CONFIG: &str = include_str!("../../data/config.toml");
pub const STATUSES: &str = include_str!("../../data/statuses.ron");
pub const SKILLS: &str = include_str!("../../data/skills.ron");
pub const ITEMS: &str = include_str!("../../data/items.ron");
pub const ENEMIES: &str = include_str!("../../data/enemies.ron");
pub const PLAYER: &str = include_str!("../../data/player.ron");

/// `(file name, content)` pairs in the layout [`ContentFactory`] expects.
///
/// [`ContentFactory`]: crate::loaders::ContentFactory
pub const FILES: [(&str, &str); 6] = [
    ("config.toml", CONFIG),
    ("statuses.ron", STATUSES),
    ("skills.ron", SKILLS),
    ("items.ron", ITEMS),
    ("enemies.ron", ENEMIES),
    ("player.ron", PLAYER),
];

/// Parses and validates the built-in content.
pub fn load() -> LoadResult<GameContent> {
    let registries = Registries::new(
        StatusLoader::parse(STATUSES)?,
        SkillLoader::parse(SKILLS)?,
        ItemLoader::parse(ITEMS)?,
    );
    let catalog = EnemyLoader::parse(ENEMIES)?;
    let content = GameContent {
        config: ConfigLoader::parse(CONFIG)?,
        registries,
        enemies: EnemyFactory::new(catalog.enemies, catalog.spawn),
        player: PlayerLoader::parse(PLAYER)?,
    };
    content.validate()?;
    Ok(content)
}
