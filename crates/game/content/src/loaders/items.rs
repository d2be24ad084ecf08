//! Item catalog loader.

use std::path::Path;

use combat_core::{ItemDefinition, ItemTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ItemTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ItemTable> {
        let catalog: ItemCatalog = parse_ron(content, "item catalog")?;

        let mut table = ItemTable::new();
        for mut item in catalog.items {
            if item.name.is_empty() {
                item.name = item.id.clone();
            }
            table.insert(item);
        }
        Ok(table)
    }
}
