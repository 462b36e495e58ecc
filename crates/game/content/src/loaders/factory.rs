//! Content factory for building the catalog from data files.

use std::path::{Path, PathBuf};

use game_core::GameConfig;

use crate::Catalog;
use crate::loaders::{
    CardLoader, ConfigLoader, EnemyLoader, LoadResult, ModifierLoader, RoomLoader,
};

/// Loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── rooms.ron
/// ├── cards.ron
/// ├── enemies.ron
/// └── modifiers.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the full catalog from the data directory.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let mut catalog = Catalog::new();
        for room in RoomLoader::load(&self.data_dir.join("rooms.ron"))? {
            catalog.add_room(room);
        }
        for card in CardLoader::load(&self.data_dir.join("cards.ron"))? {
            catalog.add_card(card);
        }
        for enemy in EnemyLoader::load(&self.data_dir.join("enemies.ron"))? {
            catalog.add_enemy(enemy);
        }
        for modifier in ModifierLoader::load(&self.data_dir.join("modifiers.ron"))? {
            catalog.add_modifier(modifier);
        }
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{CardOracle, EnemyOracle, ModifierOracle, RoomOracle};

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_a_full_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "hand_size = 4\nstarting_health = 50\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("rooms.ron"),
            r#"(rooms: [
                (id: "rat_warren", kind: Combat, monsters: ["rat"]),
                (id: "ember_hearth", kind: Campfire),
            ])"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("cards.ron"),
            r#"(cards: [
                (
                    id: "strike",
                    name: "Strike",
                    cost: Fixed(1),
                    theme: Attack,
                    rarity: Common,
                    target: Enemy,
                    effects: [Damage(amount: 6)],
                ),
            ])"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("enemies.ron"),
            r#"(enemies: [
                (
                    card_id: "rat",
                    name: "Gutter Rat",
                    max_health: 12,
                    pattern: [Attack(damage: 4)],
                ),
            ])"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("modifiers.ron"),
            r#"(modifiers: [
                (
                    id: "wax_seal",
                    category: Seal,
                    rarity: Common,
                    danger_value: 2,
                    reward_value: 2,
                    durability: Consumable,
                ),
            ])"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());

        let config = factory.load_config().unwrap();
        assert_eq!(config.hand_size, 4);
        assert_eq!(config.starting_health, 50);
        // Unspecified fields fall back to the defaults.
        assert_eq!(config.base_energy, GameConfig::DEFAULT_BASE_ENERGY);

        let catalog = factory.load_catalog().unwrap();
        let room = catalog.room(&"rat_warren".into()).unwrap();
        assert_eq!(room.monsters, vec!["rat".into()]);
        assert!(catalog.room(&"ember_hearth".into()).unwrap().monsters.is_empty());
        assert_eq!(catalog.card(&"strike".into()).unwrap().name, "Strike");
        assert_eq!(catalog.enemy(&"rat".into()).unwrap().max_health, 12);
        catalog.modifier(&"wax_seal".into()).unwrap();
    }

    #[test]
    fn nonsense_config_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "hand_size = 0\n").unwrap();
        let err = ContentFactory::new(dir.path()).load_config().unwrap_err();
        assert!(err.to_string().contains("hand_size"));
    }
}
