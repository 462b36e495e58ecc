//! In-memory content catalog implementing the game-core oracle traits.

use game_core::catalog::{
    CardDefinition, CardId, CardOracle, CardRarity, CardTheme, CatalogError, Durability,
    Element, EnemyOracle, EnemyTemplate, EnergyCost, ModifierCategory, ModifierDefinition,
    ModifierId, ModifierOracle, RoomDefinition, RoomId, RoomKind, RoomOracle,
};
use game_core::combat::{AtomicEffect, Intent, PowerId, TargetShape};

/// All loaded content, consulted through the oracle traits.
///
/// Definitions keep their insertion order; `rooms_of_kind` and the pool
/// builders rely on that order being stable across runs of the same data.
#[derive(Debug, Default)]
pub struct Catalog {
    rooms: Vec<RoomDefinition>,
    cards: Vec<CardDefinition>,
    enemies: Vec<EnemyTemplate>,
    modifiers: Vec<ModifierDefinition>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&mut self, room: RoomDefinition) {
        self.rooms.push(room);
    }

    pub fn add_card(&mut self, card: CardDefinition) {
        self.cards.push(card);
    }

    pub fn add_enemy(&mut self, enemy: EnemyTemplate) {
        self.enemies.push(enemy);
    }

    pub fn add_modifier(&mut self, modifier: ModifierDefinition) {
        self.modifiers.push(modifier);
    }

    pub fn rooms(&self) -> &[RoomDefinition] {
        &self.rooms
    }

    pub fn cards(&self) -> &[CardDefinition] {
        &self.cards
    }

    /// The starter deck every new run begins with.
    pub fn starter_deck(&self) -> Vec<(CardId, bool)> {
        let mut deck = Vec::new();
        for _ in 0..5 {
            deck.push((CardId::new("strike"), false));
        }
        for _ in 0..4 {
            deck.push((CardId::new("defend"), false));
        }
        deck.push((CardId::new("bash"), false));
        deck
    }

    /// The built-in starter catalog used by demos and tests.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        builtin::rooms(&mut catalog);
        builtin::cards(&mut catalog);
        builtin::enemies(&mut catalog);
        builtin::modifiers(&mut catalog);
        catalog
    }
}

impl RoomOracle for Catalog {
    fn room(&self, id: &RoomId) -> Result<&RoomDefinition, CatalogError> {
        self.rooms
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| CatalogError::UnknownRoom(id.clone()))
    }

    fn rooms_of_kind(&self, kind: RoomKind) -> Vec<&RoomDefinition> {
        self.rooms.iter().filter(|r| r.kind == kind).collect()
    }
}

impl CardOracle for Catalog {
    fn card(&self, id: &CardId) -> Result<&CardDefinition, CatalogError> {
        self.cards
            .iter()
            .find(|c| &c.id == id)
            .ok_or_else(|| CatalogError::UnknownCard(id.clone()))
    }
}

impl EnemyOracle for Catalog {
    fn enemy(&self, id: &CardId) -> Result<&EnemyTemplate, CatalogError> {
        self.enemies
            .iter()
            .find(|e| &e.card_id == id)
            .ok_or_else(|| CatalogError::UnknownEnemy(id.clone()))
    }
}

impl ModifierOracle for Catalog {
    fn modifier(&self, id: &ModifierId) -> Result<&ModifierDefinition, CatalogError> {
        self.modifiers
            .iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| CatalogError::UnknownModifier(id.clone()))
    }
}

mod builtin {
    use super::*;

    fn room(id: &str, kind: RoomKind, monsters: &[&str]) -> RoomDefinition {
        RoomDefinition {
            id: RoomId::new(id),
            kind,
            monsters: monsters.iter().map(|m| CardId::new(*m)).collect(),
        }
    }

    pub(super) fn rooms(catalog: &mut Catalog) {
        catalog.add_room(room("rat_warren", RoomKind::Combat, &["rat", "rat"]));
        catalog.add_room(room("cultist_shrine", RoomKind::Combat, &["cultist"]));
        catalog.add_room(room("worm_tunnel", RoomKind::Combat, &["maw_worm"]));
        catalog.add_room(room(
            "mixed_patrol",
            RoomKind::Combat,
            &["rat", "cultist"],
        ));
        catalog.add_room(room("spore_grove", RoomKind::Combat, &["fungal_husk"]));
        catalog.add_room(room("bone_pit", RoomKind::Combat, &["rat", "maw_worm"]));
        catalog.add_room(room(
            "husk_cellar",
            RoomKind::Combat,
            &["fungal_husk", "rat"],
        ));
        catalog.add_room(room("sentinel_gate", RoomKind::Elite, &["iron_sentinel"]));
        catalog.add_room(room(
            "twin_shrine",
            RoomKind::Elite,
            &["cultist", "cultist"],
        ));
        catalog.add_room(room("ember_hearth", RoomKind::Campfire, &[]));
        catalog.add_room(room("cold_spring", RoomKind::Campfire, &[]));
        catalog.add_room(room("gilded_cache", RoomKind::Treasure, &[]));
        catalog.add_room(room("sunken_vault", RoomKind::Treasure, &[]));
        catalog.add_room(room("hollow_king_throne", RoomKind::Boss, &["hollow_king"]));
    }

    struct CardSpec {
        id: &'static str,
        name: &'static str,
        cost: EnergyCost,
        theme: CardTheme,
        rarity: CardRarity,
        element: Option<Element>,
        target: TargetShape,
        effects: Vec<AtomicEffect>,
        upgrades_to: Option<&'static str>,
        ethereal: bool,
    }

    impl CardSpec {
        fn build(self) -> CardDefinition {
            CardDefinition {
                id: CardId::new(self.id),
                name: self.name.to_string(),
                cost: self.cost,
                theme: self.theme,
                rarity: self.rarity,
                element: self.element,
                target: self.target,
                effects: self.effects,
                upgrades_to: self.upgrades_to.map(CardId::new),
                ethereal: self.ethereal,
                tags: Vec::new(),
            }
        }
    }

    pub(super) fn cards(catalog: &mut Catalog) {
        let attack = |id, name, cost, effects| CardSpec {
            id,
            name,
            cost: EnergyCost::Fixed(cost),
            theme: CardTheme::Attack,
            rarity: CardRarity::Common,
            element: None,
            target: TargetShape::Enemy,
            effects,
            upgrades_to: None,
            ethereal: false,
        };
        let skill = |id, name, cost, effects| CardSpec {
            id,
            name,
            cost: EnergyCost::Fixed(cost),
            theme: CardTheme::Skill,
            rarity: CardRarity::Common,
            element: None,
            target: TargetShape::SelfOnly,
            effects,
            upgrades_to: None,
            ethereal: false,
        };

        catalog.add_card(
            CardSpec {
                upgrades_to: Some("strike_plus"),
                ..attack(
                    "strike",
                    "Strike",
                    1,
                    vec![AtomicEffect::Damage { amount: 6 }],
                )
            }
            .build(),
        );
        catalog.add_card(
            attack(
                "strike_plus",
                "Strike+",
                1,
                vec![AtomicEffect::Damage { amount: 9 }],
            )
            .build(),
        );
        catalog.add_card(
            CardSpec {
                upgrades_to: Some("defend_plus"),
                ..skill(
                    "defend",
                    "Defend",
                    1,
                    vec![AtomicEffect::Block { amount: 5 }],
                )
            }
            .build(),
        );
        catalog.add_card(
            skill(
                "defend_plus",
                "Defend+",
                1,
                vec![AtomicEffect::Block { amount: 8 }],
            )
            .build(),
        );
        catalog.add_card(
            attack(
                "bash",
                "Bash",
                2,
                vec![
                    AtomicEffect::Damage { amount: 8 },
                    AtomicEffect::ApplyPower {
                        power: PowerId::Vulnerable,
                        stacks: 2,
                        duration: Some(2),
                    },
                ],
            )
            .build(),
        );
        catalog.add_card(
            attack(
                "pommel_strike",
                "Pommel Strike",
                1,
                vec![
                    AtomicEffect::Damage { amount: 5 },
                    AtomicEffect::Draw { count: 1 },
                ],
            )
            .build(),
        );
        catalog.add_card(
            CardSpec {
                target: TargetShape::AllEnemies,
                rarity: CardRarity::Uncommon,
                element: Some(Element::Storm),
                ..attack(
                    "cleave",
                    "Cleave",
                    1,
                    vec![AtomicEffect::Damage { amount: 4 }],
                )
            }
            .build(),
        );
        catalog.add_card(
            CardSpec {
                id: "tempest",
                name: "Tempest",
                cost: EnergyCost::X,
                theme: CardTheme::Attack,
                rarity: CardRarity::Rare,
                element: Some(Element::Storm),
                target: TargetShape::AllEnemies,
                effects: vec![AtomicEffect::Damage { amount: 4 }],
                upgrades_to: None,
                ethereal: false,
            }
            .build(),
        );
        catalog.add_card(
            CardSpec {
                rarity: CardRarity::Uncommon,
                ..skill(
                    "second_wind",
                    "Second Wind",
                    1,
                    vec![
                        AtomicEffect::Heal { amount: 4 },
                        AtomicEffect::Exhaust,
                    ],
                )
            }
            .build(),
        );
        catalog.add_card(
            CardSpec {
                ethereal: true,
                element: Some(Element::Void),
                rarity: CardRarity::Uncommon,
                ..skill(
                    "ghost_armor",
                    "Ghost Armor",
                    1,
                    vec![AtomicEffect::Block { amount: 10 }],
                )
            }
            .build(),
        );
        catalog.add_card(
            CardSpec {
                rarity: CardRarity::Rare,
                ..skill(
                    "adrenaline",
                    "Adrenaline",
                    0,
                    vec![
                        AtomicEffect::GainEnergy { amount: 1 },
                        AtomicEffect::Draw { count: 2 },
                        AtomicEffect::Exhaust,
                    ],
                )
            }
            .build(),
        );
        catalog.add_card(
            CardSpec {
                rarity: CardRarity::Uncommon,
                ..skill(
                    "bristle",
                    "Bristle",
                    1,
                    vec![AtomicEffect::ApplyPower {
                        power: PowerId::Thorns,
                        stacks: 3,
                        duration: None,
                    }],
                )
            }
            .build(),
        );
    }

    pub(super) fn enemies(catalog: &mut Catalog) {
        catalog.add_enemy(EnemyTemplate {
            card_id: CardId::new("rat"),
            name: "Gutter Rat".into(),
            max_health: 12,
            pattern: vec![
                Intent::Attack { damage: 4 },
                Intent::Attack { damage: 4 },
                Intent::Defend { block: 3 },
            ],
        });
        catalog.add_enemy(EnemyTemplate {
            card_id: CardId::new("cultist"),
            name: "Cultist".into(),
            max_health: 22,
            pattern: vec![
                Intent::Buff {
                    power: PowerId::Ritual,
                    stacks: 2,
                },
                Intent::Attack { damage: 3 },
            ],
        });
        catalog.add_enemy(EnemyTemplate {
            card_id: CardId::new("maw_worm"),
            name: "Maw Worm".into(),
            max_health: 18,
            pattern: vec![
                Intent::Attack { damage: 7 },
                Intent::Defend { block: 5 },
            ],
        });
        catalog.add_enemy(EnemyTemplate {
            card_id: CardId::new("fungal_husk"),
            name: "Fungal Husk".into(),
            max_health: 16,
            pattern: vec![
                Intent::Buff {
                    power: PowerId::Thorns,
                    stacks: 2,
                },
                Intent::Attack { damage: 5 },
            ],
        });
        catalog.add_enemy(EnemyTemplate {
            card_id: CardId::new("iron_sentinel"),
            name: "Iron Sentinel".into(),
            max_health: 42,
            pattern: vec![
                Intent::Defend { block: 8 },
                Intent::Attack { damage: 9 },
                Intent::Buff {
                    power: PowerId::Strength,
                    stacks: 1,
                },
            ],
        });
        catalog.add_enemy(EnemyTemplate {
            card_id: CardId::new("hollow_king"),
            name: "The Hollow King".into(),
            max_health: 80,
            pattern: vec![
                Intent::Attack { damage: 10 },
                Intent::Buff {
                    power: PowerId::Strength,
                    stacks: 2,
                },
                Intent::Attack { damage: 6 },
                Intent::Defend { block: 10 },
            ],
        });
    }

    pub(super) fn modifiers(catalog: &mut Catalog) {
        catalog.add_modifier(ModifierDefinition {
            id: ModifierId::new("ember_sigil"),
            category: ModifierCategory::Catalyst,
            rarity: CardRarity::Common,
            danger_value: 4,
            reward_value: 5,
            durability: Durability::Permanent,
        });
        catalog.add_modifier(ModifierDefinition {
            id: ModifierId::new("black_omen"),
            category: ModifierCategory::Omen,
            rarity: CardRarity::Uncommon,
            danger_value: 8,
            reward_value: 12,
            durability: Durability::Fragile { uses: 3 },
        });
        catalog.add_modifier(ModifierDefinition {
            id: ModifierId::new("kings_edict"),
            category: ModifierCategory::Edict,
            rarity: CardRarity::Rare,
            danger_value: 10,
            reward_value: 10,
            durability: Durability::Permanent,
        });
        catalog.add_modifier(ModifierDefinition {
            id: ModifierId::new("wax_seal"),
            category: ModifierCategory::Seal,
            rarity: CardRarity::Common,
            danger_value: 2,
            reward_value: 2,
            durability: Durability::Consumable,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_internally_consistent() {
        let catalog = Catalog::builtin();

        // Every monster referenced by a room has a template.
        for room in catalog.rooms() {
            for monster in &room.monsters {
                catalog.enemy(monster).unwrap();
            }
        }
        // Every upgrade target exists.
        for card in catalog.cards() {
            if let Some(upgrade) = &card.upgrades_to {
                catalog.card(upgrade).unwrap();
            }
        }
        // Every starter deck entry exists.
        for (id, _) in catalog.starter_deck() {
            catalog.card(&id).unwrap();
        }
    }

    #[test]
    fn builtin_catalog_covers_the_template_composition() {
        let catalog = Catalog::builtin();
        assert!(catalog.rooms_of_kind(RoomKind::Combat).len() >= 7);
        assert!(catalog.rooms_of_kind(RoomKind::Elite).len() >= 2);
        assert!(catalog.rooms_of_kind(RoomKind::Campfire).len() >= 2);
        assert!(catalog.rooms_of_kind(RoomKind::Treasure).len() >= 2);
        assert_eq!(catalog.rooms_of_kind(RoomKind::Boss).len(), 1);
    }

    #[test]
    fn unknown_ids_fail_with_catalog_errors() {
        let catalog = Catalog::builtin();
        assert!(matches!(
            catalog.room(&RoomId::new("nope")),
            Err(CatalogError::UnknownRoom(_))
        ));
        assert!(matches!(
            catalog.card(&CardId::new("nope")),
            Err(CatalogError::UnknownCard(_))
        ));
        assert!(matches!(
            catalog.enemy(&CardId::new("nope")),
            Err(CatalogError::UnknownEnemy(_))
        ));
        assert!(matches!(
            catalog.modifier(&ModifierId::new("nope")),
            Err(CatalogError::UnknownModifier(_))
        ));
    }
}
