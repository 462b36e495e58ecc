//! Dungeon deck construction.
//!
//! Two modes produce a [`DungeonDeck`]:
//! - **Template**: fixed counts per room kind, filled by cycling each kind's
//!   definition pool, then uniformly shuffled (boss excluded).
//! - **Definition**: an externally supplied ordered room list, mapped to
//!   concrete content ids and preserving enemy overrides.
//!
//! In both modes the boss card ends up at index 0, never shuffled.

use crate::catalog::{CatalogError, RoomDefinition, RoomId, RoomKind, RoomOracle};
use crate::config::GameConfig;
use crate::error::{EngineError, ErrorSeverity};
use crate::rng::{DeckRng, fisher_yates};

use super::{DungeonDeck, RoomCard, RoomUid};

/// Content-configuration failure while building a deck.
///
/// These are fatal at build time: they mean the shipped content is corrupted
/// or incomplete, not that a retry could succeed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeckBuildError {
    #[error("no room definitions available for required kind `{kind}`")]
    EmptyPool { kind: RoomKind },

    #[error("room `{id}` has kind `{actual}`, expected `{expected}`")]
    KindMismatch {
        id: RoomId,
        expected: RoomKind,
        actual: RoomKind,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl EngineError for DeckBuildError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}

/// One abstract room in an externally supplied deck definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonRoom {
    pub kind: RoomKind,
    /// Explicit content id. When absent, a definition of the matching kind
    /// is picked from the pool.
    #[cfg_attr(feature = "serde", serde(default))]
    pub room_id: Option<RoomId>,
    /// Enemy substitution for combat rooms.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemy_card_ids: Option<Vec<crate::catalog::CardId>>,
}

/// Externally supplied deck: rooms listed in intended play order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonDeckDefinition {
    pub rooms: Vec<DungeonRoom>,
}

/// Builds [`DungeonDeck`]s from the content catalog.
pub struct DungeonDeckBuilder<'a> {
    rooms: &'a dyn RoomOracle,
    next_uid: u64,
}

impl<'a> DungeonDeckBuilder<'a> {
    pub fn new(rooms: &'a dyn RoomOracle) -> Self {
        Self {
            rooms,
            next_uid: 0,
        }
    }

    fn fresh_card(&mut self, definition: &RoomDefinition) -> RoomCard {
        let uid = RoomUid(self.next_uid);
        self.next_uid += 1;
        RoomCard {
            uid,
            definition_id: definition.id.clone(),
            kind: definition.kind,
            revealed: false,
            enemy_card_ids: None,
        }
    }

    /// Build a deck from the built-in template composition.
    ///
    /// Counts come from [`GameConfig`] template constants. Each kind's pool
    /// is cycled (`pool[i % len]`) to fill its count; non-boss cards are
    /// uniformly shuffled, then the boss is unshifted to index 0 so it is
    /// always the last card drawn.
    pub fn from_template(
        mut self,
        rng: &mut dyn DeckRng,
    ) -> Result<DungeonDeck, DeckBuildError> {
        let composition = [
            (RoomKind::Combat, GameConfig::TEMPLATE_COMBAT_ROOMS),
            (RoomKind::Elite, GameConfig::TEMPLATE_ELITE_ROOMS),
            (RoomKind::Campfire, GameConfig::TEMPLATE_CAMPFIRE_ROOMS),
            (RoomKind::Treasure, GameConfig::TEMPLATE_TREASURE_ROOMS),
        ];

        let mut cards = Vec::new();
        for (kind, count) in composition {
            let pool = self.pool(kind)?;
            for i in 0..count {
                let definition = pool[i % pool.len()].clone();
                cards.push(self.fresh_card(&definition));
            }
        }

        fisher_yates(rng, &mut cards);

        // Bosses go in front after the shuffle, never shuffled themselves.
        let boss_pool = self.pool(RoomKind::Boss)?;
        let mut deck = Vec::with_capacity(GameConfig::TEMPLATE_BOSS_ROOMS + cards.len());
        for i in 0..GameConfig::TEMPLATE_BOSS_ROOMS {
            let definition = boss_pool[i % boss_pool.len()].clone();
            deck.push(self.fresh_card(&definition));
        }
        deck.extend(cards);

        Ok(DungeonDeck::from_cards(deck))
    }

    /// Build a deck from an externally supplied definition.
    ///
    /// Rooms are listed in intended play order; the deck is stacked so the
    /// first listed room is drawn first. A boss room, wherever listed, is
    /// still pinned to index 0 to preserve the boss-last invariant.
    pub fn from_definition(
        mut self,
        definition: &DungeonDeckDefinition,
        rng: &mut dyn DeckRng,
    ) -> Result<DungeonDeck, DeckBuildError> {
        let mut cards = Vec::with_capacity(definition.rooms.len());
        for room in &definition.rooms {
            let concrete = match &room.room_id {
                Some(id) => {
                    let found = self.rooms.room(id)?;
                    if found.kind != room.kind {
                        return Err(DeckBuildError::KindMismatch {
                            id: id.clone(),
                            expected: room.kind,
                            actual: found.kind,
                        });
                    }
                    found.clone()
                }
                None => {
                    let pool = self.pool(room.kind)?;
                    pool[rng.index(pool.len())].clone()
                }
            };
            let mut card = self.fresh_card(&concrete);
            card.enemy_card_ids = room.enemy_card_ids.clone();
            cards.push(card);
        }

        // Stack tail-first so listed play order matches draw order.
        cards.reverse();

        // Pin the boss (if the definition has one) to the bottom.
        if let Some(pos) = cards.iter().position(|c| c.kind == RoomKind::Boss)
            && pos != 0
        {
            let boss = cards.remove(pos);
            cards.insert(0, boss);
        }

        Ok(DungeonDeck::from_cards(cards))
    }

    fn pool(&self, kind: RoomKind) -> Result<Vec<RoomDefinition>, DeckBuildError> {
        let pool: Vec<RoomDefinition> = self
            .rooms
            .rooms_of_kind(kind)
            .into_iter()
            .cloned()
            .collect();
        if pool.is_empty() {
            return Err(DeckBuildError::EmptyPool { kind });
        }
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CardId;
    use crate::rng::PcgRng;
    use std::collections::HashMap;

    struct TestRooms {
        by_id: HashMap<RoomId, RoomDefinition>,
        order: Vec<RoomId>,
    }

    impl TestRooms {
        fn standard() -> Self {
            let defs = vec![
                room("fight-rats", RoomKind::Combat, &["rat"]),
                room("fight-cult", RoomKind::Combat, &["cultist"]),
                room("elite-knight", RoomKind::Elite, &["knight"]),
                room("rest-spring", RoomKind::Campfire, &[]),
                room("gilded-chest", RoomKind::Treasure, &[]),
                room("boss-heart", RoomKind::Boss, &["heart"]),
            ];
            let order = defs.iter().map(|d| d.id.clone()).collect();
            let by_id = defs.into_iter().map(|d| (d.id.clone(), d)).collect();
            Self { by_id, order }
        }
    }

    fn room(id: &str, kind: RoomKind, monsters: &[&str]) -> RoomDefinition {
        RoomDefinition {
            id: RoomId::new(id),
            kind,
            monsters: monsters.iter().map(|m| CardId::new(*m)).collect(),
        }
    }

    impl RoomOracle for TestRooms {
        fn room(&self, id: &RoomId) -> Result<&RoomDefinition, CatalogError> {
            self.by_id
                .get(id)
                .ok_or_else(|| CatalogError::UnknownRoom(id.clone()))
        }

        fn rooms_of_kind(&self, kind: RoomKind) -> Vec<&RoomDefinition> {
            self.order
                .iter()
                .filter_map(|id| self.by_id.get(id))
                .filter(|d| d.kind == kind)
                .collect()
        }
    }

    #[test]
    fn template_deck_has_fixed_composition() {
        let rooms = TestRooms::standard();
        let deck = DungeonDeckBuilder::new(&rooms)
            .from_template(&mut PcgRng::seeded(3))
            .unwrap();

        assert_eq!(deck.len(), 14);
        let count = |kind| deck.cards().iter().filter(|c| c.kind == kind).count();
        assert_eq!(count(RoomKind::Combat), 7);
        assert_eq!(count(RoomKind::Elite), 2);
        assert_eq!(count(RoomKind::Campfire), 2);
        assert_eq!(count(RoomKind::Treasure), 2);
        assert_eq!(count(RoomKind::Boss), 1);
    }

    #[test]
    fn boss_sits_at_index_zero_for_any_seed() {
        let rooms = TestRooms::standard();
        for seed in 0..25 {
            let deck = DungeonDeckBuilder::new(&rooms)
                .from_template(&mut PcgRng::seeded(seed))
                .unwrap();
            assert_eq!(deck.cards()[0].kind, RoomKind::Boss, "seed {seed}");
        }
    }

    #[test]
    fn boss_is_last_room_drawn_regardless_of_seed() {
        let rooms = TestRooms::standard();
        for seed in 0..10 {
            let mut deck = DungeonDeckBuilder::new(&rooms)
                .from_template(&mut PcgRng::seeded(seed))
                .unwrap();
            let mut last = None;
            while !deck.is_empty() {
                let drawn = deck.draw(3);
                last = drawn.choices.last().cloned();
                deck = drawn.remaining;
            }
            assert_eq!(last.map(|c| c.kind), Some(RoomKind::Boss), "seed {seed}");
        }
    }

    #[test]
    fn empty_pool_is_a_fatal_build_error() {
        struct NoElites(TestRooms);
        impl RoomOracle for NoElites {
            fn room(&self, id: &RoomId) -> Result<&RoomDefinition, CatalogError> {
                self.0.room(id)
            }
            fn rooms_of_kind(&self, kind: RoomKind) -> Vec<&RoomDefinition> {
                if kind == RoomKind::Elite {
                    return Vec::new();
                }
                self.0.rooms_of_kind(kind)
            }
        }

        let rooms = NoElites(TestRooms::standard());
        let err = DungeonDeckBuilder::new(&rooms)
            .from_template(&mut PcgRng::seeded(0))
            .unwrap_err();
        assert_eq!(
            err,
            DeckBuildError::EmptyPool {
                kind: RoomKind::Elite
            }
        );
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn definition_mode_preserves_play_order_and_overrides() {
        let rooms = TestRooms::standard();
        let overrides = vec![CardId::new("giant-rat"), CardId::new("rat")];
        let definition = DungeonDeckDefinition {
            rooms: vec![
                DungeonRoom {
                    kind: RoomKind::Combat,
                    room_id: Some(RoomId::new("fight-rats")),
                    enemy_card_ids: Some(overrides.clone()),
                },
                DungeonRoom {
                    kind: RoomKind::Treasure,
                    room_id: None,
                    enemy_card_ids: None,
                },
                DungeonRoom {
                    kind: RoomKind::Boss,
                    room_id: Some(RoomId::new("boss-heart")),
                    enemy_card_ids: None,
                },
            ],
        };

        let deck = DungeonDeckBuilder::new(&rooms)
            .from_definition(&definition, &mut PcgRng::seeded(11))
            .unwrap();

        let first = deck.clone().draw(1);
        assert_eq!(first.choices[0].definition_id, RoomId::new("fight-rats"));
        assert_eq!(first.choices[0].enemy_card_ids, Some(overrides));
        assert_eq!(deck.cards()[0].kind, RoomKind::Boss);
    }

    #[test]
    fn definition_mode_rejects_kind_mismatch() {
        let rooms = TestRooms::standard();
        let definition = DungeonDeckDefinition {
            rooms: vec![DungeonRoom {
                kind: RoomKind::Treasure,
                room_id: Some(RoomId::new("boss-heart")),
                enemy_card_ids: None,
            }],
        };
        let err = DungeonDeckBuilder::new(&rooms)
            .from_definition(&definition, &mut PcgRng::seeded(0))
            .unwrap_err();
        assert!(matches!(err, DeckBuildError::KindMismatch { .. }));
    }
}
