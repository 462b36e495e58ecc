//! Dungeon deck: the ordered sequence of rooms a run descends through.
//!
//! The deck is an ordered stack of [`RoomCard`]s drawn from the tail. The one
//! structural invariant is boss placement: the boss card sits at index 0 and
//! is never shuffled, so popping from the tail makes it the last room ever
//! drawn regardless of shuffle outcome.

mod builder;

pub use builder::{DeckBuildError, DungeonDeckBuilder, DungeonDeckDefinition, DungeonRoom};

use crate::catalog::{CardId, RoomId, RoomKind};

/// Unique id of a room card within one deck instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomUid(pub u64);

/// One room card in a dungeon deck.
///
/// Created by the builder, mutated only to flip `revealed` on draw, and
/// destroyed with the deck when the run ends.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomCard {
    pub uid: RoomUid,
    pub definition_id: RoomId,
    pub kind: RoomKind,
    pub revealed: bool,
    /// Enemy substitution for combat rooms sourced from an external
    /// definition. `None` means the room definition's own monsters apply.
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemy_card_ids: Option<Vec<CardId>>,
}

/// Ordered room cards for a run. Drawing pops from the tail.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonDeck {
    cards: Vec<RoomCard>,
}

/// Result of one draw on the dungeon deck: the revealed choices in pop
/// order, and the deck that remains.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomChoices {
    pub choices: Vec<RoomCard>,
    pub remaining: DungeonDeck,
}

impl DungeonDeck {
    /// Wrap an already-ordered card stack. `cards[0]` is drawn last.
    pub fn from_cards(cards: Vec<RoomCard>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in stack order (index 0 is the bottom, drawn last).
    pub fn cards(&self) -> &[RoomCard] {
        &self.cards
    }

    /// Total rooms remaining, used for run progress accounting.
    pub fn rooms_remaining(&self) -> usize {
        self.cards.len()
    }

    /// Draw up to `count` room choices from the tail of the deck.
    ///
    /// Pure function of its inputs: consumes the deck and returns the drawn
    /// cards (marked `revealed`) together with the remaining deck. Drawing
    /// fewer than `count` is not an error; it signals the deck's final
    /// choice set.
    pub fn draw(mut self, count: usize) -> RoomChoices {
        let take = count.min(self.cards.len());
        let mut choices = Vec::with_capacity(take);
        // Pop from the tail; the boss at index 0 therefore comes last.
        for _ in 0..take {
            if let Some(mut card) = self.cards.pop() {
                card.revealed = true;
                choices.push(card);
            }
        }
        RoomChoices {
            choices,
            remaining: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(uid: u64, kind: RoomKind) -> RoomCard {
        RoomCard {
            uid: RoomUid(uid),
            definition_id: RoomId::new(format!("room-{uid}")),
            kind,
            revealed: false,
            enemy_card_ids: None,
        }
    }

    fn deck(n: u64) -> DungeonDeck {
        let mut cards = vec![card(0, RoomKind::Boss)];
        cards.extend((1..n).map(|i| card(i, RoomKind::Combat)));
        DungeonDeck::from_cards(cards)
    }

    #[test]
    fn draw_pops_from_tail_and_reveals() {
        let RoomChoices { choices, remaining } = deck(5).draw(2);
        assert_eq!(choices.len(), 2);
        assert!(choices.iter().all(|c| c.revealed));
        assert_eq!(choices[0].uid, RoomUid(4));
        assert_eq!(choices[1].uid, RoomUid(3));
        assert_eq!(remaining.len(), 3);
    }

    #[test]
    fn short_draw_is_the_final_choice_set() {
        let RoomChoices { choices, remaining } = deck(2).draw(3);
        assert_eq!(choices.len(), 2);
        assert!(remaining.is_empty());
        // Boss-last: the final card out is the boss at index 0
        assert_eq!(choices.last().map(|c| c.kind), Some(RoomKind::Boss));
    }

    #[test]
    fn sequential_draws_consume_the_same_order_as_one_draw() {
        let first = deck(7).draw(3);
        let second = first.remaining.draw(2);
        let mut split: Vec<RoomUid> = first.choices.iter().map(|c| c.uid).collect();
        split.extend(second.choices.iter().map(|c| c.uid));

        let combined: Vec<RoomUid> = deck(7).draw(5).choices.iter().map(|c| c.uid).collect();
        assert_eq!(split, combined);
    }

    #[test]
    fn drawn_cards_never_reappear() {
        let first = deck(6).draw(3);
        let drawn: Vec<RoomUid> = first.choices.iter().map(|c| c.uid).collect();
        let second = first.remaining.draw(3);
        assert!(second.choices.iter().all(|c| !drawn.contains(&c.uid)));
        assert!(second.remaining.cards().iter().all(|c| !c.revealed));
    }
}
