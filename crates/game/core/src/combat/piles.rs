//! Card piles for one combat instance.
//!
//! Pile membership is modeled as a tagged location on each instance inside a
//! single arena, with per-pile ordering via a sequence field. Membership is
//! exclusive and total by construction: every instance carries exactly one
//! `Pile` tag, so there is no parallel-array bookkeeping to desync.

use crate::catalog::CardId;
use crate::rng::{DeckRng, fisher_yates};

/// Unique id of a card instance within one combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardUid(pub u64);

/// One of the four disjoint card containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Pile {
    Draw,
    Hand,
    Discard,
    Exhaust,
}

/// A card instance owned by the combat's pile arena.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardInstance {
    pub uid: CardUid,
    pub definition_id: CardId,
    pub upgraded: bool,
    location: Pile,
    /// Ordering within the current pile; higher is closer to the top.
    seq: u64,
}

impl CardInstance {
    pub fn location(&self) -> Pile {
        self.location
    }
}

/// Arena of card instances with O(1)-ish tagged pile transitions.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardPiles {
    cards: Vec<CardInstance>,
    next_seq: u64,
}

impl CardPiles {
    /// Build the arena from the run deck; every instance starts in Draw.
    ///
    /// The draw pile should be shuffled (see [`CardPiles::shuffle_draw`])
    /// before the first deal.
    pub fn from_deck(deck: impl IntoIterator<Item = (CardId, bool)>) -> Self {
        let mut piles = Self::default();
        for (i, (definition_id, upgraded)) in deck.into_iter().enumerate() {
            let seq = piles.bump_seq();
            piles.cards.push(CardInstance {
                uid: CardUid(i as u64),
                definition_id,
                upgraded,
                location: Pile::Draw,
                seq,
            });
        }
        piles
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Instances in a pile, bottom-to-top.
    pub fn cards_in(&self, pile: Pile) -> Vec<&CardInstance> {
        let mut cards: Vec<&CardInstance> =
            self.cards.iter().filter(|c| c.location == pile).collect();
        cards.sort_by_key(|c| c.seq);
        cards
    }

    pub fn len(&self, pile: Pile) -> usize {
        self.cards.iter().filter(|c| c.location == pile).count()
    }

    pub fn is_empty(&self, pile: Pile) -> bool {
        self.len(pile) == 0
    }

    /// Current pile of an instance.
    pub fn location(&self, uid: CardUid) -> Option<Pile> {
        self.cards.iter().find(|c| c.uid == uid).map(|c| c.location)
    }

    pub fn card(&self, uid: CardUid) -> Option<&CardInstance> {
        self.cards.iter().find(|c| c.uid == uid)
    }

    /// Uniformly reorder the draw pile.
    pub fn shuffle_draw(&mut self, rng: &mut dyn DeckRng) {
        self.reorder_pile(Pile::Draw, rng);
    }

    fn reorder_pile(&mut self, pile: Pile, rng: &mut dyn DeckRng) {
        let mut uids: Vec<CardUid> = self
            .cards_in(pile)
            .into_iter()
            .map(|c| c.uid)
            .collect();
        fisher_yates(rng, &mut uids);
        for uid in uids {
            let seq = self.bump_seq();
            if let Some(card) = self.cards.iter_mut().find(|c| c.uid == uid) {
                card.seq = seq;
            }
        }
    }

    /// Move an instance to a pile, placing it on top.
    fn transition(&mut self, uid: CardUid, to: Pile) {
        let seq = self.bump_seq();
        if let Some(card) = self.cards.iter_mut().find(|c| c.uid == uid) {
            card.location = to;
            card.seq = seq;
        }
    }

    /// Draw one card from the top of the draw pile into the hand.
    ///
    /// An empty draw pile triggers the reshuffle: the discard pile is
    /// shuffled and becomes the new draw pile. The exhaust pile is never
    /// reshuffled. Returns `None` when draw and discard are both empty.
    pub fn draw_one(&mut self, rng: &mut dyn DeckRng) -> Option<CardUid> {
        if self.is_empty(Pile::Draw) {
            if self.is_empty(Pile::Discard) {
                return None;
            }
            self.reshuffle_discard_into_draw(rng);
        }
        let top = self.cards_in(Pile::Draw).last().map(|c| c.uid)?;
        self.transition(top, Pile::Hand);
        Some(top)
    }

    /// Draw up to `count` cards into the hand, reshuffling as needed.
    pub fn deal(&mut self, count: usize, rng: &mut dyn DeckRng) -> Vec<CardUid> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            match self.draw_one(rng) {
                Some(uid) => drawn.push(uid),
                None => break,
            }
        }
        drawn
    }

    fn reshuffle_discard_into_draw(&mut self, rng: &mut dyn DeckRng) {
        for card in self.cards.iter_mut() {
            if card.location == Pile::Discard {
                card.location = Pile::Draw;
            }
        }
        self.reorder_pile(Pile::Draw, rng);
    }

    /// Move a hand card to the discard pile.
    pub fn discard_from_hand(&mut self, uid: CardUid) {
        debug_assert_eq!(self.location(uid), Some(Pile::Hand));
        self.transition(uid, Pile::Discard);
    }

    /// Move a hand card to the exhaust pile.
    pub fn exhaust_from_hand(&mut self, uid: CardUid) {
        debug_assert_eq!(self.location(uid), Some(Pile::Hand));
        self.transition(uid, Pile::Exhaust);
    }

    /// End-of-turn hand cleanup: ethereal cards exhaust, the rest discard.
    ///
    /// Returns (discarded, exhausted) in hand order.
    pub fn discard_hand_at_turn_end(
        &mut self,
        is_ethereal: impl Fn(&CardId) -> bool,
    ) -> (Vec<CardUid>, Vec<CardUid>) {
        let hand: Vec<(CardUid, bool)> = self
            .cards_in(Pile::Hand)
            .into_iter()
            .map(|c| (c.uid, is_ethereal(&c.definition_id)))
            .collect();

        let mut discarded = Vec::new();
        let mut exhausted = Vec::new();
        for (uid, ethereal) in hand {
            if ethereal {
                self.transition(uid, Pile::Exhaust);
                exhausted.push(uid);
            } else {
                self.transition(uid, Pile::Discard);
                discarded.push(uid);
            }
        }
        (discarded, exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;

    fn piles(n: u64) -> CardPiles {
        CardPiles::from_deck((0..n).map(|i| (CardId::new(format!("card-{i}")), false)))
    }

    #[test]
    fn every_instance_is_in_exactly_one_pile() {
        let mut piles = piles(6);
        let mut rng = PcgRng::seeded(1);
        piles.deal(3, &mut rng);
        let total: usize = [Pile::Draw, Pile::Hand, Pile::Discard, Pile::Exhaust]
            .iter()
            .map(|p| piles.len(*p))
            .sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn deal_moves_cards_from_draw_to_hand() {
        let mut piles = piles(5);
        let mut rng = PcgRng::seeded(2);
        let drawn = piles.deal(3, &mut rng);
        assert_eq!(drawn.len(), 3);
        assert_eq!(piles.len(Pile::Hand), 3);
        assert_eq!(piles.len(Pile::Draw), 2);
        for uid in drawn {
            assert_eq!(piles.location(uid), Some(Pile::Hand));
        }
    }

    #[test]
    fn empty_draw_reshuffles_discard_but_never_exhaust() {
        // 5-card deck: 3 drawn, 2 played to discard, 1 exhausted from hand.
        let mut piles = piles(5);
        let mut rng = PcgRng::seeded(3);
        let drawn = piles.deal(5, &mut rng);
        assert_eq!(drawn.len(), 5);
        piles.discard_from_hand(drawn[0]);
        piles.discard_from_hand(drawn[1]);
        piles.exhaust_from_hand(drawn[2]);

        // Draw pile is empty; requesting more triggers the reshuffle.
        let refill = piles.deal(5, &mut rng);
        assert_eq!(refill.len(), 2, "only the discard pile repopulates draw");
        assert_eq!(piles.len(Pile::Exhaust), 1);
        assert_eq!(piles.len(Pile::Discard), 0);
        assert_eq!(piles.location(drawn[2]), Some(Pile::Exhaust));
    }

    #[test]
    fn draw_from_fully_exhausted_piles_is_none() {
        let mut piles = piles(1);
        let mut rng = PcgRng::seeded(4);
        let drawn = piles.deal(1, &mut rng);
        piles.exhaust_from_hand(drawn[0]);
        assert_eq!(piles.draw_one(&mut rng), None);
    }

    #[test]
    fn turn_end_routes_ethereal_to_exhaust() {
        let mut piles = CardPiles::from_deck(vec![
            (CardId::new("strike"), false),
            (CardId::new("phantom"), false),
            (CardId::new("defend"), false),
        ]);
        let mut rng = PcgRng::seeded(5);
        piles.deal(3, &mut rng);

        let (discarded, exhausted) =
            piles.discard_hand_at_turn_end(|id| id.as_str() == "phantom");
        assert_eq!(discarded.len(), 2);
        assert_eq!(exhausted.len(), 1);
        assert_eq!(piles.len(Pile::Hand), 0);
        assert_eq!(piles.len(Pile::Exhaust), 1);
    }

    #[test]
    fn discard_order_is_preserved_per_pile() {
        let mut piles = piles(3);
        let mut rng = PcgRng::seeded(6);
        let drawn = piles.deal(3, &mut rng);
        piles.discard_from_hand(drawn[1]);
        piles.discard_from_hand(drawn[0]);
        let discard: Vec<CardUid> = piles
            .cards_in(Pile::Discard)
            .into_iter()
            .map(|c| c.uid)
            .collect();
        assert_eq!(discard, vec![drawn[1], drawn[0]]);
    }
}
