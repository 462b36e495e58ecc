//! Combat state and the turn loop.
//!
//! [`CombatState`] owns the battlefield for one room: the player, the enemy
//! list, and the card piles. The catalog is consulted through oracles at the
//! call sites that need it and never stored here, so the whole state is a
//! plain value that serializes into a checkpoint.

pub mod effect;
pub mod entities;
pub mod piles;
pub mod play;
pub mod targeting;

pub use effect::{AtomicEffect, EffectDelta};
pub use entities::{EnemyEntity, EnemyId, Intent, PlayerEntity, PowerId, Powers};
pub use piles::{CardInstance, CardPiles, CardUid, Pile};
pub use play::{PlayError, PlayOutcome};
pub use targeting::{
    BattlefieldTarget, InteractionSession, ResolvedTarget, TargetError, TargetShape,
};

use crate::catalog::{CardId, CardOracle, CatalogError, EnemyOracle};
use crate::config::GameConfig;
use crate::rng::DeckRng;

/// Terminal result of a combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

/// One enemy's executed action during the enemy phase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAction {
    pub enemy: EnemyId,
    pub intent: Intent,
    pub deltas: Vec<EffectDelta>,
}

/// Everything that happened between ending one player turn and starting the
/// next.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub discarded: Vec<CardUid>,
    pub exhausted: Vec<CardUid>,
    pub enemy_actions: Vec<EnemyAction>,
    /// Hand dealt for the next turn; empty when the combat ended.
    pub drawn: Vec<CardUid>,
    pub outcome: Option<CombatOutcome>,
}

/// The full mutable state of one combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    pub player: PlayerEntity,
    pub enemies: Vec<EnemyEntity>,
    pub piles: CardPiles,
    /// 1-based player turn counter.
    pub turn: u32,
}

impl CombatState {
    /// Start a combat: spawn enemies from their templates, shuffle the deck
    /// into the draw pile, and deal the opening hand.
    pub fn start(
        player: PlayerEntity,
        enemy_card_ids: &[CardId],
        deck: impl IntoIterator<Item = (CardId, bool)>,
        templates: &dyn EnemyOracle,
        config: &GameConfig,
        rng: &mut dyn DeckRng,
    ) -> Result<Self, CatalogError> {
        let mut enemies = Vec::with_capacity(enemy_card_ids.len());
        for (i, card_id) in enemy_card_ids.iter().enumerate() {
            let template = templates.enemy(card_id)?;
            enemies.push(EnemyEntity::new(
                EnemyId(i as u32),
                template.card_id.clone(),
                template.name.clone(),
                template.max_health,
                template.pattern.clone(),
            ));
        }

        let mut piles = CardPiles::from_deck(deck);
        piles.shuffle_draw(rng);
        piles.deal(config.hand_size, rng);

        Ok(Self {
            player,
            enemies,
            piles,
            turn: 1,
        })
    }

    /// Terminal outcome, if the combat has one. Defeat wins ties.
    pub fn outcome(&self) -> Option<CombatOutcome> {
        if !self.player.is_alive() {
            return Some(CombatOutcome::Defeat);
        }
        if self.enemies.iter().all(|e| !e.is_alive()) {
            return Some(CombatOutcome::Victory);
        }
        None
    }

    /// Play one hand card. Delegates to the play pipeline; a rejected play
    /// leaves the combat untouched.
    pub fn play_card(
        &mut self,
        cards: &dyn CardOracle,
        rng: &mut dyn DeckRng,
        uid: CardUid,
        release_over: Option<BattlefieldTarget>,
    ) -> Result<PlayOutcome, PlayError> {
        play::play_card(
            cards,
            &mut self.player,
            &mut self.enemies,
            &mut self.piles,
            rng,
            uid,
            release_over,
        )
    }

    /// End the player turn: discard the hand, run the enemy phase, tick
    /// power durations, then deal the next hand unless the combat ended.
    pub fn end_turn(
        &mut self,
        cards: &dyn CardOracle,
        config: &GameConfig,
        rng: &mut dyn DeckRng,
    ) -> Result<TurnReport, CatalogError> {
        // Resolve ethereal flags before any mutation so a catalog failure
        // leaves the turn intact.
        let mut ethereal_ids: Vec<CardId> = Vec::new();
        for card in self.piles.cards_in(Pile::Hand) {
            if cards.card(&card.definition_id)?.ethereal {
                ethereal_ids.push(card.definition_id.clone());
            }
        }
        let (discarded, exhausted) = self
            .piles
            .discard_hand_at_turn_end(|id| ethereal_ids.contains(id));

        let mut enemy_actions = Vec::new();
        let mut outcome = self.outcome();
        if outcome.is_none() {
            enemy_actions = self.enemy_phase();
            outcome = self.outcome();
        }

        self.player.powers.tick_durations();
        for enemy in &mut self.enemies {
            enemy.powers.tick_durations();
        }

        let mut drawn = Vec::new();
        if outcome.is_none() {
            self.turn += 1;
            self.player.block = 0;
            self.player.energy = self.player.max_energy;
            drawn = self.piles.deal(config.hand_size, rng);
        }

        Ok(TurnReport {
            discarded,
            exhausted,
            enemy_actions,
            drawn,
            outcome,
        })
    }

    /// Execute every living enemy's telegraphed intent in battlefield order.
    fn enemy_phase(&mut self) -> Vec<EnemyAction> {
        let mut actions = Vec::new();
        for i in 0..self.enemies.len() {
            if !self.player.is_alive() {
                break;
            }
            if !self.enemies[i].is_alive() {
                continue;
            }
            let Some(intent) = self.enemies[i].intent() else {
                continue;
            };

            // Enemy block lasts until its next action.
            self.enemies[i].block = 0;

            let mut deltas = Vec::new();
            match intent {
                Intent::Attack { damage } => {
                    let enemy = &self.enemies[i];
                    let strength = enemy.powers.stacks(PowerId::Strength).max(0) as u32;
                    let mut planned = damage + strength;
                    if enemy.powers.has(PowerId::Weak) {
                        planned = planned * 3 / 4;
                    }
                    if self.player.powers.has(PowerId::Vulnerable) {
                        planned = planned * 3 / 2;
                    }
                    let (blocked, to_health) = self.player.absorb_damage(planned);
                    deltas.push(EffectDelta::Damage {
                        target: BattlefieldTarget::Player,
                        planned,
                        blocked,
                        to_health,
                    });

                    let thorns = self.player.powers.stacks(PowerId::Thorns).max(0) as u32;
                    if thorns > 0 {
                        let enemy = &mut self.enemies[i];
                        let (blocked, to_health) = enemy.absorb_damage(thorns);
                        deltas.push(EffectDelta::Damage {
                            target: BattlefieldTarget::Enemy(enemy.id),
                            planned: thorns,
                            blocked,
                            to_health,
                        });
                    }
                }
                Intent::Defend { block } => {
                    let enemy = &mut self.enemies[i];
                    enemy.block += block;
                    deltas.push(EffectDelta::Block {
                        target: BattlefieldTarget::Enemy(enemy.id),
                        amount: block,
                    });
                }
                Intent::Buff { power, stacks } => {
                    let enemy = &mut self.enemies[i];
                    enemy.powers.apply(power, stacks as i32, None);
                    deltas.push(EffectDelta::Power {
                        target: BattlefieldTarget::Enemy(enemy.id),
                        power,
                        stacks: stacks as i32,
                        removed: false,
                    });
                }
            }

            // Ritual converts to strength after the enemy acts.
            let ritual = self.enemies[i].powers.stacks(PowerId::Ritual).max(0);
            if ritual > 0 {
                self.enemies[i]
                    .powers
                    .apply(PowerId::Strength, ritual, None);
            }

            self.enemies[i].advance_intent();
            actions.push(EnemyAction {
                enemy: self.enemies[i].id,
                intent,
                deltas,
            });
        }
        actions
    }
}
