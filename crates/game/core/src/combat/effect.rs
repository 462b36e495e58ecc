//! Atomic effects and the resolution engine.
//!
//! [`AtomicEffect`] is a closed sum type: the resolver matches exhaustively,
//! so adding an effect kind is a compile-time-checked extension rather than
//! a string lookup with a silent default branch.
//!
//! Effects apply strictly in declaration order - later effects may depend on
//! state mutated by earlier ones (damage before `ApplyPower(Vulnerable)`
//! must hit at the pre-vulnerable multiplier). For `AllEnemies` targets each
//! entity-directed effect applies independently per enemy in battlefield
//! order. Resolution is all-or-nothing per play and hands the caller an
//! ordered list of [`EffectDelta`]s for presentation; it never yields
//! control mid-resolution.

use crate::error::{EngineError, ErrorSeverity};
use crate::rng::DeckRng;

use super::entities::{EnemyEntity, EnemyId, PlayerEntity, PowerId};
use super::piles::{CardPiles, CardUid};
use super::targeting::{BattlefieldTarget, ResolvedTarget};

/// One atomic, data-only effect in a card's effect list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtomicEffect {
    /// Deal damage to the card's resolved target. Block soaks first.
    Damage { amount: u32 },
    /// Grant block to the acting entity.
    Block { amount: u32 },
    /// Draw cards, reshuffling the discard pile into draw when needed.
    Draw { count: u32 },
    /// Additively stack a power on the card's resolved target.
    ApplyPower {
        power: PowerId,
        stacks: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        duration: Option<u32>,
    },
    /// Gain energy this turn.
    GainEnergy { amount: u32 },
    /// Restore health to the card's resolved target.
    Heal { amount: u32 },
    /// Route the played card to the exhaust pile instead of discard.
    Exhaust,
}

/// One visible step of a resolved play, in application order.
///
/// The presentation layer animates from this list; the engine has already
/// finished mutating by the time the caller sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDelta {
    Damage {
        target: BattlefieldTarget,
        planned: u32,
        blocked: u32,
        to_health: u32,
    },
    Block {
        target: BattlefieldTarget,
        amount: u32,
    },
    Draw {
        drawn: Vec<CardUid>,
    },
    Power {
        target: BattlefieldTarget,
        power: PowerId,
        stacks: i32,
        removed: bool,
    },
    Energy {
        gained: u32,
    },
    Heal {
        target: BattlefieldTarget,
        amount: u32,
    },
    ExhaustMarked,
}

/// Invariant failure during resolution.
///
/// By the time resolution runs, energy and targets have been validated, so
/// a failure here indicates a bug rather than a user-recoverable rejection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("effect target enemy {0:?} vanished mid-resolution")]
    TargetVanished(EnemyId),
}

impl EngineError for EffectError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TargetVanished(_) => ErrorSeverity::Internal,
        }
    }
}

/// Mutable context for one play's resolution.
pub struct EffectContext<'a> {
    pub player: &'a mut PlayerEntity,
    pub enemies: &'a mut [EnemyEntity],
    pub piles: &'a mut CardPiles,
    pub rng: &'a mut dyn DeckRng,
    /// The validated target of the play.
    pub target: ResolvedTarget,
    /// Energy consumed by an X-cost card; scales scalable amounts.
    pub x_value: Option<u32>,
    /// Set by an `Exhaust` effect; read by the pile-routing step.
    pub exhaust_marked: bool,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        player: &'a mut PlayerEntity,
        enemies: &'a mut [EnemyEntity],
        piles: &'a mut CardPiles,
        rng: &'a mut dyn DeckRng,
        target: ResolvedTarget,
        x_value: Option<u32>,
    ) -> Self {
        Self {
            player,
            enemies,
            piles,
            rng,
            target,
            x_value,
            exhaust_marked: false,
        }
    }

    /// Amounts on X-cost cards scale per point of energy consumed.
    fn scaled(&self, amount: u32) -> u32 {
        match self.x_value {
            Some(x) => amount * x,
            None => amount,
        }
    }
}

/// Apply an ordered effect list, returning the visible steps in order.
pub fn resolve_effects(
    effects: &[AtomicEffect],
    ctx: &mut EffectContext<'_>,
) -> Result<Vec<EffectDelta>, EffectError> {
    let mut deltas = Vec::new();
    for effect in effects {
        apply_effect(effect, ctx, &mut deltas)?;
    }
    Ok(deltas)
}

fn apply_effect(
    effect: &AtomicEffect,
    ctx: &mut EffectContext<'_>,
    deltas: &mut Vec<EffectDelta>,
) -> Result<(), EffectError> {
    match effect {
        AtomicEffect::Damage { amount } => {
            let base = ctx.scaled(*amount);
            for target in entity_targets(ctx)? {
                match target {
                    BattlefieldTarget::Enemy(id) => damage_enemy(ctx, id, base, deltas)?,
                    BattlefieldTarget::Player => damage_player(ctx, base, deltas),
                }
            }
        }

        AtomicEffect::Block { amount } => {
            let amount = ctx.scaled(*amount);
            ctx.player.block += amount;
            deltas.push(EffectDelta::Block {
                target: BattlefieldTarget::Player,
                amount,
            });
        }

        AtomicEffect::Draw { count } => {
            let drawn = ctx.piles.deal(ctx.scaled(*count) as usize, ctx.rng);
            deltas.push(EffectDelta::Draw { drawn });
        }

        AtomicEffect::ApplyPower {
            power,
            stacks,
            duration,
        } => {
            for target in entity_targets(ctx)? {
                match target {
                    BattlefieldTarget::Enemy(id) => {
                        let enemy = enemy_mut(ctx.enemies, id)?;
                        enemy.powers.apply(*power, *stacks, *duration);
                        deltas.push(EffectDelta::Power {
                            target,
                            power: *power,
                            stacks: *stacks,
                            removed: !enemy.powers.has(*power),
                        });
                    }
                    BattlefieldTarget::Player => {
                        ctx.player.powers.apply(*power, *stacks, *duration);
                        deltas.push(EffectDelta::Power {
                            target,
                            power: *power,
                            stacks: *stacks,
                            removed: !ctx.player.powers.has(*power),
                        });
                    }
                }
            }
        }

        AtomicEffect::GainEnergy { amount } => {
            let amount = ctx.scaled(*amount);
            ctx.player.energy += amount;
            deltas.push(EffectDelta::Energy { gained: amount });
        }

        AtomicEffect::Heal { amount } => {
            let amount = ctx.scaled(*amount);
            for target in entity_targets(ctx)? {
                let healed = match target {
                    BattlefieldTarget::Player => ctx.player.heal(amount),
                    BattlefieldTarget::Enemy(id) => {
                        let enemy = enemy_mut(ctx.enemies, id)?;
                        let healed =
                            amount.min(enemy.max_health - enemy.current_health);
                        enemy.current_health += healed;
                        healed
                    }
                };
                deltas.push(EffectDelta::Heal {
                    target,
                    amount: healed,
                });
            }
        }

        AtomicEffect::Exhaust => {
            ctx.exhaust_marked = true;
            deltas.push(EffectDelta::ExhaustMarked);
        }
    }
    Ok(())
}

/// Expand the play's resolved target into per-entity application targets.
///
/// Entity-directed effects on a no-target card act on the player (curses,
/// self-damage); `AllEnemies` expands to the living enemies in list order.
fn entity_targets(ctx: &EffectContext<'_>) -> Result<Vec<BattlefieldTarget>, EffectError> {
    Ok(match ctx.target {
        ResolvedTarget::Enemy(id) => vec![BattlefieldTarget::Enemy(id)],
        ResolvedTarget::AllEnemies => ctx
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| BattlefieldTarget::Enemy(e.id))
            .collect(),
        ResolvedTarget::Player | ResolvedTarget::None => vec![BattlefieldTarget::Player],
    })
}

fn enemy_mut<'e>(
    enemies: &'e mut [EnemyEntity],
    id: EnemyId,
) -> Result<&'e mut EnemyEntity, EffectError> {
    enemies
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or(EffectError::TargetVanished(id))
}

fn damage_enemy(
    ctx: &mut EffectContext<'_>,
    id: EnemyId,
    base: u32,
    deltas: &mut Vec<EffectDelta>,
) -> Result<(), EffectError> {
    let strength = ctx.player.powers.stacks(PowerId::Strength).max(0) as u32;
    let weakened = ctx.player.powers.has(PowerId::Weak);

    let enemy = enemy_mut(ctx.enemies, id)?;
    let mut planned = base + strength;
    if weakened {
        planned = planned * 3 / 4;
    }
    if enemy.powers.has(PowerId::Vulnerable) {
        planned = planned * 3 / 2;
    }

    let (blocked, to_health) = enemy.absorb_damage(planned);
    let thorns = enemy.powers.stacks(PowerId::Thorns).max(0) as u32;
    deltas.push(EffectDelta::Damage {
        target: BattlefieldTarget::Enemy(id),
        planned,
        blocked,
        to_health,
    });

    // Thorns retaliate against the attacker.
    if thorns > 0 {
        let (blocked, to_health) = ctx.player.absorb_damage(thorns);
        deltas.push(EffectDelta::Damage {
            target: BattlefieldTarget::Player,
            planned: thorns,
            blocked,
            to_health,
        });
    }
    Ok(())
}

fn damage_player(ctx: &mut EffectContext<'_>, base: u32, deltas: &mut Vec<EffectDelta>) {
    let mut planned = base;
    if ctx.player.powers.has(PowerId::Vulnerable) {
        planned = planned * 3 / 2;
    }
    let (blocked, to_health) = ctx.player.absorb_damage(planned);
    deltas.push(EffectDelta::Damage {
        target: BattlefieldTarget::Player,
        planned,
        blocked,
        to_health,
    });
}
