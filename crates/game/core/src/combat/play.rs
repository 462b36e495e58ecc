//! The card play pipeline.
//!
//! A play either fully resolves or leaves combat untouched. All gates run
//! before the first mutation: hand membership, the energy boundary, then
//! target resolution. Only after all three pass does the pipeline debit
//! energy, apply the effect list in order, and route the spent card to its
//! destination pile.

use crate::catalog::{CardOracle, CatalogError, EnergyCost};
use crate::error::{EngineError, ErrorSeverity};
use crate::rng::DeckRng;

use super::effect::{EffectContext, EffectDelta, EffectError, resolve_effects};
use super::entities::{EnemyEntity, PlayerEntity};
use super::piles::{CardPiles, CardUid, Pile};
use super::targeting::{BattlefieldTarget, ResolvedTarget, TargetError, resolve_drop};

/// A rejected or failed play.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlayError {
    #[error("card {0:?} is not in the hand")]
    NotInHand(CardUid),

    #[error("not enough energy: card costs {required}, {available} available")]
    InsufficientEnergy {
        required: EnergyCost,
        available: u32,
    },

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Effect(#[from] EffectError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl EngineError for PlayError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotInHand(_) => ErrorSeverity::Validation,
            Self::InsufficientEnergy { .. } => ErrorSeverity::Recoverable,
            Self::Target(err) => err.severity(),
            Self::Effect(err) => err.severity(),
            Self::Catalog(err) => err.severity(),
        }
    }
}

/// Everything that happened during one resolved play.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayOutcome {
    pub card: CardUid,
    pub target: ResolvedTarget,
    pub energy_spent: u32,
    /// Whether the card went to the exhaust pile instead of discard.
    pub exhausted: bool,
    /// Visible resolution steps, in application order.
    pub deltas: Vec<EffectDelta>,
}

/// Run the full play pipeline for one hand card.
///
/// `release_over` is where the play gesture ended; target resolution follows
/// the drop rules in [`super::targeting`]. Any error before the outcome is
/// produced means no combat state changed.
#[allow(clippy::too_many_arguments)]
pub fn play_card(
    cards: &dyn CardOracle,
    player: &mut PlayerEntity,
    enemies: &mut [EnemyEntity],
    piles: &mut CardPiles,
    rng: &mut dyn DeckRng,
    uid: CardUid,
    release_over: Option<BattlefieldTarget>,
) -> Result<PlayOutcome, PlayError> {
    let instance = piles.card(uid).ok_or(PlayError::NotInHand(uid))?;
    if instance.location() != Pile::Hand {
        return Err(PlayError::NotInHand(uid));
    }
    let definition = cards.card(&instance.definition_id)?.clone();

    if !definition.cost.can_play(player.energy) {
        return Err(PlayError::InsufficientEnergy {
            required: definition.cost,
            available: player.energy,
        });
    }

    let target = resolve_drop(definition.target, release_over, enemies)?;

    // Gates passed; from here the play commits.
    let energy_spent = definition.cost.debit(player.energy);
    player.energy -= energy_spent;
    let x_value = match definition.cost {
        EnergyCost::X => Some(energy_spent),
        EnergyCost::Fixed(_) => None,
    };

    let mut ctx = EffectContext::new(player, enemies, piles, rng, target, x_value);
    let deltas = resolve_effects(&definition.effects, &mut ctx)?;
    let exhausted = ctx.exhaust_marked;

    if exhausted {
        piles.exhaust_from_hand(uid);
    } else {
        piles.discard_from_hand(uid);
    }

    Ok(PlayOutcome {
        card: uid,
        target,
        energy_spent,
        exhausted,
        deltas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CardDefinition, CardId, CardRarity, CardTheme};
    use crate::combat::effect::AtomicEffect;
    use crate::combat::entities::EnemyId;
    use crate::combat::targeting::TargetShape;
    use crate::rng::PcgRng;

    struct TestCards {
        cards: Vec<CardDefinition>,
    }

    impl TestCards {
        fn starter() -> Self {
            let card = |id: &str, cost, target, effects| CardDefinition {
                id: CardId::new(id),
                name: id.to_string(),
                cost,
                theme: CardTheme::Attack,
                rarity: CardRarity::Common,
                element: None,
                target,
                effects,
                upgrades_to: None,
                ethereal: false,
                tags: Vec::new(),
            };
            Self {
                cards: vec![
                    card(
                        "strike",
                        EnergyCost::Fixed(1),
                        TargetShape::Enemy,
                        vec![AtomicEffect::Damage { amount: 6 }],
                    ),
                    card(
                        "defend",
                        EnergyCost::Fixed(1),
                        TargetShape::SelfOnly,
                        vec![AtomicEffect::Block { amount: 5 }],
                    ),
                    card(
                        "purge",
                        EnergyCost::Fixed(2),
                        TargetShape::Enemy,
                        vec![
                            AtomicEffect::Damage { amount: 9 },
                            AtomicEffect::Exhaust,
                        ],
                    ),
                    card(
                        "tempest",
                        EnergyCost::X,
                        TargetShape::AllEnemies,
                        vec![AtomicEffect::Damage { amount: 4 }],
                    ),
                ],
            }
        }
    }

    impl CardOracle for TestCards {
        fn card(&self, id: &CardId) -> Result<&CardDefinition, CatalogError> {
            self.cards
                .iter()
                .find(|c| &c.id == id)
                .ok_or_else(|| CatalogError::UnknownCard(id.clone()))
        }
    }

    fn setup() -> (TestCards, PlayerEntity, Vec<EnemyEntity>, CardPiles, PcgRng) {
        let cards = TestCards::starter();
        let player = PlayerEntity::new(50, 3);
        let enemies = vec![EnemyEntity::new(
            EnemyId(0),
            CardId::new("rat"),
            "Rat".into(),
            20,
            Vec::new(),
        )];
        let piles = CardPiles::from_deck(vec![
            (CardId::new("strike"), false),
            (CardId::new("defend"), false),
            (CardId::new("purge"), false),
            (CardId::new("tempest"), false),
        ]);
        (cards, player, enemies, piles, PcgRng::seeded(7))
    }

    fn hand_card(piles: &CardPiles, id: &str) -> CardUid {
        piles
            .cards_in(Pile::Hand)
            .into_iter()
            .find(|c| c.definition_id.as_str() == id)
            .map(|c| c.uid)
            .unwrap()
    }

    #[test]
    fn successful_play_debits_energy_and_discards() {
        let (cards, mut player, mut enemies, mut piles, mut rng) = setup();
        piles.deal(4, &mut rng);
        let uid = hand_card(&piles, "strike");

        let outcome = play_card(
            &cards,
            &mut player,
            &mut enemies,
            &mut piles,
            &mut rng,
            uid,
            Some(BattlefieldTarget::Enemy(EnemyId(0))),
        )
        .unwrap();

        assert_eq!(outcome.energy_spent, 1);
        assert!(!outcome.exhausted);
        assert_eq!(player.energy, 2);
        assert_eq!(enemies[0].current_health, 14);
        assert_eq!(piles.location(uid), Some(Pile::Discard));
    }

    #[test]
    fn insufficient_energy_rejects_without_mutation() {
        let (cards, mut player, mut enemies, mut piles, mut rng) = setup();
        piles.deal(4, &mut rng);
        player.energy = 1;
        let uid = hand_card(&piles, "purge");

        let err = play_card(
            &cards,
            &mut player,
            &mut enemies,
            &mut piles,
            &mut rng,
            uid,
            Some(BattlefieldTarget::Enemy(EnemyId(0))),
        )
        .unwrap_err();

        assert!(matches!(err, PlayError::InsufficientEnergy { .. }));
        assert!(err.severity().is_recoverable());
        assert_eq!(player.energy, 1);
        assert_eq!(enemies[0].current_health, 20);
        assert_eq!(piles.location(uid), Some(Pile::Hand));
    }

    #[test]
    fn rejected_target_leaves_the_play_unspent() {
        let (cards, mut player, mut enemies, mut piles, mut rng) = setup();
        piles.deal(4, &mut rng);
        enemies[0].absorb_damage(u32::MAX);
        let uid = hand_card(&piles, "strike");

        let err = play_card(
            &cards,
            &mut player,
            &mut enemies,
            &mut piles,
            &mut rng,
            uid,
            None,
        )
        .unwrap_err();

        assert!(matches!(err, PlayError::Target(TargetError::NoValidTarget)));
        assert_eq!(player.energy, 3);
        assert_eq!(piles.location(uid), Some(Pile::Hand));
    }

    #[test]
    fn exhaust_effect_routes_the_card_to_exhaust() {
        let (cards, mut player, mut enemies, mut piles, mut rng) = setup();
        piles.deal(4, &mut rng);
        let uid = hand_card(&piles, "purge");

        let outcome = play_card(
            &cards,
            &mut player,
            &mut enemies,
            &mut piles,
            &mut rng,
            uid,
            Some(BattlefieldTarget::Enemy(EnemyId(0))),
        )
        .unwrap();

        assert!(outcome.exhausted);
        assert_eq!(piles.location(uid), Some(Pile::Exhaust));
        assert_eq!(piles.len(Pile::Discard), 0);
    }

    #[test]
    fn x_cost_consumes_all_energy_and_scales() {
        let (cards, mut player, mut enemies, mut piles, mut rng) = setup();
        piles.deal(4, &mut rng);
        let uid = hand_card(&piles, "tempest");

        let outcome = play_card(
            &cards,
            &mut player,
            &mut enemies,
            &mut piles,
            &mut rng,
            uid,
            None,
        )
        .unwrap();

        assert_eq!(outcome.energy_spent, 3);
        assert_eq!(player.energy, 0);
        // 4 damage per point of consumed energy
        assert_eq!(enemies[0].current_health, 8);
    }

    #[test]
    fn card_outside_the_hand_is_a_validation_error() {
        let (cards, mut player, mut enemies, mut piles, mut rng) = setup();
        // Nothing dealt; every card still sits in the draw pile.
        let uid = piles.cards_in(Pile::Draw)[0].uid;
        let err = play_card(
            &cards,
            &mut player,
            &mut enemies,
            &mut piles,
            &mut rng,
            uid,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, PlayError::NotInHand(_)));
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }
}
