//! Target shapes, legal-target computation, and drop resolution.
//!
//! A card declares exactly one [`TargetShape`]. The resolver maps that shape
//! to the set of legal battlefield targets and validates a proposed drop
//! against it. Rejection is a normal, frequent outcome - the caller snaps
//! the card back and nothing mutates.

use crate::error::{EngineError, ErrorSeverity};

use super::entities::{EnemyEntity, EnemyId};
use super::piles::CardUid;

/// The target shape a card declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TargetShape {
    /// The acting entity; resolves immediately on play.
    SelfOnly,
    /// No target at all; resolves immediately on play.
    NoTarget,
    /// Exactly one enemy.
    Enemy,
    /// Every enemy independently, in battlefield order.
    AllEnemies,
    /// The player entity itself (enemy moves and self-debuffs).
    Player,
}

impl TargetShape {
    /// Shapes that never require a drop target.
    pub const fn resolves_immediately(&self) -> bool {
        matches!(self, Self::SelfOnly | Self::NoTarget | Self::Player | Self::AllEnemies)
    }

    /// Shapes that require a single enemy.
    pub const fn requires_enemy_target(&self) -> bool {
        matches!(self, Self::Enemy)
    }
}

/// Something a pointer can be released over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlefieldTarget {
    Player,
    Enemy(EnemyId),
}

/// The validated target a play resolves against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolvedTarget {
    None,
    Player,
    Enemy(EnemyId),
    AllEnemies,
}

/// Rejected target resolution. No state mutates on this path.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("no valid target for this card")]
    NoValidTarget,

    #[error("enemy {0:?} is not a legal target")]
    IllegalTarget(EnemyId),

    #[error("card {0:?} is not part of this interaction session")]
    UnknownCard(CardUid),
}

impl EngineError for TargetError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoValidTarget | Self::IllegalTarget(_) => ErrorSeverity::Recoverable,
            Self::UnknownCard(_) => ErrorSeverity::Validation,
        }
    }
}

/// Legal battlefield targets for a shape, in enemy-list order.
pub fn legal_targets(shape: TargetShape, enemies: &[EnemyEntity]) -> Vec<BattlefieldTarget> {
    match shape {
        TargetShape::NoTarget => Vec::new(),
        TargetShape::SelfOnly | TargetShape::Player => vec![BattlefieldTarget::Player],
        TargetShape::Enemy | TargetShape::AllEnemies => enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| BattlefieldTarget::Enemy(e.id))
            .collect(),
    }
}

/// Resolve a play gesture against a card's target shape.
///
/// The drop algorithm:
/// - immediate shapes resolve regardless of release position
/// - a release over a legal target chooses it
/// - any other release (nothing, the player, a corpse) auto-selects when
///   exactly one legal target exists in the whole encounter
/// - anything else rejects the play with zero state mutation
pub fn resolve_drop(
    shape: TargetShape,
    release_over: Option<BattlefieldTarget>,
    enemies: &[EnemyEntity],
) -> Result<ResolvedTarget, TargetError> {
    match shape {
        TargetShape::NoTarget => Ok(ResolvedTarget::None),
        TargetShape::SelfOnly | TargetShape::Player => Ok(ResolvedTarget::Player),
        TargetShape::AllEnemies => {
            if enemies.iter().any(|e| e.is_alive()) {
                Ok(ResolvedTarget::AllEnemies)
            } else {
                Err(TargetError::NoValidTarget)
            }
        }
        TargetShape::Enemy => {
            let legal = legal_targets(shape, enemies);
            if let Some(target @ BattlefieldTarget::Enemy(id)) = release_over
                && legal.contains(&target)
            {
                return Ok(ResolvedTarget::Enemy(id));
            }
            // Released anywhere else (nothing, the player, a corpse):
            // auto-resolve only when there is no ambiguity.
            match legal.as_slice() {
                [BattlefieldTarget::Enemy(only)] => Ok(ResolvedTarget::Enemy(*only)),
                _ => match release_over {
                    Some(BattlefieldTarget::Enemy(id)) => Err(TargetError::IllegalTarget(id)),
                    _ => Err(TargetError::NoValidTarget),
                },
            }
        }
    }
}

/// Explicitly owned drag state for one rendered hand.
///
/// Replaces process-wide drag singletons: the session is created when a hand
/// is rendered, passed into the targeting calls, and dropped on teardown.
#[derive(Clone, Debug, Default)]
pub struct InteractionSession {
    hand: Vec<CardUid>,
    dragging: Option<CardUid>,
}

impl InteractionSession {
    /// Open a session over the cards currently in hand.
    pub fn open(hand: impl IntoIterator<Item = CardUid>) -> Self {
        Self {
            hand: hand.into_iter().collect(),
            dragging: None,
        }
    }

    pub fn dragging(&self) -> Option<CardUid> {
        self.dragging
    }

    /// Begin dragging a hand card.
    pub fn begin_drag(&mut self, uid: CardUid) -> Result<(), TargetError> {
        if !self.hand.contains(&uid) {
            return Err(TargetError::UnknownCard(uid));
        }
        self.dragging = Some(uid);
        Ok(())
    }

    /// Release the drag and resolve it against the card's shape.
    ///
    /// The drag ends whether or not resolution succeeds; a rejected drop
    /// leaves the hand untouched for the caller to snap the card back.
    pub fn end_drag(
        &mut self,
        shape: TargetShape,
        release_over: Option<BattlefieldTarget>,
        enemies: &[EnemyEntity],
    ) -> Result<(CardUid, ResolvedTarget), TargetError> {
        let uid = self.dragging.take().ok_or(TargetError::NoValidTarget)?;
        let target = resolve_drop(shape, release_over, enemies)?;
        Ok((uid, target))
    }

    /// Drop a card from the session after it leaves the hand.
    pub fn remove_card(&mut self, uid: CardUid) {
        self.hand.retain(|c| *c != uid);
        if self.dragging == Some(uid) {
            self.dragging = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CardId;

    fn enemy(id: u32, health: u32) -> EnemyEntity {
        let mut e = EnemyEntity::new(
            EnemyId(id),
            CardId::new("rat"),
            "Rat".into(),
            health.max(1),
            Vec::new(),
        );
        if health == 0 {
            e.absorb_damage(u32::MAX);
        }
        e
    }

    #[test]
    fn dead_enemies_are_not_legal_targets() {
        let enemies = vec![enemy(0, 0), enemy(1, 10)];
        let legal = legal_targets(TargetShape::Enemy, &enemies);
        assert_eq!(legal, vec![BattlefieldTarget::Enemy(EnemyId(1))]);
    }

    #[test]
    fn release_over_a_legal_enemy_chooses_it() {
        let enemies = vec![enemy(0, 10), enemy(1, 10)];
        let resolved = resolve_drop(
            TargetShape::Enemy,
            Some(BattlefieldTarget::Enemy(EnemyId(1))),
            &enemies,
        )
        .unwrap();
        assert_eq!(resolved, ResolvedTarget::Enemy(EnemyId(1)));
    }

    #[test]
    fn single_candidate_auto_resolves_from_anywhere() {
        let enemies = vec![enemy(0, 0), enemy(1, 10)];
        let resolved = resolve_drop(TargetShape::Enemy, None, &enemies).unwrap();
        assert_eq!(resolved, ResolvedTarget::Enemy(EnemyId(1)));
    }

    #[test]
    fn release_over_a_corpse_auto_resolves_to_the_lone_survivor() {
        let enemies = vec![enemy(0, 0), enemy(1, 10)];
        let resolved = resolve_drop(
            TargetShape::Enemy,
            Some(BattlefieldTarget::Enemy(EnemyId(0))),
            &enemies,
        )
        .unwrap();
        assert_eq!(resolved, ResolvedTarget::Enemy(EnemyId(1)));
    }

    #[test]
    fn corpse_release_with_two_survivors_stays_rejected() {
        let enemies = vec![enemy(0, 0), enemy(1, 10), enemy(2, 10)];
        let err = resolve_drop(
            TargetShape::Enemy,
            Some(BattlefieldTarget::Enemy(EnemyId(0))),
            &enemies,
        )
        .unwrap_err();
        assert_eq!(err, TargetError::IllegalTarget(EnemyId(0)));
    }

    #[test]
    fn ambiguous_release_is_rejected() {
        let enemies = vec![enemy(0, 10), enemy(1, 10)];
        let err = resolve_drop(TargetShape::Enemy, None, &enemies).unwrap_err();
        assert_eq!(err, TargetError::NoValidTarget);
        assert!(err.severity().is_recoverable());
    }

    #[test]
    fn self_cards_resolve_regardless_of_position() {
        let enemies = vec![enemy(0, 10), enemy(1, 10)];
        for release in [None, Some(BattlefieldTarget::Enemy(EnemyId(0)))] {
            let resolved = resolve_drop(TargetShape::SelfOnly, release, &enemies).unwrap();
            assert_eq!(resolved, ResolvedTarget::Player);
        }
        assert_eq!(
            resolve_drop(TargetShape::NoTarget, None, &enemies).unwrap(),
            ResolvedTarget::None
        );
    }

    #[test]
    fn all_enemies_needs_a_living_enemy() {
        let alive = vec![enemy(0, 5)];
        assert_eq!(
            resolve_drop(TargetShape::AllEnemies, None, &alive).unwrap(),
            ResolvedTarget::AllEnemies
        );
        let dead = vec![enemy(0, 0)];
        assert_eq!(
            resolve_drop(TargetShape::AllEnemies, None, &dead).unwrap_err(),
            TargetError::NoValidTarget
        );
    }

    #[test]
    fn session_scopes_drag_state_to_the_hand() {
        let enemies = vec![enemy(0, 10)];
        let mut session = InteractionSession::open([CardUid(1), CardUid(2)]);

        assert!(matches!(
            session.begin_drag(CardUid(9)),
            Err(TargetError::UnknownCard(_))
        ));

        session.begin_drag(CardUid(1)).unwrap();
        let (uid, target) = session
            .end_drag(TargetShape::Enemy, None, &enemies)
            .unwrap();
        assert_eq!(uid, CardUid(1));
        assert_eq!(target, ResolvedTarget::Enemy(EnemyId(0)));
        assert_eq!(session.dragging(), None);
    }
}
