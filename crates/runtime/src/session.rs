//! The run session: one player's journey through a dungeon.
//!
//! [`RunSession`] drives the game-core engine against a content catalog and
//! checkpoints the full run record through a [`RunStateStore`] after every
//! state-changing operation. A crash at any point therefore loses at most
//! the operation in flight; the next launch sees the last checkpoint.
//!
//! The store doubles as the run lock: starting a new session while an
//! `Active` record exists is refused until that run reaches a terminal
//! status.

use std::fmt;

use chrono::Utc;

use game_core::{
    CardId, CardOracle, CombatOutcome, CombatState, DungeonDeckBuilder,
    DungeonDeckDefinition, EnemyOracle, GameConfig, PcgRng, PlayOutcome, PlayerEntity,
    PlayerSnapshot, Powers, RoomCard, RoomKind, RoomOracle, RoomUid, RunProgress,
    RunStatus, TurnReport,
};
use game_core::combat::{BattlefieldTarget, CardUid};

use crate::error::{SessionError, SessionResult};
use crate::store::{LockedRunState, RunId, RunStateStore};

/// What entering a selected room led to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomOutcome {
    /// A combat room: the battlefield is live, the opening hand dealt.
    CombatStarted,
    /// A non-combat room, resolved immediately.
    RoomCleared(RoomKind),
}

/// A live run backed by a checkpoint store.
pub struct RunSession<'c, C, S>
where
    C: RoomOracle + CardOracle + EnemyOracle,
    S: RunStateStore,
{
    content: &'c C,
    config: GameConfig,
    store: S,
    state: LockedRunState,
}

// Manual impl: the content and store type parameters need not be Debug.
impl<C, S> fmt::Debug for RunSession<'_, C, S>
where
    C: RoomOracle + CardOracle + EnemyOracle,
    S: RunStateStore,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunSession")
            .field("run_id", &self.state.run_id)
            .field("status", &self.state.status)
            .field("in_combat", &self.state.combat.is_some())
            .finish_non_exhaustive()
    }
}

impl<'c, C, S> RunSession<'c, C, S>
where
    C: RoomOracle + CardOracle + EnemyOracle,
    S: RunStateStore,
{
    /// Start a fresh run from the built-in template composition.
    ///
    /// Refused with [`SessionError::RunLocked`] while an active record holds
    /// the run lock; terminal records are overwritten.
    pub fn start(
        content: &'c C,
        config: GameConfig,
        store: S,
        starter_deck: Vec<(CardId, bool)>,
        seed: u64,
    ) -> SessionResult<Self> {
        if let Some(existing) = store.load()? {
            if existing.is_active() {
                return Err(SessionError::RunLocked(existing.run_id));
            }
        }

        let mut rng = PcgRng::seeded(seed);
        let deck = DungeonDeckBuilder::new(content).from_template(&mut rng)?;

        let state = LockedRunState {
            run_id: RunId::generate(),
            seed,
            status: RunStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            progress: RunProgress::new(deck.len()),
            player: PlayerSnapshot {
                current_health: config.starting_health,
                max_health: config.starting_health,
                max_energy: config.base_energy,
                deck: starter_deck,
            },
            deck,
            pending_choices: Vec::new(),
            current_room: None,
            combat: None,
            modifiers: Vec::new(),
            rng,
        };

        tracing::info!(run_id = %state.run_id, seed, rooms = state.deck.len(), "run started");

        let mut session = Self {
            content,
            config,
            store,
            state,
        };
        session.checkpoint()?;
        Ok(session)
    }

    /// Start a fresh run from an externally supplied deck definition.
    pub fn start_from_definition(
        content: &'c C,
        config: GameConfig,
        store: S,
        starter_deck: Vec<(CardId, bool)>,
        definition: &DungeonDeckDefinition,
        seed: u64,
    ) -> SessionResult<Self> {
        if let Some(existing) = store.load()? {
            if existing.is_active() {
                return Err(SessionError::RunLocked(existing.run_id));
            }
        }

        let mut rng = PcgRng::seeded(seed);
        let deck = DungeonDeckBuilder::new(content).from_definition(definition, &mut rng)?;

        let state = LockedRunState {
            run_id: RunId::generate(),
            seed,
            status: RunStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            progress: RunProgress::new(deck.len()),
            player: PlayerSnapshot {
                current_health: config.starting_health,
                max_health: config.starting_health,
                max_energy: config.base_energy,
                deck: starter_deck,
            },
            deck,
            pending_choices: Vec::new(),
            current_room: None,
            combat: None,
            modifiers: Vec::new(),
            rng,
        };

        tracing::info!(run_id = %state.run_id, seed, "run started from definition");

        let mut session = Self {
            content,
            config,
            store,
            state,
        };
        session.checkpoint()?;
        Ok(session)
    }

    /// Resume the run recorded in the store.
    ///
    /// Terminal records refuse resumption; use
    /// [`crate::RecoverySummary::load`] first to show the player what would
    /// be resumed.
    pub fn resume(content: &'c C, config: GameConfig, store: S) -> SessionResult<Self> {
        let state = store.load()?.ok_or(SessionError::NoActiveRun)?;
        if state.status.is_terminal() {
            return Err(SessionError::RunNotResumable {
                run_id: state.run_id,
                status: state.status,
            });
        }

        tracing::info!(
            run_id = %state.run_id,
            rooms_cleared = state.progress.cleared_count(),
            in_combat = state.combat.is_some(),
            "run resumed"
        );

        Ok(Self {
            content,
            config,
            store,
            state,
        })
    }

    pub fn state(&self) -> &LockedRunState {
        &self.state
    }

    pub fn status(&self) -> RunStatus {
        self.state.status
    }

    pub fn combat(&self) -> Option<&CombatState> {
        self.state.combat.as_ref()
    }

    pub fn pending_choices(&self) -> &[RoomCard] {
        &self.state.pending_choices
    }

    /// Draw the next room choices from the dungeon deck. The draw width is
    /// `room_choices` from the game config.
    ///
    /// Idempotent while choices are pending: a crash between draw and
    /// selection resumes with the same choices rather than drawing again.
    pub fn draw_room_choices(&mut self) -> SessionResult<&[RoomCard]> {
        self.require_active()?;
        if self.state.combat.is_some() {
            return Err(SessionError::CombatInProgress);
        }
        if !self.state.pending_choices.is_empty() {
            return Ok(&self.state.pending_choices);
        }
        if self.state.deck.is_empty() {
            return Err(SessionError::DeckExhausted);
        }

        let deck = std::mem::take(&mut self.state.deck);
        let drawn = deck.draw(self.config.room_choices);
        self.state.pending_choices = drawn.choices;
        self.state.deck = drawn.remaining;

        tracing::debug!(
            choices = self.state.pending_choices.len(),
            remaining = self.state.deck.len(),
            "room choices drawn"
        );

        self.checkpoint()?;
        Ok(&self.state.pending_choices)
    }

    /// Enter one of the pending room choices. The unchosen rooms are
    /// discarded from the run.
    pub fn select_room(&mut self, uid: RoomUid) -> SessionResult<RoomOutcome> {
        self.require_active()?;
        if self.state.combat.is_some() {
            return Err(SessionError::CombatInProgress);
        }
        if self.state.pending_choices.is_empty() {
            return Err(SessionError::NoChoicesDrawn);
        }
        let index = self
            .state
            .pending_choices
            .iter()
            .position(|c| c.uid == uid)
            .ok_or(SessionError::UnknownChoice(uid))?;

        let room = self.state.pending_choices.swap_remove(index);
        self.state.pending_choices.clear();

        tracing::info!(room = %room.definition_id, kind = %room.kind, "room entered");

        let outcome = if room.kind.has_combat() {
            let enemy_ids = match &room.enemy_card_ids {
                Some(ids) => ids.clone(),
                None => self.content.room(&room.definition_id)?.monsters.clone(),
            };
            let player = PlayerEntity {
                current_health: self.state.player.current_health,
                max_health: self.state.player.max_health,
                block: 0,
                energy: self.state.player.max_energy,
                max_energy: self.state.player.max_energy,
                powers: Powers::empty(),
            };
            let combat = CombatState::start(
                player,
                &enemy_ids,
                self.state.player.deck.clone(),
                self.content,
                &self.config,
                &mut self.state.rng,
            )?;
            self.state.current_room = Some(room);
            self.state.combat = Some(combat);
            RoomOutcome::CombatStarted
        } else {
            if room.kind == RoomKind::Campfire {
                let heal = self.state.player.max_health / 3;
                self.state.player.rest(heal);
            }
            self.state
                .progress
                .record_cleared_room(room.definition_id.clone());
            RoomOutcome::RoomCleared(room.kind)
        };

        self.checkpoint()?;
        Ok(outcome)
    }

    /// Play one hand card in the active combat.
    pub fn play_card(
        &mut self,
        uid: CardUid,
        release_over: Option<BattlefieldTarget>,
    ) -> SessionResult<PlayOutcome> {
        self.require_active()?;
        let LockedRunState { combat, rng, .. } = &mut self.state;
        let combat = combat.as_mut().ok_or(SessionError::NotInCombat)?;

        let outcome = combat.play_card(self.content, rng, uid, release_over)?;
        let combat_outcome = combat.outcome();

        if let Some(result) = combat_outcome {
            self.settle_combat(result)?;
        }
        self.checkpoint()?;
        Ok(outcome)
    }

    /// End the player turn in the active combat.
    pub fn end_turn(&mut self) -> SessionResult<TurnReport> {
        self.require_active()?;
        let LockedRunState { combat, rng, .. } = &mut self.state;
        let combat = combat.as_mut().ok_or(SessionError::NotInCombat)?;

        let report = combat.end_turn(self.content, &self.config, rng)?;

        if let Some(result) = report.outcome {
            self.settle_combat(result)?;
        }
        self.checkpoint()?;
        Ok(report)
    }

    /// Give up the run. Only active runs can be abandoned.
    pub fn abandon(&mut self) -> SessionResult<()> {
        self.state.transition(RunStatus::Abandoned)?;
        self.state.combat = None;
        self.state.pending_choices.clear();
        tracing::info!(run_id = %self.state.run_id, "run abandoned");
        self.checkpoint()
    }

    /// Fold a finished combat back into the run record.
    fn settle_combat(&mut self, result: CombatOutcome) -> SessionResult<()> {
        let Some(combat) = self.state.combat.take() else {
            return Ok(());
        };
        let room = self.state.current_room.take();
        let room_kind = room.as_ref().map(|r| r.kind);

        match result {
            CombatOutcome::Victory => {
                self.state.player.current_health = combat.player.current_health;
                if let Some(room) = room {
                    self.state.progress.record_cleared_room(room.definition_id);
                }
                tracing::info!(
                    health = self.state.player.current_health,
                    floor = self.state.progress.floor,
                    "combat won"
                );
                // The boss is the deck's final room; beating it wins the run.
                if room_kind == Some(RoomKind::Boss) {
                    self.state.transition(RunStatus::Completed)?;
                    tracing::info!(run_id = %self.state.run_id, "dungeon cleared");
                }
            }
            CombatOutcome::Defeat => {
                self.state.player.current_health = 0;
                self.state.transition(RunStatus::Failed)?;
                tracing::info!(run_id = %self.state.run_id, "run failed");
            }
        }
        Ok(())
    }

    fn require_active(&self) -> SessionResult<()> {
        if self.state.status.is_terminal() {
            return Err(SessionError::RunAlreadyTerminal {
                run_id: self.state.run_id.clone(),
                status: self.state.status,
            });
        }
        Ok(())
    }

    /// Persist the current record. Called after every mutating operation.
    fn checkpoint(&mut self) -> SessionResult<()> {
        self.state.touch();
        self.store.save(&self.state)?;
        Ok(())
    }
}
