//! The board engine: a stateful fold from classified actions to
//! snapshots.
//!
//! ## Fold shape
//!
//! The engine owns the only mutable board map in the crate. Setup actions
//! fold first and emit snapshot 0; each turn's actions then fold in order
//! and emit one snapshot per turn. Snapshots are deep copies, so the
//! working state never aliases anything already emitted.
//!
//! ## Fail-soft
//!
//! The fold never rejects input. Actions whose actor cannot be resolved,
//! or whose target is nowhere on the board, are recorded in the timeline
//! but apply no board effect. Guessing an owner would corrupt the board
//! more often than it would help.

use log::debug;
use rustc_hash::FxHashMap;

use super::snapshot::{BoardMap, Snapshot};
use super::state::{PlayerBoard, FULL_PRIZES};
use crate::classify::{Action, ActionKind, PlayDestination, Turn};
use crate::core::Roster;

/// Folds classified actions into per-player boards and emits snapshots.
///
/// ## Example
///
/// ```
/// use ptcgl_replay::board::BoardEngine;
/// use ptcgl_replay::classify::classify_line;
/// use ptcgl_replay::core::Roster;
///
/// let roster = Roster::from_names(&["Ash", "Misty"]);
/// let mut engine = BoardEngine::new(roster);
/// engine.apply_setup(&[classify_line("Ash drew 7 cards for the opening hand.")]);
/// let snapshots = engine.into_snapshots();
/// assert_eq!(snapshots[0].player("Ash").unwrap().hand_size, Some(7));
/// ```
pub struct BoardEngine {
    roster: Roster,
    board: BoardMap,
    prizes_taken: FxHashMap<String, u32>,
    snapshots: Vec<Snapshot>,
}

impl BoardEngine {
    /// Create an engine with a fresh board per roster player.
    #[must_use]
    pub fn new(roster: Roster) -> Self {
        let mut board = BoardMap::default();
        for name in roster.names() {
            board.insert(name.clone(), PlayerBoard::new());
        }
        Self {
            roster,
            board,
            prizes_taken: FxHashMap::default(),
            snapshots: Vec::new(),
        }
    }

    /// Replay a whole match: setup actions, then each turn in order.
    #[must_use]
    pub fn replay(roster: Roster, setup: &[Action], turns: &[Turn]) -> Vec<Snapshot> {
        let mut engine = Self::new(roster);
        engine.apply_setup(setup);
        for turn in turns {
            engine.apply_turn(turn.number, &turn.player, &turn.actions);
        }
        engine.into_snapshots()
    }

    /// Fold the setup-phase actions and emit snapshot 0.
    ///
    /// Setup lines carry no enclosing turn, so placeholder actors stay
    /// unresolved there. After the fold, any player with an empty active
    /// position and a non-empty bench has their first bench card promoted:
    /// some logs only ever say where cards were "played" during setup.
    pub fn apply_setup(&mut self, actions: &[Action]) {
        for action in actions {
            self.apply_action(action, None);
        }
        for board in self.board.values_mut() {
            if board.active.is_none() && !board.bench.is_empty() {
                let first = board.bench.remove(0);
                board.active = Some(first);
            }
        }
        self.take_snapshot(0);
    }

    /// Fold one turn's actions and emit its snapshot.
    pub fn apply_turn(&mut self, number: u32, player: &str, actions: &[Action]) {
        for action in actions {
            self.apply_action(action, Some(player));
        }
        self.take_snapshot(number);
    }

    /// The working board. Mostly useful in tests; snapshots are the
    /// supported way to observe a replay.
    #[must_use]
    pub fn board(&self) -> &BoardMap {
        &self.board
    }

    /// Consume the engine, yielding the emitted snapshots in order.
    #[must_use]
    pub fn into_snapshots(self) -> Vec<Snapshot> {
        debug!(
            "replay complete: {} snapshots over {} boards",
            self.snapshots.len(),
            self.board.len()
        );
        self.snapshots
    }

    /// Apply one action to the working board.
    fn apply_action(&mut self, action: &Action, turn_player: Option<&str>) {
        match &action.kind {
            ActionKind::Draw { actor, count } => {
                if let Some(count) = count {
                    if let Some(player) = self.roster.resolve(actor.as_deref(), turn_player) {
                        self.ensure_board(player).record_draw(*count);
                    }
                }
            }
            ActionKind::Play { actor, card, to } => match to {
                Some(PlayDestination::Active) => match actor.as_deref() {
                    Some(actor) => {
                        if let Some(player) = self.roster.resolve(Some(actor), turn_player) {
                            self.ensure_board(player).promote(card);
                        }
                    }
                    // "<card> is now in the Active Spot": the card name is
                    // the only ownership evidence on the line.
                    None => self.apply_unowned_promotion(card),
                },
                Some(PlayDestination::Bench) => {
                    if let Some(player) = self.roster.resolve(actor.as_deref(), turn_player) {
                        self.ensure_board(player).move_to_bench(card);
                    }
                }
                // Stadium cards and destination-less plays occupy no
                // tracked position.
                Some(PlayDestination::Stadium) | None => {}
            },
            ActionKind::Knockout { owner, target } => {
                self.apply_knockout(owner.as_deref(), target);
            }
            ActionKind::Prize { actor, count } => {
                if let Some(player) = self.roster.resolve(actor.as_deref(), turn_player) {
                    let player = player.to_string();
                    self.ensure_board(&player);
                    let taken = self.prizes_taken.entry(player).or_insert(0);
                    *taken = taken.saturating_add(count.unwrap_or(1));
                }
            }
            // Event-only kinds: recorded in the timeline, no occupancy
            // change. Evolution deliberately leaves slot identity alone.
            ActionKind::Attach { .. }
            | ActionKind::Attack { .. }
            | ActionKind::Evolve { .. }
            | ActionKind::SpecialMechanic { .. }
            | ActionKind::SpecialCondition { .. }
            | ActionKind::PhaseMarker
            | ActionKind::Result { .. }
            | ActionKind::Other => {}
        }
    }

    /// Promote a card named without an owner.
    ///
    /// Candidate order: roster order, then any boards materialized
    /// mid-fold. The first player whose bench holds the card takes the
    /// promotion; no holder means no effect. Promotion after a knockout
    /// happens on the attacker's turn, so the turn player is not a
    /// usable fallback for this form.
    fn apply_unowned_promotion(&mut self, card: &str) {
        let mut candidates: Vec<String> = self.roster.names().to_vec();
        for name in self.board.keys() {
            if !candidates.iter().any(|c| c == name) {
                candidates.push(name.clone());
            }
        }
        for name in candidates {
            let benched = self
                .board
                .get(&name)
                .is_some_and(|board| board.bench.iter().any(|c| c.is_named(card)));
            if benched {
                if let Some(board) = self.board.get_mut(&name) {
                    board.promote(card);
                }
                return;
            }
        }
    }

    /// Remove a Knocked Out card from whichever board holds it.
    ///
    /// Candidate order: the line's own owner capture when it resolves,
    /// then roster order, then any boards materialized mid-fold. The
    /// first board actually holding the card takes the removal; finding
    /// none leaves every board untouched.
    fn apply_knockout(&mut self, owner: Option<&str>, target: &str) {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(name) = self.roster.resolve(owner, None) {
            candidates.push(name.to_string());
        }
        for name in self.roster.names() {
            if !candidates.iter().any(|c| c == name) {
                candidates.push(name.clone());
            }
        }
        for name in self.board.keys() {
            if !candidates.iter().any(|c| c == name) {
                candidates.push(name.clone());
            }
        }
        for name in candidates {
            if let Some(board) = self.board.get_mut(&name) {
                if board.remove_named(target) {
                    return;
                }
            }
        }
    }

    /// The named player's working board, created on first touch.
    fn ensure_board(&mut self, player: &str) -> &mut PlayerBoard {
        self.board.entry(player.to_string()).or_default()
    }

    /// Deep-copy the working board, stamp derived prize counts, and emit.
    ///
    /// Prizes are derived, not stored: the working board always carries
    /// the starting count and each snapshot shows six minus the prize
    /// cards its player has taken so far.
    fn take_snapshot(&mut self, turn_number: u32) {
        let mut snapshot = Snapshot::capture(turn_number, &self.board);
        for (player, taken) in &self.prizes_taken {
            if let Some(board) = snapshot.board.get_mut(player) {
                board.prizes = FULL_PRIZES.saturating_sub(*taken);
            }
        }
        self.snapshots.push(snapshot);
    }
}
