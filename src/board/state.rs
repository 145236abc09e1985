//! Per-player board state: the one mutable structure in the crate.
//!
//! A `PlayerBoard` is owned exclusively by the board engine during a
//! replay; everything that escapes is a deep copy inside a snapshot.
//! Bench order is meaningful: insertion order is bench position, and a
//! demoted active card always lands at the end.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::CardSlot;

/// Prize cards each player starts with.
pub const FULL_PRIZES: u32 = 6;

/// One player's visible board: active card, ordered bench, prize count,
/// and hand size when the log has told us about it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBoard {
    /// The single front position. `None` until something is promoted, or
    /// after the active card is Knocked Out.
    pub active: Option<CardSlot>,
    /// Benched cards in insertion order.
    pub bench: SmallVec<[CardSlot; 5]>,
    /// Remaining prize cards, in `0..=6`.
    pub prizes: u32,
    /// Cards in hand, tracked from draw events only.
    #[serde(rename = "handSize", default, skip_serializing_if = "Option::is_none")]
    pub hand_size: Option<u32>,
}

impl Default for PlayerBoard {
    fn default() -> Self {
        Self {
            active: None,
            bench: SmallVec::new(),
            prizes: FULL_PRIZES,
            hand_size: None,
        }
    }
}

impl PlayerBoard {
    /// A fresh board: no active, empty bench, full prizes, unknown hand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record drawn cards, initializing the hand from zero if unknown.
    pub fn record_draw(&mut self, count: u32) {
        let current = self.hand_size.unwrap_or(0);
        self.hand_size = Some(current.saturating_add(count));
    }

    /// Remove the first bench card with this name, keeping bench order.
    pub fn remove_bench(&mut self, name: &str) -> Option<CardSlot> {
        let index = self.bench.iter().position(|card| card.is_named(name))?;
        Some(self.bench.remove(index))
    }

    /// Promote the named card to the active position.
    ///
    /// The card is pulled from the bench when present there, otherwise it
    /// materializes (logs routinely promote cards never seen before). A
    /// different card already in the active position is demoted to the end
    /// of the bench; a same-named one is simply replaced. Upholds the
    /// single-active invariant by construction.
    pub fn promote(&mut self, name: &str) {
        let previous = self.active.take();
        let slot = self
            .remove_bench(name)
            .unwrap_or_else(|| CardSlot::new(name));
        self.active = Some(slot);

        if let Some(card) = previous {
            if !card.is_named(name) {
                // No duplicate bench entries for the demoted card.
                self.remove_bench(&card.name);
                self.bench.push(card);
            }
        }
    }

    /// Move the named card to the end of the bench, removing it first
    /// from wherever it sits on this board.
    pub fn move_to_bench(&mut self, name: &str) {
        self.remove_named(name);
        self.bench.push(CardSlot::new(name));
    }

    /// Remove the named card from the active position or the bench.
    ///
    /// Returns whether anything was removed.
    pub fn remove_named(&mut self, name: &str) -> bool {
        if self.active.as_ref().is_some_and(|card| card.is_named(name)) {
            self.active = None;
            return true;
        }
        self.remove_bench(name).is_some()
    }

    /// Whether the named card sits anywhere on this board.
    #[must_use]
    pub fn holds(&self, name: &str) -> bool {
        self.active.as_ref().is_some_and(|card| card.is_named(name))
            || self.bench.iter().any(|card| card.is_named(name))
    }
}
