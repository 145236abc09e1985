//! Immutable board snapshots taken at turn boundaries.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::state::PlayerBoard;

/// The board map: player name to board. `FxHashMap` for cheap lookups;
/// nothing iterates it order-sensitively.
pub type BoardMap = FxHashMap<String, PlayerBoard>;

/// The full board as of a turn boundary.
///
/// A snapshot owns a deep copy of every board it holds: no snapshot
/// shares storage with another or with the engine's working state, so
/// stepping back through history can never observe later mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// 0 for the setup boundary, then the turn number just folded.
    #[serde(rename = "turnNumber")]
    pub turn_number: u32,
    /// Per-player boards, deep-copied at capture time.
    pub board: BoardMap,
}

impl Snapshot {
    /// Capture a deep copy of the working board.
    #[must_use]
    pub fn capture(turn_number: u32, board: &BoardMap) -> Self {
        Self {
            turn_number,
            board: board.clone(),
        }
    }

    /// A player's board in this snapshot, if present.
    #[must_use]
    pub fn player(&self, name: &str) -> Option<&PlayerBoard> {
        self.board.get(name)
    }
}
