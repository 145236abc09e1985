//! Transcript segmentation: free text into setup lines and turn blocks.
//!
//! ## Pass structure
//!
//! A single forward pass over the trimmed, non-empty lines. A turn header
//! (`Turn # <n> - <player>'s Turn`) closes the current block and opens the
//! next; everything before the first header is the setup phase. Turn
//! numbers are taken from the headers verbatim, so gaps and repeats in the
//! source survive segmentation unchanged.
//!
//! Segmentation never fails: a line that fits nowhere is still kept as an
//! action of the block it appeared in.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::Roster;

/// Matches a turn header and captures the turn number and player.
///
/// The number capture is bounded at nine digits so it always fits a `u32`;
/// a longer digit run is not a header and falls through as an ordinary line.
static TURN_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Turn #\s*(\d{1,9})\s*-\s*(.+?)'s Turn").expect("turn header pattern")
});

/// Parse a turn header line into its number and player captures.
#[must_use]
pub fn parse_turn_header(line: &str) -> Option<(u32, String)> {
    let caps = TURN_HEADER_RE.captures(line)?;
    let number = caps[1].parse().ok()?;
    Some((number, caps[2].trim().to_string()))
}

/// One turn block as segmented from the transcript: the header captures
/// plus the raw action lines in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTurn {
    /// Turn number from the header, verbatim.
    pub number: u32,
    /// Player named in the header. May be a placeholder in degenerate logs.
    pub player: String,
    /// Raw lines of the block, trimmed, in source order.
    pub actions: Vec<String>,
}

/// A segmented transcript: provenance, roster, setup lines, turn blocks.
///
/// This is the halfway point between raw text and the classified match
/// document. `setup` and the turn action lists still hold raw lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedLog {
    /// Source label (file name or equivalent).
    pub file: String,
    /// Canonical player names in first-seen order.
    pub players: Vec<String>,
    /// Raw lines preceding the first turn header.
    pub setup: Vec<String>,
    /// Turn blocks in source order.
    pub turns: Vec<RawTurn>,
}

impl SegmentedLog {
    /// Segment raw transcript text.
    ///
    /// Empty and whitespace-only input yields a well-formed empty log.
    ///
    /// ## Example
    ///
    /// ```
    /// use ptcgl_replay::transcript::SegmentedLog;
    ///
    /// let log = SegmentedLog::parse(
    ///     "Ash drew 7 cards for the opening hand.\n\
    ///      Turn # 1 - Ash's Turn\n\
    ///      Ash drew a card.",
    ///     "match.log",
    /// );
    /// assert_eq!(log.players, ["Ash"]);
    /// assert_eq!(log.setup.len(), 1);
    /// assert_eq!(log.turns[0].number, 1);
    /// ```
    #[must_use]
    pub fn parse(text: &str, file: impl Into<String>) -> Self {
        let mut setup = Vec::new();
        let mut turns: Vec<RawTurn> = Vec::new();
        let mut current: Option<RawTurn> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some((number, player)) = parse_turn_header(line) {
                if let Some(done) = current.take() {
                    turns.push(done);
                }
                current = Some(RawTurn {
                    number,
                    player,
                    actions: Vec::new(),
                });
                continue;
            }
            match current.as_mut() {
                Some(turn) => turn.actions.push(line.to_string()),
                None => setup.push(line.to_string()),
            }
        }
        if let Some(done) = current.take() {
            turns.push(done);
        }

        let players = extract_players(&setup, &turns);
        let file = file.into();
        debug!(
            "segmented {:?}: {} players, {} setup lines, {} turns",
            file,
            players.len(),
            setup.len(),
            turns.len()
        );
        Self {
            file,
            players,
            setup,
            turns,
        }
    }

    /// The roster implied by this log's player list.
    #[must_use]
    pub fn roster(&self) -> Roster {
        Roster::from_names(&self.players)
    }
}

/// Collect canonical player names from setup lines and turn headers.
#[must_use]
pub fn extract_players(setup: &[String], turns: &[RawTurn]) -> Vec<String> {
    let mut roster = Roster::default();
    for line in setup {
        roster.scan_setup_line(line);
    }
    for turn in turns {
        roster.add(&turn.player);
    }
    roster.into_names()
}
