//! The match document: classified transcript plus summary, and the
//! replay entry points callers actually use.
//!
//! A `MatchDocument` is everything recoverable from one transcript in a
//! single pass: provenance, roster, raw setup lines, classified turns,
//! and the aggregate summary. Snapshots are derived on demand by
//! replaying the document through the board engine.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::{BoardEngine, Snapshot};
use crate::classify::{classify_line, classify_turn, Action, Turn};
use crate::core::Roster;
use crate::summary::{summarize, MatchSummary};
use crate::transcript::{SegmentedLog, ShapeError};

/// A fully classified match, serializable as pretty-printed JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDocument {
    /// Source label (file name or equivalent).
    pub file: String,
    /// Canonical player names in first-seen order.
    pub players: Vec<String>,
    /// Raw setup lines, kept unclassified on the wire.
    pub setup: Vec<String>,
    /// Classified turns in source order.
    pub turns: Vec<Turn>,
    /// Aggregate view: knockouts, mechanics, conditions, result.
    pub summary: MatchSummary,
}

impl MatchDocument {
    /// Build a document from raw transcript text.
    ///
    /// ## Example
    ///
    /// ```
    /// use ptcgl_replay::replay::MatchDocument;
    ///
    /// let doc = MatchDocument::from_text(
    ///     "Ash drew 7 cards for the opening hand.\n\
    ///      Turn # 1 - Ash's Turn\n\
    ///      Ash drew a card.",
    ///     "match.log",
    /// );
    /// assert_eq!(doc.players, ["Ash"]);
    /// assert_eq!(doc.summary.turn_count, 1);
    /// ```
    #[must_use]
    pub fn from_text(text: &str, file: impl Into<String>) -> Self {
        Self::from_segmented(SegmentedLog::parse(text, file))
    }

    /// Load text of unknown provenance: structured JSON when it satisfies
    /// the shape contract, raw transcript otherwise.
    #[must_use]
    pub fn load(text: &str, file: impl Into<String>) -> Self {
        Self::from_segmented(SegmentedLog::load(text, file))
    }

    /// Build a document from structured JSON text, failing on shape.
    pub fn from_structured_str(json: &str) -> Result<Self, ShapeError> {
        Ok(Self::from_segmented(SegmentedLog::from_structured_str(
            json,
        )?))
    }

    /// Build a document from an already-parsed JSON value.
    pub fn from_structured_value(value: &Value) -> Result<Self, ShapeError> {
        Ok(Self::from_segmented(SegmentedLog::from_value(value)?))
    }

    /// Classify a segmented log and aggregate its summary.
    #[must_use]
    pub fn from_segmented(log: SegmentedLog) -> Self {
        let roster = Roster::from_names(&log.players);
        let turns: Vec<Turn> = log.turns.iter().map(classify_turn).collect();
        let summary = summarize(&roster, &turns);
        debug!(
            "document built from {:?}: {} players, {} turns",
            log.file,
            roster.len(),
            turns.len()
        );
        Self {
            file: log.file,
            players: log.players,
            setup: log.setup,
            turns,
            summary,
        }
    }

    /// The roster implied by this document's player list.
    #[must_use]
    pub fn roster(&self) -> Roster {
        Roster::from_names(&self.players)
    }

    /// Replay the document into per-turn board snapshots.
    ///
    /// Index 0 is the setup boundary; index N is the board after turn N's
    /// actions. Each snapshot is independently owned.
    #[must_use]
    pub fn snapshots(&self) -> Vec<Snapshot> {
        let setup: Vec<Action> = self.setup.iter().map(|line| classify_line(line)).collect();
        BoardEngine::replay(self.roster(), &setup, &self.turns)
    }

    /// Serialize as the pretty-printed JSON interchange form.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ActionKind;

    const SAMPLE: &str = "\
Ash drew 7 cards for the opening hand.
Misty drew 7 cards for the opening hand.
Ash played Pikachu to the Active Spot.
Turn # 1 - Ash's Turn
Ash drew a card.
Turn # 2 - Misty's Turn
Misty drew a card.
You conceded.
";

    #[test]
    fn test_from_text_end_to_end() {
        let doc = MatchDocument::from_text(SAMPLE, "sample.log");
        assert_eq!(doc.file, "sample.log");
        assert_eq!(doc.players, ["Ash", "Misty"]);
        assert_eq!(doc.setup.len(), 3);
        assert_eq!(doc.turns.len(), 2);
        assert!(matches!(
            doc.turns[0].actions[0].kind,
            ActionKind::Draw { .. }
        ));
        assert_eq!(doc.summary.turn_count, 2);
        assert_eq!(doc.summary.result.winner.as_deref(), Some("Ash"));
        assert_eq!(doc.summary.result.final_turn, Some(2));
    }

    #[test]
    fn test_snapshots_derive_from_document() {
        let doc = MatchDocument::from_text(SAMPLE, "sample.log");
        let snapshots = doc.snapshots();
        assert_eq!(snapshots.len(), doc.turns.len() + 1);
        assert_eq!(snapshots[0].turn_number, 0);
        assert_eq!(snapshots[0].player("Ash").unwrap().hand_size, Some(7));
        assert_eq!(snapshots[1].player("Ash").unwrap().hand_size, Some(8));
    }

    #[test]
    fn test_empty_input_yields_empty_document() {
        let doc = MatchDocument::from_text("", "empty.log");
        assert!(doc.players.is_empty());
        assert!(doc.turns.is_empty());
        assert_eq!(doc.summary.turn_count, 0);
        assert_eq!(doc.snapshots().len(), 1);
    }

    #[test]
    fn test_document_round_trips_through_load() {
        let doc = MatchDocument::from_text(SAMPLE, "sample.log");
        let json = doc.to_json_pretty().unwrap();
        let again = MatchDocument::load(&json, "unused.log");
        assert_eq!(again, doc);
    }

    #[test]
    fn test_pretty_output_shape() {
        let doc = MatchDocument::from_text(SAMPLE, "sample.log");
        let json = doc.to_json_pretty().unwrap();
        assert!(json.contains("\"file\": \"sample.log\""));
        assert!(json.contains("\"turn_count\": 2"));
        assert!(json.contains("\"kind\": \"draw\""));
    }
}
