//! # ptcgl-replay
//!
//! A log-to-state reconstruction engine for Pokémon TCG Live match
//! transcripts: free text in, classified turns, board snapshots, and a
//! match summary out.
//!
//! ## Design Principles
//!
//! 1. **Fail-soft**: transcripts have no schema, so nothing about a line
//!    is allowed to abort a parse. Unrecognized lines classify as `other`
//!    and keep their text; unresolvable actors record without applying.
//!
//! 2. **Ordered rules, not scattered matching**: every line meets one
//!    fixed-priority rule table. The order is a tested contract.
//!
//! 3. **Immutable history**: the working board is private to the replay
//!    fold; everything callers see is an independently-owned snapshot.
//!
//! ## Architecture
//!
//! Text flows one way: segmentation splits setup from turn blocks, the
//! classifier types each line, the board engine folds the typed stream
//! into per-turn snapshots, and the aggregator reduces it to a summary.
//! The whole pipeline is synchronous, deterministic, and I/O-free; the
//! same text always yields byte-identical output.
//!
//! ## Modules
//!
//! - `core`: player roster, actor resolution, card slots
//! - `transcript`: raw-text segmentation and structured-input acceptance
//! - `classify`: the action vocabulary and the ordered rule table
//! - `board`: per-player board state, the replay fold, snapshots
//! - `summary`: knockout/mechanic/result aggregation
//! - `replay`: the match document facade

pub mod board;
pub mod classify;
pub mod core;
pub mod replay;
pub mod summary;
pub mod transcript;

// Re-export commonly used types
pub use crate::core::{CardSlot, Roster};

pub use crate::transcript::{RawTurn, SegmentedLog, ShapeError};

pub use crate::classify::{
    classify_line, classify_turn, Action, ActionKind, PlayDestination, Turn,
};

pub use crate::board::{BoardEngine, BoardMap, PlayerBoard, Snapshot, FULL_PRIZES};

pub use crate::summary::{
    summarize, ConditionEvent, KnockoutEvent, MatchResult, MatchSummary, NotableMechanic,
    ResultMethod,
};

pub use crate::replay::MatchDocument;
