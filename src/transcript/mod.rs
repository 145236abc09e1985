//! Transcript intake: segmentation of raw text and acceptance of
//! structured documents.
//!
//! Both entry points produce a [`SegmentedLog`], the raw-line form the
//! classifier consumes.

pub mod input;
pub mod segment;

pub use input::ShapeError;
pub use segment::{extract_players, parse_turn_header, RawTurn, SegmentedLog};
