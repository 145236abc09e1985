//! Board reconstruction: mutable per-player state, the replay fold, and
//! the immutable snapshots it emits.

pub mod engine;
pub mod snapshot;
pub mod state;

pub use engine::BoardEngine;
pub use snapshot::{BoardMap, Snapshot};
pub use state::{PlayerBoard, FULL_PRIZES};
