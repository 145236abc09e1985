//! Core identity types: players and cards.
//!
//! These are the building blocks the rest of the crate agrees on. Everything
//! downstream (segmentation, classification, board replay, summary) speaks
//! in terms of roster names and card slots.

pub mod card;
pub mod player;

pub use card::CardSlot;
pub use player::{is_placeholder, Roster};
