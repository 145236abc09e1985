//! Action classification: the typed event vocabulary and the ordered
//! rule table that maps raw lines onto it.

pub mod action;
pub mod rules;

pub use action::{Action, ActionKind, PlayDestination, Turn};
pub use rules::{classify_line, classify_turn, is_notable_mechanic};
