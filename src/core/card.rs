//! Card slots: named cards occupying board positions.
//!
//! The transcript never exposes stable card identifiers, so a slot is
//! tracked purely by the name the log prints. Two copies of the same card
//! are indistinguishable; board operations that search by name act on the
//! first occurrence.

use serde::{Deserialize, Serialize};

/// A named card sitting in the Active Spot or on the Bench.
///
/// ## Example
///
/// ```
/// use ptcgl_replay::core::CardSlot;
///
/// let slot = CardSlot::new("Pikachu");
/// assert_eq!(slot.name, "Pikachu");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardSlot {
    /// Card name exactly as the log spells it.
    pub name: String,
}

impl CardSlot {
    /// Create a slot holding the named card.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Whether this slot holds the named card.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }
}

impl std::fmt::Display for CardSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
