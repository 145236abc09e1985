//! Classified actions: the typed event vocabulary of a match.
//!
//! ## Wire format
//!
//! An action serializes as a flat JSON object: the original line under
//! `raw`, the discriminant under `kind`, and the variant's captures beside
//! them. Optional captures are omitted when absent, so documents stay
//! stable across re-parses of the same text.
//!
//! ```json
//! { "raw": "Misty's Starmie used Water Gun on Pikachu for 40 damage.",
//!   "kind": "attack", "attackerOwner": "Misty", "attacker": "Starmie",
//!   "attack": "Water Gun", "target": "Pikachu", "damage": 40 }
//! ```

use serde::{Deserialize, Serialize};

/// A classified log line: the raw text plus its typed interpretation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The line exactly as segmented (trimmed).
    pub raw: String,
    /// Typed interpretation of the line.
    #[serde(flatten)]
    pub kind: ActionKind,
}

/// Where a played card was placed, when the line says.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayDestination {
    #[serde(rename = "Active Spot")]
    Active,
    #[serde(rename = "Bench")]
    Bench,
    #[serde(rename = "Stadium spot")]
    Stadium,
}

impl PlayDestination {
    /// Map a captured destination phrase to its variant.
    #[must_use]
    pub fn from_capture(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("active spot") {
            Some(Self::Active)
        } else if trimmed.eq_ignore_ascii_case("bench") {
            Some(Self::Bench)
        } else if trimmed.eq_ignore_ascii_case("stadium spot") {
            Some(Self::Stadium)
        } else {
            None
        }
    }
}

/// The typed event vocabulary.
///
/// Captures that the grammar marks optional are `Option` here; a field
/// that is present but unparseable (an out-of-range count, say) also
/// lands as `None` rather than failing the line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    /// Cards drawn, including the opening hand and mulligan bonus draws.
    Draw {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        actor: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
    },
    /// Energy attached to a named card.
    Attach {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        actor: Option<String>,
        energy: String,
        target: String,
    },
    /// An attack with owner, attacker, attack name, target, and damage.
    Attack {
        #[serde(rename = "attackerOwner")]
        attacker_owner: String,
        attacker: String,
        attack: String,
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        damage: Option<u32>,
        /// Bonus damage from a Weakness clause on the same line.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extra_damage: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extra_reason: Option<String>,
    },
    /// An evolution from one card name to another.
    Evolve {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        actor: Option<String>,
        from: String,
        to: String,
        /// Whether the evolution target is a VSTAR.
        #[serde(default, skip_serializing_if = "is_false")]
        to_vstar: bool,
    },
    /// A card played, promoted, or benched.
    Play {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        actor: Option<String>,
        card: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<PlayDestination>,
    },
    /// A card Knocked Out, with its owner when the line names one.
    Knockout {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
        target: String,
    },
    /// A once-per-game power (VSTAR Power, Legacy Star, Apex Dragon).
    SpecialMechanic { detail: String },
    /// A special condition applied to a card.
    SpecialCondition { target: String, condition: String },
    /// Prize cards taken.
    Prize {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        actor: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        count: Option<u32>,
    },
    /// A between-turns phase marker (Pokémon Checkup).
    PhaseMarker,
    /// A game-result line (concession or explicit win).
    Result { detail: String },
    /// Anything the grammar does not recognize. Never dropped.
    Other,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ActionKind {
    /// The wire discriminant for this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draw { .. } => "draw",
            Self::Attach { .. } => "attach",
            Self::Attack { .. } => "attack",
            Self::Evolve { .. } => "evolve",
            Self::Play { .. } => "play",
            Self::Knockout { .. } => "knockout",
            Self::SpecialMechanic { .. } => "special_mechanic",
            Self::SpecialCondition { .. } => "special_condition",
            Self::Prize { .. } => "prize",
            Self::PhaseMarker => "phase_marker",
            Self::Result { .. } => "result",
            Self::Other => "other",
        }
    }
}

/// A classified turn: the header captures plus the typed action stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Turn number from the header, verbatim.
    pub number: u32,
    /// Player named in the header.
    pub player: String,
    /// Classified actions in source order, one per surviving line.
    pub actions: Vec<Action>,
}
