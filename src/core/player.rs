//! Player identity: the canonical roster and actor resolution.
//!
//! ## Roster
//!
//! The canonical player list in first-seen order. Names are collected from
//! setup lines and turn headers; placeholder words the client substitutes
//! for real names ("you", "opponent") are never admitted.
//!
//! ## Resolution
//!
//! Log lines name actors inconsistently: sometimes by real name, sometimes
//! by placeholder. `Roster::resolve` maps a captured actor to a concrete
//! player, falling back to the player whose turn the line appeared in.

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder words the log uses in place of a real player name.
const PLACEHOLDERS: &[&str] = &["you", "your", "opponent", "your opponent", "the opponent"];

/// Matches a setup line that opens with an acting player's name.
///
/// The verb list is the vocabulary observed in exported transcripts; a line
/// that opens with none of these verbs contributes no name.
static PLAYER_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(.*?) (?:chose|won|decided|drew|played|attached|evolved|used|is now|took|put|flipped|revealed|reveals|searches|conceded|wins)",
    )
    .expect("player line pattern")
});

/// Matches the opening hand draw, which always names the drawing player.
static OPENING_HAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?) drew 7 cards for the opening hand").expect("opening hand pattern")
});

/// Whether a captured actor is a placeholder rather than a real name.
#[must_use]
pub fn is_placeholder(name: &str) -> bool {
    let trimmed = name.trim();
    PLACEHOLDERS
        .iter()
        .any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// The canonical player list for a match, in first-seen order.
///
/// ## Example
///
/// ```
/// use ptcgl_replay::core::Roster;
///
/// let mut roster = Roster::default();
/// roster.add("Ash");
/// roster.add("Misty");
/// roster.add("you"); // placeholder, ignored
/// roster.add("Ash"); // duplicate, ignored
/// assert_eq!(roster.names(), ["Ash", "Misty"]);
/// assert_eq!(roster.opponent_of("Ash"), Some("Misty"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster from an already-collected name list.
    ///
    /// Placeholders and duplicates are dropped; order is preserved.
    #[must_use]
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut roster = Self::default();
        for name in names {
            roster.add(name.as_ref());
        }
        roster
    }

    /// Admit a name into the roster.
    ///
    /// Empty strings, placeholders, and names already present are ignored.
    pub fn add(&mut self, name: &str) {
        let trimmed = name.trim();
        if trimmed.is_empty() || is_placeholder(trimmed) {
            return;
        }
        if !self.names.iter().any(|n| n == trimmed) {
            self.names.push(trimmed.to_string());
        }
    }

    /// Scan a setup line for an acting player's name and admit it.
    pub fn scan_setup_line(&mut self, line: &str) {
        if let Some(caps) = OPENING_HAND_RE.captures(line) {
            self.add(&caps[1]);
        }
        if let Some(caps) = PLAYER_LINE_RE.captures(line) {
            self.add(&caps[1]);
        }
    }

    /// Canonical names in first-seen order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Consume the roster, yielding the canonical name list.
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        self.names
    }

    /// Number of known players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no player has been admitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether the exact name is on the roster.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Resolve a captured actor to a concrete player name.
    ///
    /// Preference order:
    /// 1. the capture itself, when present and not a placeholder;
    /// 2. the enclosing turn's player, when known and not a placeholder.
    ///
    /// Returns `None` when neither applies; callers treat that as a
    /// recorded-but-unapplied event rather than guessing a player.
    #[must_use]
    pub fn resolve<'a>(
        &self,
        capture: Option<&'a str>,
        turn_player: Option<&'a str>,
    ) -> Option<&'a str> {
        if let Some(name) = capture {
            let trimmed = name.trim();
            if !trimmed.is_empty() && !is_placeholder(trimmed) {
                return Some(trimmed);
            }
        }
        if let Some(name) = turn_player {
            let trimmed = name.trim();
            if !trimmed.is_empty() && !is_placeholder(trimmed) {
                return Some(trimmed);
            }
        }
        None
    }

    /// The first roster entry distinct from `name`.
    ///
    /// Only used for opponent-directed inference (e.g. the winner implied
    /// by a concession). With an empty `name` this is the first entry.
    #[must_use]
    pub fn opponent_of(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .find(|n| name.is_empty() || *n != name)
    }
}
