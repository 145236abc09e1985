//! Match summary aggregation.
//!
//! One scan over the classified stream collects the knockout record, the
//! once-per-game mechanics, the special conditions, and the match result.
//! Everything keeps stream order and carries its raw line, so a summary
//! entry can always be traced back to the transcript.
//!
//! ## Result policy
//!
//! A concession sets `method` and infers the winner as the other known
//! player relative to the conceding side. An explicit "`<name> wins`"
//! line sets the winner straight from the capture and overwrites any
//! earlier inference; the later explicit statement always takes
//! precedence. Every result line advances `final_turn`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{is_notable_mechanic, ActionKind, Turn};
use crate::core::Roster;

static CONCESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)conceded").expect("concession pattern"));

static CONCEDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?) conceded").expect("conceder pattern"));

static WINS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(.+?) wins").expect("wins pattern"));

/// A card Knocked Out, with the turn it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnockoutEvent {
    pub turn: u32,
    pub target: String,
    /// Owner when the line named one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub raw: String,
}

/// A once-per-game mechanic sighting. Attack-borne mechanics carry the
/// attack fields; dedicated marker lines carry only the raw text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotableMechanic {
    pub turn: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    pub raw: String,
}

/// A special condition applied to a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEvent {
    pub turn: u32,
    pub condition: String,
    pub target: String,
    pub raw: String,
}

/// How the match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultMethod {
    Concession,
    ExplicitWin,
}

/// The resolved match result. Fields stay `null` on the wire when the
/// log never said; absence of a result is itself information.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Option<String>,
    pub method: Option<ResultMethod>,
    pub final_turn: Option<u32>,
}

/// The aggregate view of a match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub turn_count: u32,
    pub players: Vec<String>,
    pub knockouts: Vec<KnockoutEvent>,
    pub notable_mechanics: Vec<NotableMechanic>,
    pub special_conditions: Vec<ConditionEvent>,
    pub result: MatchResult,
}

/// Aggregate a classified turn stream into a match summary.
///
/// ## Example
///
/// ```
/// use ptcgl_replay::classify::classify_turn;
/// use ptcgl_replay::core::Roster;
/// use ptcgl_replay::summary::summarize;
/// use ptcgl_replay::transcript::RawTurn;
///
/// let roster = Roster::from_names(&["Ash", "Misty"]);
/// let turn = classify_turn(&RawTurn {
///     number: 3,
///     player: "Ash".to_string(),
///     actions: vec!["You conceded.".to_string()],
/// });
/// let summary = summarize(&roster, &[turn]);
/// assert_eq!(summary.result.winner.as_deref(), Some("Misty"));
/// ```
#[must_use]
pub fn summarize(roster: &Roster, turns: &[Turn]) -> MatchSummary {
    let mut summary = MatchSummary {
        turn_count: u32::try_from(turns.len()).unwrap_or(u32::MAX),
        players: roster.names().to_vec(),
        ..MatchSummary::default()
    };

    for turn in turns {
        for action in &turn.actions {
            match &action.kind {
                ActionKind::Knockout { owner, target } => {
                    summary.knockouts.push(KnockoutEvent {
                        turn: turn.number,
                        target: target.clone(),
                        owner: owner.clone(),
                        raw: action.raw.clone(),
                    });
                }
                ActionKind::SpecialMechanic { .. } => {
                    summary.notable_mechanics.push(NotableMechanic {
                        turn: turn.number,
                        attack: None,
                        target: None,
                        damage: None,
                        raw: action.raw.clone(),
                    });
                }
                ActionKind::Attack {
                    attack,
                    target,
                    damage,
                    ..
                } if is_notable_mechanic(&action.raw) => {
                    summary.notable_mechanics.push(NotableMechanic {
                        turn: turn.number,
                        attack: Some(attack.clone()),
                        target: Some(target.clone()),
                        damage: *damage,
                        raw: action.raw.clone(),
                    });
                }
                ActionKind::SpecialCondition { target, condition } => {
                    summary.special_conditions.push(ConditionEvent {
                        turn: turn.number,
                        condition: condition.clone(),
                        target: target.clone(),
                        raw: action.raw.clone(),
                    });
                }
                ActionKind::Result { detail } => {
                    record_result(&mut summary.result, roster, turn, detail);
                }
                _ => {}
            }
        }
    }

    summary
}

/// Fold one result line into the running result.
fn record_result(result: &mut MatchResult, roster: &Roster, turn: &Turn, detail: &str) {
    if CONCESSION_RE.is_match(detail) {
        result.method = Some(ResultMethod::Concession);
        let conceder_capture = CONCEDER_RE
            .captures(detail)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        let conceder = roster
            .resolve(conceder_capture, Some(&turn.player))
            .unwrap_or("");
        result.winner = roster.opponent_of(conceder).map(str::to_string);
    } else if let Some(caps) = WINS_RE.captures(detail) {
        result.winner = Some(caps[1].trim().to_string());
        if result.method.is_none() {
            result.method = Some(ResultMethod::ExplicitWin);
        }
    }
    result.final_turn = Some(turn.number);
}
