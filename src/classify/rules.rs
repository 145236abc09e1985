//! The ordered classification rule table.
//!
//! ## First match wins
//!
//! Rules are tried strictly in table order and the first hit decides the
//! kind. The order is a correctness contract, not a set of independent
//! conditionals: several later patterns also match lines an earlier tier
//! owns (an attack line that mentions a VSTAR attacker must classify as
//! `attack`, with the mechanic surfaced by the aggregator instead).
//!
//! Tier order: draw, attach, attack, evolve, play, knockout,
//! special mechanic, special condition, prize, phase marker, result.
//! Unmatched lines fall out as `other` and are never dropped.
//!
//! A builder may decline a regex hit by returning `None`, sending the line
//! on down the table. Only the active-Pokémon form uses this, to keep
//! condition words ("... Active Pokémon is now Paralyzed") out of the
//! card-name capture.

use log::trace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::action::{Action, ActionKind, PlayDestination, Turn};
use crate::transcript::RawTurn;

/// Special condition vocabulary. Kept in sync with the condition rule.
const CONDITIONS: &[&str] = &["Burned", "Poisoned", "Asleep", "Paralyzed", "Confused"];

/// Words that mark a once-per-game mechanic wherever they appear.
static MECHANIC_WORDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Legacy Star|Apex Dragon|VSTAR").expect("mechanic words pattern"));

/// Bonus damage clause scanned off an already-matched attack line.
static WEAKNESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)took (\d+) more damage because of (.+?) Weakness")
        .expect("weakness clause pattern")
});

/// VSTAR naming in an evolution target.
static VSTAR_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)VSTAR|V STAR").expect("vstar name pattern"));

type Builder = fn(&Captures<'_>, &str) -> Option<ActionKind>;

struct Rule {
    regex: Regex,
    build: Builder,
}

/// The table. Numeric captures parse leniently: a count too large for
/// `u32` records as absent instead of failing the line.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        // Draw tier. The mulligan bonus wording comes first so its count
        // is not half-eaten by the plain counted form.
        (
            r"^(.*?) drew (\d+) more cards? because (.+?) took at least 1 mulligan",
            build_draw_counted as Builder,
        ),
        (r"^(.*?) drew (\d+) cards?", build_draw_counted),
        (r"^(.*?) drew a card", build_draw_single),
        // Attach.
        (
            r"^(.*?) attached (.+?) to (.+?)(?: in the Active Spot| on the Bench)?\.?$",
            build_attach,
        ),
        // Attack. Unanchored: trailing clauses (weakness bonus) stay on
        // the same line and are scanned separately.
        (
            r"(.+?)'s (.+?) used (.+?) on (.+?) for (\d+) damage",
            build_attack,
        ),
        // Evolve.
        (
            r"^(.*?) evolved (.+?) to (.+?)(?: on the Bench| on the Active Spot| in the Active Spot| to the Bench)?\.?$",
            build_evolve,
        ),
        // Play tier: promotion wordings first, bench wordings second, the
        // generic played form last so destination phrases are not
        // swallowed into the card name.
        (
            r"^(.*?) (?:played|put|sent|moved|switched in|switched|switches|switch|promoted) (.+?) (?:into|to|onto|in) the Active Spot[.!]?$",
            build_play_active,
        ),
        (
            r"^(.+?) (?:switched|switches) (?:their |your )?Active Pok\u{e9}mon to (.+?)[.!]?$",
            build_play_active,
        ),
        (
            r"^(.+?)(?:'s)? Active Pok\u{e9}mon is (?:now )?(.+?)[.!]?$",
            build_play_active_guarded,
        ),
        (
            r"^(.*?) (?:played|put|moved|sent|retreated) (.+?) (?:onto|to|into|on) (?:the )?Bench[.!]?$",
            build_play_bench,
        ),
        (r"^(.+?) benched (.+?)[.!]?$", build_play_bench),
        (
            r"^(.*?) played (.+?)(?: to the (Active Spot|Bench|Stadium spot))?\.?$",
            build_play,
        ),
        (
            r"^(.+?) is now in the Active Spot[.!]?$",
            build_play_promoted_card,
        ),
        // Knockout tier: owned form first.
        (r"^(.+?)'s (.+?) was Knocked Out", build_knockout_owned),
        (r"^(.+?) was Knocked Out", build_knockout),
        // Once-per-game mechanics.
        (r"Legacy Star|Apex Dragon|VSTAR", build_special_mechanic),
        // Special conditions.
        (
            r"is now (Burned|Poisoned|Asleep|Paralyzed|Confused)",
            build_special_condition,
        ),
        // Prizes.
        (r"^(.*?) took (\d+) Prize cards?", build_prize_counted),
        (r"^(.*?) took a Prize card", build_prize_single),
        // Phase marker.
        (r"^Pok\u{e9}mon Checkup", build_phase_marker),
        // Result lines.
        (
            r"You conceded\.|wins\.?|wins!|conceded\.",
            build_result,
        ),
    ]
    .into_iter()
    .map(|(pattern, build)| Rule {
        regex: compile(pattern),
        build,
    })
    .collect()
});

/// Compile a table pattern, case-insensitive. Patterns are literals, so a
/// compile failure is a programmer error.
fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("classifier pattern must compile")
}

// === Capture helpers ===

fn capture(caps: &Captures<'_>, group: usize) -> String {
    caps.get(group)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn opt_capture(caps: &Captures<'_>, group: usize) -> Option<String> {
    let text = capture(caps, group);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn int_capture(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().trim().parse().ok()
}

// === Builders ===

fn build_draw_counted(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Draw {
        actor: opt_capture(caps, 1),
        count: int_capture(caps, 2),
    })
}

fn build_draw_single(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Draw {
        actor: opt_capture(caps, 1),
        count: Some(1),
    })
}

fn build_attach(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Attach {
        actor: opt_capture(caps, 1),
        energy: capture(caps, 2),
        target: capture(caps, 3),
    })
}

fn build_attack(caps: &Captures<'_>, raw: &str) -> Option<ActionKind> {
    let (extra_damage, extra_reason) = match WEAKNESS_RE.captures(raw) {
        Some(extra) => (int_capture(&extra, 1), opt_capture(&extra, 2)),
        None => (None, None),
    };
    Some(ActionKind::Attack {
        attacker_owner: capture(caps, 1),
        attacker: capture(caps, 2),
        attack: capture(caps, 3),
        target: capture(caps, 4),
        damage: int_capture(caps, 5),
        extra_damage,
        extra_reason,
    })
}

fn build_evolve(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    let to = capture(caps, 3);
    let to_vstar = VSTAR_NAME_RE.is_match(&to);
    Some(ActionKind::Evolve {
        actor: opt_capture(caps, 1),
        from: capture(caps, 2),
        to,
        to_vstar,
    })
}

fn build_play_active(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Play {
        actor: opt_capture(caps, 1),
        card: capture(caps, 2),
        to: Some(PlayDestination::Active),
    })
}

/// The "`<owner>'s Active Pokémon is now <card>`" form, declined when the
/// would-be card is a condition word so the condition rule can claim the
/// line instead.
fn build_play_active_guarded(caps: &Captures<'_>, raw: &str) -> Option<ActionKind> {
    let card = capture(caps, 2);
    if CONDITIONS.iter().any(|c| card.eq_ignore_ascii_case(c)) {
        return None;
    }
    build_play_active(caps, raw)
}

fn build_play_bench(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Play {
        actor: opt_capture(caps, 1),
        card: capture(caps, 2),
        to: Some(PlayDestination::Bench),
    })
}

fn build_play(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Play {
        actor: opt_capture(caps, 1),
        card: capture(caps, 2),
        to: caps
            .get(3)
            .and_then(|m| PlayDestination::from_capture(m.as_str())),
    })
}

/// The actorless "`<card> is now in the Active Spot`" form.
fn build_play_promoted_card(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Play {
        actor: None,
        card: capture(caps, 1),
        to: Some(PlayDestination::Active),
    })
}

fn build_knockout_owned(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Knockout {
        owner: opt_capture(caps, 1),
        target: capture(caps, 2),
    })
}

fn build_knockout(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Knockout {
        owner: None,
        target: capture(caps, 1),
    })
}

fn build_special_mechanic(_caps: &Captures<'_>, raw: &str) -> Option<ActionKind> {
    Some(ActionKind::SpecialMechanic {
        detail: raw.to_string(),
    })
}

fn build_special_condition(caps: &Captures<'_>, raw: &str) -> Option<ActionKind> {
    // Target is whatever precedes the matched "is now <condition>" clause.
    let target = caps
        .get(0)
        .map(|m| raw[..m.start()].trim().to_string())
        .unwrap_or_default();
    Some(ActionKind::SpecialCondition {
        target,
        condition: capture(caps, 1),
    })
}

fn build_prize_counted(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Prize {
        actor: opt_capture(caps, 1),
        count: int_capture(caps, 2),
    })
}

fn build_prize_single(caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Prize {
        actor: opt_capture(caps, 1),
        count: Some(1),
    })
}

fn build_phase_marker(_caps: &Captures<'_>, _raw: &str) -> Option<ActionKind> {
    Some(ActionKind::PhaseMarker)
}

fn build_result(_caps: &Captures<'_>, raw: &str) -> Option<ActionKind> {
    Some(ActionKind::Result {
        detail: raw.to_string(),
    })
}

// === Entry points ===

/// Classify one log line. Never fails; an unmatched line becomes `other`.
///
/// ## Example
///
/// ```
/// use ptcgl_replay::classify::{classify_line, ActionKind};
///
/// let action = classify_line("Ash drew 3 cards.");
/// assert!(matches!(
///     action.kind,
///     ActionKind::Draw { count: Some(3), .. }
/// ));
/// ```
#[must_use]
pub fn classify_line(raw: &str) -> Action {
    let raw = raw.trim();
    for rule in RULES.iter() {
        if let Some(caps) = rule.regex.captures(raw) {
            if let Some(kind) = (rule.build)(&caps, raw) {
                trace!("classified as {}: {:?}", kind.name(), raw);
                return Action {
                    raw: raw.to_string(),
                    kind,
                };
            }
        }
    }
    trace!("classified as other: {:?}", raw);
    Action {
        raw: raw.to_string(),
        kind: ActionKind::Other,
    }
}

/// Classify a segmented turn block into a typed turn.
#[must_use]
pub fn classify_turn(raw: &RawTurn) -> Turn {
    Turn {
        number: raw.number,
        player: raw.player.clone(),
        actions: raw.actions.iter().map(|line| classify_line(line)).collect(),
    }
}

/// Whether a line mentions a once-per-game mechanic. The aggregator uses
/// this to surface mechanic-laden attacks alongside dedicated markers.
#[must_use]
pub fn is_notable_mechanic(raw: &str) -> bool {
    MECHANIC_WORDS_RE.is_match(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(line: &str) -> ActionKind {
        classify_line(line).kind
    }

    #[test]
    fn test_draw_counted() {
        assert_eq!(
            kind_of("Ash drew 3 cards."),
            ActionKind::Draw {
                actor: Some("Ash".to_string()),
                count: Some(3),
            }
        );
    }

    #[test]
    fn test_draw_single() {
        assert_eq!(
            kind_of("Misty drew a card."),
            ActionKind::Draw {
                actor: Some("Misty".to_string()),
                count: Some(1),
            }
        );
    }

    #[test]
    fn test_draw_opening_hand() {
        assert_eq!(
            kind_of("Ash drew 7 cards for the opening hand."),
            ActionKind::Draw {
                actor: Some("Ash".to_string()),
                count: Some(7),
            }
        );
    }

    #[test]
    fn test_draw_mulligan_bonus() {
        assert_eq!(
            kind_of("Misty drew 2 more cards because Ash took at least 1 mulligan."),
            ActionKind::Draw {
                actor: Some("Misty".to_string()),
                count: Some(2),
            }
        );
    }

    #[test]
    fn test_attach() {
        assert_eq!(
            kind_of("Ash attached Lightning Energy to Pikachu in the Active Spot."),
            ActionKind::Attach {
                actor: Some("Ash".to_string()),
                energy: "Lightning Energy".to_string(),
                target: "Pikachu".to_string(),
            }
        );
    }

    #[test]
    fn test_attack_with_damage() {
        assert_eq!(
            kind_of("Misty's Starmie used Water Gun on Pikachu for 40 damage."),
            ActionKind::Attack {
                attacker_owner: "Misty".to_string(),
                attacker: "Starmie".to_string(),
                attack: "Water Gun".to_string(),
                target: "Pikachu".to_string(),
                damage: Some(40),
                extra_damage: None,
                extra_reason: None,
            }
        );
    }

    #[test]
    fn test_attack_with_weakness_clause() {
        let kind = kind_of(
            "Ash's Pikachu used Thunderbolt on Starmie for 60 damage. \
             Starmie took 60 more damage because of Lightning Weakness.",
        );
        match kind {
            ActionKind::Attack {
                damage,
                extra_damage,
                extra_reason,
                ..
            } => {
                assert_eq!(damage, Some(60));
                assert_eq!(extra_damage, Some(60));
                assert_eq!(extra_reason.as_deref(), Some("Lightning"));
            }
            other => panic!("expected attack, got {other:?}"),
        }
    }

    #[test]
    fn test_evolve() {
        assert_eq!(
            kind_of("Ash evolved Charmander to Charmeleon on the Bench."),
            ActionKind::Evolve {
                actor: Some("Ash".to_string()),
                from: "Charmander".to_string(),
                to: "Charmeleon".to_string(),
                to_vstar: false,
            }
        );
    }

    #[test]
    fn test_evolve_to_vstar() {
        assert_eq!(
            kind_of("Misty evolved Arceus V to Arceus VSTAR."),
            ActionKind::Evolve {
                actor: Some("Misty".to_string()),
                from: "Arceus V".to_string(),
                to: "Arceus VSTAR".to_string(),
                to_vstar: true,
            }
        );
    }

    #[test]
    fn test_play_with_destination() {
        assert_eq!(
            kind_of("Ash played Pikachu to the Active Spot."),
            ActionKind::Play {
                actor: Some("Ash".to_string()),
                card: "Pikachu".to_string(),
                to: Some(PlayDestination::Active),
            }
        );
        assert_eq!(
            kind_of("Ash played Snorlax to the Bench."),
            ActionKind::Play {
                actor: Some("Ash".to_string()),
                card: "Snorlax".to_string(),
                to: Some(PlayDestination::Bench),
            }
        );
        assert_eq!(
            kind_of("Misty played Lure Module to the Stadium spot."),
            ActionKind::Play {
                actor: Some("Misty".to_string()),
                card: "Lure Module".to_string(),
                to: Some(PlayDestination::Stadium),
            }
        );
    }

    #[test]
    fn test_play_without_destination() {
        assert_eq!(
            kind_of("Ash played Professor's Research."),
            ActionKind::Play {
                actor: Some("Ash".to_string()),
                card: "Professor's Research".to_string(),
                to: None,
            }
        );
        // A card name containing " to the " is not a destination phrase.
        assert_eq!(
            kind_of("Ash played Path to the Peak."),
            ActionKind::Play {
                actor: Some("Ash".to_string()),
                card: "Path to the Peak".to_string(),
                to: None,
            }
        );
    }

    #[test]
    fn test_promotion_wordings() {
        for line in [
            "Ash sent Mew to the Active Spot.",
            "Ash put Mew into the Active Spot.",
            "Ash switched in Mew to the Active Spot.",
            "Ash promoted Mew to the Active Spot!",
            "Ash switched their Active Pokémon to Mew.",
        ] {
            assert_eq!(
                kind_of(line),
                ActionKind::Play {
                    actor: Some("Ash".to_string()),
                    card: "Mew".to_string(),
                    to: Some(PlayDestination::Active),
                },
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_active_is_now_form() {
        assert_eq!(
            kind_of("Misty's Active Pokémon is now Staryu."),
            ActionKind::Play {
                actor: Some("Misty".to_string()),
                card: "Staryu".to_string(),
                to: Some(PlayDestination::Active),
            }
        );
    }

    #[test]
    fn test_active_is_now_declines_condition_words() {
        // The guard sends the line on to the condition rule.
        assert_eq!(
            kind_of("Misty's Active Pokémon is now Paralyzed."),
            ActionKind::SpecialCondition {
                target: "Misty's Active Pok\u{e9}mon".to_string(),
                condition: "Paralyzed".to_string(),
            }
        );
    }

    #[test]
    fn test_bench_wordings() {
        for line in [
            "Ash moved Pikachu onto the Bench.",
            "Ash put Pikachu on the Bench.",
            "Ash retreated Pikachu to the Bench.",
            "Ash benched Pikachu.",
            "Ash played Pikachu on the Bench.",
        ] {
            assert_eq!(
                kind_of(line),
                ActionKind::Play {
                    actor: Some("Ash".to_string()),
                    card: "Pikachu".to_string(),
                    to: Some(PlayDestination::Bench),
                },
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_card_promoted_without_actor() {
        assert_eq!(
            kind_of("Sableye is now in the Active Spot."),
            ActionKind::Play {
                actor: None,
                card: "Sableye".to_string(),
                to: Some(PlayDestination::Active),
            }
        );
    }

    #[test]
    fn test_knockout_forms() {
        assert_eq!(
            kind_of("Pikachu was Knocked Out!"),
            ActionKind::Knockout {
                owner: None,
                target: "Pikachu".to_string(),
            }
        );
        assert_eq!(
            kind_of("Ash's Pikachu was Knocked Out!"),
            ActionKind::Knockout {
                owner: Some("Ash".to_string()),
                target: "Pikachu".to_string(),
            }
        );
    }

    #[test]
    fn test_special_mechanic_marker() {
        assert_eq!(
            kind_of("Ash used the VSTAR Power Starbirth."),
            ActionKind::SpecialMechanic {
                detail: "Ash used the VSTAR Power Starbirth.".to_string(),
            }
        );
        assert!(matches!(
            kind_of("Misty's Zacian used its Legacy Star."),
            ActionKind::SpecialMechanic { .. }
        ));
    }

    #[test]
    fn test_special_condition() {
        assert_eq!(
            kind_of("Pikachu is now Asleep."),
            ActionKind::SpecialCondition {
                target: "Pikachu".to_string(),
                condition: "Asleep".to_string(),
            }
        );
    }

    #[test]
    fn test_prize_forms() {
        assert_eq!(
            kind_of("Ash took a Prize card."),
            ActionKind::Prize {
                actor: Some("Ash".to_string()),
                count: Some(1),
            }
        );
        assert_eq!(
            kind_of("Misty took 2 Prize cards."),
            ActionKind::Prize {
                actor: Some("Misty".to_string()),
                count: Some(2),
            }
        );
    }

    #[test]
    fn test_phase_marker() {
        assert_eq!(kind_of("Pokémon Checkup"), ActionKind::PhaseMarker);
    }

    #[test]
    fn test_result_lines() {
        assert_eq!(
            kind_of("You conceded."),
            ActionKind::Result {
                detail: "You conceded.".to_string(),
            }
        );
        assert_eq!(
            kind_of("Misty wins."),
            ActionKind::Result {
                detail: "Misty wins.".to_string(),
            }
        );
    }

    #[test]
    fn test_unmatched_becomes_other() {
        let action = classify_line("Cards were shuffled back into the deck.");
        assert_eq!(action.kind, ActionKind::Other);
        assert_eq!(action.raw, "Cards were shuffled back into the deck.");
    }

    #[test]
    fn test_priority_draw_beats_looser_rules() {
        // Also matches the generic played rule; draw is earlier and wins.
        let kind = kind_of("Ash played Bibarel and drew 3 cards.");
        assert!(
            matches!(kind, ActionKind::Draw { count: Some(3), .. }),
            "got {kind:?}"
        );
    }

    #[test]
    fn test_priority_attack_beats_mechanic_marker() {
        // Mentions VSTAR but is first and foremost an attack.
        let kind = kind_of("Ash's Arceus VSTAR used Trinity Nova on Starmie for 200 damage.");
        assert!(matches!(kind, ActionKind::Attack { .. }), "got {kind:?}");
    }

    #[test]
    fn test_priority_evolve_beats_mechanic_marker() {
        let kind = kind_of("Ash evolved Arceus V to Arceus VSTAR.");
        assert!(
            matches!(kind, ActionKind::Evolve { to_vstar: true, .. }),
            "got {kind:?}"
        );
    }

    #[test]
    fn test_play_beats_result_for_wins_substring() {
        // "Twins." contains the result pattern's "wins." substring.
        let kind = kind_of("Ash played Twins.");
        assert!(matches!(kind, ActionKind::Play { .. }), "got {kind:?}");
    }

    #[test]
    fn test_classification_keeps_raw_text() {
        let action = classify_line("  Ash drew a card.  ");
        assert_eq!(action.raw, "Ash drew a card.");
    }

    #[test]
    fn test_classify_turn() {
        let raw = RawTurn {
            number: 2,
            player: "Misty".to_string(),
            actions: vec![
                "Misty drew a card.".to_string(),
                "gibberish".to_string(),
            ],
        };
        let turn = classify_turn(&raw);
        assert_eq!(turn.number, 2);
        assert_eq!(turn.player, "Misty");
        assert_eq!(turn.actions.len(), 2);
        assert!(matches!(turn.actions[0].kind, ActionKind::Draw { .. }));
        assert_eq!(turn.actions[1].kind, ActionKind::Other);
    }

    #[test]
    fn test_is_notable_mechanic() {
        assert!(is_notable_mechanic("Ash used Starbirth (VSTAR Power)."));
        assert!(is_notable_mechanic("Apex Dragon dealt massive damage."));
        assert!(!is_notable_mechanic("Ash drew a card."));
    }

    #[test]
    fn test_unparseable_count_degrades_to_absent() {
        // Too large for u32: the line still classifies as a draw, with the
        // count recorded as absent rather than raising.
        assert_eq!(
            kind_of("Ash drew 9999999999 cards."),
            ActionKind::Draw {
                actor: Some("Ash".to_string()),
                count: None,
            }
        );
    }
}
