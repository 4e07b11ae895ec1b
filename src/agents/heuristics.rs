//! Text heuristics that turn free-form model output into scores.

use crate::types::Position;

const AGREE_TERMS: [&str; 6] = ["agree", "correct", "accurate", "good", "excellent", "strong"];
const DISAGREE_TERMS: [&str; 6] = [
    "disagree",
    "incorrect",
    "inaccurate",
    "weak",
    "poor",
    "limited",
];

const POSITIVE_TERMS: [&str; 5] = [
    "beneficial",
    "advantage",
    "opportunity",
    "promising",
    "optimistic",
];
const NEGATIVE_TERMS: [&str; 6] = [
    "concern",
    "risk",
    "problem",
    "challenge",
    "cautious",
    "critical",
];

const MAX_KEY_POINTS: usize = 5;

/// Number of terms from `terms` that appear anywhere in `lowered`.
fn count_present(lowered: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| lowered.contains(*term)).count()
}

/// Share of agreeing terms among all scored terms, or `default` when none appear.
///
/// Matching is by substring, so "disagree" also counts as "agree".
pub fn agreement_level(text: &str, default: f64) -> f64 {
    let lowered = text.to_lowercase();
    let positive = count_present(&lowered, &AGREE_TERMS);
    let negative = count_present(&lowered, &DISAGREE_TERMS);

    if positive + negative == 0 {
        default
    } else {
        positive as f64 / (positive + negative) as f64
    }
}

/// Bullet lines (`- `, `* `, `•`) with the marker stripped, at most five.
pub fn key_points(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                Some(rest.trim().to_string())
            } else {
                line.strip_prefix('•').map(|rest| rest.trim().to_string())
            }
        })
        .filter(|point| !point.is_empty())
        .take(MAX_KEY_POINTS)
        .collect()
}

/// Stance implied by the balance of positive and negative terms.
pub fn final_position(text: &str, default: Position) -> Position {
    let lowered = text.to_lowercase();
    let positive = count_present(&lowered, &POSITIVE_TERMS);
    let negative = count_present(&lowered, &NEGATIVE_TERMS);

    if positive > negative * 2 {
        Position::Optimistic
    } else if positive > negative {
        Position::Supportive
    } else if negative > positive * 2 {
        Position::Critical
    } else if negative > positive {
        Position::Cautious
    } else {
        default
    }
}
