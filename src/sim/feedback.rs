//! Player-facing feedback text

use super::state::RoundResult;
use crate::tuning::ClickMode;

/// Message for a reaction time
pub fn reaction_feedback(reaction_ms: u32) -> &'static str {
    match reaction_ms {
        0..200 => "Superhuman reflexes!",
        200..250 => "Lightning fast!",
        250..300 => "Excellent!",
        300..350 => "Great job!",
        350..400 => "Good reflexes!",
        _ => "Keep practicing!",
    }
}

/// Message for an accuracy score
pub fn accuracy_feedback(points: u32) -> &'static str {
    match points {
        100.. => "Perfect shot!",
        80..100 => "Great accuracy!",
        60..80 => "Good hit!",
        40..60 => "Getting closer!",
        _ => "Keep practicing!",
    }
}

/// Message for a resolved round, judged the way the variant scores it
pub fn round_feedback(result: &RoundResult, mode: ClickMode) -> &'static str {
    match *result {
        RoundResult::TooEarly => "Too early! Wait for the target to appear.",
        RoundResult::TimedOut => "Too slow! The target got away.",
        RoundResult::Miss { .. } if mode == ClickMode::MustHit => "Missed! Aim for the target.",
        RoundResult::Hit { points, .. } if mode == ClickMode::Precision => accuracy_feedback(points),
        RoundResult::Miss { .. } => accuracy_feedback(0),
        RoundResult::Hit { reaction_ms, .. } => reaction_feedback(reaction_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_thresholds() {
        assert_eq!(reaction_feedback(150), "Superhuman reflexes!");
        assert_eq!(reaction_feedback(200), "Lightning fast!");
        assert_eq!(reaction_feedback(299), "Excellent!");
        assert_eq!(reaction_feedback(349), "Great job!");
        assert_eq!(reaction_feedback(399), "Good reflexes!");
        assert_eq!(reaction_feedback(400), "Keep practicing!");
    }

    #[test]
    fn test_accuracy_thresholds() {
        assert_eq!(accuracy_feedback(100), "Perfect shot!");
        assert_eq!(accuracy_feedback(80), "Great accuracy!");
        assert_eq!(accuracy_feedback(60), "Good hit!");
        assert_eq!(accuracy_feedback(59), "Getting closer!");
        assert_eq!(accuracy_feedback(10), "Keep practicing!");
    }

    #[test]
    fn test_round_feedback_per_mode() {
        let hit = RoundResult::Hit {
            reaction_ms: 220,
            distance: 3.0,
            points: 100,
        };
        assert_eq!(round_feedback(&hit, ClickMode::Precision), "Perfect shot!");
        assert_eq!(round_feedback(&hit, ClickMode::Anywhere), "Lightning fast!");
        assert_eq!(
            round_feedback(&RoundResult::TooEarly, ClickMode::Precision),
            "Too early! Wait for the target to appear."
        );
    }
}
