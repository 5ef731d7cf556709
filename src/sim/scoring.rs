//! Scoring and difficulty formulas
//!
//! Pure functions only; the session applies them on round resolution.

use crate::consts::*;
use crate::tuning::{Progression, VariantRules};

use super::state::SessionState;

/// Points for a click `distance` pixels from the center of a target of `radius`.
///
/// Bullseye (inner 20% of the radius) is worth the full 100, then points fall
/// off linearly to 0 at the rim. Anything outside the target scores 0.
pub fn accuracy_points(distance: f32, radius: f32) -> u32 {
    if radius <= 0.0 || !distance.is_finite() {
        return 0;
    }
    let distance = distance.max(0.0);
    if distance <= radius * BULLSEYE_FRACTION {
        MAX_POINTS
    } else if distance <= radius {
        let scaled = (MAX_POINTS as f32 * (1.0 - distance / radius)).floor();
        scaled.clamp(0.0, MAX_POINTS as f32) as u32
    } else {
        0
    }
}

/// Speed bonus: `max(0, floor((1000 - reaction) / divisor))`
pub fn reaction_bonus(reaction_ms: u32, divisor: u32) -> u32 {
    if divisor == 0 {
        return 0;
    }
    REACTION_BONUS_CEILING_MS.saturating_sub(reaction_ms) / divisor
}

/// Experience earned by an Arcade hit
pub fn experience_for_hit(reaction_ms: u32) -> u32 {
    5 + reaction_bonus(reaction_ms, 200)
}

/// Score earned by a timed hit at `level` (level before the hit is applied)
pub fn hit_score(level: u32, reaction_ms: u32) -> u64 {
    100 + level as u64 * 10 + reaction_bonus(reaction_ms, 10) as u64
}

/// Target diameter for a level
pub fn target_size(rules: &VariantRules, level: u32) -> f32 {
    rules.target_size.at(level)
}

/// Time budget for a level (`None` when the variant has no timeout)
pub fn time_limit_ms(rules: &VariantRules, level: u32) -> Option<u64> {
    rules.time_limit.map(|curve| curve.at(level).round() as u64)
}

/// Outcome of applying a successful round to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitAward {
    pub points: u32,
    pub score_gained: u64,
    pub leveled_up: bool,
    pub new_best: bool,
}

/// Apply a resolved click to the session stats.
///
/// `points` is the accuracy score for the click. Score, experience, streak,
/// level and best time are updated per the variant's progression.
pub fn award_hit(
    state: &mut SessionState,
    rules: &VariantRules,
    reaction_ms: u32,
    points: u32,
) -> HitAward {
    let level_before = state.level;
    let perfect = points == MAX_POINTS;

    let score_gained = match rules.progression {
        Progression::PerfectHits { .. } => points as u64,
        Progression::Hits { .. } | Progression::Experience { .. } => {
            hit_score(level_before, reaction_ms)
        }
    };
    state.score += score_gained;
    state.hits += 1;
    if perfect {
        state.perfect_hits += 1;
    }

    let success = match rules.progression {
        Progression::PerfectHits { .. } => perfect,
        _ => true,
    };
    if success {
        state.extend_streak();
    } else {
        state.break_streak();
    }

    let candidate = match rules.progression {
        Progression::Hits { per_level } => state.hits / per_level.max(1) + 1,
        Progression::PerfectHits { per_level } => state.perfect_hits / per_level.max(1) + 1,
        Progression::Experience { per_level } => {
            let per_level = per_level.max(1);
            let total = state.experience + experience_for_hit(reaction_ms);
            state.experience = total % per_level;
            level_before + total / per_level
        }
    };
    state.level = state.level.max(candidate);

    let new_best = if !rules.best_time_requires_perfect || perfect {
        state.record_time(reaction_ms)
    } else {
        false
    };

    HitAward {
        points,
        score_gained,
        leveled_up: state.level > level_before,
        new_best,
    }
}
