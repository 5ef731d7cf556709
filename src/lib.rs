//! Reaction Zone - a reaction-time target game
//!
//! Core modules:
//! - `sim`: Deterministic session state machine (rounds, timers, scoring)
//! - `tuning`: Data-driven per-variant game balance
//! - `records`: In-memory run records (ghost replay, leaderboard)

pub mod records;
pub mod sim;
pub mod tuning;

pub use records::Records;
pub use tuning::{Tuning, TuningError, Variant, VariantRules};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Targets spawn this far (percent) from each edge of the game area
    pub const TARGET_MARGIN_PCT: u32 = 10;
    /// Width of the spawn band (percent), so positions land in 10..=89
    pub const TARGET_SPAN_PCT: u32 = 80;

    /// Points for a bullseye hit
    pub const MAX_POINTS: u32 = 100;
    /// Fraction of the target radius that counts as a bullseye
    pub const BULLSEYE_FRACTION: f32 = 0.2;

    /// Reaction times at or above this earn no speed bonus
    pub const REACTION_BONUS_CEILING_MS: u32 = 1000;

    /// Number of recent reaction times kept for ghost markers
    pub const RECENT_TIMES: usize = 5;

    /// Host frame interval used by the native demo (~60 Hz)
    pub const FRAME_MS: u64 = 16;
}

/// Convert a percent position inside the game area to pixels
#[inline]
pub fn percent_to_pixels(pos_pct: Vec2, area: Vec2) -> Vec2 {
    pos_pct * area / 100.0
}

/// Distance in pixels from a click to a target placed at a percent position
#[inline]
pub fn click_distance(click: Vec2, target_pct: Vec2, area: Vec2) -> f32 {
    click.distance(percent_to_pixels(target_pct, area))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_to_pixels() {
        let px = percent_to_pixels(Vec2::new(50.0, 25.0), Vec2::new(400.0, 200.0));
        assert_eq!(px, Vec2::new(200.0, 50.0));
    }

    #[test]
    fn test_click_distance() {
        let d = click_distance(Vec2::new(203.0, 54.0), Vec2::new(50.0, 25.0), Vec2::new(400.0, 200.0));
        assert!((d - 5.0).abs() < 0.0001);
    }
}
