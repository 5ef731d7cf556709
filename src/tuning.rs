//! Per-variant game balance
//!
//! Every rule that differs between the Classic, Zone and Arcade variants lives
//! here so the session state machine stays variant-agnostic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Wait for the target, click anywhere as fast as you can
    Classic,
    /// Speed and precision: points by distance from the bullseye
    #[default]
    Zone,
    /// Lives, experience and a shrinking time budget
    Arcade,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Classic, Variant::Zone, Variant::Arcade];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Zone => "Zone",
            Variant::Arcade => "Arcade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "zone" | "reaction-zone" => Some(Variant::Zone),
            "arcade" => Some(Variant::Arcade),
            _ => None,
        }
    }
}

/// What a click during the waiting period does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EarlyClick {
    /// Nothing happens
    Ignore,
    /// Round stops, player must start again
    StopRound,
    /// Costs a life, next round follows
    LoseLife,
}

/// How a click on a shown target is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickMode {
    /// Any click counts as a hit
    Anywhere,
    /// Every click resolves the round with distance-based points
    Precision,
    /// Clicks outside the target are misses and the round keeps running
    MustHit,
}

/// How the level advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progression {
    /// One level per `per_level` hits
    Hits { per_level: u32 },
    /// One level per `per_level` perfect hits
    PerfectHits { per_level: u32 },
    /// One level per `per_level` experience points
    Experience { per_level: u32 },
}

/// Linear per-level decay with a floor: `max(min, base - (level - 1) * step)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    pub base: f32,
    pub step: f32,
    pub min: f32,
}

impl LevelCurve {
    pub const fn new(base: f32, step: f32, min: f32) -> Self {
        Self { base, step, min }
    }

    /// Value at the given level (1-based)
    pub fn at(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (self.base - steps * self.step).max(self.min)
    }
}

/// All rules for one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRules {
    /// Random reveal delay range (inclusive, ms)
    pub reveal_delay_min_ms: u64,
    pub reveal_delay_max_ms: u64,
    /// Starting lives (`None` = unlimited, the game never ends)
    pub lives: Option<u8>,
    pub early_click: EarlyClick,
    pub click_mode: ClickMode,
    pub progression: Progression,
    /// Target diameter in pixels by level
    pub target_size: LevelCurve,
    /// Time budget in ms by level (`None` = no timeout)
    pub time_limit: Option<LevelCurve>,
    /// Pause after a successful round
    pub pause_after_hit_ms: u64,
    /// Pause after a level up (replaces `pause_after_hit_ms`)
    pub pause_after_level_up_ms: u64,
    /// Pause after a timeout or early click
    pub pause_after_fail_ms: u64,
    /// Rounds scoring below this stop the run (`None` = always continue)
    pub continue_threshold: Option<u32>,
    /// Only perfect hits can set a best time
    pub best_time_requires_perfect: bool,
    /// Replay the best time before each start
    pub ghost_replay: bool,
    /// Extra replay time after the ghost lands
    pub ghost_replay_padding_ms: u64,
    /// Show the tutorial before the first game
    pub tutorial: bool,
}

impl VariantRules {
    pub fn classic() -> Self {
        Self {
            reveal_delay_min_ms: 1000,
            reveal_delay_max_ms: 5000,
            lives: Some(3),
            early_click: EarlyClick::LoseLife,
            click_mode: ClickMode::Anywhere,
            progression: Progression::Hits { per_level: 5 },
            target_size: LevelCurve::new(80.0, 8.0, 40.0),
            time_limit: Some(LevelCurve::new(3000.0, 250.0, 1000.0)),
            pause_after_hit_ms: 800,
            pause_after_level_up_ms: 1000,
            pause_after_fail_ms: 800,
            continue_threshold: None,
            best_time_requires_perfect: false,
            ghost_replay: false,
            ghost_replay_padding_ms: 0,
            tutorial: false,
        }
    }

    pub fn zone() -> Self {
        Self {
            reveal_delay_min_ms: 1000,
            reveal_delay_max_ms: 5000,
            lives: None,
            early_click: EarlyClick::StopRound,
            click_mode: ClickMode::Precision,
            progression: Progression::PerfectHits { per_level: 3 },
            target_size: LevelCurve::new(50.0, 4.0, 16.0),
            time_limit: None,
            pause_after_hit_ms: 800,
            pause_after_level_up_ms: 800,
            pause_after_fail_ms: 800,
            continue_threshold: Some(60),
            best_time_requires_perfect: true,
            ghost_replay: true,
            ghost_replay_padding_ms: 1000,
            tutorial: false,
        }
    }

    pub fn arcade() -> Self {
        Self {
            reveal_delay_min_ms: 500,
            reveal_delay_max_ms: 500,
            lives: Some(3),
            early_click: EarlyClick::Ignore,
            click_mode: ClickMode::MustHit,
            progression: Progression::Experience { per_level: 100 },
            target_size: LevelCurve::new(80.0, 8.0, 40.0),
            time_limit: Some(LevelCurve::new(5000.0, 500.0, 1000.0)),
            pause_after_hit_ms: 300,
            pause_after_level_up_ms: 1000,
            pause_after_fail_ms: 800,
            continue_threshold: None,
            best_time_requires_perfect: false,
            ghost_replay: false,
            ghost_replay_padding_ms: 0,
            tutorial: true,
        }
    }

    /// Check the rules for values the state machine cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.reveal_delay_min_ms > self.reveal_delay_max_ms {
            return Err(TuningError::DelayRange {
                min: self.reveal_delay_min_ms,
                max: self.reveal_delay_max_ms,
            });
        }
        if self.lives == Some(0) {
            return Err(TuningError::NoLives);
        }
        let per_level = match self.progression {
            Progression::Hits { per_level }
            | Progression::PerfectHits { per_level }
            | Progression::Experience { per_level } => per_level,
        };
        if per_level == 0 {
            return Err(TuningError::ZeroProgression);
        }
        if self.target_size.min <= 0.0 {
            return Err(TuningError::TargetSize(self.target_size.min));
        }
        if let Some(limit) = self.time_limit {
            if limit.min < 1.0 {
                return Err(TuningError::TimeLimit(limit.min));
            }
        }
        Ok(())
    }
}

/// Tuning errors
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("Invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Reveal delay range is inverted: {min}ms > {max}ms")]
    DelayRange { min: u64, max: u64 },
    #[error("Starting lives must be at least 1")]
    NoLives,
    #[error("Progression step must be at least 1")]
    ZeroProgression,
    #[error("Minimum target size must be positive, got {0}")]
    TargetSize(f32),
    #[error("Minimum time limit must be at least 1ms, got {0}")]
    TimeLimit(f32),
}

/// Balance table for all variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub classic: VariantRules,
    pub zone: VariantRules,
    pub arcade: VariantRules,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            classic: VariantRules::classic(),
            zone: VariantRules::zone(),
            arcade: VariantRules::arcade(),
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning table. Missing variants keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        for variant in Variant::ALL {
            self.rules(variant).validate()?;
        }
        Ok(())
    }

    pub fn rules(&self, variant: Variant) -> &VariantRules {
        match variant {
            Variant::Classic => &self.classic,
            Variant::Zone => &self.zone,
            Variant::Arcade => &self.arcade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_from_str() {
        assert_eq!(Variant::from_str("ZONE"), Some(Variant::Zone));
        assert_eq!(Variant::from_str("arcade"), Some(Variant::Arcade));
        assert_eq!(Variant::from_str("Classic"), Some(Variant::Classic));
        assert_eq!(Variant::from_str("pong"), None);
        for v in Variant::ALL {
            assert_eq!(Variant::from_str(v.as_str()), Some(v));
        }
    }

    #[test]
    fn test_level_curve_floors() {
        let size = VariantRules::arcade().target_size;
        assert_eq!(size.at(1), 80.0);
        assert_eq!(size.at(2), 72.0);
        assert_eq!(size.at(6), 40.0);
        assert_eq!(size.at(50), 40.0);

        let limit = VariantRules::arcade().time_limit.unwrap();
        assert_eq!(limit.at(1), 5000.0);
        assert_eq!(limit.at(3), 4000.0);
        assert_eq!(limit.at(20), 1000.0);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_override() {
        let mut zone = serde_json::to_value(VariantRules::zone()).unwrap();
        zone["continue_threshold"] = serde_json::json!(80);
        let json = serde_json::json!({ "zone": zone }).to_string();

        let tuning = Tuning::from_json(&json).unwrap();
        assert_eq!(tuning.zone.continue_threshold, Some(80));
        assert_eq!(tuning.arcade, VariantRules::arcade());
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(Tuning::from_json("{not json"), Err(TuningError::Json(_))));

        let mut classic = serde_json::to_value(VariantRules::classic()).unwrap();
        classic["reveal_delay_min_ms"] = serde_json::json!(6000);
        let json = serde_json::json!({ "classic": classic }).to_string();
        assert!(matches!(
            Tuning::from_json(&json),
            Err(TuningError::DelayRange { min: 6000, max: 5000 })
        ));

        let mut arcade = VariantRules::arcade();
        arcade.lives = Some(0);
        assert!(matches!(arcade.validate(), Err(TuningError::NoLives)));

        let mut zone = VariantRules::zone();
        zone.progression = Progression::PerfectHits { per_level: 0 };
        assert!(matches!(zone.validate(), Err(TuningError::ZeroProgression)));
    }
}
