//! Session state and core round types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::VariantRules;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No round running, waiting for the player to start
    Idle,
    /// Replaying the recorded best time before the round starts
    GhostReplay,
    /// Random reveal delay pending
    AwaitingTarget,
    /// Target visible, time limit pending
    TargetShown,
    /// Round resolved, brief pause pending
    Resolved,
    /// Run ended
    GameOver,
}

/// A target on the game area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Center, in percent of the game area (each axis in 10..=89)
    pub position: Vec2,
    /// Diameter in pixels
    pub size: f32,
}

impl Target {
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundResult {
    /// Clicked inside the target (or anywhere, in Classic)
    Hit {
        reaction_ms: u32,
        distance: f32,
        points: u32,
    },
    /// Clicked outside the target
    Miss { reaction_ms: u32, distance: f32 },
    /// Clicked before the target appeared
    TooEarly,
    /// Target expired before any click
    TimedOut,
}

impl RoundResult {
    pub fn reaction_ms(&self) -> Option<u32> {
        match *self {
            RoundResult::Hit { reaction_ms, .. } | RoundResult::Miss { reaction_ms, .. } => {
                Some(reaction_ms)
            }
            RoundResult::TooEarly | RoundResult::TimedOut => None,
        }
    }

    pub fn points(&self) -> u32 {
        match *self {
            RoundResult::Hit { points, .. } => points,
            _ => 0,
        }
    }
}

/// One target-appearance-to-resolution cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub target: Target,
    /// Time budget once the target is shown (`None` = unlimited)
    pub time_limit_ms: Option<u64>,
    /// When the target appeared (ms)
    pub shown_at_ms: Option<u64>,
    pub result: Option<RoundResult>,
}

impl Round {
    pub fn new(target: Target, time_limit_ms: Option<u64>) -> Self {
        Self {
            target,
            time_limit_ms,
            shown_at_ms: None,
            result: None,
        }
    }

    /// Milliseconds since the target appeared
    pub fn reaction_ms(&self, now_ms: u64) -> u32 {
        let shown = self.shown_at_ms.unwrap_or(now_ms);
        now_ms.saturating_sub(shown).min(u32::MAX as u64) as u32
    }
}

/// Difficulty label derived from level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Master,
}

impl Difficulty {
    pub fn for_level(level: u32) -> Self {
        match level {
            0 | 1 => Difficulty::Easy,
            2 => Difficulty::Medium,
            3 => Difficulty::Hard,
            4 => Difficulty::Expert,
            _ => Difficulty::Master,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::Master => "Master",
        }
    }
}

/// Events emitted by the session for hosts (sound cues, HUD effects)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    GhostReplayStarted { time_ms: u32 },
    TargetShown { position: Vec2, size: f32 },
    Hit { reaction_ms: u32, points: u32 },
    Miss { distance: f32 },
    TooEarly,
    TimedOut { lives_left: Option<u8> },
    LevelUp { level: u32 },
    GameOver { score: u64, level: u32 },
    TutorialAdvanced { step: u8 },
}

/// Score, level and lives for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current level (1-based, never decreases within a run)
    pub level: u32,
    /// Experience toward the next level
    pub experience: u32,
    pub score: u64,
    /// Remaining lives (`None` = unlimited)
    pub lives: Option<u8>,
    /// Fastest qualifying reaction (kept across runs)
    pub best_time_ms: Option<u32>,
    pub game_over: bool,
    /// Consecutive successful rounds
    pub streak: u32,
    /// Longest streak (kept across runs)
    pub best_streak: u32,
    pub hits: u32,
    pub perfect_hits: u32,
    /// Tutorial not yet dismissed
    pub first_time: bool,
    pub tutorial_step: u8,
    /// Last round ended with an early click
    pub too_early: bool,
}

impl SessionState {
    pub fn new(rules: &VariantRules) -> Self {
        Self {
            level: 1,
            experience: 0,
            score: 0,
            lives: rules.lives,
            best_time_ms: None,
            game_over: false,
            streak: 0,
            best_streak: 0,
            hits: 0,
            perfect_hits: 0,
            first_time: rules.tutorial,
            tutorial_step: 0,
            too_early: false,
        }
    }

    /// Fresh run stats, keeping records that survive across runs
    pub fn reset_run(&mut self, rules: &VariantRules) {
        let best_time_ms = self.best_time_ms;
        let best_streak = self.best_streak;
        let first_time = self.first_time;
        let tutorial_step = self.tutorial_step;
        *self = Self::new(rules);
        self.best_time_ms = best_time_ms;
        self.best_streak = best_streak;
        self.first_time = first_time;
        self.tutorial_step = tutorial_step;
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_level(self.level)
    }

    /// Remove one life. Returns true when this takes lives to zero.
    pub fn lose_life(&mut self) -> bool {
        match self.lives {
            Some(lives) if lives > 0 => {
                let left = lives - 1;
                self.lives = Some(left);
                if left == 0 {
                    self.game_over = true;
                }
                self.game_over
            }
            Some(_) => true,
            None => false,
        }
    }

    pub fn extend_streak(&mut self) {
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
    }

    pub fn break_streak(&mut self) {
        self.streak = 0;
    }

    /// Keep the faster of the current best and `reaction_ms`. Returns true on a new best.
    pub fn record_time(&mut self, reaction_ms: u32) -> bool {
        match self.best_time_ms {
            Some(best) if best <= reaction_ms => false,
            _ => {
                self.best_time_ms = Some(reaction_ms);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lose_life_sets_game_over_at_zero() {
        let mut state = SessionState::new(&VariantRules::arcade());
        assert_eq!(state.lives, Some(3));
        assert!(!state.lose_life());
        assert!(!state.lose_life());
        assert!(!state.game_over);
        assert!(state.lose_life());
        assert_eq!(state.lives, Some(0));
        assert!(state.game_over);
        // Already at zero: stays at zero
        assert!(state.lose_life());
        assert_eq!(state.lives, Some(0));
    }

    #[test]
    fn test_unlimited_lives_never_end() {
        let mut state = SessionState::new(&VariantRules::zone());
        for _ in 0..10 {
            assert!(!state.lose_life());
        }
        assert_eq!(state.lives, None);
        assert!(!state.game_over);
    }

    #[test]
    fn test_reset_run_keeps_records() {
        let rules = VariantRules::arcade();
        let mut state = SessionState::new(&rules);
        state.score = 900;
        state.level = 4;
        state.record_time(231);
        state.extend_streak();
        state.extend_streak();
        state.break_streak();
        state.first_time = false;

        state.reset_run(&rules);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, Some(3));
        assert_eq!(state.best_time_ms, Some(231));
        assert_eq!(state.best_streak, 2);
        assert!(!state.first_time);
    }

    #[test]
    fn test_record_time_keeps_fastest() {
        let mut state = SessionState::new(&VariantRules::classic());
        assert!(state.record_time(300));
        assert!(!state.record_time(300));
        assert!(!state.record_time(450));
        assert!(state.record_time(280));
        assert_eq!(state.best_time_ms, Some(280));
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(Difficulty::for_level(1).as_str(), "Easy");
        assert_eq!(Difficulty::for_level(4), Difficulty::Expert);
        assert_eq!(Difficulty::for_level(12), Difficulty::Master);
    }
}
