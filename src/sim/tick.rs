//! Session driver
//!
//! The host calls [`tick`] once per frame with the one-shot inputs gathered
//! since the last frame. Inputs are applied first, then the pending timer
//! fires if it is due.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::autopilot::{AutoAction, Autopilot};
use super::feedback::round_feedback;
use super::scoring::{accuracy_points, award_hit, target_size, time_limit_ms};
use super::state::{GameEvent, GamePhase, Round, RoundResult, SessionState, Target};
use super::timer::{PendingTimer, TimerKind, TimerSlot};
use crate::click_distance;
use crate::consts::*;
use crate::records::Records;
use crate::tuning::{ClickMode, EarlyClick, Variant, VariantRules};

/// Timers that may fire back-to-back in a single tick
const MAX_TIMER_STEPS: u32 = 8;

/// A click on the game area, in pixels relative to its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub pos: Vec2,
    /// Size of the game area in pixels
    pub area: Vec2,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub click: Option<Click>,
    /// Start button
    pub start: bool,
    /// Reset button
    pub reset: bool,
    pub advance_tutorial: bool,
    pub skip_tutorial: bool,
    /// Idle/demo mode - the autopilot plays
    pub autoplay: bool,
}

/// One player's game session
#[derive(Debug, Clone)]
pub struct Session {
    pub variant: Variant,
    pub rules: VariantRules,
    pub state: SessionState,
    pub phase: GamePhase,
    /// Current round, or the last resolved one
    pub round: Option<Round>,
    pub records: Records,
    /// Run seed for reproducibility
    pub seed: u64,
    rounds_started: u32,
    timer: TimerSlot,
    rng: Pcg32,
    autopilot: Autopilot,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(variant: Variant, rules: VariantRules, seed: u64) -> Self {
        log::info!("New {} session with seed {}", variant.as_str(), seed);
        Self {
            variant,
            state: SessionState::new(&rules),
            rules,
            phase: GamePhase::Idle,
            round: None,
            records: Records::new(),
            seed,
            rounds_started: 0,
            timer: TimerSlot::new(),
            rng: Pcg32::seed_from_u64(seed),
            autopilot: Autopilot::new(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            events: Vec::new(),
        }
    }

    /// Rounds begun since the session was created
    pub fn rounds_started(&self) -> u32 {
        self.rounds_started
    }

    pub fn pending_timer(&self) -> Option<PendingTimer> {
        self.timer.pending()
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Feedback text for the last resolved round
    pub fn feedback(&self) -> Option<&'static str> {
        let result = self.round.as_ref()?.result?;
        Some(round_feedback(&result, self.rules.click_mode))
    }

    /// Begin a run (or, for variants without lives, the next attempt)
    pub fn start(&mut self, now_ms: u64) {
        match self.phase {
            GamePhase::Idle | GamePhase::GameOver => {}
            _ => {
                log::debug!("Start ignored in {:?}", self.phase);
                return;
            }
        }

        self.timer.cancel();
        if self.phase == GamePhase::GameOver || self.rules.lives.is_some() {
            self.state.reset_run(&self.rules);
        }
        self.state.first_time = false;
        self.state.too_early = false;
        self.state.game_over = false;
        self.events.push(GameEvent::GameStarted);

        match self.records.ghost {
            Some(ghost) if self.rules.ghost_replay => {
                self.phase = GamePhase::GhostReplay;
                self.timer.arm(
                    TimerKind::ReplayDone,
                    now_ms,
                    ghost.time_ms as u64 + self.rules.ghost_replay_padding_ms,
                );
                self.events.push(GameEvent::GhostReplayStarted {
                    time_ms: ghost.time_ms,
                });
            }
            _ => self.begin_round(now_ms),
        }
    }

    /// Abandon the run and return to Idle with fresh stats
    pub fn reset(&mut self, now_ms: u64) {
        self.timer.cancel();
        if self.rules.lives.is_none() && self.state.score > 0 {
            self.records
                .add_score(self.state.score, self.state.level, now_ms);
        }
        self.state.reset_run(&self.rules);
        self.phase = GamePhase::Idle;
        self.round = None;
        log::info!("Session reset");
    }

    /// Drop the pending timer (host going away). A run in progress stops.
    pub fn cancel_pending(&mut self, now_ms: u64) {
        self.timer.cancel();
        match self.phase {
            GamePhase::Idle | GamePhase::GameOver => {}
            _ if self.state.game_over => self.enter_game_over(now_ms),
            _ => self.phase = GamePhase::Idle,
        }
    }

    pub fn advance_tutorial(&mut self) {
        if !self.rules.tutorial || !self.state.first_time {
            return;
        }
        self.state.tutorial_step = (self.state.tutorial_step + 1) % 3;
        self.events.push(GameEvent::TutorialAdvanced {
            step: self.state.tutorial_step,
        });
    }

    pub fn skip_tutorial(&mut self) {
        self.state.first_time = false;
        self.state.tutorial_step = 0;
    }

    /// Handle a click on the game area
    pub fn click(&mut self, now_ms: u64, click: Click) {
        match self.phase {
            GamePhase::Idle | GamePhase::GameOver => self.start(now_ms),
            GamePhase::GhostReplay | GamePhase::Resolved => {}
            GamePhase::AwaitingTarget => self.early_click(now_ms),
            GamePhase::TargetShown => self.target_click(now_ms, click),
        }
    }

    /// Fire the pending timer if it is due
    pub fn update(&mut self, now_ms: u64) {
        let mut steps = 0;
        while steps < MAX_TIMER_STEPS {
            let Some(kind) = self.timer.take_due(now_ms) else {
                break;
            };
            self.fire(kind, now_ms);
            steps += 1;
        }
    }

    fn fire(&mut self, kind: TimerKind, now_ms: u64) {
        match (kind, self.phase) {
            (TimerKind::Reveal, GamePhase::AwaitingTarget) => self.reveal(now_ms),
            (TimerKind::Expire, GamePhase::TargetShown) => self.expire(now_ms),
            (TimerKind::Resume, GamePhase::Resolved) => {
                if self.state.game_over {
                    self.enter_game_over(now_ms);
                } else {
                    self.begin_round(now_ms);
                }
            }
            (TimerKind::ReplayDone, GamePhase::GhostReplay) => self.begin_round(now_ms),
            (kind, phase) => log::warn!("Stale {:?} timer in {:?}", kind, phase),
        }
    }

    fn begin_round(&mut self, now_ms: u64) {
        let span = TARGET_MARGIN_PCT..TARGET_MARGIN_PCT + TARGET_SPAN_PCT;
        let position = Vec2::new(
            self.rng.random_range(span.clone()) as f32,
            self.rng.random_range(span) as f32,
        );
        let target = Target {
            position,
            size: target_size(&self.rules, self.state.level),
        };
        let lo = self.rules.reveal_delay_min_ms;
        let hi = self.rules.reveal_delay_max_ms.max(lo);
        let delay = self.rng.random_range(lo..=hi);

        self.round = Some(Round::new(
            target,
            time_limit_ms(&self.rules, self.state.level),
        ));
        self.rounds_started += 1;
        self.phase = GamePhase::AwaitingTarget;
        self.timer.arm(TimerKind::Reveal, now_ms, delay);
        log::debug!("Round {} armed, reveal in {}ms", self.rounds_started, delay);
    }

    fn reveal(&mut self, now_ms: u64) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        round.shown_at_ms = Some(now_ms);
        self.phase = GamePhase::TargetShown;
        self.events.push(GameEvent::TargetShown {
            position: round.target.position,
            size: round.target.size,
        });
        if let Some(limit) = round.time_limit_ms {
            self.timer.arm(TimerKind::Expire, now_ms, limit);
        }
    }

    fn early_click(&mut self, now_ms: u64) {
        match self.rules.early_click {
            EarlyClick::Ignore => return,
            EarlyClick::StopRound => {
                self.timer.cancel();
                self.phase = GamePhase::Idle;
            }
            EarlyClick::LoseLife => {
                self.state.lose_life();
                self.pause(now_ms, self.rules.pause_after_fail_ms);
            }
        }
        self.state.too_early = true;
        self.state.break_streak();
        if let Some(round) = self.round.as_mut() {
            round.result = Some(RoundResult::TooEarly);
        }
        self.events.push(GameEvent::TooEarly);
        log::info!("Too early! Lives: {:?}", self.state.lives);
    }

    fn target_click(&mut self, now_ms: u64, click: Click) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let target = round.target;
        let reaction_ms = round.reaction_ms(now_ms);
        // A click at or past the limit lost the race with the Expire timer
        if round
            .time_limit_ms
            .is_some_and(|limit| reaction_ms as u64 >= limit)
        {
            self.timer.cancel();
            self.expire(now_ms);
            return;
        }
        let distance = click_distance(click.pos, target.position, click.area);
        let on_target = distance <= target.radius();

        if self.rules.click_mode == ClickMode::MustHit && !on_target {
            self.state.break_streak();
            self.events.push(GameEvent::Miss { distance });
            return;
        }

        self.timer.cancel();
        let points = accuracy_points(distance, target.radius());
        let award = award_hit(&mut self.state, &self.rules, reaction_ms, points);
        self.state.too_early = false;

        let result = if on_target || self.rules.click_mode == ClickMode::Anywhere {
            self.records.push_recent(reaction_ms);
            self.events.push(GameEvent::Hit {
                reaction_ms,
                points,
            });
            RoundResult::Hit {
                reaction_ms,
                distance,
                points,
            }
        } else {
            self.events.push(GameEvent::Miss { distance });
            RoundResult::Miss {
                reaction_ms,
                distance,
            }
        };
        if let Some(round) = self.round.as_mut() {
            round.result = Some(result);
        }

        if award.new_best {
            // Replayed at the size the next round will use
            self.records
                .set_ghost(reaction_ms, target_size(&self.rules, self.state.level));
        }
        if award.leveled_up {
            log::info!("Level up! Now level {}", self.state.level);
            self.events.push(GameEvent::LevelUp {
                level: self.state.level,
            });
        }

        match self.rules.continue_threshold {
            Some(threshold) if points < threshold => {
                self.phase = GamePhase::Idle;
            }
            _ => {
                let pause = if award.leveled_up {
                    self.rules.pause_after_level_up_ms
                } else {
                    self.rules.pause_after_hit_ms
                };
                self.pause(now_ms, pause);
            }
        }
    }

    fn expire(&mut self, now_ms: u64) {
        self.state.break_streak();
        self.state.lose_life();
        if let Some(round) = self.round.as_mut() {
            round.result = Some(RoundResult::TimedOut);
        }
        self.events.push(GameEvent::TimedOut {
            lives_left: self.state.lives,
        });
        log::info!("Timeout! Lives remaining: {:?}", self.state.lives);
        self.pause(now_ms, self.rules.pause_after_fail_ms);
    }

    fn pause(&mut self, now_ms: u64, delay_ms: u64) {
        self.phase = GamePhase::Resolved;
        self.timer.arm(TimerKind::Resume, now_ms, delay_ms);
    }

    fn enter_game_over(&mut self, now_ms: u64) {
        self.timer.cancel();
        self.phase = GamePhase::GameOver;
        self.records
            .add_score(self.state.score, self.state.level, now_ms);
        self.events.push(GameEvent::GameOver {
            score: self.state.score,
            level: self.state.level,
        });
        log::info!(
            "Game over: score {} at level {}",
            self.state.score,
            self.state.level
        );
    }
}

/// Advance the session by one host frame
pub fn tick(session: &mut Session, input: &TickInput, now_ms: u64) {
    if input.reset {
        session.reset(now_ms);
    }
    if input.advance_tutorial {
        session.advance_tutorial();
    }
    if input.skip_tutorial {
        session.skip_tutorial();
    }
    if input.start {
        session.start(now_ms);
    }
    if let Some(click) = input.click {
        session.click(now_ms, click);
    }

    if input.autoplay {
        let action = session.autopilot.decide(
            session.phase,
            session.round.as_ref(),
            session.rounds_started,
            now_ms,
        );
        match action {
            Some(AutoAction::Start) => session.start(now_ms),
            Some(AutoAction::Click(click)) => session.click(now_ms, click),
            None => {}
        }
    }

    session.update(now_ms);
}
