//! Autopilot for idle/demo mode
//!
//! Plays like a somewhat distracted human: presses start when idle (and again
//! a few seconds after game over), sometimes
//! jumps the gun, reacts after a random delay and clicks near (not always on)
//! the bullseye. Seeded, so demo runs are reproducible.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GamePhase, Round};
use super::tick::Click;
use crate::percent_to_pixels;

/// Game area the autopilot pretends to click on
pub const AUTOPILOT_AREA: Vec2 = Vec2::new(600.0, 400.0);
/// Human-ish reaction range (ms)
const REACTION_MIN_MS: u64 = 170;
const REACTION_MAX_MS: u64 = 1400;
/// One round in this many gets an early click
const EARLY_CLICK_ODDS: u32 = 20;
/// How long the game-over screen stays up before the next run
const RESTART_DELAY_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoAction {
    Start,
    Click(Click),
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    round: u32,
    click_after_ms: u64,
    /// Offset from the target center as a fraction of its radius
    aim: Vec2,
    early: bool,
    done: bool,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    plan: Option<Plan>,
    game_over_since: Option<u64>,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            plan: None,
            game_over_since: None,
        }
    }

    /// Decide what to do this frame
    pub fn decide(
        &mut self,
        phase: GamePhase,
        round: Option<&Round>,
        round_index: u32,
        now_ms: u64,
    ) -> Option<AutoAction> {
        if phase != GamePhase::GameOver {
            self.game_over_since = None;
        }
        match phase {
            GamePhase::Idle => Some(AutoAction::Start),
            GamePhase::AwaitingTarget => {
                let plan = self.plan_for(round_index);
                if plan.early {
                    plan.early = false;
                    return Some(AutoAction::Click(Click {
                        pos: AUTOPILOT_AREA / 2.0,
                        area: AUTOPILOT_AREA,
                    }));
                }
                None
            }
            GamePhase::TargetShown => {
                let round = round?;
                let shown_at = round.shown_at_ms?;
                let plan = self.plan_for(round_index);
                if plan.done || now_ms < shown_at + plan.click_after_ms {
                    return None;
                }
                plan.done = true;
                let center = percent_to_pixels(round.target.position, AUTOPILOT_AREA);
                Some(AutoAction::Click(Click {
                    pos: center + plan.aim * round.target.radius(),
                    area: AUTOPILOT_AREA,
                }))
            }
            GamePhase::GameOver => {
                let since = *self.game_over_since.get_or_insert(now_ms);
                if now_ms < since + RESTART_DELAY_MS {
                    return None;
                }
                self.game_over_since = None;
                Some(AutoAction::Start)
            }
            GamePhase::GhostReplay | GamePhase::Resolved => None,
        }
    }

    fn plan_for(&mut self, round_index: u32) -> &mut Plan {
        let plan = match self.plan {
            Some(plan) if plan.round == round_index => plan,
            _ => self.new_plan(round_index),
        };
        self.plan.insert(plan)
    }

    fn new_plan(&mut self, round_index: u32) -> Plan {
        let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
        // Squared so most clicks land close to the center
        let reach = self.rng.random_range(0.0f32..1.1).powi(2);
        Plan {
            round: round_index,
            click_after_ms: self.rng.random_range(REACTION_MIN_MS..REACTION_MAX_MS),
            aim: Vec2::from_angle(angle) * reach,
            early: self.rng.random_ratio(1, EARLY_CLICK_ODDS),
            done: false,
        }
    }
}
