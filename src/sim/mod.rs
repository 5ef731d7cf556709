//! Deterministic session simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is injected by the host (milliseconds)
//! - Seeded RNG only
//! - At most one pending timer
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod feedback;
pub mod scoring;
pub mod state;
pub mod tick;
pub mod timer;

pub use autopilot::{AutoAction, Autopilot};
pub use feedback::{accuracy_feedback, reaction_feedback, round_feedback};
pub use scoring::{accuracy_points, award_hit, reaction_bonus};
pub use state::{Difficulty, GameEvent, GamePhase, Round, RoundResult, SessionState, Target};
pub use tick::{Click, Session, TickInput, tick};
pub use timer::{PendingTimer, TimerKind, TimerSlot};
