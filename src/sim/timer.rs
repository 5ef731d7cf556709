//! Single deferred timer
//!
//! A session owns exactly one slot. Arming replaces whatever was pending, so a
//! timer from a previous phase can never fire after the state has moved on.

use serde::{Deserialize, Serialize};

/// What happens when the timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Reveal the target
    Reveal,
    /// Target time limit ran out
    Expire,
    /// Post-round pause is over
    Resume,
    /// Ghost replay finished
    ReplayDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTimer {
    pub kind: TimerKind,
    pub due_ms: u64,
}

/// Holds at most one pending timer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerSlot {
    pending: Option<PendingTimer>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule `kind` to fire `delay_ms` after `now_ms`, replacing any pending timer
    pub fn arm(&mut self, kind: TimerKind, now_ms: u64, delay_ms: u64) {
        if let Some(old) = self.pending {
            log::debug!("Timer {:?} replaced by {:?}", old.kind, kind);
        }
        self.pending = Some(PendingTimer {
            kind,
            due_ms: now_ms.saturating_add(delay_ms),
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<PendingTimer> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the timer if it is due at `now_ms`
    pub fn take_due(&mut self, now_ms: u64) -> Option<TimerKind> {
        match self.pending {
            Some(timer) if timer.due_ms <= now_ms => {
                self.pending = None;
                Some(timer.kind)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_due() {
        let mut slot = TimerSlot::new();
        slot.arm(TimerKind::Reveal, 1000, 500);
        assert_eq!(slot.take_due(1499), None);
        assert_eq!(slot.take_due(1500), Some(TimerKind::Reveal));
        assert_eq!(slot.take_due(9999), None);
    }

    #[test]
    fn test_arm_replaces_pending() {
        let mut slot = TimerSlot::new();
        slot.arm(TimerKind::Expire, 0, 100);
        slot.arm(TimerKind::Resume, 0, 300);
        assert_eq!(slot.take_due(200), None);
        assert_eq!(slot.take_due(300), Some(TimerKind::Resume));
    }

    #[test]
    fn test_cancel() {
        let mut slot = TimerSlot::new();
        slot.arm(TimerKind::Reveal, 0, 10);
        slot.cancel();
        assert!(!slot.is_pending());
        assert_eq!(slot.take_due(100), None);
    }
}
