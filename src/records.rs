//! Run records for the lifetime of the page
//!
//! Nothing here is persisted: records reset when the page reloads.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::RECENT_TIMES;

/// Maximum number of finished runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Session clock (ms) when the run ended
    pub timestamp_ms: u64,
}

/// Best reaction, replayed before the next Zone round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ghost {
    pub time_ms: u32,
    /// Target size in effect when the best time was set
    pub zone_size: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Records {
    pub entries: Vec<HighScoreEntry>,
    pub ghost: Option<Ghost>,
    /// Most recent hit reaction times (newest first)
    pub recent_times: VecDeque<u32>,
}

impl Records {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ghost: None,
            recent_times: VecDeque::with_capacity(RECENT_TIMES),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished run. Returns the rank achieved (1-indexed) or None.
    pub fn add_score(&mut self, score: u64, level: u32, timestamp_ms: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp_ms,
        };

        // Sorted descending by score; ties keep the older run first
        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("Run recorded: score {} level {} (rank {})", score, level, rank);
        Some(rank)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn push_recent(&mut self, reaction_ms: u32) {
        self.recent_times.push_front(reaction_ms);
        self.recent_times.truncate(RECENT_TIMES);
    }

    pub fn set_ghost(&mut self, time_ms: u32, zone_size: f32) {
        self.ghost = Some(Ghost {
            time_ms,
            zone_size: zone_size.round() as u32,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_score_never_qualifies() {
        let mut records = Records::new();
        assert!(!records.qualifies(0));
        assert_eq!(records.add_score(0, 1, 0), None);
        assert!(records.entries.is_empty());
    }

    #[test]
    fn test_sorted_and_truncated() {
        let mut records = Records::new();
        for i in 1..=12u64 {
            records.add_score(i * 100, 1, i);
        }
        assert_eq!(records.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(records.top_score(), Some(1200));
        assert_eq!(records.entries.last().map(|e| e.score), Some(300));

        assert!(!records.qualifies(300));
        assert!(records.qualifies(1250));
        assert_eq!(records.add_score(650, 3, 99), Some(7));
        assert_eq!(records.entries.last().map(|e| e.score), Some(400));
    }

    #[test]
    fn test_recent_times_capped_newest_first() {
        let mut records = Records::new();
        for t in [300, 310, 320, 330, 340, 350] {
            records.push_recent(t);
        }
        assert_eq!(records.recent_times.len(), RECENT_TIMES);
        assert_eq!(records.recent_times.front(), Some(&350));
        assert_eq!(records.recent_times.back(), Some(&310));
    }

    #[test]
    fn test_ghost() {
        let mut records = Records::new();
        records.set_ghost(212, 46.0);
        assert_eq!(
            records.ghost,
            Some(Ghost {
                time_ms: 212,
                zone_size: 46
            })
        );
    }
}
