//! Run timing, score and level progression
//!
//! Score is a pure function of run time, and run time is wall-clock time
//! since the run started minus every paused span. Everything downstream of
//! score (level, theme, milestones) is derived from it.

use super::theme::{Oklch, ThemeBlend};
use crate::consts::{MILESTONE_STEP, POINTS_PER_LEVEL, SCORE_TICK_MS, THEME_TRANSITION_TICKS};

/// Score for a run time in milliseconds
#[inline]
pub const fn score_for_elapsed(elapsed_ms: u64) -> u64 {
    elapsed_ms / SCORE_TICK_MS
}

/// Level for a score, starting at 1
#[inline]
pub const fn level_for_score(score: u64) -> u32 {
    (score / POINTS_PER_LEVEL) as u32 + 1
}

/// Levels that get a badge announcement
pub fn is_badge_level(level: u32) -> bool {
    matches!(level, 1 | 5 | 10)
}

/// Wall clock to run time conversion, excluding paused spans
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    started_at: u64,
    paused_at: Option<u64>,
    paused_total: u64,
}

impl RunClock {
    pub fn new(now: u64) -> Self {
        Self {
            started_at: now,
            paused_at: None,
            paused_total: 0,
        }
    }

    /// Milliseconds of unpaused play at wall time `now`
    pub fn run_time(&self, now: u64) -> u64 {
        let end = self.paused_at.unwrap_or(now).max(self.started_at);
        (end - self.started_at).saturating_sub(self.paused_total)
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self, now: u64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: u64) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_sub(paused_at);
        }
    }
}

/// Fires each multiple of `MILESTONE_STEP` once, in increasing order
#[derive(Debug, Clone, Copy, Default)]
pub struct MilestoneTracker {
    last: u64,
}

impl MilestoneTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest milestone fired so far (0 before the first)
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Thresholds newly crossed by `score`, lowest first
    pub fn advance(&mut self, score: u64) -> Vec<u64> {
        let reached = score / MILESTONE_STEP * MILESTONE_STEP;
        let mut crossed = Vec::new();
        while self.last < reached {
            self.last += MILESTONE_STEP;
            crossed.push(self.last);
        }
        crossed
    }
}

/// Background color change between two themes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeTransition {
    pub from: [Oklch; 2],
    pub to: [Oklch; 2],
    steps: u32,
}

impl ThemeTransition {
    pub fn new(from: [Oklch; 2], to: [Oklch; 2]) -> Self {
        Self { from, to, steps: 0 }
    }

    /// Progress in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.steps as f32 / THEME_TRANSITION_TICKS as f32).min(1.0)
    }

    /// Advance one tick; returns true once the transition is complete
    pub fn step(&mut self) -> bool {
        self.steps += 1;
        self.steps >= THEME_TRANSITION_TICKS
    }

    /// Gradient stops to draw at the current progress
    pub fn colors(&self, blend: ThemeBlend) -> [Oklch; 2] {
        let t = self.progress();
        [
            blend.apply(self.from[0], self.to[0], t),
            blend.apply(self.from[1], self.to[1], t),
        ]
    }
}
