//! Game state and core simulation types
//!
//! Everything one run needs lives in `GameState`; nothing survives the run.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::Player;
use super::clock::{MilestoneTracker, ThemeTransition};
use super::collision::Aabb;
use super::effects::{ActiveEffects, PowerUpKind};
use super::spawner::{Difficulty, Spawner};
use super::theme::{Oklch, Theme, ThemeBlend, ThemeName, theme_for_level};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Driver has stopped ticking; run time is frozen
    Paused,
    /// Run ended by an unshielded hit
    GameOver,
}

/// Notifications produced by a tick, drained by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player touched an obstacle; `shielded` if the shield took the hit
    Collision { shielded: bool },
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    /// Score crossed a multiple of 100
    Milestone(u64),
    LevelChanged { level: u32, theme: ThemeName },
    GameOver { score: u64 },
}

/// A falling block
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Fall speed in pixels per tick before slow-motion
    pub velocity: f32,
    pub color: Oklch,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// A falling power-up
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl PowerUp {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Playfield size in pixels
    pub width: f32,
    pub height: f32,
    pub difficulty: Difficulty,
    pub phase: GamePhase,
    /// Score, frozen at game over
    pub score: u64,
    /// Level derived from score, starting at 1
    pub level: u32,
    pub theme: &'static Theme,
    pub theme_transition: Option<ThemeTransition>,
    pub milestones: MilestoneTracker,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Live power-ups in spawn order
    pub power_ups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    pub spawner: Spawner,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh run on a `width` x `height` playfield
    pub fn new(width: f32, height: f32, difficulty: Difficulty, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawner = Spawner::new(difficulty, &mut rng);

        Self {
            width,
            height,
            difficulty,
            phase: GamePhase::Playing,
            score: 0,
            level: 1,
            theme: theme_for_level(1),
            theme_transition: None,
            milestones: MilestoneTracker::new(),
            player: Player::new(width, height),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            effects: ActiveEffects::new(),
            spawner,
            events: Vec::new(),
            rng,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Shielded exactly while a shield effect is live
    pub fn has_shield(&self) -> bool {
        self.effects.has_shield()
    }

    /// Background gradient stops, following any in-flight transition
    pub fn background(&self, blend: ThemeBlend) -> [Oklch; 2] {
        match &self.theme_transition {
            Some(transition) => transition.colors(blend),
            None => self.theme.background,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
