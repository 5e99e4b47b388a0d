//! Sky Dodge - A falling-obstacle arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (spawning, collisions, power-ups, levels, score)
//! - `renderer`: Scene tessellation and WebGPU pipeline
//! - `platform`: Browser/native platform abstraction (time, keyboard)
//! - `persistence`: String key-value storage with tolerant JSON loading
//! - `highscores`, `settings`: Persisted player data
//! - `audio`: Sound effects and music driven by engine notifications

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;
pub use sim::{Difficulty, Engine, EngineConfig};

/// Game configuration constants
pub mod consts {
    /// Default playfield size (the browser driver shrinks it to fit the window)
    pub const PLAYFIELD_WIDTH: f32 = 600.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Horizontal speed in pixels per tick
    pub const PLAYER_SPEED: f32 = 8.0;
    /// Gap between the player's bottom edge and the playfield floor
    pub const PLAYER_FLOOR_MARGIN: f32 = 20.0;

    /// Obstacle geometry
    pub const OBSTACLE_HEIGHT: f32 = 40.0;
    pub const OBSTACLE_MIN_WIDTH: f32 = 40.0;
    pub const OBSTACLE_MAX_WIDTH: f32 = 80.0;
    pub const OBSTACLE_SPAWN_Y: f32 = -50.0;
    /// Minimum obstacle spawn interval regardless of level
    pub const OBSTACLE_INTERVAL_FLOOR_MS: u64 = 300;
    /// Interval reduction per two levels gained
    pub const OBSTACLE_INTERVAL_STEP_MS: u64 = 100;
    /// Fall speed increase per two levels gained
    pub const OBSTACLE_SPEED_STEP: f32 = 0.5;

    /// Power-up geometry
    pub const POWER_UP_SIZE: f32 = 32.0;
    pub const POWER_UP_FALL_SPEED: f32 = 2.0;
    pub const POWER_UP_INTERVAL_MIN_MS: u64 = 10_000;
    pub const POWER_UP_INTERVAL_MAX_MS: u64 = 15_000;
    pub const MAX_LIVE_POWER_UPS: usize = 2;

    /// Entities are dropped once they fall this far below the playfield
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Effect timings and strengths
    pub const EFFECT_DURATION_MS: u64 = 5_000;
    pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;
    pub const SLOW_MOTION_MULTIPLIER: f32 = 0.5;

    /// One score point per this many milliseconds survived
    pub const SCORE_TICK_MS: u64 = 100;
    pub const POINTS_PER_LEVEL: u64 = 100;
    pub const MILESTONE_STEP: u64 = 100;

    /// Ticks for a full theme transition (progress advances 0.02 per tick)
    pub const THEME_TRANSITION_TICKS: u32 = 50;
}
