//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module touches the GPU or
//! the platform:
//! - Time is injected as run-relative milliseconds
//! - Randomness comes from a seeded RNG owned by the game state
//! - Key state arrives as a two-boolean `TickInput` snapshot

pub mod actor;
pub mod clock;
pub mod collision;
pub mod effects;
pub mod engine;
pub mod spawner;
pub mod state;
pub mod theme;
pub mod tick;

pub use actor::Player;
pub use clock::{MilestoneTracker, RunClock, ThemeTransition, is_badge_level, level_for_score, score_for_elapsed};
pub use collision::Aabb;
pub use effects::{ActiveEffect, ActiveEffects, PowerUpKind};
pub use engine::{Engine, EngineConfig, Notifications};
pub use spawner::{Difficulty, Spawner};
pub use state::{GameEvent, GamePhase, GameState, Obstacle, PowerUp};
pub use theme::{Oklch, Theme, ThemeBlend, ThemeName, theme_for_level};
pub use tick::{TickInput, tick};
