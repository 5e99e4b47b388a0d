//! Engine: owns one run and the driver-facing API
//!
//! The frame driver calls `update(now)` then `render(blend)` once per
//! display frame, with `now` in wall-clock milliseconds. The engine turns
//! wall time into run time, ticks the simulation, and forwards the tick's
//! events to the registered callbacks.

use super::clock::RunClock;
use super::effects::{ActiveEffect, PowerUpKind};
use super::spawner::Difficulty;
use super::state::{GameEvent, GamePhase, GameState};
use super::theme::{ThemeBlend, ThemeName};
use super::tick::{TickInput, tick};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::platform::InputBinding;
use crate::renderer::{Vertex, build_scene};

/// Construction parameters for a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Playfield size in pixels
    pub width: f32,
    pub height: f32,
    pub difficulty: Difficulty,
    /// Seed for spawn positions and power-up draws
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            difficulty: Difficulty::default(),
            seed: 0,
        }
    }
}

/// Fire-and-forget callbacks; any may be left unset
#[derive(Default)]
pub struct Notifications {
    /// Called with `true` when a shield absorbed the hit
    pub on_collision: Option<Box<dyn FnMut(bool)>>,
    pub on_power_up: Option<Box<dyn FnMut(PowerUpKind)>>,
    pub on_milestone: Option<Box<dyn FnMut(u64)>>,
    pub on_level_change: Option<Box<dyn FnMut(u32, ThemeName)>>,
}

pub type GameOverCallback = Box<dyn FnMut(u64)>;

pub struct Engine {
    state: GameState,
    clock: RunClock,
    input: TickInput,
    /// Taken when it fires so it can only fire once
    on_game_over: Option<GameOverCallback>,
    notifications: Notifications,
    input_binding: Option<Box<dyn InputBinding>>,
}

impl Engine {
    /// Start a run at wall time `now`
    pub fn new(config: EngineConfig, now: u64, on_game_over: impl FnMut(u64) + 'static) -> Self {
        log::info!(
            "Starting run: {}x{} {} (seed {})",
            config.width,
            config.height,
            config.difficulty.as_str(),
            config.seed
        );

        Self {
            state: GameState::new(config.width, config.height, config.difficulty, config.seed),
            clock: RunClock::new(now),
            input: TickInput::default(),
            on_game_over: Some(Box::new(on_game_over)),
            notifications: Notifications::default(),
            input_binding: None,
        }
    }

    pub fn with_notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = notifications;
        self
    }

    /// Take input from `binding` on every update. Replaces (and detaches)
    /// any previous binding.
    pub fn attach_input(&mut self, binding: Box<dyn InputBinding>) {
        if let Some(mut previous) = self.input_binding.replace(binding) {
            previous.detach();
        }
    }

    /// Set movement intent directly; overridden by an attached binding
    pub fn set_intent(&mut self, left: bool, right: bool) {
        self.input = TickInput { left, right };
    }

    /// Advance one frame. No-op while paused or after game over.
    pub fn update(&mut self, now: u64) {
        if self.state.phase != GamePhase::Playing {
            return;
        }

        if let Some(binding) = &self.input_binding {
            self.input = binding.intent();
        }

        let run_time = self.clock.run_time(now);
        tick(&mut self.state, &self.input, run_time);
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Collision { shielded } => {
                    if let Some(callback) = self.notifications.on_collision.as_mut() {
                        callback(shielded);
                    }
                }
                GameEvent::PowerUpCollected(kind) => {
                    if let Some(callback) = self.notifications.on_power_up.as_mut() {
                        callback(kind);
                    }
                }
                GameEvent::PowerUpExpired(_) => {}
                GameEvent::Milestone(score) => {
                    if let Some(callback) = self.notifications.on_milestone.as_mut() {
                        callback(score);
                    }
                }
                GameEvent::LevelChanged { level, theme } => {
                    if let Some(callback) = self.notifications.on_level_change.as_mut() {
                        callback(level, theme);
                    }
                }
                GameEvent::GameOver { score } => {
                    if let Some(mut callback) = self.on_game_over.take() {
                        callback(score);
                    }
                }
            }
        }
    }

    /// Tessellate the current frame. Never mutates the run.
    pub fn render(&self, blend: ThemeBlend) -> Vec<Vertex> {
        build_scene(&self.state, blend)
    }

    pub fn pause(&mut self, now: u64) {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
            self.clock.pause(now);
            log::info!("Paused at score {}", self.state.score);
        }
    }

    pub fn resume(&mut self, now: u64) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
            self.clock.resume(now);
            log::info!("Resumed at score {}", self.state.score);
        }
    }

    /// Flip between playing and paused; returns the new paused flag
    pub fn toggle_pause(&mut self, now: u64) -> bool {
        match self.state.phase {
            GamePhase::Playing => self.pause(now),
            GamePhase::Paused => self.resume(now),
            GamePhase::GameOver => {}
        }
        self.is_paused()
    }

    /// Unpaused milliseconds since the run started, the timebase of
    /// `ActiveEffect::expires_at`
    pub fn run_time(&self, now: u64) -> u64 {
        self.clock.run_time(now)
    }

    pub fn is_paused(&self) -> bool {
        self.state.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    /// Live effects in activation order
    pub fn active_effects(&self) -> &[ActiveEffect] {
        self.state.effects.as_slice()
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.state.effects.speed_multiplier()
    }

    pub fn slow_motion_multiplier(&self) -> f32 {
        self.state.effects.slow_motion_multiplier()
    }

    pub fn has_shield(&self) -> bool {
        self.state.has_shield()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for staging scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Release the input binding. Safe to call any number of times.
    pub fn cleanup(&mut self) {
        if let Some(mut binding) = self.input_binding.take() {
            binding.detach();
            log::debug!("Input binding detached");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use crate::sim::theme::Oklch;
    use glam::Vec2;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn config() -> EngineConfig {
        EngineConfig {
            difficulty: Difficulty::Easy,
            seed: 9,
            ..Default::default()
        }
    }

    fn stage_hit(engine: &mut Engine) {
        let pos = engine.state().player.pos;
        engine.state_mut().obstacles.push(Obstacle {
            pos,
            size: Vec2::splat(40.0),
            velocity: 0.0,
            color: Oklch::new(0.5, 0.1, 30.0),
        });
    }

    struct CountingBinding {
        detached: Rc<Cell<u32>>,
        intent: TickInput,
    }

    impl InputBinding for CountingBinding {
        fn intent(&self) -> TickInput {
            self.intent
        }

        fn detach(&mut self) {
            self.detached.set(self.detached.get() + 1);
        }
    }

    #[test]
    fn test_shield_then_game_over_fires_once() {
        let finals = Rc::new(RefCell::new(Vec::new()));
        let sink = finals.clone();
        let mut engine = Engine::new(config(), 10_000, move |score| sink.borrow_mut().push(score));

        let collisions = Rc::new(RefCell::new(Vec::new()));
        let collision_sink = collisions.clone();
        engine.notifications.on_collision =
            Some(Box::new(move |shielded| collision_sink.borrow_mut().push(shielded)));

        engine
            .state_mut()
            .effects
            .activate(PowerUpKind::Shield, 0);
        stage_hit(&mut engine);
        engine.update(10_500);
        assert!(!engine.is_game_over());
        assert!(!engine.has_shield());

        stage_hit(&mut engine);
        engine.update(11_000);
        assert!(engine.is_game_over());
        assert_eq!(engine.score(), 10);

        engine.update(20_000);
        stage_hit(&mut engine);
        engine.update(30_000);

        assert_eq!(*finals.borrow(), vec![10]);
        assert_eq!(*collisions.borrow(), vec![true, false]);
        assert_eq!(engine.score(), 10);
    }

    #[test]
    fn test_pause_resume_keeps_score() {
        let mut engine = Engine::new(config(), 0, |_| {});
        engine.update(2_500);
        let before = engine.score();
        assert_eq!(before, 25);

        assert!(engine.toggle_pause(2_500));
        engine.update(60_000);
        assert_eq!(engine.score(), before);

        assert!(!engine.toggle_pause(60_000));
        assert_eq!(engine.score(), before);

        engine.update(60_300);
        assert_eq!(engine.score(), 28);
    }

    #[test]
    fn test_pause_does_not_expire_effects() {
        let mut engine = Engine::new(config(), 0, |_| {});
        engine.update(0);
        engine
            .state_mut()
            .effects
            .activate(PowerUpKind::SpeedBoost, 0);
        engine.pause(1_000);
        engine.resume(30_000);
        engine.update(30_000);
        assert_eq!(engine.speed_multiplier(), 1.5);
        engine.update(34_000);
        assert_eq!(engine.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_toggle_pause_after_game_over() {
        let mut engine = Engine::new(config(), 0, |_| {});
        stage_hit(&mut engine);
        engine.update(100);
        assert!(engine.is_game_over());
        assert!(!engine.toggle_pause(200));
        assert!(!engine.is_paused());
    }

    #[test]
    fn test_binding_drives_intent() {
        let detached = Rc::new(Cell::new(0));
        let mut engine = Engine::new(config(), 0, |_| {});
        engine.attach_input(Box::new(CountingBinding {
            detached: detached.clone(),
            intent: TickInput {
                left: true,
                right: false,
            },
        }));

        let x = engine.state().player.pos.x;
        engine.update(16);
        assert_eq!(engine.state().player.pos.x, x - 8.0);
    }

    #[test]
    fn test_cleanup_twice_detaches_once() {
        let detached = Rc::new(Cell::new(0));
        let mut engine = Engine::new(config(), 0, |_| {});
        engine.attach_input(Box::new(CountingBinding {
            detached: detached.clone(),
            intent: TickInput::default(),
        }));

        engine.cleanup();
        engine.cleanup();
        drop(engine);
        assert_eq!(detached.get(), 1);
    }

    #[test]
    fn test_replacing_binding_detaches_previous() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut engine = Engine::new(config(), 0, |_| {});
        engine.attach_input(Box::new(CountingBinding {
            detached: first.clone(),
            intent: TickInput::default(),
        }));
        engine.attach_input(Box::new(CountingBinding {
            detached: second.clone(),
            intent: TickInput::default(),
        }));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);

        drop(engine);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_render_is_pure() {
        let mut engine = Engine::new(config(), 0, |_| {});
        engine.update(0);
        let score = engine.score();
        let obstacles = engine.state().obstacles.clone();
        let first = engine.render(ThemeBlend::Step);
        let second = engine.render(ThemeBlend::Step);
        assert!(!first.is_empty());
        assert_eq!(first.len(), second.len());
        assert_eq!(engine.score(), score);
        assert_eq!(engine.state().obstacles, obstacles);
    }
}
