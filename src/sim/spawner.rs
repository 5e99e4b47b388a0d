//! Obstacle and power-up spawning
//!
//! Each kind of spawn is gated on the time since its own last successful
//! spawn. A kind that has never spawned is due immediately.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effects::PowerUpKind;
use super::state::{Obstacle, PowerUp};
use super::theme::Oklch;
use crate::consts::*;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Obstacle spawn interval at level 1
    pub fn spawn_interval_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 2000,
            Difficulty::Medium => 1500,
            Difficulty::Hard => 1000,
        }
    }

    /// Obstacle fall speed at level 1 (pixels per tick)
    pub fn obstacle_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 2.5,
            Difficulty::Medium => 3.0,
            Difficulty::Hard => 4.0,
        }
    }

    /// Obstacle interval for a level: 100ms shorter per two levels, never
    /// below the floor
    pub fn obstacle_interval_ms(&self, level: u32) -> u64 {
        let reduction = (level / 2) as u64 * OBSTACLE_INTERVAL_STEP_MS;
        self.spawn_interval_ms()
            .saturating_sub(reduction)
            .max(OBSTACLE_INTERVAL_FLOOR_MS)
    }

    /// Obstacle fall speed for a level: +0.5 per two levels
    pub fn obstacle_speed_at(&self, level: u32) -> f32 {
        self.obstacle_speed() + (level / 2) as f32 * OBSTACLE_SPEED_STEP
    }
}

/// Spawn gates for one run
#[derive(Debug, Clone)]
pub struct Spawner {
    difficulty: Difficulty,
    last_obstacle_at: Option<u64>,
    last_power_up_at: Option<u64>,
    /// Gate for the next power-up, redrawn after every power-up spawn
    power_up_interval_ms: u64,
}

impl Spawner {
    pub fn new<R: Rng>(difficulty: Difficulty, rng: &mut R) -> Self {
        Self {
            difficulty,
            last_obstacle_at: None,
            last_power_up_at: None,
            power_up_interval_ms: draw_power_up_interval(rng),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn power_up_interval_ms(&self) -> u64 {
        self.power_up_interval_ms
    }

    pub fn obstacle_due(&self, now: u64, level: u32) -> bool {
        match self.last_obstacle_at {
            None => true,
            Some(last) => now.saturating_sub(last) > self.difficulty.obstacle_interval_ms(level),
        }
    }

    pub fn power_up_due(&self, now: u64, live_power_ups: usize) -> bool {
        if live_power_ups >= MAX_LIVE_POWER_UPS {
            return false;
        }
        match self.last_power_up_at {
            None => true,
            Some(last) => now.saturating_sub(last) > self.power_up_interval_ms,
        }
    }

    /// Spawn one obstacle above the playfield if the gate is open
    pub fn try_spawn_obstacle<R: Rng>(
        &mut self,
        now: u64,
        level: u32,
        playfield_width: f32,
        color: Oklch,
        rng: &mut R,
    ) -> Option<Obstacle> {
        if !self.obstacle_due(now, level) {
            return None;
        }

        let width = OBSTACLE_MIN_WIDTH + rng.random::<f32>() * (OBSTACLE_MAX_WIDTH - OBSTACLE_MIN_WIDTH);
        let x = rng.random::<f32>() * (playfield_width - width).max(0.0);

        self.last_obstacle_at = Some(now);
        Some(Obstacle {
            pos: Vec2::new(x, OBSTACLE_SPAWN_Y),
            size: Vec2::new(width, OBSTACLE_HEIGHT),
            velocity: self.difficulty.obstacle_speed_at(level),
            color,
        })
    }

    /// Spawn one power-up above the playfield if the gate is open and fewer
    /// than the maximum are live
    pub fn try_spawn_power_up<R: Rng>(
        &mut self,
        now: u64,
        live_power_ups: usize,
        playfield_width: f32,
        rng: &mut R,
    ) -> Option<PowerUp> {
        if !self.power_up_due(now, live_power_ups) {
            return None;
        }

        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let x = rng.random::<f32>() * (playfield_width - POWER_UP_SIZE).max(0.0);

        self.last_power_up_at = Some(now);
        self.power_up_interval_ms = draw_power_up_interval(rng);
        Some(PowerUp {
            kind,
            pos: Vec2::new(x, -POWER_UP_SIZE),
            size: Vec2::splat(POWER_UP_SIZE),
            collected: false,
        })
    }
}

fn draw_power_up_interval<R: Rng>(rng: &mut R) -> u64 {
    rng.random_range(POWER_UP_INTERVAL_MIN_MS..POWER_UP_INTERVAL_MAX_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const GREY: Oklch = Oklch::new(0.5, 0.0, 0.0);

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_difficulty_table() {
        assert_eq!(Difficulty::Easy.spawn_interval_ms(), 2000);
        assert_eq!(Difficulty::Medium.spawn_interval_ms(), 1500);
        assert_eq!(Difficulty::Hard.spawn_interval_ms(), 1000);
        assert_eq!(Difficulty::Easy.obstacle_speed(), 2.5);
        assert_eq!(Difficulty::Medium.obstacle_speed(), 3.0);
        assert_eq!(Difficulty::Hard.obstacle_speed(), 4.0);
    }

    #[test]
    fn test_interval_shrinks_every_two_levels() {
        let d = Difficulty::Easy;
        assert_eq!(d.obstacle_interval_ms(1), 2000);
        assert_eq!(d.obstacle_interval_ms(2), 1900);
        assert_eq!(d.obstacle_interval_ms(3), 1900);
        assert_eq!(d.obstacle_interval_ms(10), 1500);
        assert_eq!(Difficulty::Hard.obstacle_interval_ms(14), 300);
        assert_eq!(Difficulty::Hard.obstacle_interval_ms(40), 300);
    }

    #[test]
    fn test_speed_grows_every_two_levels() {
        assert_eq!(Difficulty::Medium.obstacle_speed_at(1), 3.0);
        assert_eq!(Difficulty::Medium.obstacle_speed_at(2), 3.5);
        assert_eq!(Difficulty::Medium.obstacle_speed_at(5), 4.0);
    }

    #[test]
    fn test_difficulty_parse() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::parse("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("nightmare"), None);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_obstacle_gate_one_second_apart() {
        let mut rng = rng();
        let mut spawner = Spawner::new(Difficulty::Easy, &mut rng);
        let first = spawner.try_spawn_obstacle(0, 1, 600.0, GREY, &mut rng);
        let second = spawner.try_spawn_obstacle(1000, 1, 600.0, GREY, &mut rng);
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn test_obstacle_gate_past_interval() {
        let mut rng = rng();
        let mut spawner = Spawner::new(Difficulty::Easy, &mut rng);
        assert!(spawner.try_spawn_obstacle(0, 1, 600.0, GREY, &mut rng).is_some());
        assert!(spawner.try_spawn_obstacle(2100, 1, 600.0, GREY, &mut rng).is_some());
    }

    #[test]
    fn test_obstacle_gate_is_strict() {
        let mut rng = rng();
        let mut spawner = Spawner::new(Difficulty::Easy, &mut rng);
        spawner.try_spawn_obstacle(0, 1, 600.0, GREY, &mut rng);
        assert!(!spawner.obstacle_due(2000, 1));
        assert!(spawner.obstacle_due(2001, 1));
    }

    #[test]
    fn test_obstacle_shape() {
        let mut rng = rng();
        let mut spawner = Spawner::new(Difficulty::Hard, &mut rng);
        for i in 0..50 {
            let o = spawner
                .try_spawn_obstacle(i * 5_000, 4, 600.0, GREY, &mut rng)
                .expect("gate open");
            assert!(o.size.x >= 40.0 && o.size.x < 80.0);
            assert_eq!(o.size.y, 40.0);
            assert!(o.pos.x >= 0.0 && o.pos.x + o.size.x <= 600.0);
            assert_eq!(o.pos.y, -50.0);
            assert_eq!(o.velocity, 5.0);
            assert_eq!(o.color, GREY);
        }
    }

    #[test]
    fn test_power_up_interval_in_range() {
        let mut rng = rng();
        let mut spawner = Spawner::new(Difficulty::Medium, &mut rng);
        let mut now = 0;
        for _ in 0..20 {
            let interval = spawner.power_up_interval_ms();
            assert!((10_000..15_000).contains(&interval));
            assert!(spawner.try_spawn_power_up(now, 0, 600.0, &mut rng).is_some());
            now += 20_000;
        }
    }

    #[test]
    fn test_power_up_gate() {
        let mut rng = rng();
        let mut spawner = Spawner::new(Difficulty::Medium, &mut rng);
        let p = spawner.try_spawn_power_up(0, 0, 600.0, &mut rng).expect("first spawn");
        assert_eq!(p.size, Vec2::splat(32.0));
        assert_eq!(p.pos.y, -32.0);
        assert!(!p.collected);

        // Never before 10 seconds
        assert!(spawner.try_spawn_power_up(9_999, 0, 600.0, &mut rng).is_none());
        // Always after 15 seconds
        assert!(spawner.try_spawn_power_up(15_001, 0, 600.0, &mut rng).is_some());
    }

    #[test]
    fn test_power_up_cap() {
        let mut rng = rng();
        let mut spawner = Spawner::new(Difficulty::Medium, &mut rng);
        assert!(spawner.try_spawn_power_up(0, 2, 600.0, &mut rng).is_none());
        assert!(spawner.try_spawn_power_up(0, 1, 600.0, &mut rng).is_some());
    }
}
