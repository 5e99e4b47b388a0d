//! The player-controlled sprite

use glam::Vec2;

use super::collision::Aabb;
use crate::consts::*;

/// The player. Only moves horizontally; shield state lives in the active
/// effects, not here.
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Base speed in pixels per tick
    pub speed: f32,
    pub move_left: bool,
    pub move_right: bool,
    playfield_width: f32,
}

impl Player {
    /// Centered horizontally, resting just above the floor
    pub fn new(playfield_width: f32, playfield_height: f32) -> Self {
        let size = Vec2::splat(PLAYER_SIZE);
        Self {
            pos: Vec2::new(
                playfield_width / 2.0 - size.x / 2.0,
                playfield_height - size.y - PLAYER_FLOOR_MARGIN,
            ),
            size,
            speed: PLAYER_SPEED,
            move_left: false,
            move_right: false,
            playfield_width,
        }
    }

    pub fn set_intent(&mut self, left: bool, right: bool) {
        self.move_left = left;
        self.move_right = right;
    }

    /// Move one tick. The left delta is applied before the right delta, so
    /// holding both keys cancels out; the result is clamped to the playfield.
    pub fn advance(&mut self, speed_multiplier: f32) {
        let step = self.speed * speed_multiplier.max(0.0);

        if self.move_left {
            self.pos.x -= step;
        }
        if self.move_right {
            self.pos.x += step;
        }

        let max_x = (self.playfield_width - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_position() {
        let player = Player::new(600.0, 800.0);
        assert_eq!(player.pos, Vec2::new(280.0, 740.0));
        assert_eq!(player.size, Vec2::splat(40.0));
    }

    #[test]
    fn test_moves_by_speed() {
        let mut player = Player::new(600.0, 800.0);
        player.set_intent(true, false);
        player.advance(1.0);
        assert_eq!(player.pos.x, 272.0);

        player.set_intent(false, true);
        player.advance(1.5);
        assert_eq!(player.pos.x, 284.0);
    }

    #[test]
    fn test_both_directions_cancel() {
        let mut player = Player::new(600.0, 800.0);
        player.set_intent(true, true);
        player.advance(1.0);
        assert_eq!(player.pos.x, 280.0);
    }

    #[test]
    fn test_left_then_right_at_wall() {
        // Left is applied first and clamped only at the end of the tick
        let mut player = Player::new(600.0, 800.0);
        player.pos.x = 4.0;
        player.set_intent(true, true);
        player.advance(1.0);
        assert_eq!(player.pos.x, 4.0);
    }

    #[test]
    fn test_clamped_to_edges() {
        let mut player = Player::new(600.0, 800.0);
        player.pos.x = 3.0;
        player.set_intent(true, false);
        player.advance(1.0);
        assert_eq!(player.pos.x, 0.0);

        player.pos.x = 555.0;
        player.set_intent(false, true);
        player.advance(1.0);
        assert_eq!(player.pos.x, 560.0);
    }

    #[test]
    fn test_no_vertical_movement() {
        let mut player = Player::new(600.0, 800.0);
        let y = player.pos.y;
        player.set_intent(false, true);
        for _ in 0..10 {
            player.advance(1.5);
        }
        assert_eq!(player.pos.y, y);
    }

    proptest! {
        #[test]
        fn prop_always_inside_playfield(
            moves in proptest::collection::vec((any::<bool>(), any::<bool>(), 0.0f32..3.0), 0..200)
        ) {
            let mut player = Player::new(300.0, 400.0);
            for (left, right, mult) in moves {
                player.set_intent(left, right);
                player.advance(mult);
                prop_assert!(player.pos.x >= 0.0);
                prop_assert!(player.pos.x <= 300.0 - player.size.x);
            }
        }
    }
}
