//! Per-frame simulation tick
//!
//! One call advances the run by one display frame. Movement is measured in
//! pixels per tick; timers are measured in run-time milliseconds.

use super::clock::{ThemeTransition, level_for_score, score_for_elapsed};
use super::state::{GameEvent, GamePhase, GameState};
use super::theme::theme_for_level;
use crate::consts::*;

/// Key state snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// Advance the game state by one frame at run time `now` (ms)
pub fn tick(state: &mut GameState, input: &TickInput, now: u64) {
    if state.phase != GamePhase::Playing {
        return;
    }

    update_progression(state, now);

    for kind in state.effects.sweep_expired(now) {
        log::debug!("{} expired at {}ms", kind.as_str(), now);
        state.events.push(GameEvent::PowerUpExpired(kind));
    }

    state.player.set_intent(input.left, input.right);
    state.player.advance(state.effects.speed_multiplier());

    spawn(state, now);

    let slow_motion = state.effects.slow_motion_multiplier();
    if resolve_obstacles(state, slow_motion) {
        return;
    }
    resolve_power_ups(state, now, slow_motion);
}

/// Score, level, theme and milestones
fn update_progression(state: &mut GameState, now: u64) {
    // Wall clocks can step backwards; score never does
    state.score = state.score.max(score_for_elapsed(now));

    let level = level_for_score(state.score);
    if level != state.level {
        let old_theme = state.theme;
        state.level = level;
        state.theme = theme_for_level(level);

        if old_theme.background[0] != state.theme.background[0] {
            state.theme_transition = Some(ThemeTransition::new(
                old_theme.background,
                state.theme.background,
            ));
        }

        log::info!("Level {} ({:?})", level, state.theme.name);
        state.events.push(GameEvent::LevelChanged {
            level,
            theme: state.theme.name,
        });
    }

    if let Some(transition) = state.theme_transition.as_mut() {
        if transition.step() {
            state.theme_transition = None;
        }
    }

    for milestone in state.milestones.advance(state.score) {
        log::debug!("Milestone {}", milestone);
        state.events.push(GameEvent::Milestone(milestone));
    }
}

fn spawn(state: &mut GameState, now: u64) {
    if let Some(obstacle) = state.spawner.try_spawn_obstacle(
        now,
        state.level,
        state.width,
        state.theme.obstacle,
        &mut state.rng,
    ) {
        log::debug!(
            "Obstacle at x={:.0} w={:.0} v={:.1}",
            obstacle.pos.x,
            obstacle.size.x,
            obstacle.velocity
        );
        state.obstacles.push(obstacle);
    }

    if let Some(power_up) =
        state
            .spawner
            .try_spawn_power_up(now, state.power_ups.len(), state.width, &mut state.rng)
    {
        log::debug!("{} power-up at x={:.0}", power_up.kind.as_str(), power_up.pos.x);
        state.power_ups.push(power_up);
    }
}

/// Move obstacles and resolve hits. Returns true if the run ended.
fn resolve_obstacles(state: &mut GameState, slow_motion: f32) -> bool {
    let player = state.player.bounds();
    let floor = state.height + OFFSCREEN_MARGIN;

    let mut i = 0;
    while i < state.obstacles.len() {
        let (hit, below) = {
            let obstacle = &mut state.obstacles[i];
            obstacle.pos.y += obstacle.velocity * slow_motion;
            (obstacle.bounds().overlaps(&player), obstacle.pos.y >= floor)
        };

        if hit {
            state.obstacles.remove(i);
            if state.effects.consume_shield() {
                log::debug!("Shield absorbed a hit");
                state.events.push(GameEvent::Collision { shielded: true });
                continue;
            }

            state.phase = GamePhase::GameOver;
            log::info!("Game over at score {} (level {})", state.score, state.level);
            state.events.push(GameEvent::Collision { shielded: false });
            state.events.push(GameEvent::GameOver { score: state.score });
            return true;
        }

        if below {
            state.obstacles.remove(i);
        } else {
            i += 1;
        }
    }

    false
}

/// Move power-ups and collect any the player touches
fn resolve_power_ups(state: &mut GameState, now: u64, slow_motion: f32) {
    let player = state.player.bounds();
    let floor = state.height + OFFSCREEN_MARGIN;

    let mut collected = Vec::new();
    state.power_ups.retain_mut(|power_up| {
        if power_up.collected {
            return false;
        }

        power_up.pos.y += POWER_UP_FALL_SPEED * slow_motion;

        if power_up.bounds().overlaps(&player) {
            power_up.collected = true;
            collected.push(power_up.kind);
            return false;
        }

        power_up.pos.y < floor
    });

    for kind in collected {
        let effect = state.effects.activate(kind, now);
        log::debug!("{} active until {}ms", kind.as_str(), effect.expires_at);
        state.events.push(GameEvent::PowerUpCollected(kind));
    }
}
