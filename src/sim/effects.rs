//! Timed power-up effects
//!
//! Effects are kept as a flat list of `(kind, expiry)` entries. Collecting a
//! power-up whose kind is already active appends a second entry rather than
//! extending the first, so one kind may have staggered expiries.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    SpeedBoost,
    Shield,
    SlowMotion,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shield,
        PowerUpKind::SlowMotion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "speedBoost",
            PowerUpKind::Shield => "shield",
            PowerUpKind::SlowMotion => "slowMotion",
        }
    }
}

/// One granted effect and the run time (ms) at which it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub expires_at: u64,
}

/// All currently active effects, in activation order
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    entries: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant an effect lasting `EFFECT_DURATION_MS` from `now`
    pub fn activate(&mut self, kind: PowerUpKind, now: u64) -> ActiveEffect {
        let effect = ActiveEffect {
            kind,
            expires_at: now + EFFECT_DURATION_MS,
        };
        self.entries.push(effect);
        effect
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// The player is shielded exactly while a shield effect is live
    pub fn has_shield(&self) -> bool {
        self.is_active(PowerUpKind::Shield)
    }

    /// Spend the shield on a hit. Removes every shield entry; returns false
    /// if there was none to spend.
    pub fn consume_shield(&mut self) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != PowerUpKind::Shield);
        self.entries.len() != before
    }

    /// Drop effects whose expiry is at or before `now`, returning their kinds
    pub fn sweep_expired(&mut self, now: u64) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.entries.retain(|e| {
            if now >= e.expires_at {
                expired.push(e.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Multiplier on the player's horizontal speed
    pub fn speed_multiplier(&self) -> f32 {
        if self.is_active(PowerUpKind::SpeedBoost) {
            SPEED_BOOST_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Multiplier on every falling entity's speed
    pub fn slow_motion_multiplier(&self) -> f32 {
        if self.is_active(PowerUpKind::SlowMotion) {
            SLOW_MOTION_MULTIPLIER
        } else {
            1.0
        }
    }

    pub fn as_slice(&self) -> &[ActiveEffect] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_boost_window() {
        let mut effects = ActiveEffects::new();
        assert_eq!(effects.speed_multiplier(), 1.0);

        let effect = effects.activate(PowerUpKind::SpeedBoost, 1_000);
        assert_eq!(effect.expires_at, 6_000);
        assert_eq!(effects.speed_multiplier(), 1.5);

        assert!(effects.sweep_expired(5_999).is_empty());
        assert_eq!(effects.speed_multiplier(), 1.5);

        assert_eq!(effects.sweep_expired(6_000), vec![PowerUpKind::SpeedBoost]);
        assert_eq!(effects.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_slow_motion_multiplier() {
        let mut effects = ActiveEffects::new();
        assert_eq!(effects.slow_motion_multiplier(), 1.0);
        effects.activate(PowerUpKind::SlowMotion, 0);
        assert_eq!(effects.slow_motion_multiplier(), 0.5);
        assert_eq!(effects.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_reactivation_appends() {
        let mut effects = ActiveEffects::new();
        effects.activate(PowerUpKind::Shield, 0);
        effects.activate(PowerUpKind::Shield, 2_000);
        assert_eq!(effects.len(), 2);

        // First entry expires, the later one keeps the shield up
        effects.sweep_expired(5_000);
        assert!(effects.has_shield());
        effects.sweep_expired(7_000);
        assert!(!effects.has_shield());
    }

    #[test]
    fn test_consume_shield_removes_all_shield_entries() {
        let mut effects = ActiveEffects::new();
        effects.activate(PowerUpKind::Shield, 0);
        effects.activate(PowerUpKind::SpeedBoost, 0);
        effects.activate(PowerUpKind::Shield, 100);

        assert!(effects.consume_shield());
        assert!(!effects.has_shield());
        assert_eq!(effects.as_slice().len(), 1);
        assert_eq!(effects.as_slice()[0].kind, PowerUpKind::SpeedBoost);

        assert!(!effects.consume_shield());
    }

    #[test]
    fn test_kind_names() {
        let names: Vec<_> = PowerUpKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["speedBoost", "shield", "slowMotion"]);
        assert_eq!(
            serde_json::to_string(&PowerUpKind::SlowMotion).unwrap(),
            "\"slowMotion\""
        );
    }
}
