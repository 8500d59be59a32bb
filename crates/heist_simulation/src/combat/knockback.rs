//! Knockback: a short forced velocity that overrides locomotion.

use bevy::prelude::*;

/// Active impulse on a guard.
///
/// While `is_active()` the locomotion system writes `velocity` verbatim
/// and perception is suspended.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Knockback {
    pub velocity: Vec2,
    pub remaining: f32,
}

impl Knockback {
    /// Starts (or restarts) an impulse. A zero direction still suspends the
    /// guard for `duration`, it just doesn't move it.
    pub fn start(&mut self, direction: Vec2, force: f32, duration: f32) {
        self.velocity = direction.normalize_or_zero() * force.max(0.0);
        self.remaining = duration.max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn tick(&mut self, delta: f32) {
        if !self.is_active() {
            return;
        }
        self.remaining = (self.remaining - delta).max(0.0);
        if self.remaining <= 0.0 {
            self.velocity = Vec2::ZERO;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
