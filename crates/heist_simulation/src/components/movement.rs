//! Movement components: velocity, facing, speed.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Linear velocity (units/sec), written on the fixed tick.
///
/// Host physics body reads this; headless runs integrate it via
/// `HeadlessPhysicsPlugin`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec2);

/// Horizontal facing of a 2D sprite.
#[derive(
    Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize,
)]
#[reflect(Component)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }

    pub fn flipped(&self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Facing implied by a horizontal velocity; `None` for zero.
    pub fn from_horizontal(x: f32) -> Option<Self> {
        if x > 0.0 {
            Some(Facing::Right)
        } else if x < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }

    /// Keeps facing consistent with the last nonzero horizontal velocity.
    /// Returns true when the sprite has to flip.
    pub fn follow(&mut self, velocity: Vec2) -> bool {
        match Facing::from_horizontal(velocity.x) {
            Some(next) if next != *self => {
                *self = next;
                true
            }
            _ => false,
        }
    }
}

/// Base movement speed (units/sec).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub base: f32,
    pub current: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl MovementSpeed {
    pub fn new(base: f32) -> Self {
        Self {
            base,
            current: base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_follows_horizontal_sign() {
        let mut facing = Facing::Right;

        assert!(!facing.follow(Vec2::new(3.0, 1.0)));
        assert!(facing.follow(Vec2::new(-0.5, 0.0)));
        assert_eq!(facing, Facing::Left);

        // Vertical-only motion keeps the last facing
        assert!(!facing.follow(Vec2::new(0.0, 4.0)));
        assert_eq!(facing, Facing::Left);
    }

    #[test]
    fn test_facing_vector() {
        assert_eq!(Facing::Left.as_vec2(), Vec2::NEG_X);
        assert_eq!(Facing::Right.flipped(), Facing::Left);
    }
}
