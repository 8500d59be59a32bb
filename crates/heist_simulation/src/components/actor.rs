//! Health shared by guards (and anything else that can be knocked out).

use bevy::prelude::*;

/// Hit points.
///
/// Invariant: 0 ≤ current ≤ max. Damage only via `take_damage`,
/// restore only via `restore_full`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Returns the damage actually removed (clamped at zero).
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    pub fn restore_full(&mut self) {
        self.current = self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::new(2);

        assert_eq!(health.take_damage(1), 1);
        assert_eq!(health.current, 1);
        assert!(!health.is_depleted());

        assert_eq!(health.take_damage(5), 1); // saturating
        assert_eq!(health.current, 0);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_health_restore_full() {
        let mut health = Health::new(3);
        health.take_damage(3);
        health.restore_full();
        assert_eq!(health.current, 3);
    }
}
