//! Player-side components the guards and level logic talk to.
//!
//! Input handling and animation stay in the host; the simulation only
//! needs the lock flag, the visibility flag and the collected items.

use bevy::prelude::*;

use crate::components::{MovementSpeed, Velocity};

/// Player marker. Perception only considers entities carrying it.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(PlayerVisibility, MovementLock, Velocity, MovementSpeed, KeyRing, Objectives)]
pub struct Player;

/// "Is the player currently visible", owned by hiding spots.
///
/// Guards never detect a player with `visible == false`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct PlayerVisibility {
    pub visible: bool,
}

impl Default for PlayerVisibility {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Player movement lock (QTE, capture, hiding).
///
/// `lock`/`unlock` are idempotent; return true only on an actual change.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct MovementLock {
    pub locked: bool,
}

impl MovementLock {
    pub fn lock(&mut self) -> bool {
        let changed = !self.locked;
        self.locked = true;
        changed
    }

    pub fn unlock(&mut self) -> bool {
        let changed = self.locked;
        self.locked = false;
        changed
    }
}

/// Keys carried by the player (one key opens one door).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct KeyRing {
    pub keys: u32,
}

impl KeyRing {
    pub fn add(&mut self, amount: u32) {
        self.keys = self.keys.saturating_add(amount);
    }

    /// Consumes one key if available.
    pub fn try_use(&mut self) -> bool {
        if self.keys == 0 {
            return false;
        }
        self.keys -= 1;
        true
    }
}

/// Level objectives: materials that unlock the exit.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Objectives {
    pub materials_collected: u32,
    pub materials_required: u32,
}

impl Objectives {
    pub fn new(materials_required: u32) -> Self {
        Self {
            materials_collected: 0,
            materials_required,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.materials_collected >= self.materials_required
    }

    pub fn missing(&self) -> u32 {
        self.materials_required
            .saturating_sub(self.materials_collected)
    }
}

/// Temporary speed multiplier from a boot pickup.
///
/// A second pickup restarts the countdown instead of stacking.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SpeedBoost {
    pub multiplier: f32,
    pub remaining: f32,
}
