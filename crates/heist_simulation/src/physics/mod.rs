//! Headless stand-in for the host physics body.
//!
//! Games run the guards on the host's kinematic bodies; headless runs (tests,
//! the demo binary) use this plugin instead:
//! - movement lock zeroes a locked player's velocity
//! - Velocity integrated into Transform on the fixed tick
//! - enter-only contacts: guard ↔ player proximity, guard ↔ `Wall` overlap

use std::collections::HashSet;

use bevy::prelude::*;

use crate::ai::{Guard, GuardCollision};
use crate::components::{MovementLock, Player, Velocity};

/// Guard ↔ player distance that counts as a body contact.
/// Larger than the cling offset so a held pair stays in contact.
pub const CONTACT_RADIUS: f32 = 0.75;

/// Solid axis-aligned obstacle centred on its Transform.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Wall {
    pub half_extents: Vec2,
}

impl Wall {
    pub fn contains(&self, center: Vec2, point: Vec2) -> bool {
        let offset = (point - center).abs();
        offset.x <= self.half_extents.x && offset.y <= self.half_extents.y
    }
}

/// System: locked players don't move
pub fn enforce_movement_lock(mut players: Query<(&MovementLock, &mut Velocity), With<Player>>) {
    for (lock, mut velocity) in players.iter_mut() {
        if lock.locked && velocity.0 != Vec2::ZERO {
            velocity.0 = Vec2::ZERO;
        }
    }
}

/// System: Transform += Velocity × dt
pub fn integrate_velocity(time: Res<Time<Fixed>>, mut bodies: Query<(&Velocity, &mut Transform)>) {
    let delta = time.delta_secs();

    for (velocity, mut transform) in bodies.iter_mut() {
        if velocity.0 == Vec2::ZERO {
            continue;
        }
        transform.translation += velocity.0.extend(0.0) * delta;
    }
}

/// System: emits `GuardCollision` when a guard starts touching a player or a wall
pub fn detect_contacts(
    guards: Query<(Entity, &Transform), With<Guard>>,
    players: Query<(Entity, &Transform), (With<Player>, Without<Guard>)>,
    walls: Query<(Entity, &Transform, &Wall), Without<Guard>>,
    mut touching: Local<HashSet<(Entity, Entity)>>,
    mut collisions: EventWriter<GuardCollision>,
) {
    let mut current = HashSet::new();

    for (guard, guard_transform) in guards.iter() {
        let position = guard_transform.translation.truncate();

        for (player, player_transform) in players.iter() {
            if position.distance(player_transform.translation.truncate()) <= CONTACT_RADIUS {
                current.insert((guard, player));
                if !touching.contains(&(guard, player)) {
                    collisions.write(GuardCollision {
                        guard,
                        other: player,
                        other_is_trigger: false,
                    });
                }
            }
        }

        for (wall, wall_transform, shape) in walls.iter() {
            if shape.contains(wall_transform.translation.truncate(), position) {
                current.insert((guard, wall));
                if !touching.contains(&(guard, wall)) {
                    collisions.write(GuardCollision {
                        guard,
                        other: wall,
                        other_is_trigger: false,
                    });
                }
            }
        }
    }

    *touching = current;
}

pub struct HeadlessPhysicsPlugin;

impl Plugin for HeadlessPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Wall>()
            .add_event::<GuardCollision>()
            .add_systems(
            FixedPostUpdate,
            (enforce_movement_lock, integrate_velocity, detect_contacts).chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_contains() {
        let wall = Wall {
            half_extents: Vec2::new(0.5, 2.0),
        };
        let center = Vec2::new(10.0, 0.0);

        assert!(wall.contains(center, Vec2::new(9.6, 1.5)));
        assert!(!wall.contains(center, Vec2::new(9.4, 0.0)));
        assert!(!wall.contains(center, Vec2::new(10.0, 2.5)));
    }
}
