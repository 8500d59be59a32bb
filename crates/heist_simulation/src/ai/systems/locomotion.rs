//! Guard locomotion: FSM state → Velocity on the fixed tick.

use bevy::prelude::*;

use crate::ai::{Guard, GuardConfig, GuardState};
use crate::combat::Knockback;
use crate::components::{Facing, Player, Velocity};

/// Velocity a guard should have this tick.
///
/// Priority: disabled (zero) > knockback > held/stunned (zero) > chase > patrol.
pub fn steer(
    state: &GuardState,
    config: &GuardConfig,
    facing: Facing,
    position: Vec2,
    target: Option<Vec2>,
    knockback: &Knockback,
) -> Vec2 {
    match state {
        GuardState::Incapacitated { .. } | GuardState::Captured { .. } => return Vec2::ZERO,
        _ if knockback.is_active() => return knockback.velocity,
        _ => {}
    }

    match state {
        GuardState::Chase { .. } => target
            .map(|t| (t - position).normalize_or_zero() * config.chase_speed())
            .unwrap_or(Vec2::ZERO),
        GuardState::Patrol if config.auto_patrol => facing.as_vec2() * config.patrol_speed,
        _ => Vec2::ZERO,
    }
}

/// System: steering + facing + knockback countdown
pub fn guard_locomotion(
    time: Res<Time<Fixed>>,
    mut guards: Query<
        (
            &GuardState,
            &GuardConfig,
            &Transform,
            &mut Facing,
            &mut Velocity,
            &mut Knockback,
        ),
        With<Guard>,
    >,
    players: Query<&Transform, (With<Player>, Without<Guard>)>,
) {
    let delta = time.delta_secs();

    for (state, config, transform, mut facing, mut velocity, mut knockback) in guards.iter_mut() {
        let target = state
            .target()
            .and_then(|t| players.get(t).ok())
            .map(|t| t.translation.truncate());

        let next = steer(
            state,
            config,
            *facing,
            transform.translation.truncate(),
            target,
            &knockback,
        );
        velocity.0 = next;
        facing.follow(next);
        knockback.tick(delta);
    }
}
