//! Guard damage: knockback on non-lethal hits, incapacitation on lethal ones.
//!
//! Hitting a guard that is holding the player cancels the QTE and frees the
//! player. Guards that are already down ignore hits entirely.

use bevy::prelude::*;

use super::Knockback;
use crate::ai::systems::release_hold;
use crate::ai::{Guard, GuardConfig, GuardIncapacitated, GuardState, GuardTint, QteUiEvent};
use crate::audio::{GuardAudio, MusicDirector};
use crate::components::{Health, MovementLock, Player, Velocity};

/// Damage request: `applyDamage(amount, knockbackDirection)`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequested {
    pub target: Entity,
    pub amount: u32,
    pub knockback_direction: Vec2,
}

/// What a hit did to a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Guard is already down
    Ignored,
    Knockback,
    Incapacitated,
}

/// Applies the damage to `health` unless the guard is already down.
pub fn resolve_hit(state: &GuardState, health: &mut Health, amount: u32) -> HitOutcome {
    if state.is_incapacitated() {
        return HitOutcome::Ignored;
    }

    health.take_damage(amount);
    if health.is_depleted() {
        HitOutcome::Incapacitated
    } else {
        HitOutcome::Knockback
    }
}

/// System: DamageRequested → guard health, knockback, incapacitation
pub fn apply_guard_damage(
    mut requests: EventReader<DamageRequested>,
    mut guards: Query<
        (
            &mut GuardState,
            &mut Health,
            &mut Knockback,
            &mut Velocity,
            &mut GuardAudio,
            &mut GuardTint,
            &GuardConfig,
        ),
        With<Guard>,
    >,
    mut players: Query<&mut MovementLock, (With<Player>, Without<Guard>)>,
    mut music: MusicDirector,
    mut qte_ui: EventWriter<QteUiEvent>,
    mut incapacitated: EventWriter<GuardIncapacitated>,
) {
    for request in requests.read() {
        let guard = request.target;
        let Ok((mut state, mut health, mut knockback, mut velocity, mut audio, mut tint, config)) =
            guards.get_mut(guard)
        else {
            crate::log_warning(&format!("DamageRequested: {:?} is not a guard", guard));
            continue;
        };

        let previous = *state;
        let outcome = resolve_hit(&previous, &mut health, request.amount);
        if outcome == HitOutcome::Ignored {
            crate::log(&format!(
                "Guard {:?}: hit ignored ({})",
                guard,
                previous.name()
            ));
            continue;
        }

        if let GuardState::Contact { target, .. } = previous {
            let mut lock = players.get_mut(target).ok();
            release_hold(
                guard,
                lock.as_deref_mut(),
                &mut audio,
                &mut music,
                &mut qte_ui,
            );
            *state = GuardState::Patrol;
            crate::log(&format!("💥 Guard {:?}: Contact → Patrol (hit during QTE)", guard));
        }

        match outcome {
            HitOutcome::Incapacitated => {
                velocity.0 = Vec2::ZERO;
                knockback.clear();
                music.stop_all(guard, &mut audio);
                *tint = GuardTint::Incapacitated;
                *state = GuardState::Incapacitated {
                    remaining: config.incapacitation_duration,
                };
                incapacitated.write(GuardIncapacitated { guard });
                crate::log(&format!(
                    "💀 Guard {:?}: {} → Incapacitated ({:.1}s)",
                    guard,
                    previous.name(),
                    config.incapacitation_duration
                ));
            }
            HitOutcome::Knockback => {
                knockback.start(
                    request.knockback_direction,
                    config.knockback_force,
                    config.knockback_duration,
                );
                crate::log(&format!(
                    "🥊 Guard {:?}: hit for {}, health {}/{}",
                    guard, request.amount, health.current, health.max
                ));
            }
            HitOutcome::Ignored => {}
        }
    }
}
